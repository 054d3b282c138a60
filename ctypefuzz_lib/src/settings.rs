/// The deepest type the generator will be asked to build. Generation and rendering recurse once
/// per level.
pub const MAX_DEPTH: u32 = 128;

/// The most parameters a generated function pointer can have.
pub const MAX_PARAMS: u32 = 32;

/// The largest node budget. At this size a typedef is already tens of megabytes long.
pub const MAX_NODES: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOpts {
    depth: u32,
    param_max: u32,
    only_int: bool,
    no_cv: bool,
    fn_ptr_bias: f64,
    cv_chance: f64,
    max_nodes: usize,
}

impl GenerateOpts {
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn param_max(&self) -> u32 {
        self.param_max
    }

    pub fn only_int(&self) -> bool {
        self.only_int
    }

    pub fn no_cv(&self) -> bool {
        self.no_cv
    }

    pub fn fn_ptr_bias(&self) -> f64 {
        self.fn_ptr_bias
    }

    pub fn cv_chance(&self) -> f64 {
        self.cv_chance
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }
}

#[derive(Debug, Clone)]
pub struct GenerateOptsBuilder {
    depth: u32,
    param_max: u32,
    only_int: bool,
    no_cv: bool,
    fn_ptr_bias: f64,
    cv_chance: f64,
    max_nodes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOptsErr {
    ZeroDepth,
    DepthTooLarge(u32),
    TooManyParams(u32),
    InvalidProbability(&'static str, f64),
    ZeroNodeBudget,
    TooManyNodes(usize),
}

impl std::fmt::Display for GenerateOptsErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateOptsErr::ZeroDepth => write!(f, "The depth has to be at least 1."),
            GenerateOptsErr::DepthTooLarge(depth) => {
                write!(f, "A depth of {depth} is above the maximum of {MAX_DEPTH}.")
            }
            GenerateOptsErr::TooManyParams(count) => write!(
                f,
                "Can't generate up to {count} parameters, the maximum is {MAX_PARAMS}."
            ),
            GenerateOptsErr::InvalidProbability(name, p) => {
                write!(f, "The {name} has to be between 0 and 1, got {p}.")
            }
            GenerateOptsErr::ZeroNodeBudget => write!(f, "The node budget can't be 0."),
            GenerateOptsErr::TooManyNodes(count) => write!(
                f,
                "A node budget of {count} is above the maximum of {MAX_NODES}."
            ),
        }
    }
}

impl std::error::Error for GenerateOptsErr {}

impl Default for GenerateOptsBuilder {
    fn default() -> Self {
        Self {
            depth: 1,
            param_max: 5,
            only_int: false,
            no_cv: false,
            fn_ptr_bias: 1.0,
            cv_chance: 0.3,
            max_nodes: 1 << 16,
        }
    }
}

impl GenerateOptsBuilder {
    /// Depth 1, up to 5 parameters, every type and qualifier allowed and a function pointer at
    /// every level that isn't the last.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn param_max(mut self, param_max: u32) -> Self {
        self.param_max = param_max;
        self
    }

    /// Restrict every scalar to `int`
    pub fn only_int(mut self, only_int: bool) -> Self {
        self.only_int = only_int;
        self
    }

    /// Never generate `const` or `volatile`
    pub fn no_cv(mut self, no_cv: bool) -> Self {
        self.no_cv = no_cv;
        self
    }

    /// The chance that a level above the depth limit becomes a function pointer.
    pub fn fn_ptr_bias(mut self, fn_ptr_bias: f64) -> Self {
        self.fn_ptr_bias = fn_ptr_bias;
        self
    }

    /// The chance for each of `const` and `volatile` to be added to a scalar or pointer.
    pub fn cv_chance(mut self, cv_chance: f64) -> Self {
        self.cv_chance = cv_chance;
        self
    }

    /// After this many nodes every remaining node is generated as a scalar.
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn build(self) -> Result<GenerateOpts, GenerateOptsErr> {
        if self.depth == 0 {
            return Err(GenerateOptsErr::ZeroDepth);
        }
        if self.depth > MAX_DEPTH {
            return Err(GenerateOptsErr::DepthTooLarge(self.depth));
        }
        if self.param_max > MAX_PARAMS {
            return Err(GenerateOptsErr::TooManyParams(self.param_max));
        }
        for (name, p) in [
            ("function pointer bias", self.fn_ptr_bias),
            ("qualifier chance", self.cv_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GenerateOptsErr::InvalidProbability(name, p));
            }
        }
        if self.max_nodes == 0 {
            return Err(GenerateOptsErr::ZeroNodeBudget);
        }
        if self.max_nodes > MAX_NODES {
            return Err(GenerateOptsErr::TooManyNodes(self.max_nodes));
        }

        Ok(GenerateOpts {
            depth: self.depth,
            param_max: self.param_max,
            only_int: self.only_int,
            no_cv: self.no_cv,
            fn_ptr_bias: self.fn_ptr_bias,
            cv_chance: self.cv_chance,
            max_nodes: self.max_nodes,
        })
    }
}
