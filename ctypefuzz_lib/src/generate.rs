//! Random type generation.
//!
//! The order of the draws is fixed, so a [`ScriptedEntropy`](crate::entropy::ScriptedEntropy) can
//! force any shape:
//!
//! - a node above the depth limit first draws `chance(fn_ptr_bias)`, and if that is false
//!   `range(0, 1)`, where 0 is a scalar and 1 a pointer. A pointee skips the first draw.
//! - a function pointer draws its parameter count with `range(0, param_max)`, then generates its
//!   parameters in order and its return type last.
//! - a pointer generates its pointee and then its qualifiers.
//! - a scalar draws `range(0, 12)` into [`BaseType::CATALOGUE`] unless `only_int` is set, then its
//!   qualifiers.
//! - qualifiers draw `chance(cv_chance)` for `const` and then for `volatile`, unless `no_cv` is set.

use tracing::{debug, warn};

use crate::{
    entropy::Entropy,
    settings::GenerateOpts,
    ty::{BaseType, FunctionPointer, Pointee, Pointer, Qualifiers, Scalar, TypeNode},
};

/// Generates one random type. The result is never deeper than `opts.depth()`.
pub fn generate<E: Entropy + ?Sized>(opts: &GenerateOpts, entropy: &mut E) -> TypeNode {
    debug!(
        depth = opts.depth(),
        param_max = opts.param_max(),
        only_int = opts.only_int(),
        no_cv = opts.no_cv(),
        fn_ptr_bias = opts.fn_ptr_bias(),
        "generating type"
    );

    let mut generator = Generator {
        opts,
        entropy,
        nodes: 0,
        clamped: false,
    };
    let ty = generator.node(1);

    if generator.clamped {
        warn!(
            max_nodes = opts.max_nodes(),
            nodes = generator.nodes,
            "node budget reached, remaining nodes were generated as scalars"
        );
    }
    debug!(depth = ty.depth(), nodes = generator.nodes, "generated type");
    ty
}

struct Generator<'a, E: ?Sized> {
    opts: &'a GenerateOpts,
    entropy: &'a mut E,
    nodes: usize,
    clamped: bool,
}

impl<E: Entropy + ?Sized> Generator<'_, E> {
    /// Whether a node at `depth` has to be a scalar.
    fn at_limit(&mut self, depth: u32) -> bool {
        if depth >= self.opts.depth() {
            return true;
        }
        if self.nodes >= self.opts.max_nodes() {
            self.clamped = true;
            return true;
        }
        false
    }

    fn node(&mut self, depth: u32) -> TypeNode {
        if self.at_limit(depth) {
            return self.scalar().into();
        }
        if self.entropy.chance(self.opts.fn_ptr_bias()) {
            return self.function_pointer(depth).into();
        }
        match self.entropy.range(0, 1) {
            0 => self.scalar().into(),
            _ => self.pointer(depth).into(),
        }
    }

    fn pointee(&mut self, depth: u32) -> Pointee {
        if self.at_limit(depth) {
            return self.scalar().into();
        }
        match self.entropy.range(0, 1) {
            0 => self.scalar().into(),
            _ => self.pointer(depth).into(),
        }
    }

    fn function_pointer(&mut self, depth: u32) -> FunctionPointer {
        self.nodes += 1;
        let count = self.entropy.range(0, self.opts.param_max());
        let params = (0..count).map(|_| self.node(depth + 1)).collect();
        let return_type = self.node(depth + 1);
        FunctionPointer::new(return_type, params)
    }

    fn pointer(&mut self, depth: u32) -> Pointer {
        self.nodes += 1;
        let pointee = self.pointee(depth + 1);
        let qualifiers = self.qualifiers();
        Pointer::new(pointee, qualifiers)
    }

    fn scalar(&mut self) -> Scalar {
        self.nodes += 1;
        let base = if self.opts.only_int() {
            BaseType::Int
        } else {
            let last = BaseType::CATALOGUE.len() as u32 - 1;
            BaseType::CATALOGUE[self.entropy.range(0, last) as usize]
        };
        Scalar::new(base, self.qualifiers())
    }

    fn qualifiers(&mut self) -> Qualifiers {
        if self.opts.no_cv() {
            return Qualifiers::NONE;
        }
        let is_const = self.entropy.chance(self.opts.cv_chance());
        let is_volatile = self.entropy.chance(self.opts.cv_chance());
        Qualifiers::new(is_const, is_volatile)
    }
}
