use std::fmt::Display;

/// A generated C type.
///
/// Each node owns its children, so a tree is built once and dropped as a whole. A pointer can never
/// point directly at a function pointer, see [`Pointee`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Scalar(Scalar),
    Pointer(Pointer),
    FunctionPointer(FunctionPointer),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
}

impl Qualifiers {
    pub const NONE: Qualifiers = Qualifiers {
        is_const: false,
        is_volatile: false,
    };

    pub fn new(is_const: bool, is_volatile: bool) -> Self {
        Self {
            is_const,
            is_volatile,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_const && !self.is_volatile
    }
}

impl Display for Qualifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match (self.is_const, self.is_volatile) {
            (true, true) => "const volatile",
            (true, false) => "const",
            (false, true) => "volatile",
            (false, false) => "",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    /// Never drawn by the generator, only usable in hand built trees.
    Void,
    Char,
    Short,
    Int,
    Long,
    LongLong,
    UnsignedChar,
    UnsignedShort,
    UnsignedInt,
    UnsignedLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
}

impl BaseType {
    /// The base types the generator picks from, indexed by a uniform draw.
    pub const CATALOGUE: [BaseType; 13] = [
        BaseType::Char,
        BaseType::Short,
        BaseType::Int,
        BaseType::Long,
        BaseType::LongLong,
        BaseType::UnsignedChar,
        BaseType::UnsignedShort,
        BaseType::UnsignedInt,
        BaseType::UnsignedLong,
        BaseType::UnsignedLongLong,
        BaseType::Float,
        BaseType::Double,
        BaseType::LongDouble,
    ];

    pub fn spelling(&self) -> &'static str {
        match self {
            BaseType::Void => "void",
            BaseType::Char => "char",
            BaseType::Short => "short",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::LongLong => "long long",
            BaseType::UnsignedChar => "unsigned char",
            BaseType::UnsignedShort => "unsigned short",
            BaseType::UnsignedInt => "unsigned int",
            BaseType::UnsignedLong => "unsigned long",
            BaseType::UnsignedLongLong => "unsigned long long",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::LongDouble => "long double",
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spelling())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    pub base: BaseType,
    pub qualifiers: Qualifiers,
}

impl Scalar {
    pub fn new(base: BaseType, qualifiers: Qualifiers) -> Self {
        Self { base, qualifiers }
    }

    pub fn plain(base: BaseType) -> Self {
        Self::new(base, Qualifiers::NONE)
    }
}

/// The qualifiers belong to the pointer itself, so `Pointer { qualifiers: const, .. }` over `int`
/// is `int * const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub pointee: Pointee,
    pub qualifiers: Qualifiers,
}

impl Pointer {
    pub fn new(pointee: impl Into<Pointee>, qualifiers: Qualifiers) -> Self {
        Self {
            pointee: pointee.into(),
            qualifiers,
        }
    }
}

/// What a [`Pointer`] may point at.
///
/// Pointers to function pointers are not generated, so they can't be represented either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pointee {
    Scalar(Scalar),
    Pointer(Box<Pointer>),
}

impl From<Scalar> for Pointee {
    fn from(value: Scalar) -> Self {
        Pointee::Scalar(value)
    }
}

impl From<Pointer> for Pointee {
    fn from(value: Pointer) -> Self {
        Pointee::Pointer(Box::new(value))
    }
}

impl Pointee {
    pub fn depth(&self) -> usize {
        match self {
            Pointee::Scalar(_) => 1,
            Pointee::Pointer(p) => 1 + p.pointee.depth(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Pointee::Scalar(_) => 1,
            Pointee::Pointer(p) => 1 + p.pointee.node_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPointer {
    pub return_type: Box<TypeNode>,
    pub params: Vec<TypeNode>,
}

impl FunctionPointer {
    pub fn new(return_type: impl Into<TypeNode>, params: Vec<TypeNode>) -> Self {
        Self {
            return_type: Box::new(return_type.into()),
            params,
        }
    }
}

impl From<Scalar> for TypeNode {
    fn from(value: Scalar) -> Self {
        TypeNode::Scalar(value)
    }
}

impl From<Pointer> for TypeNode {
    fn from(value: Pointer) -> Self {
        TypeNode::Pointer(value)
    }
}

impl From<FunctionPointer> for TypeNode {
    fn from(value: FunctionPointer) -> Self {
        TypeNode::FunctionPointer(value)
    }
}

impl From<Pointee> for TypeNode {
    fn from(value: Pointee) -> Self {
        match value {
            Pointee::Scalar(s) => TypeNode::Scalar(s),
            Pointee::Pointer(p) => TypeNode::Pointer(*p),
        }
    }
}

impl TypeNode {
    /// The root counts as depth 1.
    pub fn depth(&self) -> usize {
        match self {
            TypeNode::Scalar(_) => 1,
            TypeNode::Pointer(p) => 1 + p.pointee.depth(),
            TypeNode::FunctionPointer(f) => {
                let params = f.params.iter().map(TypeNode::depth).max().unwrap_or(0);
                1 + params.max(f.return_type.depth())
            }
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            TypeNode::Scalar(_) => 1,
            TypeNode::Pointer(p) => 1 + p.pointee.node_count(),
            TypeNode::FunctionPointer(f) => {
                1 + f.return_type.node_count()
                    + f.params.iter().map(TypeNode::node_count).sum::<usize>()
            }
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeNode::Scalar(_))
    }
}

/// Writes the type name, that is the declarator without an identifier, e.g. `int (*)(char p0)`.
impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.declare(""))
    }
}
