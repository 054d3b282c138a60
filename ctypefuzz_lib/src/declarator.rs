//! Turns a [`TypeNode`] into C declarator syntax.
//!
//! C declarators are read inside out: the identifier sits in the middle and every derivation wraps
//! around it. A pointer adds a `*` left of what it wraps, a function pointer adds `(*...)(params)`
//! around it. Because `()` binds tighter than `*`, a function pointer can't be written by simply
//! prefixing its return type. Instead the function pointer builds its `(*inner)(params)` fragment
//! and hands it to its return type through [`TypeNode::as_return`], which repeats the process when
//! the return type is a function pointer itself.

use std::fmt::Display;

use crate::ty::{FunctionPointer, Pointee, Pointer, Qualifiers, Scalar, TypeNode};

/// Every keyword from C89 up to C23. None of these can name a typedef.
const KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "auto",
    "bool",
    "break",
    "case",
    "char",
    "const",
    "constexpr",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "false",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "nullptr",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "struct",
    "switch",
    "thread_local",
    "true",
    "typedef",
    "typeof",
    "typeof_unqual",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_BitInt",
    "_Bool",
    "_Complex",
    "_Decimal128",
    "_Decimal32",
    "_Decimal64",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaratorErr {
    EmptyName,
    NotAnIdentifier(String),
    Keyword(String),
}

impl Display for DeclaratorErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaratorErr::EmptyName => write!(f, "The declared name can't be empty."),
            DeclaratorErr::NotAnIdentifier(name) => {
                write!(f, "`{name}` is not a valid C identifier.")
            }
            DeclaratorErr::Keyword(name) => {
                write!(f, "`{name}` is a C keyword and can't be declared.")
            }
        }
    }
}

impl std::error::Error for DeclaratorErr {}

/// Checks that `name` can be used as the identifier of a declaration.
pub fn validate_name(name: &str) -> Result<(), DeclaratorErr> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(DeclaratorErr::EmptyName);
    };

    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(DeclaratorErr::NotAnIdentifier(name.to_owned()));
    }
    if KEYWORDS.contains(&name) {
        return Err(DeclaratorErr::Keyword(name.to_owned()));
    }
    Ok(())
}

/// Renders the declaration of `name` with type `root`, without the trailing `;`.
pub fn render(root: &TypeNode, name: &str) -> Result<String, DeclaratorErr> {
    validate_name(name)?;
    Ok(root.declare(name))
}

/// Renders `typedef <declaration>;`.
pub fn typedef(root: &TypeNode, name: &str) -> Result<String, DeclaratorErr> {
    Ok(format!("typedef {};", render(root, name)?))
}

fn push_qualifiers(out: &mut String, qualifiers: Qualifiers) {
    if !qualifiers.is_empty() {
        out.push(' ');
        out.push_str(&qualifiers.to_string());
    }
}

impl TypeNode {
    /// Renders this type as a declarator around `suffix`. An empty `suffix` gives the abstract
    /// declarator, which is the type name.
    pub fn declare(&self, suffix: &str) -> String {
        match self {
            TypeNode::Scalar(s) => s.declare(suffix),
            TypeNode::Pointer(p) => p.declare(suffix),
            TypeNode::FunctionPointer(f) => f.declare(suffix),
        }
    }

    /// Renders this type as the return type of a function pointer whose declarator is `outer`.
    pub fn as_return(&self, outer: String) -> String {
        match self {
            TypeNode::Scalar(s) => s.declare(&outer),
            TypeNode::Pointer(p) => p.declare(&outer),
            TypeNode::FunctionPointer(f) => f.as_return(outer),
        }
    }
}

impl Scalar {
    pub fn declare(&self, suffix: &str) -> String {
        let mut out = self.base.spelling().to_owned();
        push_qualifiers(&mut out, self.qualifiers);
        if !suffix.is_empty() {
            out.push(' ');
            out.push_str(suffix);
        }
        out
    }
}

impl Pointee {
    pub fn declare(&self, suffix: &str) -> String {
        match self {
            Pointee::Scalar(s) => s.declare(suffix),
            Pointee::Pointer(p) => p.declare(suffix),
        }
    }
}

impl Pointer {
    pub fn declare(&self, suffix: &str) -> String {
        let mut out = self.pointee.declare("");
        if !out.ends_with('*') {
            out.push(' ');
        }
        out.push('*');
        push_qualifiers(&mut out, self.qualifiers);
        if !suffix.is_empty() {
            // `int *p` but `int * const p`
            if !out.ends_with('*') {
                out.push(' ');
            }
            out.push_str(suffix);
        }
        out
    }
}

impl FunctionPointer {
    pub fn declare(&self, suffix: &str) -> String {
        self.return_type.as_return(self.wrap(suffix))
    }

    pub fn as_return(&self, outer: String) -> String {
        self.return_type.as_return(self.wrap(&outer))
    }

    /// `(*inner)(params)`, the part of the declarator that doesn't depend on the return type.
    fn wrap(&self, inner: &str) -> String {
        format!("(*{inner})({})", self.param_list())
    }

    fn param_list(&self) -> String {
        self.params
            .iter()
            .enumerate()
            .map(|(i, param)| param.declare(&format!("p{i}")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
