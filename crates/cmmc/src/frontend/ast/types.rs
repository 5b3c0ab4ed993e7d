//! Type specifiers as written in declarations

use super::Ident;

/// The type part of a declaration: `int`, `bool`, `void` or `struct S`
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Int,
    Bool,
    Void,
    /// `struct S`; the identifier is linked to the struct's definition
    Struct(Ident),
}

impl TypeSpec {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSpec::Void)
    }
}
