//! The C-- type model

use super::symbol::{SymbolArena, SymbolId};
use crate::frontend::ast::Interner;
use std::fmt;

/// Type of a C-- expression or symbol
///
/// Struct types refer to their defining symbol, so two struct types are equal
/// exactly when they name the same definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    Void,
    String,
    /// The name of a struct type used as a value, e.g. `P` in `P.x`
    StructName(SymbolId),
    /// A variable of struct type
    StructInstance(SymbolId),
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Absorbing type of an expression that already produced a diagnostic
    Error,
}

impl Type {
    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function { params, ret: Box::new(ret) }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    pub fn is_struct_name(&self) -> bool {
        matches!(self, Type::StructName(_))
    }

    pub fn is_struct_instance(&self) -> bool {
        matches!(self, Type::StructInstance(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Equality that lets `Error` match anything
    pub fn matches(&self, other: &Type) -> bool {
        self.is_error() || other.is_error() || self == other
    }

    /// Render this type with struct names spelled out
    pub fn display<'a>(&'a self, symbols: &'a SymbolArena, names: &'a Interner) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, symbols, names }
    }
}

/// [`Type`] paired with what it needs to print struct names
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    symbols: &'a SymbolArena,
    names: &'a Interner,
}

impl TypeDisplay<'_> {
    fn struct_name(&self, id: SymbolId) -> &str {
        self.symbols
            .get(id)
            .and_then(|sym| self.names.resolve(sym.name))
            .unwrap_or("<unknown>")
    }

    fn nested<'b>(&'b self, ty: &'b Type) -> TypeDisplay<'b> {
        TypeDisplay { ty, symbols: self.symbols, names: self.names }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::String => write!(f, "string"),
            Type::StructName(id) => write!(f, "struct-name {}", self.struct_name(*id)),
            Type::StructInstance(id) => write!(f, "struct {}", self.struct_name(*id)),
            Type::Function { params, ret } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", self.nested(param))?;
                }
                write!(f, ")->{}", self.nested(ret))
            }
            Type::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Position;
    use crate::frontend::sema::{Scope, Symbol};

    #[test]
    fn test_error_matches_everything() {
        assert!(Type::Error.matches(&Type::Int));
        assert!(Type::Bool.matches(&Type::Error));
        assert!(Type::Int.matches(&Type::Int));
        assert!(!Type::Int.matches(&Type::Bool));
    }

    #[test]
    fn test_struct_types_compare_by_definition() {
        let mut names = Interner::new();
        let mut symbols = SymbolArena::new();
        let p = symbols.alloc(Symbol::struct_def(names.get_or_intern("P"), Position::new(1, 8), Scope::new()));
        let q = symbols.alloc(Symbol::struct_def(names.get_or_intern("Q"), Position::new(2, 8), Scope::new()));

        assert_eq!(Type::StructInstance(p), Type::StructInstance(p));
        assert_ne!(Type::StructInstance(p), Type::StructInstance(q));
        assert_ne!(Type::StructInstance(p), Type::StructName(p));
    }

    #[test]
    fn test_display() {
        let mut names = Interner::new();
        let mut symbols = SymbolArena::new();
        let p = symbols.alloc(Symbol::struct_def(names.get_or_intern("Point"), Position::new(1, 8), Scope::new()));

        let fn_ty = Type::function(vec![Type::Int, Type::StructInstance(p)], Type::Void);
        assert_eq!(fn_ty.display(&symbols, &names).to_string(), "(int,struct Point)->void");
        assert_eq!(Type::StructName(p).display(&symbols, &names).to_string(), "struct-name Point");
        assert_eq!(Type::Error.display(&symbols, &names).to_string(), "error");
    }
}
