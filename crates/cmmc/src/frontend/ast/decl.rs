//! Declaration AST nodes

use super::{Block, Ident, TypeSpec};

/// Top-level declaration
#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

/// Variable or struct field: `int x;`, `struct Point p;`
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: TypeSpec,
    pub id: Ident,
}

impl VarDecl {
    pub fn new(ty: TypeSpec, id: Ident) -> Self {
        Self { ty, id }
    }
}

/// Function definition: `int f(int a, bool b) { ... }`
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub return_type: TypeSpec,
    pub id: Ident,
    pub formals: Vec<Formal>,
    pub body: Block,
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Formal {
    pub ty: TypeSpec,
    pub id: Ident,
}

impl Formal {
    pub fn new(ty: TypeSpec, id: Ident) -> Self {
        Self { ty, id }
    }
}

/// Struct definition: `struct Point { int x; int y; };`
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub id: Ident,
    pub fields: Vec<VarDecl>,
}
