//! Statement AST nodes

use super::{Expr, VarDecl};
use crate::common::Position;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Position,
}

impl Stmt {
    pub fn new(kind: StmtKind, pos: Position) -> Self {
        Self { kind, pos }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Assignment statement: loc = exp;
    Assign(Expr),

    /// Post-increment: loc++;
    PostInc(Expr),

    /// Post-decrement: loc--;
    PostDec(Expr),

    /// Input: cin >> loc;
    Read(Expr),

    /// Output: cout << exp;
    Write(Expr),

    /// If statement, each branch its own scope
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },

    /// While loop: while (cond) { ... }
    While {
        condition: Expr,
        body: Block,
    },

    /// Counted loop: repeat (count) { ... }
    Repeat {
        count: Expr,
        body: Block,
    },

    /// Call statement: f(args);
    Call(Expr),

    /// Return statement: return [exp];
    Return(Option<Expr>),
}

/// Braced body: local declarations followed by statements
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(decls: Vec<VarDecl>, stmts: Vec<Stmt>) -> Self {
        Self { decls, stmts }
    }
}
