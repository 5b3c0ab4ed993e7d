//! Abstract Syntax Tree definitions
//!
//! The tree is built once by the parser and never restructured afterwards.
//! Name resolution fills the symbol slot of every [`Ident`]; type checking
//! caches the computed type of every [`Expr`].

mod types;
mod expr;
mod stmt;
mod decl;

pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use decl::*;

use crate::common::Position;
use crate::frontend::sema::SymbolId;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Interned identifier text
pub type Name = DefaultSymbol;

/// Interner owning the text of every identifier in a program
pub type Interner = DefaultStringInterner;

/// A complete C-- program
#[derive(Debug, Clone)]
pub struct Program {
    pub declarations: Vec<Decl>,
    pub names: Interner,
}

impl Program {
    pub fn new(declarations: Vec<Decl>, names: Interner) -> Self {
        Self { declarations, names }
    }

    /// Text of an interned name
    pub fn name(&self, name: Name) -> &str {
        self.names.resolve(name).unwrap_or("<unknown>")
    }
}

/// Identifier occurrence, either a declaration site or a use
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: Name,
    pub pos: Position,
    /// Symbol this identifier denotes, set by name resolution
    pub sym: Option<SymbolId>,
}

impl Ident {
    pub fn new(name: Name, pos: Position) -> Self {
        Self { name, pos, sym: None }
    }

    pub fn link(&mut self, sym: SymbolId) {
        self.sym = Some(sym);
    }
}
