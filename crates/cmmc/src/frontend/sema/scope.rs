//! Scopes and the stack-of-scopes symbol table

use super::symbol::SymbolId;
use crate::frontend::ast::Name;
use std::collections::HashMap;
use thiserror::Error;

/// Recoverable outcomes of symbol table operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTableError {
    #[error("symbol table has no scope")]
    EmptyTable,

    #[error("name already declared in the current scope")]
    DuplicateName,
}

/// One lexical binding environment
#[derive(Debug, Clone, Default)]
pub struct Scope {
    symbols: HashMap<Name, SymbolId>,
    order: Vec<Name>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`; an existing binding is kept and the new one rejected
    pub fn define(&mut self, name: Name, sym: SymbolId) -> Result<(), SymbolTableError> {
        if self.symbols.contains_key(&name) {
            return Err(SymbolTableError::DuplicateName);
        }
        self.symbols.insert(name, sym);
        self.order.push(name);
        Ok(())
    }

    pub fn lookup(&self, name: Name) -> Option<SymbolId> {
        self.symbols.get(&name).copied()
    }

    /// Bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Name, SymbolId)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.symbols.get(name).map(|sym| (*name, *sym)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Stack of scopes, innermost last
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// An empty table; push a scope before declaring anything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Remove the innermost scope and hand it back
    pub fn pop_scope(&mut self) -> Result<Scope, SymbolTableError> {
        self.scopes.pop().ok_or(SymbolTableError::EmptyTable)
    }

    /// Bind `name` in the innermost scope
    pub fn declare(&mut self, name: Name, sym: SymbolId) -> Result<(), SymbolTableError> {
        self.scopes
            .last_mut()
            .ok_or(SymbolTableError::EmptyTable)?
            .define(name, sym)
    }

    /// Look `name` up in the innermost scope only
    pub fn lookup_local(&self, name: Name) -> Result<Option<SymbolId>, SymbolTableError> {
        let scope = self.scopes.last().ok_or(SymbolTableError::EmptyTable)?;
        Ok(scope.lookup(name))
    }

    /// Look `name` up from the innermost scope outwards
    pub fn lookup_chain(&self, name: Name) -> Result<Option<SymbolId>, SymbolTableError> {
        if self.scopes.is_empty() {
            return Err(SymbolTableError::EmptyTable);
        }
        Ok(self.scopes.iter().rev().find_map(|scope| scope.lookup(name)))
    }

    /// Chain lookup that skips the innermost scope
    pub fn lookup_enclosing(&self, name: Name) -> Result<Option<SymbolId>, SymbolTableError> {
        let Some((_, outer)) = self.scopes.split_last() else {
            return Err(SymbolTableError::EmptyTable);
        };
        Ok(outer.iter().rev().find_map(|scope| scope.lookup(name)))
    }

    /// Number of active scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Position;
    use crate::frontend::ast::Interner;
    use crate::frontend::sema::{Symbol, SymbolArena, Type};

    struct Fixture {
        names: Interner,
        arena: SymbolArena,
    }

    impl Fixture {
        fn new() -> Self {
            Self { names: Interner::new(), arena: SymbolArena::new() }
        }

        fn var(&mut self, name: &str) -> (Name, SymbolId) {
            let name = self.names.get_or_intern(name);
            let sym = self.arena.alloc(Symbol::variable(name, Position::new(1, 1), Type::Int));
            (name, sym)
        }
    }

    #[test]
    fn test_duplicate_in_same_scope_rejected() {
        let mut fx = Fixture::new();
        let mut table = SymbolTable::new();
        table.push_scope();

        let (x, first) = fx.var("x");
        let (_, second) = fx.var("x");
        assert_eq!(table.declare(x, first), Ok(()));
        assert_eq!(table.declare(x, second), Err(SymbolTableError::DuplicateName));
        assert_eq!(table.lookup_local(x), Ok(Some(first)));
    }

    #[test]
    fn test_local_lookup_ignores_outer_scopes() {
        let mut fx = Fixture::new();
        let mut table = SymbolTable::new();
        table.push_scope();
        let (x, outer) = fx.var("x");
        table.declare(x, outer).unwrap();

        table.push_scope();
        assert_eq!(table.lookup_local(x), Ok(None));
        assert_eq!(table.lookup_chain(x), Ok(Some(outer)));
    }

    #[test]
    fn test_chain_lookup_finds_innermost_shadow() {
        let mut fx = Fixture::new();
        let mut table = SymbolTable::new();
        let (x, outer) = fx.var("x");
        let (_, middle) = fx.var("x");
        let (_, inner) = fx.var("x");

        table.push_scope();
        table.declare(x, outer).unwrap();
        table.push_scope();
        table.declare(x, middle).unwrap();
        table.push_scope();
        table.declare(x, inner).unwrap();

        assert_eq!(table.lookup_chain(x), Ok(Some(inner)));
        table.pop_scope().unwrap();
        assert_eq!(table.lookup_chain(x), Ok(Some(middle)));
        assert_eq!(table.lookup_enclosing(x), Ok(Some(outer)));
    }

    #[test]
    fn test_empty_table_operations_fail() {
        let mut fx = Fixture::new();
        let mut table = SymbolTable::new();
        let (x, sym) = fx.var("x");

        assert_eq!(table.declare(x, sym), Err(SymbolTableError::EmptyTable));
        assert_eq!(table.lookup_local(x), Err(SymbolTableError::EmptyTable));
        assert_eq!(table.lookup_chain(x), Err(SymbolTableError::EmptyTable));
        assert!(matches!(table.pop_scope(), Err(SymbolTableError::EmptyTable)));
    }

    #[test]
    fn test_table_usable_after_popping_too_many() {
        let mut fx = Fixture::new();
        let mut table = SymbolTable::new();
        table.push_scope();
        assert!(table.pop_scope().is_ok());
        assert!(matches!(table.pop_scope(), Err(SymbolTableError::EmptyTable)));

        table.push_scope();
        let (x, sym) = fx.var("x");
        assert_eq!(table.declare(x, sym), Ok(()));
        assert_eq!(table.lookup_chain(x), Ok(Some(sym)));
        assert_eq!(table.depth(), 1);
    }

    #[test]
    fn test_popped_scope_keeps_insertion_order() {
        let mut fx = Fixture::new();
        let mut table = SymbolTable::new();
        table.push_scope();
        let (b, b_sym) = fx.var("b");
        let (a, a_sym) = fx.var("a");
        table.declare(b, b_sym).unwrap();
        table.declare(a, a_sym).unwrap();

        let scope = table.pop_scope().unwrap();
        let order: Vec<_> = scope.iter().collect();
        assert_eq!(order, vec![(b, b_sym), (a, a_sym)]);
        assert_eq!(scope.len(), 2);
    }
}
