//! Symbols and the arena that owns them

use super::scope::Scope;
use super::types::Type;
use crate::common::Position;
use crate::frontend::ast::{Interner, Name};
use std::fmt::Write;

/// Handle to a symbol stored in a [`SymbolArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A declared name
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: Name,
    /// Declaration site
    pub pos: Position,
    pub kind: SymbolKind,
}

/// Kind of symbol
#[derive(Debug, Clone)]
pub enum SymbolKind {
    /// Global, local, formal or struct field
    Variable { ty: Type },
    Function { params: Vec<Type>, ret: Type },
    /// Struct type definition owning its field scope
    StructDef { fields: Scope },
}

impl Symbol {
    pub fn variable(name: Name, pos: Position, ty: Type) -> Self {
        Self { name, pos, kind: SymbolKind::Variable { ty } }
    }

    pub fn function(name: Name, pos: Position, params: Vec<Type>, ret: Type) -> Self {
        Self { name, pos, kind: SymbolKind::Function { params, ret } }
    }

    pub fn struct_def(name: Name, pos: Position, fields: Scope) -> Self {
        Self { name, pos, kind: SymbolKind::StructDef { fields } }
    }
}

/// Owner of every symbol created while analyzing one program.
///
/// Scopes and identifier nodes hold [`SymbolId`]s into the arena, so a symbol
/// outlives the scope that declared it and stays reachable from the tree.
#[derive(Debug, Clone, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    /// Type an identifier denoting this symbol has
    pub fn type_of(&self, id: SymbolId) -> Option<Type> {
        let ty = match &self.get(id)?.kind {
            SymbolKind::Variable { ty } => ty.clone(),
            SymbolKind::Function { params, ret } => Type::function(params.clone(), ret.clone()),
            SymbolKind::StructDef { .. } => Type::StructName(id),
        };
        Some(ty)
    }

    /// Field scope of a struct definition
    pub fn struct_fields(&self, id: SymbolId) -> Option<&Scope> {
        match &self.get(id)?.kind {
            SymbolKind::StructDef { fields } => Some(fields),
            _ => None,
        }
    }

    /// Definition a struct-typed variable refers to
    pub fn struct_of(&self, id: SymbolId) -> Option<SymbolId> {
        match &self.get(id)?.kind {
            SymbolKind::Variable { ty: Type::StructInstance(def) } => Some(*def),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, sym)| (SymbolId(i), sym))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// One line per symbol in declaration order: `line:col name: type`.
    /// Struct fields are listed indented under their definition.
    pub fn dump(&self, names: &Interner) -> String {
        let mut out = String::new();
        let name_of = |sym: &Symbol| names.resolve(sym.name).unwrap_or("<unknown>");

        for (id, sym) in self.iter() {
            let Some(ty) = self.type_of(id) else { continue };
            let _ = writeln!(out, "{} {}: {}", sym.pos, name_of(sym), ty.display(self, names));

            if let SymbolKind::StructDef { fields } = &sym.kind {
                for (_, field) in fields.iter() {
                    let (Some(field_sym), Some(field_ty)) = (self.get(field), self.type_of(field)) else {
                        continue;
                    };
                    let _ = writeln!(out, "    {}: {}", name_of(field_sym), field_ty.display(self, names));
                }
            }
        }
        out
    }
}
