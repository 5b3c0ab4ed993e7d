//! Name resolution
//!
//! Binds every declaration into the scope it appears in and links every
//! identifier use to the symbol it denotes. Problems are reported to the
//! collected [`Diagnostics`] and traversal carries on, so one run reports
//! every independent naming error in the program.

use super::error::InternalError;
use super::scope::SymbolTable;
use super::symbol::{Symbol, SymbolArena, SymbolId, SymbolKind};
use super::types::Type;
use crate::common::{Diagnostics, ErrorKind};
use crate::frontend::ast::*;

/// What the left side of a `.` turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// A struct instance of the given definition
    Struct(SymbolId),
    NonStruct,
    /// Already diagnosed; the rest of the chain is skipped silently
    Bad,
}

/// Where struct type names in a declaration are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclSite {
    Ordinary,
    /// Field of a struct being declared; its own field scope is skipped
    Field,
}

/// Name resolution pass
pub struct NameResolver {
    table: SymbolTable,
    symbols: SymbolArena,
    diagnostics: Diagnostics,
}

impl NameResolver {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            symbols: SymbolArena::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Resolve a whole program. The outermost scope lives as long as the pass.
    pub fn resolve(&mut self, program: &mut Program) -> Result<(), InternalError> {
        self.table.push_scope();
        for decl in &mut program.declarations {
            self.resolve_decl(decl)?;
        }
        log::debug!(
            "name resolution: {} symbols, {} diagnostics",
            self.symbols.len(),
            self.diagnostics.len()
        );
        Ok(())
    }

    /// Symbols created so far and the diagnostics reported
    pub fn finish(self) -> (SymbolArena, Diagnostics) {
        (self.symbols, self.diagnostics)
    }

    fn resolve_decl(&mut self, decl: &mut Decl) -> Result<(), InternalError> {
        match decl {
            Decl::Var(var) => self.resolve_var_decl(&mut var.ty, &mut var.id, DeclSite::Ordinary).map(drop),
            Decl::Fn(func) => self.resolve_fn_decl(func),
            Decl::Struct(s) => self.resolve_struct_decl(s),
        }
    }

    /// Variables, formals and fields. Returns the declared type when the
    /// name was bound.
    fn resolve_var_decl(
        &mut self,
        ty: &mut TypeSpec,
        id: &mut Ident,
        site: DeclSite,
    ) -> Result<Option<Type>, InternalError> {
        let declared = if ty.is_void() {
            self.diagnostics.fatal(id.pos, ErrorKind::NonFunctionVoid);
            None
        } else {
            self.resolve_type(ty, site)?
        };

        if self.table.lookup_local(id.name)?.is_some() {
            self.diagnostics.fatal(id.pos, ErrorKind::MultiplyDeclared);
            return Ok(None);
        }

        let Some(declared) = declared else {
            return Ok(None);
        };
        let sym = self.symbols.alloc(Symbol::variable(id.name, id.pos, declared.clone()));
        self.table.declare(id.name, sym)?;
        id.link(sym);
        log::trace!("declared variable {:?} at {}", sym, id.pos);
        Ok(Some(declared))
    }

    /// Type named by a specifier; `None` if a struct name did not resolve
    fn resolve_type(&mut self, ty: &mut TypeSpec, site: DeclSite) -> Result<Option<Type>, InternalError> {
        let resolved = match ty {
            TypeSpec::Int => Type::Int,
            TypeSpec::Bool => Type::Bool,
            TypeSpec::Void => Type::Void,
            TypeSpec::Struct(name) => {
                let found = match site {
                    DeclSite::Ordinary => self.table.lookup_chain(name.name)?,
                    DeclSite::Field => self.table.lookup_enclosing(name.name)?,
                };
                match found.filter(|sym| self.symbols.struct_fields(*sym).is_some()) {
                    Some(def) => {
                        name.link(def);
                        Type::StructInstance(def)
                    }
                    None => {
                        self.diagnostics.fatal(name.pos, ErrorKind::InvalidStructName);
                        return Ok(None);
                    }
                }
            }
        };
        Ok(Some(resolved))
    }

    fn resolve_fn_decl(&mut self, func: &mut FnDecl) -> Result<(), InternalError> {
        let ret = self.resolve_type(&mut func.return_type, DeclSite::Ordinary)?.unwrap_or(Type::Error);

        let sym = if self.table.lookup_local(func.id.name)?.is_some() {
            self.diagnostics.fatal(func.id.pos, ErrorKind::MultiplyDeclared);
            None
        } else {
            let sym = self.symbols.alloc(Symbol::function(func.id.name, func.id.pos, Vec::new(), ret));
            self.table.declare(func.id.name, sym)?;
            func.id.link(sym);
            Some(sym)
        };

        self.table.push_scope();
        log::trace!("enter function scope at {} (depth {})", func.id.pos, self.table.depth());

        let mut param_types = Vec::with_capacity(func.formals.len());
        for formal in &mut func.formals {
            if let Some(ty) = self.resolve_var_decl(&mut formal.ty, &mut formal.id, DeclSite::Ordinary)? {
                param_types.push(ty);
            }
        }

        if let Some(sym) = sym {
            match self.symbols.get_mut(sym).map(|s| &mut s.kind) {
                Some(SymbolKind::Function { params, .. }) => *params = param_types,
                Some(_) => return Err(InternalError::WrongSymbolKind(sym, "function")),
                None => return Err(InternalError::UnknownSymbol(sym)),
            }
        }

        self.resolve_fn_body(&mut func.body)?;
        self.table.pop_scope()?;
        log::trace!("exit function scope (depth {})", self.table.depth());
        Ok(())
    }

    /// The function scope already holds the formals; locals share it
    fn resolve_fn_body(&mut self, body: &mut Block) -> Result<(), InternalError> {
        for decl in &mut body.decls {
            self.resolve_var_decl(&mut decl.ty, &mut decl.id, DeclSite::Ordinary)?;
        }
        for stmt in &mut body.stmts {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_struct_decl(&mut self, s: &mut StructDecl) -> Result<(), InternalError> {
        if self.table.lookup_local(s.id.name)?.is_some() {
            self.diagnostics.fatal(s.id.pos, ErrorKind::MultiplyDeclared);
            return Ok(());
        }

        self.table.push_scope();
        for field in &mut s.fields {
            self.resolve_var_decl(&mut field.ty, &mut field.id, DeclSite::Field)?;
        }
        let fields = self.table.pop_scope()?;

        let sym = self.symbols.alloc(Symbol::struct_def(s.id.name, s.id.pos, fields));
        self.table.declare(s.id.name, sym)?;
        s.id.link(sym);
        log::trace!("declared struct {:?} at {}", sym, s.id.pos);
        Ok(())
    }

    /// Nested block with its own scope
    fn resolve_block(&mut self, block: &mut Block) -> Result<(), InternalError> {
        self.table.push_scope();
        self.resolve_fn_body(block)?;
        self.table.pop_scope()?;
        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) -> Result<(), InternalError> {
        match &mut stmt.kind {
            StmtKind::Assign(expr)
            | StmtKind::PostInc(expr)
            | StmtKind::PostDec(expr)
            | StmtKind::Read(expr)
            | StmtKind::Write(expr)
            | StmtKind::Call(expr) => self.resolve_expr(expr),

            StmtKind::If { condition, then_block, else_block } => {
                self.resolve_expr(condition)?;
                self.resolve_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.resolve_block(else_block)?;
                }
                Ok(())
            }

            StmtKind::While { condition, body } => {
                self.resolve_expr(condition)?;
                self.resolve_block(body)
            }

            StmtKind::Repeat { count, body } => {
                self.resolve_expr(count)?;
                self.resolve_block(body)
            }

            StmtKind::Return(value) => match value {
                Some(expr) => self.resolve_expr(expr),
                None => Ok(()),
            },
        }
    }

    fn resolve_expr(&mut self, expr: &mut Expr) -> Result<(), InternalError> {
        match &mut expr.kind {
            ExprKind::IntLiteral(_) | ExprKind::StringLiteral(_) | ExprKind::True | ExprKind::False => Ok(()),

            ExprKind::Id(id) => self.resolve_use(id),

            ExprKind::Dot { base, field } => self.resolve_dot(base, field).map(drop),

            ExprKind::Assign { target, value } => {
                self.resolve_expr(target)?;
                self.resolve_expr(value)
            }

            ExprKind::Call { callee, args } => {
                self.resolve_use(callee)?;
                for arg in args {
                    self.resolve_expr(arg)?;
                }
                Ok(())
            }

            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),

            ExprKind::Binary { left, right, .. } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)
            }
        }
    }

    /// Identifier use: link to the innermost visible binding
    fn resolve_use(&mut self, id: &mut Ident) -> Result<(), InternalError> {
        match self.table.lookup_chain(id.name)? {
            Some(sym) => id.link(sym),
            None => self.diagnostics.fatal(id.pos, ErrorKind::UndeclaredIdentifier),
        }
        Ok(())
    }

    /// Resolve `base.field`, reporting what the whole access denotes
    fn resolve_dot(&mut self, base: &mut Expr, field: &mut Ident) -> Result<Access, InternalError> {
        let base_access = match &mut base.kind {
            ExprKind::Id(id) => {
                self.resolve_use(id)?;
                match id.sym {
                    Some(sym) => self.access_of(sym),
                    None => Access::Bad,
                }
            }
            ExprKind::Dot { base: inner, field: inner_field } => self.resolve_dot(inner, inner_field)?,
            _ => {
                self.resolve_expr(base)?;
                Access::NonStruct
            }
        };

        let def = match base_access {
            Access::Struct(def) => def,
            Access::NonStruct => {
                self.diagnostics.fatal(base.pos, ErrorKind::DotAccessOnNonStruct);
                return Ok(Access::Bad);
            }
            Access::Bad => return Ok(Access::Bad),
        };

        let fields = self
            .symbols
            .struct_fields(def)
            .ok_or(InternalError::WrongSymbolKind(def, "struct definition"))?;

        match fields.lookup(field.name) {
            Some(sym) => {
                field.link(sym);
                Ok(self.access_of(sym))
            }
            None => {
                self.diagnostics.fatal(field.pos, ErrorKind::InvalidFieldName);
                Ok(Access::Bad)
            }
        }
    }

    fn access_of(&self, sym: SymbolId) -> Access {
        self.symbols.struct_of(sym).map_or(Access::NonStruct, Access::Struct)
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}
