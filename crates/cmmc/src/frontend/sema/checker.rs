//! Type checking
//!
//! Runs over a fully resolved program. Every expression gets its type cached
//! in [`Expr::ty`]; an expression that fails a rule is typed [`Type::Error`],
//! which every later rule accepts silently so a mistake is reported once.

use super::error::InternalError;
use super::symbol::SymbolArena;
use super::types::Type;
use crate::common::{Construct, Diagnostics, ErrorKind, Position};
use crate::frontend::ast::*;

/// Type checking pass
pub struct TypeChecker<'a> {
    symbols: &'a SymbolArena,
    diagnostics: Diagnostics,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolArena) -> Self {
        Self { symbols, diagnostics: Diagnostics::new() }
    }

    /// Check every function body in the program
    pub fn check(&mut self, program: &mut Program) -> Result<(), InternalError> {
        for decl in &mut program.declarations {
            if let Decl::Fn(func) = decl {
                self.check_fn(func)?;
            }
        }
        log::debug!("type checking: {} diagnostics", self.diagnostics.len());
        Ok(())
    }

    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }

    fn check_fn(&mut self, func: &mut FnDecl) -> Result<(), InternalError> {
        let ret = match self.ident_type(&func.id)? {
            Type::Function { ret, .. } => *ret,
            _ => {
                let sym = func.id.sym.ok_or(InternalError::Unresolved(func.id.pos))?;
                return Err(InternalError::WrongSymbolKind(sym, "function"));
            }
        };
        self.check_block(&mut func.body, &ret)
    }

    fn check_block(&mut self, block: &mut Block, ret: &Type) -> Result<(), InternalError> {
        for stmt in &mut block.stmts {
            self.check_stmt(stmt, ret)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, ret: &Type) -> Result<(), InternalError> {
        match &mut stmt.kind {
            StmtKind::Assign(expr) | StmtKind::Call(expr) => {
                self.expr_type(expr)?;
            }

            StmtKind::PostInc(expr) | StmtKind::PostDec(expr) => {
                let ty = self.expr_type(expr)?;
                if !ty.is_int() && !ty.is_error() {
                    self.diagnostics.fatal(expr.pos, ErrorKind::ArithmeticOnNonNumeric);
                }
            }

            StmtKind::Read(expr) => {
                let kind = match self.expr_type(expr)? {
                    Type::Function { .. } => Some(ErrorKind::ReadFunction),
                    Type::StructName(_) => Some(ErrorKind::ReadStructName),
                    Type::StructInstance(_) => Some(ErrorKind::ReadStructVariable),
                    _ => None,
                };
                if let Some(kind) = kind {
                    self.diagnostics.fatal(expr.pos, kind);
                }
            }

            StmtKind::Write(expr) => {
                let kind = match self.expr_type(expr)? {
                    Type::Function { .. } => Some(ErrorKind::WriteFunction),
                    Type::StructName(_) => Some(ErrorKind::WriteStructName),
                    Type::StructInstance(_) => Some(ErrorKind::WriteStructVariable),
                    Type::Void => Some(ErrorKind::WriteVoid),
                    _ => None,
                };
                if let Some(kind) = kind {
                    self.diagnostics.fatal(expr.pos, kind);
                }
            }

            StmtKind::If { condition, then_block, else_block } => {
                self.check_condition(condition, Construct::If)?;
                self.check_block(then_block, ret)?;
                if let Some(else_block) = else_block {
                    self.check_block(else_block, ret)?;
                }
            }

            StmtKind::While { condition, body } => {
                self.check_condition(condition, Construct::While)?;
                self.check_block(body, ret)?;
            }

            StmtKind::Repeat { count, body } => {
                let ty = self.expr_type(count)?;
                if !ty.is_int() && !ty.is_error() {
                    self.diagnostics.fatal(count.pos, ErrorKind::NonIntRepeatCount);
                }
                self.check_block(body, ret)?;
            }

            StmtKind::Return(value) => self.check_return(value.as_mut(), stmt.pos, ret)?,
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &mut Expr, construct: Construct) -> Result<(), InternalError> {
        let ty = self.expr_type(condition)?;
        if !ty.is_bool() && !ty.is_error() {
            self.diagnostics.fatal(condition.pos, ErrorKind::NonBoolCondition(construct));
        }
        Ok(())
    }

    fn check_return(&mut self, value: Option<&mut Expr>, pos: Position, ret: &Type) -> Result<(), InternalError> {
        match value {
            Some(expr) if ret.is_void() => {
                self.diagnostics.fatal(expr.pos, ErrorKind::ReturnValueInVoidFunction);
                self.expr_type(expr)?;
            }
            Some(expr) => {
                let ty = self.expr_type(expr)?;
                if !ty.matches(ret) {
                    self.diagnostics.fatal(expr.pos, ErrorKind::BadReturnValue);
                }
            }
            None if !ret.is_void() => {
                self.diagnostics.fatal(pos, ErrorKind::MissingReturnValue);
            }
            None => {}
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Type of `expr`, computed once and cached on the node
    pub fn expr_type(&mut self, expr: &mut Expr) -> Result<Type, InternalError> {
        if let Some(ty) = &expr.ty {
            return Ok(ty.clone());
        }
        let ty = self.compute_type(expr)?;
        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    fn compute_type(&mut self, expr: &mut Expr) -> Result<Type, InternalError> {
        match &mut expr.kind {
            ExprKind::IntLiteral(_) => Ok(Type::Int),
            ExprKind::StringLiteral(_) => Ok(Type::String),
            ExprKind::True | ExprKind::False => Ok(Type::Bool),
            ExprKind::Id(id) => self.ident_type(id),
            ExprKind::Dot { base, field } => {
                self.expr_type(base)?;
                self.ident_type(field)
            }
            ExprKind::Assign { target, value } => self.check_assign(target, value),
            ExprKind::Call { callee, args } => self.check_call(callee, args),
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand),
            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right),
        }
    }

    fn ident_type(&self, id: &Ident) -> Result<Type, InternalError> {
        let sym = id.sym.ok_or(InternalError::Unresolved(id.pos))?;
        self.symbols.type_of(sym).ok_or(InternalError::UnknownSymbol(sym))
    }

    fn check_assign(&mut self, target: &mut Expr, value: &mut Expr) -> Result<Type, InternalError> {
        let target_ty = self.expr_type(target)?;
        let value_ty = self.expr_type(value)?;

        if target_ty.is_error() || value_ty.is_error() {
            return Ok(Type::Error);
        }

        let kind = if target_ty.is_function() && value_ty.is_function() {
            Some(ErrorKind::FunctionAssignment)
        } else if target_ty.is_struct_name() && value_ty.is_struct_name() {
            Some(ErrorKind::StructNameAssignment)
        } else if target_ty.is_struct_instance() && value_ty.is_struct_instance() {
            Some(ErrorKind::StructVariableAssignment)
        } else if target_ty != value_ty {
            Some(ErrorKind::TypeMismatch)
        } else {
            None
        };

        match kind {
            Some(kind) => {
                self.diagnostics.fatal(target.pos, kind);
                Ok(Type::Error)
            }
            None => Ok(value_ty),
        }
    }

    fn check_call(&mut self, callee: &Ident, args: &mut [Expr]) -> Result<Type, InternalError> {
        let Type::Function { params, ret } = self.ident_type(callee)? else {
            self.diagnostics.fatal(callee.pos, ErrorKind::CallOnNonFunction);
            return Ok(Type::Error);
        };

        let arg_types = args
            .iter_mut()
            .map(|arg| self.expr_type(arg))
            .collect::<Result<Vec<_>, _>>()?;

        if params.len() != args.len() {
            self.diagnostics.fatal(callee.pos, ErrorKind::ArityMismatch);
            return Ok(*ret);
        }

        for ((arg, arg_ty), param) in args.iter().zip(&arg_types).zip(&params) {
            if !arg_ty.matches(param) {
                self.diagnostics.fatal(arg.pos, ErrorKind::ArgTypeMismatch);
            }
        }
        Ok(*ret)
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &mut Expr) -> Result<Type, InternalError> {
        let ty = self.expr_type(operand)?;
        let (expected, kind) = match op {
            UnaryOp::Neg => (Type::Int, ErrorKind::ArithmeticOnNonNumeric),
            UnaryOp::Not => (Type::Bool, ErrorKind::LogicalOnNonBool),
        };

        if ty == expected {
            Ok(expected)
        } else {
            if !ty.is_error() {
                self.diagnostics.fatal(operand.pos, kind);
            }
            Ok(Type::Error)
        }
    }

    fn check_binary(&mut self, op: BinaryOp, left: &mut Expr, right: &mut Expr) -> Result<Type, InternalError> {
        let left_ty = self.expr_type(left)?;
        let right_ty = self.expr_type(right)?;

        let (operand, result, kind) = match op.class() {
            OpClass::Arithmetic => (Type::Int, Type::Int, ErrorKind::ArithmeticOnNonNumeric),
            OpClass::Relational => (Type::Int, Type::Bool, ErrorKind::RelationalOnNonNumeric),
            OpClass::Logical => (Type::Bool, Type::Bool, ErrorKind::LogicalOnNonBool),
            OpClass::Equality => return Ok(self.check_equality(left.pos, &left_ty, &right_ty)),
        };

        let mut ok = true;
        for (ty, pos) in [(&left_ty, left.pos), (&right_ty, right.pos)] {
            if *ty != operand {
                ok = false;
                if !ty.is_error() {
                    self.diagnostics.fatal(pos, kind.clone());
                }
            }
        }

        Ok(if ok { result } else { Type::Error })
    }

    fn check_equality(&mut self, pos: Position, left: &Type, right: &Type) -> Type {
        if left.is_error() || right.is_error() {
            return Type::Error;
        }

        let kind = if left.is_void() && right.is_void() {
            Some(ErrorKind::EqualityOnVoidFunctions)
        } else if left.is_function() && right.is_function() {
            Some(ErrorKind::EqualityOnFunctions)
        } else if left.is_struct_name() && right.is_struct_name() {
            Some(ErrorKind::EqualityOnStructNames)
        } else if left.is_struct_instance() && right.is_struct_instance() {
            Some(ErrorKind::EqualityOnStructVariables)
        } else if left != right {
            Some(ErrorKind::TypeMismatch)
        } else {
            None
        };

        match kind {
            Some(kind) => {
                self.diagnostics.fatal(pos, kind);
                Type::Error
            }
            None => Type::Bool,
        }
    }
}
