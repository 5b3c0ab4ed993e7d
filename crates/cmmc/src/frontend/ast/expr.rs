//! Expression AST nodes

use super::Ident;
use crate::common::Position;
use crate::frontend::sema::Type;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    /// Where diagnostics about this expression are reported
    pub pos: Position,
    /// Type of this expression (filled in during type checking)
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Position) -> Self {
        Self { kind, pos, ty: None }
    }

    /// Identifier use
    pub fn id(ident: Ident) -> Self {
        let pos = ident.pos;
        Self::new(ExprKind::Id(ident), pos)
    }

    /// `base.field`, reported at the field
    pub fn dot(base: Expr, field: Ident) -> Self {
        let pos = field.pos;
        Self::new(ExprKind::Dot { base: Box::new(base), field }, pos)
    }

    /// `target = value`, reported at the target
    pub fn assign(target: Expr, value: Expr) -> Self {
        let pos = target.pos;
        Self::new(
            ExprKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            pos,
        )
    }

    /// `callee(args)`, reported at the callee
    pub fn call(callee: Ident, args: Vec<Expr>) -> Self {
        let pos = callee.pos;
        Self::new(ExprKind::Call { callee, args }, pos)
    }

    /// Unary operation, reported at its operand
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let pos = operand.pos;
        Self::new(ExprKind::Unary { op, operand: Box::new(operand) }, pos)
    }

    /// Binary operation, reported at its left operand
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let pos = left.pos;
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            pos,
        )
    }

    /// True for the forms that may appear on the left of `=`
    pub fn is_location(&self) -> bool {
        matches!(self.kind, ExprKind::Id(_) | ExprKind::Dot { .. })
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i32),

    /// String literal, quotes included: "hello"
    StringLiteral(String),

    /// true
    True,

    /// false
    False,

    /// Identifier: foo
    Id(Ident),

    /// Field access: p.x, a.b.c
    Dot {
        base: Box<Expr>,
        field: Ident,
    },

    /// Assignment: x = y
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// Function call: f(a, b)
    Call {
        callee: Ident,
        args: Vec<Expr>,
    },

    /// Unary operation: -x, !flag
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Binary operation: a + b, x < y
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -
    Not, // !
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Logical
    And,
    Or,

    // Equality
    Eq,
    Ne,

    // Relational
    Lt,
    Gt,
    Le,
    Ge,
}

/// Operator families sharing one typing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Arithmetic,
    Logical,
    Equality,
    Relational,
}

impl BinaryOp {
    pub fn class(self) -> OpClass {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => OpClass::Arithmetic,
            BinaryOp::And | BinaryOp::Or => OpClass::Logical,
            BinaryOp::Eq | BinaryOp::Ne => OpClass::Equality,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => OpClass::Relational,
        }
    }
}
