//! Recursive descent parser for C--

use crate::common::{CompileError, CompileResult, Diagnostics, Position};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, StringLit, Token, TokenKind};

/// Recursive descent parser for C--
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    names: Interner,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            names: Interner::new(),
        }
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut declarations = Vec::new();

        while !self.at_end() {
            declarations.push(self.parse_declaration()?);
        }

        Ok(Program::new(declarations, std::mem::take(&mut self.names)))
    }

    /// Diagnostics the lexer produced while feeding this parser
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.lexer.take_diagnostics()
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::parser(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.pos,
        )
    }

    fn expect_ident(&mut self) -> CompileResult<Ident> {
        if let TokenKind::Identifier(text) = &self.current.kind {
            let name = self.names.get_or_intern(text);
            let pos = self.current.pos;
            self.advance();
            Ok(Ident::new(name, pos))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_declaration(&mut self) -> CompileResult<Decl> {
        if self.check(&TokenKind::Struct) {
            self.advance();
            let struct_id = self.expect_ident()?;
            if self.check(&TokenKind::LBrace) {
                return self.parse_struct_body(struct_id).map(Decl::Struct);
            }
            return self.parse_var_or_fn(TypeSpec::Struct(struct_id));
        }

        let ty = self.parse_type()?;
        self.parse_var_or_fn(ty)
    }

    fn parse_var_or_fn(&mut self, ty: TypeSpec) -> CompileResult<Decl> {
        let id = self.expect_ident()?;
        if self.check(&TokenKind::LParen) {
            return self.parse_function(ty, id).map(Decl::Fn);
        }
        self.expect(TokenKind::Semi)?;
        Ok(Decl::Var(VarDecl::new(ty, id)))
    }

    fn parse_type(&mut self) -> CompileResult<TypeSpec> {
        let ty = match &self.current.kind {
            TokenKind::Int => TypeSpec::Int,
            TokenKind::Bool => TypeSpec::Bool,
            TokenKind::Void => TypeSpec::Void,
            TokenKind::Struct => {
                self.advance();
                return Ok(TypeSpec::Struct(self.expect_ident()?));
            }
            _ => return Err(self.unexpected("type")),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_var_decl(&mut self) -> CompileResult<VarDecl> {
        let ty = self.parse_type()?;
        let id = self.expect_ident()?;
        self.expect(TokenKind::Semi)?;
        Ok(VarDecl::new(ty, id))
    }

    fn parse_var_decls(&mut self) -> CompileResult<Vec<VarDecl>> {
        let mut decls = Vec::new();
        while self.current.kind.is_type_start() {
            decls.push(self.parse_var_decl()?);
        }
        Ok(decls)
    }

    /// `{ field+ } ;` after `struct Name`
    fn parse_struct_body(&mut self, id: Ident) -> CompileResult<StructDecl> {
        self.expect(TokenKind::LBrace)?;
        let fields = self.parse_var_decls()?;
        if fields.is_empty() {
            return Err(self.unexpected("field declaration"));
        }
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Semi)?;
        Ok(StructDecl { id, fields })
    }

    fn parse_function(&mut self, return_type: TypeSpec, id: Ident) -> CompileResult<FnDecl> {
        self.expect(TokenKind::LParen)?;
        let mut formals = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                let formal_id = self.expect_ident()?;
                formals.push(Formal::new(ty, formal_id));
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(FnDecl { return_type, id, formals, body })
    }

    fn parse_block(&mut self) -> CompileResult<Block> {
        self.expect(TokenKind::LBrace)?;
        let decls = self.parse_var_decls()?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(decls, stmts))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_stmt(&mut self) -> CompileResult<Stmt> {
        let pos = self.current.pos;

        let kind = match &self.current.kind {
            TokenKind::Cin => {
                self.advance();
                self.expect(TokenKind::Read)?;
                let target = self.parse_loc()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Read(target)
            }
            TokenKind::Cout => {
                self.advance();
                self.expect(TokenKind::Write)?;
                let value = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Write(value)
            }
            TokenKind::If => {
                self.advance();
                let condition = self.parse_paren_expr()?;
                let then_block = self.parse_block()?;
                let else_block = if self.match_token(&TokenKind::Else) {
                    Some(self.parse_block()?)
                } else {
                    None
                };
                StmtKind::If { condition, then_block, else_block }
            }
            TokenKind::While => {
                self.advance();
                let condition = self.parse_paren_expr()?;
                let body = self.parse_block()?;
                StmtKind::While { condition, body }
            }
            TokenKind::Repeat => {
                self.advance();
                let count = self.parse_paren_expr()?;
                let body = self.parse_block()?;
                StmtKind::Repeat { count, body }
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semi)?;
                StmtKind::Return(value)
            }
            TokenKind::Identifier(_) => return self.parse_simple_stmt(pos),
            _ => return Err(self.unexpected("statement")),
        };

        Ok(Stmt::new(kind, pos))
    }

    /// Statements starting with an identifier: calls, assignments, `++`, `--`
    fn parse_simple_stmt(&mut self, pos: Position) -> CompileResult<Stmt> {
        let id = self.expect_ident()?;

        if self.check(&TokenKind::LParen) {
            let call = self.parse_call(id)?;
            self.expect(TokenKind::Semi)?;
            return Ok(Stmt::new(StmtKind::Call(call), pos));
        }

        let loc = self.parse_loc_tail(Expr::id(id))?;
        let kind = match &self.current.kind {
            TokenKind::Eq => {
                self.advance();
                let value = self.parse_expr()?;
                StmtKind::Assign(Expr::assign(loc, value))
            }
            TokenKind::PlusPlus => {
                self.advance();
                StmtKind::PostInc(loc)
            }
            TokenKind::MinusMinus => {
                self.advance();
                StmtKind::PostDec(loc)
            }
            _ => return Err(self.unexpected("'=', '++' or '--'")),
        };
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(kind, pos))
    }

    fn parse_paren_expr(&mut self) -> CompileResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parse an expression (assignment has the lowest precedence)
    pub fn parse_expr(&mut self) -> CompileResult<Expr> {
        let left = self.parse_or()?;

        if self.check(&TokenKind::Eq) {
            if !left.is_location() {
                return Err(CompileError::parser("invalid assignment target", left.pos));
            }
            self.advance();
            let value = self.parse_expr()?;
            return Ok(Expr::assign(left, value));
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_and()?;
        while self.match_token(&TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.match_token(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = Expr::binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    // Equality and relational operators do not associate.
    fn parse_equality(&mut self) -> CompileResult<Expr> {
        let left = self.parse_relational()?;
        let op = match self.current.kind {
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_relational()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_relational(&mut self) -> CompileResult<Expr> {
        let left = self.parse_additive()?;
        let op = match self.current.kind {
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::GtEq => BinaryOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_additive(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> CompileResult<Expr> {
        if self.match_token(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::unary(UnaryOp::Neg, operand));
        }
        if self.match_token(&TokenKind::Bang) {
            let operand = self.parse_unary()?;
            return Ok(Expr::unary(UnaryOp::Not, operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> CompileResult<Expr> {
        let pos = self.current.pos;
        let kind = match &self.current.kind {
            TokenKind::IntLiteral(v) => ExprKind::IntLiteral(v.value),
            TokenKind::StringLiteral(StringLit::Valid(text)) => ExprKind::StringLiteral(text.clone()),
            TokenKind::True => ExprKind::True,
            TokenKind::False => ExprKind::False,
            TokenKind::LParen => return self.parse_paren_expr(),
            TokenKind::Identifier(_) => {
                let id = self.expect_ident()?;
                if self.check(&TokenKind::LParen) {
                    return self.parse_call(id);
                }
                return self.parse_loc_tail(Expr::id(id));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(Expr::new(kind, pos))
    }

    /// `callee ( [exp {, exp}] )`
    fn parse_call(&mut self, callee: Ident) -> CompileResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Expr::call(callee, args))
    }

    /// `id {. id}`
    fn parse_loc(&mut self) -> CompileResult<Expr> {
        let id = self.expect_ident()?;
        self.parse_loc_tail(Expr::id(id))
    }

    fn parse_loc_tail(&mut self, mut loc: Expr) -> CompileResult<Expr> {
        while self.match_token(&TokenKind::Dot) {
            let field = self.expect_ident()?;
            loc = Expr::dot(loc, field);
        }
        Ok(loc)
    }
}
