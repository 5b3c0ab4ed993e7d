//! Token definitions for the C-- lexer

use crate::common::Position;
use logos::Logos;
use std::fmt;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position) -> Self {
        Self { kind, pos }
    }
}

/// Value of an integer literal, clamped to `i32::MAX` when it does not fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntValue {
    pub value: i32,
    pub overflowed: bool,
}

/// Outcome of scanning a string literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringLit {
    /// Well-formed literal, quotes included
    Valid(String),
    BadEscape,
    Unterminated,
    UnterminatedBadEscape,
}

/// All token kinds in C--
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
#[logos(skip r"#[^\n]*")]       // Skip hash comments
pub enum TokenKind {
    // === Keywords ===
    #[token("bool")]
    Bool,
    #[token("int")]
    Int,
    #[token("void")]
    Void,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("struct")]
    Struct,
    #[token("cin")]
    Cin,
    #[token("cout")]
    Cout,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("repeat")]
    Repeat,
    #[token("return")]
    Return,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    #[regex(r"[0-9]+", lex_int)]
    IntLiteral(IntValue),

    #[token("\"", lex_string)]
    StringLiteral(StringLit),

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Eq,
    #[token("<<")]
    Write,
    #[token(">>")]
    Read,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Special
    Eof,
}

fn lex_int(lex: &mut logos::Lexer<TokenKind>) -> IntValue {
    match lex.slice().parse::<i32>() {
        Ok(value) => IntValue { value, overflowed: false },
        Err(_) => IntValue { value: i32::MAX, overflowed: true },
    }
}

/// Scan the body of a string literal after its opening quote.
///
/// A literal ends at the closing quote; a newline or the end of input leaves
/// it unterminated, and the newline is not consumed.
fn lex_string(lex: &mut logos::Lexer<TokenKind>) -> StringLit {
    let rest = lex.remainder();
    let mut bad_escape = false;
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(i + 1);
                return if bad_escape {
                    StringLit::BadEscape
                } else {
                    StringLit::Valid(lex.slice().to_string())
                };
            }
            '\n' => {
                lex.bump(i);
                return unterminated(bad_escape);
            }
            '\\' => match chars.next() {
                Some((_, 'n' | 't' | '\'' | '"' | '?' | '\\')) => {}
                Some((j, '\n')) => {
                    lex.bump(j);
                    return unterminated(true);
                }
                Some(_) => bad_escape = true,
                None => break,
            },
            _ => {}
        }
    }

    lex.bump(rest.len());
    unterminated(bad_escape)
}

fn unterminated(bad_escape: bool) -> StringLit {
    if bad_escape {
        StringLit::UnterminatedBadEscape
    } else {
        StringLit::Unterminated
    }
}

impl TokenKind {
    /// Check if this token starts a type in a declaration
    pub fn is_type_start(&self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Bool | TokenKind::Void | TokenKind::Struct)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Bool => "'bool'",
            TokenKind::Int => "'int'",
            TokenKind::Void => "'void'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Struct => "'struct'",
            TokenKind::Cin => "'cin'",
            TokenKind::Cout => "'cout'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::Repeat => "'repeat'",
            TokenKind::Return => "'return'",
            TokenKind::Identifier(name) => return write!(f, "identifier '{}'", name),
            TokenKind::IntLiteral(v) => return write!(f, "integer literal {}", v.value),
            TokenKind::StringLiteral(_) => "string literal",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Bang => "'!'",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::Eq => "'='",
            TokenKind::Write => "'<<'",
            TokenKind::Read => "'>>'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}
