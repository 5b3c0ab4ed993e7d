//! Lexer implementation using logos

use super::token::{StringLit, Token, TokenKind};
use crate::common::{Diagnostics, ErrorKind, LineIndex};
use logos::Logos;

/// Lexer for C-- source code.
///
/// Malformed input never stops the lexer: it is reported to the collected
/// [`Diagnostics`] and skipped.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    lines: LineIndex<'a>,
    peeked: Option<Token>,
    at_eof: bool,
    diagnostics: Diagnostics,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            lines: LineIndex::new(source),
            peeked: None,
            at_eof: false,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.peeked.take() {
            return token;
        }

        loop {
            if self.at_eof {
                let pos = self.lines.position(self.inner.source().len());
                return Token::new(TokenKind::Eof, pos);
            }

            let Some(result) = self.inner.next() else {
                self.at_eof = true;
                continue;
            };
            let pos = self.lines.position(self.inner.span().start);

            match result {
                Ok(TokenKind::IntLiteral(value)) => {
                    if value.overflowed {
                        self.diagnostics.warn(pos, ErrorKind::IntegerTooLarge);
                    }
                    return Token::new(TokenKind::IntLiteral(value), pos);
                }
                Ok(TokenKind::StringLiteral(lit)) => match lit {
                    StringLit::Valid(_) => return Token::new(TokenKind::StringLiteral(lit), pos),
                    StringLit::BadEscape => {
                        self.diagnostics.fatal(pos, ErrorKind::BadEscapeString);
                    }
                    StringLit::Unterminated => {
                        self.diagnostics.fatal(pos, ErrorKind::UnterminatedString);
                    }
                    StringLit::UnterminatedBadEscape => {
                        self.diagnostics.fatal(pos, ErrorKind::UnterminatedBadEscapeString);
                    }
                },
                Ok(kind) => return Token::new(kind, pos),
                Err(()) => {
                    let c = self.inner.slice().chars().next().unwrap_or('?');
                    self.diagnostics.fatal(pos, ErrorKind::IllegalCharacter(c));
                }
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token(),
        };
        self.peeked.insert(token)
    }

    /// Tokenize the entire source and return all tokens with the diagnostics
    /// produced along the way
    pub fn tokenize_all(mut self) -> (Vec<Token>, Diagnostics) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Hand over the diagnostics collected so far
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Position;
    use crate::frontend::lexer::IntValue;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source).tokenize_all();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords() {
        let source = "int bool void struct cin cout if else while repeat return true false";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().kind, TokenKind::Int));
        assert!(matches!(lexer.next_token().kind, TokenKind::Bool));
        assert!(matches!(lexer.next_token().kind, TokenKind::Void));
        assert!(matches!(lexer.next_token().kind, TokenKind::Struct));
        assert!(matches!(lexer.next_token().kind, TokenKind::Cin));
        assert!(matches!(lexer.next_token().kind, TokenKind::Cout));
        assert!(matches!(lexer.next_token().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().kind, TokenKind::Repeat));
        assert!(matches!(lexer.next_token().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().kind, TokenKind::True));
        assert!(matches!(lexer.next_token().kind, TokenKind::False));
        assert!(matches!(lexer.next_token().kind, TokenKind::Eof));
    }

    #[test]
    fn test_identifiers_and_keyword_prefixes() {
        assert_eq!(
            kinds("intx repeat_ x1"),
            vec![
                TokenKind::Identifier("intx".into()),
                TokenKind::Identifier("repeat_".into()),
                TokenKind::Identifier("x1".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("<< >> <= < ++ + -- - == = != ! && ||"),
            vec![
                TokenKind::Write,
                TokenKind::Read,
                TokenKind::LtEq,
                TokenKind::Lt,
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::MinusMinus,
                TokenKind::Minus,
                TokenKind::EqEq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Bang,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let (tokens, _) = Lexer::new("int x;\n  x = 1;").tokenize_all();
        assert_eq!(tokens[0].pos, Position::new(1, 1));
        assert_eq!(tokens[1].pos, Position::new(1, 5));
        assert_eq!(tokens[3].pos, Position::new(2, 3));
        assert_eq!(tokens[5].pos, Position::new(2, 7));
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("int // trailing\n# hash comment\nx"),
            vec![TokenKind::Int, TokenKind::Identifier("x".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_integer_overflow_warns_and_clamps() {
        let (tokens, diags) = Lexer::new("99999999999").tokenize_all();
        assert_eq!(
            tokens[0].kind,
            TokenKind::IntLiteral(IntValue { value: i32::MAX, overflowed: true })
        );
        assert_eq!(diags.kinds(), vec![ErrorKind::IntegerTooLarge]);
        assert!(!diags.has_fatal());
    }

    #[test]
    fn test_string_literals() {
        let (tokens, diags) = Lexer::new(r#""a\tb\"c""#).tokenize_all();
        assert_eq!(
            tokens[0].kind,
            TokenKind::StringLiteral(StringLit::Valid(r#""a\tb\"c""#.into()))
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_bad_strings_are_reported_and_dropped() {
        let source = "\"bad \\q escape\"\n\"open\n\"open \\q\nx";
        let (tokens, diags) = Lexer::new(source).tokenize_all();

        assert_eq!(
            diags.kinds(),
            vec![
                ErrorKind::BadEscapeString,
                ErrorKind::UnterminatedString,
                ErrorKind::UnterminatedBadEscapeString,
            ]
        );
        let positions: Vec<_> = diags.iter().map(|d| d.pos).collect();
        assert_eq!(positions, vec![Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)]);
        assert_eq!(tokens[0].kind, TokenKind::Identifier("x".into()));
    }

    #[test]
    fn test_unterminated_string_at_end_of_input() {
        let (tokens, diags) = Lexer::new("x \"open").tokenize_all();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
        assert_eq!(diags.kinds(), vec![ErrorKind::UnterminatedString]);
        assert_eq!(diags.iter().next().map(|d| d.pos), Some(Position::new(1, 3)));

        let (_, diags) = Lexer::new("\"open \\q").tokenize_all();
        assert_eq!(diags.kinds(), vec![ErrorKind::UnterminatedBadEscapeString]);
    }

    #[test]
    fn test_illegal_character() {
        let (tokens, diags) = Lexer::new("x @ y").tokenize_all();
        assert_eq!(tokens.len(), 3);
        assert_eq!(diags.kinds(), vec![ErrorKind::IllegalCharacter('@')]);
        assert_eq!(diags.iter().next().map(|d| d.pos), Some(Position::new(1, 3)));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.peek().kind, TokenKind::Identifier("a".into()));
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier("a".into()));
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier("b".into()));
    }
}
