//! Diagnostics produced while lexing and analyzing a program
//!
//! Every user-facing problem is an [`ErrorKind`] recorded at a [`Position`]
//! with a [`Severity`]. Fatal diagnostics do not stop a pass; they only tell
//! later phases not to run.

use std::fmt;
use thiserror::Error;
use super::Position;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Reported but harmless; later phases may still run
    Warning,
    /// Later phases must not run
    Fatal,
}

/// Statement whose controlling expression must be `bool`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    If,
    While,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::If => write!(f, "an if condition"),
            Construct::While => write!(f, "a while condition"),
        }
    }
}

/// Every diagnostic the front end can emit. `Display` is the message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // === Lexical ===
    #[error("integer literal too large; using max value")]
    IntegerTooLarge,

    #[error("ignoring illegal character: {0}")]
    IllegalCharacter(char),

    #[error("unterminated string literal ignored")]
    UnterminatedString,

    #[error("string literal with bad escaped character ignored")]
    BadEscapeString,

    #[error("unterminated string literal with bad escaped character ignored")]
    UnterminatedBadEscapeString,

    // === Name resolution ===
    #[error("Non-function declared void")]
    NonFunctionVoid,

    #[error("Invalid name of struct type")]
    InvalidStructName,

    #[error("Multiply declared identifier")]
    MultiplyDeclared,

    #[error("Undeclared identifier")]
    UndeclaredIdentifier,

    #[error("Dot-access of non-struct type")]
    DotAccessOnNonStruct,

    #[error("Invalid struct field name")]
    InvalidFieldName,

    // === Operators ===
    #[error("Arithmetic operator applied to non-numeric operand")]
    ArithmeticOnNonNumeric,

    #[error("Logical operator applied to non-bool operand")]
    LogicalOnNonBool,

    #[error("Relational operator applied to non-numeric operand")]
    RelationalOnNonNumeric,

    #[error("Equality operator applied to void functions")]
    EqualityOnVoidFunctions,

    #[error("Equality operator applied to functions")]
    EqualityOnFunctions,

    #[error("Equality operator applied to struct names")]
    EqualityOnStructNames,

    #[error("Equality operator applied to struct variables")]
    EqualityOnStructVariables,

    #[error("Type mismatch")]
    TypeMismatch,

    // === Assignment ===
    #[error("Function assignment")]
    FunctionAssignment,

    #[error("Struct name assignment")]
    StructNameAssignment,

    #[error("Struct variable assignment")]
    StructVariableAssignment,

    // === Calls ===
    #[error("Attempt to call a non-function")]
    CallOnNonFunction,

    #[error("Function call with wrong number of args")]
    ArityMismatch,

    #[error("Type of actual does not match type of formal")]
    ArgTypeMismatch,

    // === Returns ===
    #[error("Return with a value in a void function")]
    ReturnValueInVoidFunction,

    #[error("Missing return value")]
    MissingReturnValue,

    #[error("Bad return value")]
    BadReturnValue,

    // === Input / output ===
    #[error("Attempt to read a function")]
    ReadFunction,

    #[error("Attempt to read a struct name")]
    ReadStructName,

    #[error("Attempt to read a struct variable")]
    ReadStructVariable,

    #[error("Attempt to write a function")]
    WriteFunction,

    #[error("Attempt to write a struct name")]
    WriteStructName,

    #[error("Attempt to write a struct variable")]
    WriteStructVariable,

    #[error("Attempt to write void")]
    WriteVoid,

    // === Control flow ===
    #[error("Non-bool expression used as {0}")]
    NonBoolCondition(Construct),

    #[error("Non-integer expression used as a repeat clause")]
    NonIntRepeatCount,
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: Position,
    pub severity: Severity,
    pub kind: ErrorKind,
}

impl Diagnostic {
    pub fn new(pos: Position, severity: Severity, kind: ErrorKind) -> Self {
        Self { pos, severity, kind }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "***WARNING***",
            Severity::Fatal => "***ERROR***",
        };
        write!(f, "{} {} {}", self.pos, tag, self.kind)
    }
}

/// Ordered sink of diagnostics for one analysis run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, pos: Position, kind: ErrorKind) {
        log::trace!("warning at {pos}: {kind}");
        self.items.push(Diagnostic::new(pos, Severity::Warning, kind));
    }

    pub fn fatal(&mut self, pos: Position, kind: ErrorKind) {
        log::trace!("error at {pos}: {kind}");
        self.items.push(Diagnostic::new(pos, Severity::Fatal, kind));
    }

    /// True once any fatal diagnostic has been recorded
    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    /// Append another sink's diagnostics after this one's
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Kinds in report order, handy for assertions
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.items.iter().map(|d| d.kind.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_report_format() {
        let diag = Diagnostic::new(Position::new(3, 7), Severity::Fatal, ErrorKind::UndeclaredIdentifier);
        assert_eq!(diag.to_string(), "3:7 ***ERROR*** Undeclared identifier");

        let warn = Diagnostic::new(Position::new(1, 9), Severity::Warning, ErrorKind::IntegerTooLarge);
        assert_eq!(warn.to_string(), "1:9 ***WARNING*** integer literal too large; using max value");
    }

    #[test]
    fn test_condition_messages() {
        assert_eq!(
            ErrorKind::NonBoolCondition(Construct::If).to_string(),
            "Non-bool expression used as an if condition"
        );
        assert_eq!(
            ErrorKind::NonBoolCondition(Construct::While).to_string(),
            "Non-bool expression used as a while condition"
        );
    }

    #[test]
    fn test_warnings_are_not_fatal() {
        let mut diags = Diagnostics::new();
        diags.warn(Position::new(1, 1), ErrorKind::IntegerTooLarge);
        assert!(!diags.has_fatal());

        diags.fatal(Position::new(2, 1), ErrorKind::TypeMismatch);
        assert!(diags.has_fatal());
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = Diagnostics::new();
        first.fatal(Position::new(1, 1), ErrorKind::MultiplyDeclared);
        let mut second = Diagnostics::new();
        second.fatal(Position::new(5, 2), ErrorKind::TypeMismatch);

        first.extend(second);
        assert_eq!(first.kinds(), vec![ErrorKind::MultiplyDeclared, ErrorKind::TypeMismatch]);
    }
}
