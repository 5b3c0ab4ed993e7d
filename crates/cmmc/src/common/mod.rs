//! Common infrastructure shared by the lexer, parser and semantic passes

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, Diagnostics, ErrorKind, Severity, Construct};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::{LineIndex, Position};
