//! C-- Compiler - semantic-analysis front end for the C-- teaching language
//!
//! ## Architecture
//!
//! - **Common** (`common/`): positions, diagnostics, errors and reporting
//! - **Frontend** (`frontend/`): lexer, parser, AST and semantic analysis
//!   (name resolution and type checking)

pub mod common;
pub mod frontend;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter, Diagnostics, ErrorKind, Position, Severity};
pub use frontend::{Analysis, CmmFrontend, CompileContext, FrontendConfig};
