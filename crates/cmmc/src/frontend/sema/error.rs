//! Contract violations inside the analysis passes

use super::scope::SymbolTableError;
use super::symbol::SymbolId;
use crate::common::{CompileError, Position};
use thiserror::Error;

/// A bug in the analyzer itself rather than in the analyzed program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("symbol table misuse: {0}")]
    Table(#[from] SymbolTableError),

    #[error("identifier at {0} reached type checking unresolved")]
    Unresolved(Position),

    #[error("dangling symbol {0:?}")]
    UnknownSymbol(SymbolId),

    #[error("symbol {0:?} is not a {1}")]
    WrongSymbolKind(SymbolId, &'static str),
}

impl From<InternalError> for CompileError {
    fn from(err: InternalError) -> Self {
        CompileError::internal(err.to_string())
    }
}
