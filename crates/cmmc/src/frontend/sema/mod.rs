//! Semantic analysis
//!
//! Two passes over the parsed tree: [`NameResolver`] binds declarations and
//! links identifier uses to symbols, then [`TypeChecker`] types every
//! expression. The checker only runs when name resolution reported nothing
//! fatal, since it relies on every identifier being linked.

mod error;
mod types;
mod symbol;
mod scope;
mod resolver;
mod checker;

pub use error::InternalError;
pub use types::{Type, TypeDisplay};
pub use symbol::{Symbol, SymbolArena, SymbolId, SymbolKind};
pub use scope::{Scope, SymbolTable, SymbolTableError};
pub use resolver::NameResolver;
pub use checker::TypeChecker;

use crate::common::Diagnostics;
use crate::frontend::ast::Program;

/// Diagnostics of a whole analysis run, in report order
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    diagnostics: Diagnostics,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the diagnostics of a later phase
    pub fn merge(&mut self, diagnostics: Diagnostics) {
        self.diagnostics.extend(diagnostics);
    }

    /// True if later phases such as code generation must not run
    pub fn has_fatal_error(&self) -> bool {
        self.diagnostics.has_fatal()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

/// Run name resolution and, if it succeeded, type checking
pub fn analyze(program: &mut Program) -> Result<(SymbolArena, AnalysisResult), InternalError> {
    let mut result = AnalysisResult::new();

    let mut resolver = NameResolver::new();
    resolver.resolve(program)?;
    let (symbols, diagnostics) = resolver.finish();
    result.merge(diagnostics);

    if result.has_fatal_error() {
        log::info!("skipping type checking after name errors");
        return Ok((symbols, result));
    }

    let mut checker = TypeChecker::new(&symbols);
    checker.check(program)?;
    result.merge(checker.finish());

    Ok((symbols, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use crate::frontend::parser::Parser;

    fn run(source: &str) -> (Program, SymbolArena, AnalysisResult) {
        let mut program = Parser::new(source).parse().unwrap();
        let (symbols, result) = analyze(&mut program).unwrap();
        (program, symbols, result)
    }

    #[test]
    fn test_type_checking_skipped_after_name_errors() {
        let (_, _, result) = run("void f() { x = 1 + true; }");
        assert!(result.has_fatal_error());
        assert_eq!(result.diagnostics().kinds(), vec![ErrorKind::UndeclaredIdentifier]);
    }

    #[test]
    fn test_clean_program() {
        let (_, symbols, result) = run("int x; void main() { x = 1; cout << x; }");
        assert!(!result.has_fatal_error());
        assert!(result.diagnostics().is_empty());
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_type_errors_are_fatal() {
        let (_, _, result) = run("int x; void main() { x = true; }");
        assert!(result.has_fatal_error());
        assert_eq!(result.diagnostics().kinds(), vec![ErrorKind::TypeMismatch]);
    }
}
