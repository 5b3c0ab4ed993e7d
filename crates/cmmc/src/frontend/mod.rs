//! C-- front end
//!
//! The pipeline is:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Name resolution, linking every identifier to its symbol
//! 4. Type checking, run only when name resolution found no fatal error

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::{CompileError, CompileResult, DiagnosticReporter, Diagnostics};

pub use ast::Program;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{AnalysisResult, SymbolArena};

/// Configuration options passed to the front end
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_symbols: bool,
    pub verbose: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Output of a completed analysis run
#[derive(Debug)]
pub struct Analysis {
    /// The tree with identifiers linked and expression types cached
    pub program: Program,
    pub symbols: SymbolArena,
    pub result: AnalysisResult,
}

impl Analysis {
    /// True if code generation must not run on this program
    pub fn has_fatal_error(&self) -> bool {
        self.result.has_fatal_error()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.result.diagnostics()
    }
}

/// C-- front end
pub struct CmmFrontend;

impl CmmFrontend {
    pub fn new() -> Self {
        Self
    }

    /// Source file extensions this front end handles
    pub fn extensions(&self) -> &'static [&'static str] {
        &[".cmm", ".cminusminus"]
    }

    /// Run the whole pipeline, reporting every diagnostic through the context.
    ///
    /// Semantic problems are returned in the [`Analysis`]; an `Err` means
    /// parsing failed or the analyzer hit an internal fault.
    pub fn analyze(&self, source: &str, ctx: &CompileContext, config: &FrontendConfig) -> CompileResult<Analysis> {
        if config.dump_tokens {
            eprintln!("=== C-- Tokens ===");
            eprint!("{}", self.dump_tokens(source));
            eprintln!("=== End Tokens ===\n");
        }

        log::info!("parsing {}", ctx.filename);
        let mut parser = Parser::new(source);
        let parsed = parser.parse();

        let mut result = AnalysisResult::new();
        result.merge(parser.take_diagnostics());
        for diag in result.diagnostics() {
            ctx.reporter.report_diagnostic(ctx.file_id, diag);
        }

        let mut program = match parsed {
            Ok(program) => program,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };

        if config.dump_ast {
            eprintln!("=== C-- AST ===");
            eprintln!("{:#?}", program.declarations);
            eprintln!("=== End AST ===\n");
        }

        log::info!("analyzing {}", ctx.filename);
        let (symbols, sema_result) = match sema::analyze(&mut program) {
            Ok(analyzed) => analyzed,
            Err(e) => {
                let e = CompileError::from(e);
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };

        let sema_diagnostics = sema_result.into_diagnostics();
        for diag in &sema_diagnostics {
            ctx.reporter.report_diagnostic(ctx.file_id, diag);
        }
        result.merge(sema_diagnostics);

        if config.dump_symbols {
            eprintln!("=== C-- Symbols ===");
            eprint!("{}", symbols.dump(&program.names));
            eprintln!("=== End Symbols ===\n");
        }

        if config.verbose {
            log::info!(
                "{}: {} symbols, {} diagnostics, fatal: {}",
                ctx.filename,
                symbols.len(),
                result.diagnostics().len(),
                result.has_fatal_error()
            );
        }

        Ok(Analysis { program, symbols, result })
    }

    /// One token per line: `line:col kind`
    pub fn dump_tokens(&self, source: &str) -> String {
        let (tokens, _) = Lexer::new(source).tokenize_all();
        let mut output = String::new();
        for token in &tokens {
            output.push_str(&format!("{} {}\n", token.pos, token.kind));
        }
        output
    }
}

impl Default for CmmFrontend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ErrorKind, Position};
    use crate::frontend::ast::*;
    use crate::frontend::sema::Type;
    use pretty_assertions::assert_eq;

    fn analyze(source: &str) -> CompileResult<Analysis> {
        let mut reporter = DiagnosticReporter::plain();
        let file_id = reporter.add_file("test.cmm", source);
        let ctx = CompileContext::new("test.cmm".into(), file_id, &reporter);
        CmmFrontend::new().analyze(source, &ctx, &FrontendConfig::default())
    }

    fn reported(analysis: &Analysis) -> Vec<(Position, ErrorKind)> {
        analysis.diagnostics().iter().map(|d| (d.pos, d.kind.clone())).collect()
    }

    fn body(analysis: &Analysis, decl: usize) -> &Block {
        match &analysis.program.declarations[decl] {
            Decl::Fn(f) => &f.body,
            _ => panic!("expected function"),
        }
    }

    fn assignment(stmt: &Stmt) -> (&Expr, &Expr, &Expr) {
        let StmtKind::Assign(expr) = &stmt.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Assign { target, value } = &expr.kind else {
            panic!("expected assignment expression");
        };
        (expr, target, value)
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let analysis = analyze("void f() {\n  int x;\n  int x;\n}").unwrap();
        assert_eq!(reported(&analysis), vec![(Position::new(3, 7), ErrorKind::MultiplyDeclared)]);
        assert!(analysis.has_fatal_error());

        let xs = analysis
            .symbols
            .iter()
            .filter(|(_, sym)| analysis.program.name(sym.name) == "x")
            .count();
        assert_eq!(xs, 1);
    }

    #[test]
    fn test_shadowing() {
        let analysis = analyze("void f() { int x; if (true) { int x; x = 1; } }").unwrap();
        assert!(analysis.diagnostics().is_empty());

        let block = body(&analysis, 0);
        let StmtKind::If { then_block, .. } = &block.stmts[0].kind else {
            panic!("expected if");
        };
        let (_, target, _) = assignment(&then_block.stmts[0]);
        let ExprKind::Id(id) = &target.kind else { panic!("expected id") };
        assert_eq!(id.sym, then_block.decls[0].id.sym);
        assert_ne!(id.sym, block.decls[0].id.sym);
    }

    #[test]
    fn test_struct_field_chain() {
        let analysis = analyze("struct P { int x; }; struct P p; void f() { p.x = 3; }").unwrap();
        assert!(analysis.diagnostics().is_empty());

        let Decl::Struct(def) = &analysis.program.declarations[0] else {
            panic!("expected struct");
        };
        let (assign, target, _) = assignment(&body(&analysis, 2).stmts[0]);
        let ExprKind::Dot { field, .. } = &target.kind else {
            panic!("expected dot access");
        };
        assert_eq!(field.sym, def.fields[0].id.sym);
        assert_eq!(target.ty, Some(Type::Int));
        assert_eq!(assign.ty, Some(Type::Int));
    }

    #[test]
    fn test_arity_mismatch() {
        let analysis = analyze(
            "int f(int a) { return a; }
             void g() { int a; int b; a = f(a, b); }",
        )
        .unwrap();
        assert_eq!(analysis.diagnostics().kinds(), vec![ErrorKind::ArityMismatch]);

        let (_, _, call) = assignment(&body(&analysis, 1).stmts[0]);
        assert_eq!(call.ty, Some(Type::Int));
    }

    #[test]
    fn test_cascading_suppression() {
        let analysis = analyze("int y; void f() { y = (1 + true); }").unwrap();
        assert_eq!(analysis.diagnostics().kinds(), vec![ErrorKind::ArithmeticOnNonNumeric]);
    }

    #[test]
    fn test_column_after_non_ascii_string() {
        let analysis = analyze("void f() { cout << \"\u{e9}\"; y = 1; }").unwrap();
        assert_eq!(
            reported(&analysis),
            vec![(Position::new(1, 25), ErrorKind::UndeclaredIdentifier)]
        );
    }

    #[test]
    fn test_use_links_to_declared_symbol() {
        let analysis = analyze("int g; void f() { g = 1; }").unwrap();
        let Decl::Var(decl) = &analysis.program.declarations[0] else {
            panic!("expected variable");
        };
        let (_, target, _) = assignment(&body(&analysis, 1).stmts[0]);
        let ExprKind::Id(id) = &target.kind else { panic!("expected id") };

        let sym = id.sym.unwrap();
        assert_eq!(Some(sym), decl.id.sym);
        let symbol = analysis.symbols.get(sym).unwrap();
        assert_eq!(analysis.program.name(symbol.name), "g");
        assert_eq!(symbol.pos, decl.id.pos);
    }

    #[test]
    fn test_lexer_diagnostics_come_first() {
        let analysis = analyze("int x; void f() { x = 99999999999; y = 1; }").unwrap();
        assert_eq!(
            analysis.diagnostics().kinds(),
            vec![ErrorKind::IntegerTooLarge, ErrorKind::UndeclaredIdentifier]
        );
    }

    #[test]
    fn test_warnings_alone_are_not_fatal() {
        let analysis = analyze("int x; void f() { x = 99999999999; }").unwrap();
        assert_eq!(analysis.diagnostics().len(), 1);
        assert!(!analysis.has_fatal_error());
    }

    #[test]
    fn test_syntax_error_is_hard_error() {
        let err = analyze("int x\n").unwrap_err();
        assert!(matches!(err, CompileError::Parser { .. }));
    }

    #[test]
    fn test_dump_tokens() {
        let dump = CmmFrontend::new().dump_tokens("int x;");
        assert_eq!(dump, "1:1 'int'\n1:5 identifier 'x'\n1:6 ';'\n1:7 end of file\n");
    }

    #[test]
    fn test_symbol_dump() {
        let analysis = analyze("struct P { int x; }; struct P p; bool f(int a) { return true; }").unwrap();
        assert_eq!(
            analysis.symbols.dump(&analysis.program.names),
            "1:16 x: int\n\
             1:8 P: struct-name P\n    x: int\n\
             1:31 p: struct P\n\
             1:39 f: (int)->bool\n\
             1:45 a: int\n"
        );
    }
}
