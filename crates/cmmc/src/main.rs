//! C-- Compiler - semantic checker for C-- programs
//!
//! Usage: cmmc [OPTIONS] <input>

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use cmm_compiler::common::DiagnosticReporter;
use cmm_compiler::frontend::{CmmFrontend, CompileContext, FrontendConfig};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "cmmc")]
#[command(author = "C-- Toolchain Team")]
#[command(version = "0.1.0")]
#[command(about = "Name and type checker for the C-- teaching language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print `line:col ***ERROR*** message` lines instead of source snippets
    #[arg(long)]
    plain: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump the symbol listing after analysis
    #[arg(long)]
    dump_symbols: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Analyze the input file; `Ok(false)` when the program has errors
fn run(args: &Args) -> Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = if args.plain {
        DiagnosticReporter::plain()
    } else {
        DiagnosticReporter::new()
    };
    let file_id = reporter.add_file(&filename, &source);

    let frontend = CmmFrontend::new();
    let known = frontend.extensions();
    if !known.iter().any(|ext| filename.ends_with(ext)) {
        log::warn!("{} does not have a C-- extension ({})", filename, known.join(", "));
    }

    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_symbols: args.dump_symbols,
        verbose: args.verbose,
    };

    let ctx = CompileContext::new(filename.clone(), file_id, &reporter);

    let analysis = match frontend.analyze(&source, &ctx, &config) {
        Ok(analysis) => analysis,
        Err(e) => {
            // already reported through the context
            log::debug!("analysis aborted: {}", e);
            return Ok(false);
        }
    };

    if analysis.has_fatal_error() {
        log::info!("{}: {} diagnostics", filename, analysis.diagnostics().len());
        return Ok(false);
    }

    if args.verbose {
        eprintln!("{}: no errors", filename);
    }
    Ok(true)
}
