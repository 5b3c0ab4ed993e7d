//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use std::ops::Range;
use thiserror::Error;
use super::{Diagnostic, Position, Severity};

/// Hard failure of a pipeline stage
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Parser error at {pos}: {message}")]
    Parser { message: String, pos: Position },

    #[error("Internal compiler error: {message}")]
    Internal { message: String },
}

impl CompileError {
    pub fn parser(message: impl Into<String>, pos: Position) -> Self {
        Self::Parser {
            message: message.into(),
            pos,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
    plain: bool,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
            plain: false,
        }
    }

    /// Reporter printing one `line:col ***ERROR*** message` line per
    /// diagnostic instead of source snippets
    pub fn plain() -> Self {
        Self { plain: true, ..Self::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Byte range covering the character at `pos`, clamped to its line
    fn byte_range(&self, file_id: usize, pos: Position) -> Range<usize> {
        let line_index = pos.line.saturating_sub(1) as usize;
        let (Ok(line), Ok(source)) = (self.files.line_range(file_id, line_index), self.files.source(file_id)) else {
            return 0..0;
        };
        let text = source.get(line.clone()).unwrap_or_default();
        match text.char_indices().nth(pos.column.saturating_sub(1) as usize) {
            Some((offset, c)) => {
                let start = line.start + offset;
                start..(start + c.len_utf8()).min(line.end)
            }
            None => line.end..line.end,
        }
    }

    fn build_compile_error(&self, file_id: usize, error: &CompileError) -> Report<usize> {
        match error {
            CompileError::Parser { message, pos } => Report::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, self.byte_range(file_id, *pos)).with_message(message)
                ]),

            CompileError::Internal { message } => {
                Report::bug().with_message(format!("Internal compiler error: {}", message))
            }
        }
    }

    fn build_diagnostic(&self, file_id: usize, diag: &Diagnostic) -> Report<usize> {
        let report = match diag.severity {
            Severity::Warning => Report::warning(),
            Severity::Fatal => Report::error(),
        };
        report
            .with_message(diag.kind.to_string())
            .with_labels(vec![
                Label::primary(file_id, self.byte_range(file_id, diag.pos))
                    .with_message(format!("at {}", diag.pos))
            ])
    }

    fn emit(&self, out: &mut dyn WriteColor, report: &Report<usize>) {
        let _ = term::emit(out, &self.config, &self.files, report);
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        if self.plain {
            eprintln!("{}", error);
            return;
        }
        let report = self.build_compile_error(file_id, error);
        self.emit(&mut self.writer.lock(), &report);
    }

    pub fn report_diagnostic(&self, file_id: usize, diag: &Diagnostic) {
        if self.plain {
            eprintln!("{}", diag);
            return;
        }
        let report = self.build_diagnostic(file_id, diag);
        self.emit(&mut self.writer.lock(), &report);
    }

    /// Render a diagnostic without colors, for logs and tests
    pub fn render_diagnostic(&self, file_id: usize, diag: &Diagnostic) -> String {
        let mut buffer = Buffer::no_color();
        let report = self.build_diagnostic(file_id, diag);
        self.emit(&mut buffer, &report);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;

    #[test]
    fn test_render_points_at_column() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("t.cmm", "int x;\nbool x;\n");
        let diag = Diagnostic::new(Position::new(2, 6), Severity::Fatal, ErrorKind::MultiplyDeclared);

        let rendered = reporter.render_diagnostic(file_id, &diag);
        assert!(rendered.contains("Multiply declared identifier"));
        assert!(rendered.contains("t.cmm:2:6"));
    }

    #[test]
    fn test_out_of_range_position_is_clamped() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("t.cmm", "int x;\n");
        assert_eq!(reporter.byte_range(file_id, Position::new(1, 40)), 7..7);
        assert_eq!(reporter.byte_range(file_id, Position::new(9, 1)), 0..0);
    }

    #[test]
    fn test_column_maps_to_character_bytes() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("t.cmm", "cout << \"\u{e9}\u{e9}\"; y = 1;\n");
        assert_eq!(reporter.byte_range(file_id, Position::new(1, 10)), 9..11);
        assert_eq!(reporter.byte_range(file_id, Position::new(1, 15)), 16..17);
    }
}
