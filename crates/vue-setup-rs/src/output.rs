//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use serde::Serialize;
use vue_setup_transformer::{TextRange, TransformError, TransformWarning};

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within the line).
    pub col: u32,
}

/// Byte offsets of line starts, for offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| (offset + 1) as u32),
        );
        Self { line_starts }
    }

    /// Converts a byte offset to a line/column position.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        LineCol {
            line: line as u32,
            col: offset - self.line_starts[line],
        }
    }
}

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The file was not converted.
    Error,
    /// The file was converted but needs a look.
    Warning,
}

/// A diagnostic reduced to what the formatter needs.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Option<TextRange>,
}

impl From<&TransformError> for Diagnostic {
    fn from(error: &TransformError) -> Self {
        Self {
            severity: Severity::Error,
            code: error.code(),
            message: error.to_string(),
            span: error.span,
        }
    }
}

impl From<&TransformWarning> for Diagnostic {
    fn from(warning: &TransformWarning) -> Self {
        Self {
            severity: Severity::Warning,
            code: warning.code(),
            message: warning.to_string(),
            span: warning.span,
        }
    }
}

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error or Warning).
    #[serde(rename = "type")]
    pub diagnostic_type: Severity,
    /// The file path.
    pub filename: String,
    /// The start position, when the problem has a location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    /// The end position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
    /// The message.
    pub message: String,
    /// The diagnostic code.
    pub code: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

impl Position {
    fn new(line_index: &LineIndex, offset: u32) -> Self {
        let LineCol { line, col } = line_index.line_col(offset);
        Self {
            line: line + 1,
            column: col + 1,
            offset,
        }
    }
}

/// The JSON record for one processed file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The file path, relative to the workspace.
    pub filename: String,
    /// Whether the file was converted.
    pub converted: bool,
    /// The converted code, when printed rather than written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Errors and warnings for the file.
    pub diagnostics: Vec<FormattedDiagnostic>,
}

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a collection of diagnostics.
    pub fn format(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path, source: &str) -> String {
        match self.format {
            OutputFormat::Human => Self::format_human(diagnostics, file_path, source),
            OutputFormat::Json => {
                let formatted = Self::format_json_diagnostics(diagnostics, file_path, source);
                serde_json::to_string_pretty(&formatted).unwrap_or_default()
            }
        }
    }

    /// Formats as human-readable output with the offending line.
    fn format_human(diagnostics: &[Diagnostic], file_path: &Utf8Path, source: &str) -> String {
        let line_index = LineIndex::new(source);
        let lines: Vec<&str> = source.lines().collect();
        let mut output = String::new();

        for diag in diagnostics {
            let severity = match diag.severity {
                Severity::Error => "Error",
                Severity::Warning => "Warning",
            };

            let Some(span) = diag.span else {
                output.push_str(&format!(
                    "{}\n{}: {} ({})\n\n",
                    file_path, severity, diag.message, diag.code
                ));
                continue;
            };

            let start = line_index.line_col(u32::from(span.start()));
            output.push_str(&format!(
                "{}:{}:{}\n{}: {} ({})\n",
                file_path,
                start.line + 1,
                start.col + 1,
                severity,
                diag.message,
                diag.code
            ));

            let line_num = start.line as usize;
            if let Some(line) = lines.get(line_num) {
                output.push_str(&format!("  {} | {}\n", line_num + 1, line));
                output.push_str(&format!(
                    "  {} | {}^\n",
                    " ".repeat((line_num + 1).to_string().len()),
                    " ".repeat(start.col as usize)
                ));
            }

            output.push('\n');
        }

        output
    }

    /// Formats diagnostics into JSON-ready structs.
    pub fn format_json_diagnostics(
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> Vec<FormattedDiagnostic> {
        let line_index = LineIndex::new(source);
        diagnostics
            .iter()
            .map(|diag| FormattedDiagnostic {
                diagnostic_type: diag.severity,
                filename: file_path.to_string(),
                start: diag
                    .span
                    .map(|span| Position::new(&line_index, u32::from(span.start()))),
                end: diag
                    .span
                    .map(|span| Position::new(&line_index, u32::from(span.end()))),
                message: diag.message.clone(),
                code: diag.code.to_string(),
            })
            .collect()
    }
}

/// Summary of a conversion run.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of files converted.
    pub converted_count: usize,
    /// Number of errors (files that failed).
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Whether to fail on warnings.
    #[serde(skip)]
    pub fail_on_warnings: bool,
}

impl RunSummary {
    /// Returns true when the process should exit with an error.
    pub fn failed(&self) -> bool {
        self.error_count > 0 || (self.warning_count > 0 && self.fail_on_warnings)
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let error_word = if self.error_count == 1 {
            "error"
        } else {
            "errors"
        };
        let warning_word = if self.warning_count == 1 {
            "warning"
        } else {
            "warnings"
        };
        let file_word = if self.file_count == 1 {
            "file"
        } else {
            "files"
        };

        format!(
            "====================================\nvue-setup-rs converted {} of {} {} with {} {} and {} {}",
            self.converted_count,
            self.file_count,
            file_word,
            self.error_count,
            error_word,
            self.warning_count,
            warning_word
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vue_setup_transformer::TextSize;

    fn diagnostic(span: Option<(u32, u32)>) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            code: "data-not-object",
            message: "`data` does not return an object literal and was skipped".to_string(),
            span: span.map(|(start, end)| TextRange::new(TextSize::from(start), TextSize::from(end))),
        }
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.line_col(0), LineCol { line: 0, col: 0 });
        assert_eq!(index.line_col(4), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(6), LineCol { line: 2, col: 0 });
        assert_eq!(index.line_col(7), LineCol { line: 3, col: 0 });
    }

    #[test]
    fn test_format_human() {
        let formatter = Formatter::new(OutputFormat::Human);
        let output = formatter.format(
            &[diagnostic(Some((11, 15)))],
            Utf8Path::new("src/App.vue"),
            "<script>\n  data() {}\n</script>",
        );
        insta::assert_snapshot!(output, @r###"
        src/App.vue:2:3
        Warning: `data` does not return an object literal and was skipped (data-not-object)
          2 |   data() {}
            |   ^
        "###);
    }

    #[test]
    fn test_format_human_without_span() {
        let formatter = Formatter::new(OutputFormat::Human);
        let output = formatter.format(&[diagnostic(None)], Utf8Path::new("a.vue"), "");
        assert!(output.starts_with("a.vue\nWarning: "));
    }

    #[test]
    fn test_format_json() {
        let diagnostics = Formatter::format_json_diagnostics(
            &[diagnostic(Some((3, 5)))],
            Utf8Path::new("a.vue"),
            "ab\ncd",
        );
        let json = serde_json::to_value(&diagnostics).expect("serializes");
        assert_eq!(json[0]["type"], "Warning");
        assert_eq!(json[0]["filename"], "a.vue");
        assert_eq!(json[0]["start"]["line"], 2);
        assert_eq!(json[0]["start"]["column"], 1);
        assert_eq!(json[0]["end"]["offset"], 5);
        assert_eq!(json[0]["code"], "data-not-object");
    }

    #[test]
    fn test_summary() {
        let summary = RunSummary {
            file_count: 5,
            converted_count: 3,
            error_count: 2,
            warning_count: 1,
            fail_on_warnings: false,
        };

        let output = summary.format();
        assert!(output.contains("converted 3 of 5 files"));
        assert!(output.contains("2 errors"));
        assert!(output.contains("1 warning"));
        assert!(summary.failed());
    }

    #[test]
    fn test_summary_fail_on_warnings() {
        let mut summary = RunSummary {
            file_count: 1,
            converted_count: 1,
            warning_count: 1,
            ..RunSummary::default()
        };
        assert!(!summary.failed());
        summary.fail_on_warnings = true;
        assert!(summary.failed());
    }
}
