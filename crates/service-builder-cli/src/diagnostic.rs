use miette::{Diagnostic, NamedSource, SourceSpan};
use service_builder_dsl::{DslError, ParseError, ScanError};

/// A diagnostic wrapping a `ParseError` for rich miette rendering.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ModelDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

/// Convert a `ParseError` into a miette `ModelDiagnostic`.
///
/// Line/column positions are mapped back to byte offsets in `source`; the
/// label covers the rune the error points at.
pub fn parse_error_to_diagnostic(error: &ParseError, source: &str) -> ModelDiagnostic {
    let named_src = NamedSource::new(error.source_name(), source.to_string());
    // A lexeme's position is after its first rune; a read error's position
    // is before the rune that failed to decode.
    let span = match error.position() {
        Some(p) if matches!(error.error(), DslError::Read { .. }) => {
            rune_span(source, p.line, p.column)
        }
        Some(p) => rune_span(source, p.line, p.column.saturating_sub(1)),
        None => (source.len(), 0).into(),
    };

    let (message, label, suggestion) = match error.error() {
        DslError::IllegalCharacter { found, .. } => (
            format!("illegal character '{found}'"),
            "cannot start any token".to_string(),
            Some(
                "Identifiers use ASCII letters, digits and '_'; only { } [ ] : , are punctuation."
                    .to_string(),
            ),
        ),

        DslError::UnexpectedToken {
            expected, found, ..
        } => (
            format!("unexpected token: expected {expected}, found {found}"),
            format!("expected {expected}"),
            None,
        ),

        DslError::UnexpectedEndOfInput { expected, .. } => (
            format!("unexpected end of input: expected {expected}"),
            "input ended here".to_string(),
            Some(format!("Add {expected} to complete the definition.")),
        ),

        DslError::InvalidInteger { text, .. } => (
            format!("invalid integer '{text}'"),
            "out of range".to_string(),
            Some(format!("Pagination values must be at most {}.", i64::MAX)),
        ),

        DslError::Read {
            source: ScanError::InvalidUtf8 { .. },
        } => (
            "input is not valid UTF-8".to_string(),
            "invalid byte sequence".to_string(),
            Some("Save the file as UTF-8.".to_string()),
        ),

        other => (other.to_string(), "error".to_string(), None),
    };

    ModelDiagnostic {
        src: named_src,
        span,
        message,
        label,
        suggestion,
    }
}

/// Render a parse error for a file using miette.
pub fn render_diagnostic(error: &ParseError, source: &str) -> miette::Report {
    miette::Report::new(parse_error_to_diagnostic(error, source))
}

/// The byte span of rune `index` (counted from 0) on `line`.
///
/// A rune past the end of the text maps to an empty span at the end.
fn rune_span(source: &str, line: usize, index: usize) -> SourceSpan {
    let line_start = if line <= 1 {
        0
    } else {
        source
            .match_indices('\n')
            .nth(line - 2)
            .map_or(source.len(), |(i, _)| i + 1)
    };

    let rest = &source[line_start..];
    match rest.char_indices().nth(index) {
        Some((i, ch)) => (line_start + i, ch.len_utf8()).into(),
        None => (source.len(), 0).into(),
    }
}
