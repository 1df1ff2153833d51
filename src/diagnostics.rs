//! Diagnostic formatting for the Dachs compiler CLI.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use dachs_core::Error;

/// Normalize a span to ensure end > start (required by ariadne).
pub fn normalize_span(start: usize, end: usize) -> (usize, usize) {
    (start, end.max(start + 1))
}

/// Keep a span inside a text of `len` bytes. A span at the end of the text
/// points at its last byte.
pub fn fit_span(start: usize, end: usize, len: usize) -> (usize, usize) {
    let (start, end) = normalize_span(start.min(len), end.min(len));
    if end > len && len > 0 {
        (len - 1, len)
    } else {
        (start, end)
    }
}

fn build_report(
    err: &Error,
    text: &str,
    color: bool,
) -> Report<'static, (String, Range<usize>)> {
    let file = err.start.source.name.clone();
    let end = err.end.as_ref().map_or(err.start.offset, |e| e.offset);
    let (start, end) = fit_span(err.start.offset, end, text.len());

    let mut report = Report::build(ReportKind::Error, (file.clone(), start..end))
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(color),
        )
        .with_message(err.message())
        .with_label(
            Label::new((file, start..end))
                .with_message(err.message())
                .with_color(Color::Red),
        );
    for note in err.notes() {
        report = report.with_note(note);
    }
    report.finish()
}

/// Render an error without colors.
pub fn render(err: &Error) -> String {
    let text = String::from_utf8_lossy(&err.start.source.code).into_owned();
    let file = err.start.source.name.clone();
    let mut buf = Vec::new();
    if build_report(err, &text, false)
        .write((file, Source::from(text)), &mut buf)
        .is_err()
    {
        return err.to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Print an error to stderr using ariadne for pretty output.
pub fn print_error(err: &Error) {
    let text = String::from_utf8_lossy(&err.start.source.code).into_owned();
    let file = err.start.source.name.clone();
    if build_report(err, &text, true)
        .eprint((file, Source::from(text)))
        .is_err()
    {
        eprintln!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use dachs_core::{Logger, Position};

    use super::*;

    #[test]
    fn test_normalize_span_valid() {
        assert_eq!(normalize_span(0, 10), (0, 10));
        assert_eq!(normalize_span(5, 15), (5, 15));
    }

    #[test]
    fn test_normalize_span_zero_length() {
        // Zero-length span should become length 1
        assert_eq!(normalize_span(5, 5), (5, 6));
        assert_eq!(normalize_span(0, 0), (0, 1));
    }

    #[test]
    fn test_fit_span() {
        assert_eq!(fit_span(2, 4, 10), (2, 4));
        assert_eq!(fit_span(10, 10, 10), (9, 10));
        assert_eq!(fit_span(3, 20, 10), (3, 10));
        assert_eq!(fit_span(0, 0, 0), (0, 1));
    }

    #[test]
    fn test_render_contains_message_and_notes() {
        let src = dachs_core::Source::dummy("func main\n  ret x\nend\n");
        let start = Position::new(16, 2, 7, src.clone());
        let end = Position::new(17, 2, 8, src);
        let err = Error::new(start, end, "Unknown variable 'x'").note("In function 'main'");

        let out = render(&err);
        assert!(out.contains("Unknown variable 'x'"), "{}", out);
        assert!(out.contains("In function 'main'"), "{}", out);
        assert!(out.contains("<dummy>"), "{}", out);
        assert!(out.contains("ret x"), "{}", out);
    }

    #[test]
    fn test_render_error_at_eof() {
        let src = dachs_core::Source::dummy("func main");
        let err = dachs_syntax::parse(src, Logger::disabled()).unwrap_err();
        let out = render(&err);
        assert!(out.contains("Expected 'end'"), "{}", out);
    }
}
