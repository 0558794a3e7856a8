//! User-facing error reports

use std::io;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use jsir_library::LIST_SEPARATOR;

use crate::error::DriverError;

const LIBRARIES_SOURCE: &str = "--libraries";
const NO_SOURCE: &str = "jsirc";

/// Error code shown in reports for each failure kind
pub fn error_code(error: &DriverError) -> &'static str {
    match error {
        DriverError::Configuration(_) => "E0100",
        DriverError::MalformedLibrary(_) => "E0200",
        DriverError::Io { .. } => "E0300",
        DriverError::Backend(_) => "E0400",
    }
}

/// Print a failure to stderr.
///
/// `libraries` is the raw `--libraries` value; when the failure is about
/// one of its entries the report points at that entry.
pub fn report_failure(error: &DriverError, libraries: Option<&str>) -> io::Result<()> {
    let code = error_code(error);
    match error {
        DriverError::Configuration(errors) => {
            for err in errors {
                report_plain(code, &err.to_string(), &[])?;
            }
            Ok(())
        }
        DriverError::MalformedLibrary(err) => {
            let located = libraries.and_then(|list| entry_span(list, err.library()).map(|span| (list, span)));
            match located {
                Some((list, span)) => report_entry(code, &err.to_string(), list, span),
                None => report_plain(code, &err.to_string(), &[]),
            }
        }
        DriverError::Io { .. } => report_plain(code, &error.to_string(), &[]),
        DriverError::Backend(err) => {
            report_plain(code, "compilation failed", &err.messages())
        }
    }
}

fn report_plain(code: &str, message: &str, notes: &[String]) -> io::Result<()> {
    let mut report = Report::build(ReportKind::Error, (NO_SOURCE, 0..0))
        .with_code(code)
        .with_message(message);
    for note in notes {
        report = report.with_note(note);
    }
    report.finish().eprint((NO_SOURCE, Source::from("")))
}

fn report_entry(code: &str, message: &str, list: &str, span: Range<usize>) -> io::Result<()> {
    let location = (LIBRARIES_SOURCE, span);
    Report::build(ReportKind::Error, location.clone())
        .with_code(code)
        .with_message("malformed library")
        .with_label(
            Label::new(location)
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((LIBRARIES_SOURCE, Source::from(list)))
}

/// Byte range of `entry` within a separator-delimited list
pub fn entry_span(list: &str, entry: &str) -> Option<Range<usize>> {
    let mut offset = 0;
    for segment in list.split(LIST_SEPARATOR) {
        if segment == entry {
            return Some(offset..offset + segment.len());
        }
        offset += segment.len() + LIST_SEPARATOR.len_utf8();
    }
    None
}
