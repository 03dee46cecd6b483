//! Error rendering using ariadne
//!
//! Construction errors carry a byte span into the definition document. This
//! module turns them into annotated source snippets.

use crate::{ConstructionError, DefinitionErrorKind, HandlerKind};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<definition>";

/// Render a construction error with its source snippet to stderr
///
/// # Example
/// ```no_run
/// use vmgen::{Registry, Vm, render_error};
///
/// let source = "name = \"x\"";
/// if let Err(e) = Vm::from_source(source, &Registry::new()) {
///     render_error(source, &e);
/// }
/// ```
pub fn render_error(source: &str, error: &ConstructionError) {
    render_error_to_writer(source, error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(
    source: &str,
    error: &ConstructionError,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(source, error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(source: &str, error: &ConstructionError) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Same as `render_error_to_string` but without ANSI color codes, making the
/// output easier to compare in tests.
pub fn render_error_to_string_no_color(source: &str, error: &ConstructionError) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    source: &str,
    error: &ConstructionError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    // Nothing to point at when the document could not be read at all.
    if let ConstructionError::Definition(err) = error {
        if let DefinitionErrorKind::Io { .. } = err.kind {
            return writeln!(writer, "Error: {}", err);
        }
    }

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let span = clamp(source, error.span().0.clone());
    let message = error.to_string();
    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_message(&message)
        .with_config(ariadne::Config::default().with_color(use_color));

    let color = colors.next();
    match error {
        ConstructionError::Definition(err) => {
            report = report.with_code(err.code()).with_label(
                Label::new((SOURCE_ID, span))
                    .with_message(&message)
                    .with_color(color),
            );
            if let DefinitionErrorKind::DuplicateOpcode { first, .. } = &err.kind {
                report = report.with_label(
                    Label::new((SOURCE_ID, clamp(source, first.0.clone())))
                        .with_message("first declared here")
                        .with_color(colors.next()),
                );
            }
            if let Some(help) = err.help() {
                report = report.with_help(help);
            }
        }
        ConstructionError::UnresolvedHandler(err) => {
            let code = match err.kind {
                HandlerKind::Execute => "H001",
                HandlerKind::Fuel => "H002",
            };
            report = report.with_code(code).with_label(
                Label::new((SOURCE_ID, span))
                    .with_message(format!("`{}` is not registered", err.name))
                    .with_color(color),
            );
            report = report.with_help(format!(
                "Register the {} `{}` before building the VM",
                err.kind, err.name
            ));
        }
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

fn clamp(source: &str, range: std::ops::Range<usize>) -> std::ops::Range<usize> {
    let end = range.end.min(source.len());
    range.start.min(end)..end
}
