//! Exports of a selection.
//!
//! Both formats walk the model in order and include each principle that is
//! checked or has at least one checked requirement, followed by its checked
//! requirements. Principle names are split into a name and an explanation on
//! the first `.`, requirement names on the first `:`.

mod markdown;
mod pdf;

use std::{fmt, sync::LazyLock};

use chrono::NaiveDateTime;
use regex::Regex;
pub use markdown::render as render_markdown;
pub use pdf::{FontStyle, Page, PdfLayout, TextLine, layout as layout_pdf, write as write_pdf};
use tracing::instrument;

use crate::domain::{Delimiter, Labels, Selection};

/// The formats a selection can be exported to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// A Markdown document.
    #[default]
    #[value(alias = "md")]
    Markdown,
    /// A paginated A4 PDF document.
    Pdf,
}

impl ExportFormat {
    /// The file extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Pdf => "pdf",
        }
    }

    /// The default file name of an export in the given locale.
    #[must_use]
    pub fn file_name(self, labels: &Labels) -> String {
        format!("{}.{}", labels.file_stem, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

/// Errors that can occur when exporting a selection.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The PDF document could not be assembled.
    #[error("Failed to write PDF: {0}")]
    Pdf(String),
}

/// Exports a selection in the given format.
///
/// # Errors
///
/// Returns an error if the PDF document cannot be written.
#[instrument(level = "debug", skip(selection, labels, layout))]
pub fn export(
    selection: &Selection<'_>,
    labels: &Labels,
    layout: &PdfLayout,
    format: ExportFormat,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, ExportError> {
    let bytes = match format {
        ExportFormat::Markdown => render_markdown(selection, labels).into_bytes(),
        ExportFormat::Pdf => {
            let pages = layout_pdf(selection, labels, layout, generated_at.date());
            write_pdf(&pages, &labels.title, layout)?
        }
    };
    tracing::debug!(bytes = bytes.len(), "exported selection");
    Ok(bytes)
}

/// Splits a display name into its name and explanation on the first
/// occurrence of the delimiter. Both parts are trimmed; the explanation is
/// empty when the delimiter doesn't occur.
#[must_use]
pub fn split_name(name: &str, delimiter: Delimiter) -> (&str, &str) {
    name.split_once(delimiter.as_char())
        .map_or((name.trim(), ""), |(name, explanation)| {
            (name.trim(), explanation.trim())
        })
}

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n)+").expect("line break pattern is valid"));

/// Collapses every run of line breaks into one paragraph break, and trims.
#[must_use]
pub fn paragraphs(text: &str) -> String {
    LINE_BREAKS.replace_all(text, "\n\n").trim().to_string()
}
