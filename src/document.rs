//! The self-contained interactive HTML document.
//!
//! The document carries the model, the locale labels and the PDF page
//! geometry as embedded JSON, alongside a stylesheet and a script that are
//! compiled into the binary. The script renders the model, keeps the
//! checkbox state, searches, and exports the selection to Markdown and PDF
//! in the browser. Nothing is fetched at runtime except the PDF library.

mod html;

pub use html::{HtmlEmitter, TIMESTAMP_FORMAT};

/// Static assets embedded verbatim in every document.
pub mod embedded {
    /// Browsing, selection, search and export logic.
    pub const SCRIPT: &str = include_str!("document/assets/app.js");

    /// Stylesheet.
    pub const STYLESHEET: &str = include_str!("document/assets/style.css");

    /// Client-side PDF library used by the export button.
    pub const PDF_LIBRARY_URL: &str =
        "https://cdnjs.cloudflare.com/ajax/libs/jspdf/2.5.1/jspdf.umd.min.js";
}

/// Errors that can occur when emitting the document.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A JSON payload could not be serialized.
    #[error("Failed to serialize document data")]
    Serialize(#[from] serde_json::Error),
}
