use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::instrument;

use crate::{
    document::{EmitError, embedded},
    domain::{GovernanceModel, Labels},
    export::PdfLayout,
};

/// Format of the generation timestamp in the document footer.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Emits the interactive HTML document for a model.
#[derive(Debug, Clone, Copy)]
pub struct HtmlEmitter<'a> {
    labels: &'a Labels,
    layout: &'a PdfLayout,
}

impl<'a> HtmlEmitter<'a> {
    /// Creates an emitter with the given labels and PDF page geometry.
    #[must_use]
    pub const fn new(labels: &'a Labels, layout: &'a PdfLayout) -> Self {
        Self { labels, layout }
    }

    /// Emits the document.
    ///
    /// The result is a complete HTML document; nothing is written until the
    /// caller decides where it goes.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the embedded JSON payloads cannot be
    /// serialized.
    #[instrument(skip_all, fields(principles = model.principles().len()))]
    pub fn emit(
        &self,
        model: &GovernanceModel,
        generated_at: NaiveDateTime,
    ) -> Result<String, EmitError> {
        let labels = self.labels;
        let model_json = script_json(model)?;
        let labels_json = script_json(labels)?;
        let layout_json = script_json(self.layout)?;
        let fingerprint = model.fingerprint();
        let timestamp = generated_at.format(TIMESTAMP_FORMAT);

        let document = format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="{generator}">
    <meta name="model-fingerprint" content="{fingerprint}">
    <title>{title}</title>
    <style>
{stylesheet}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
            <p>{subtitle}</p>
        </header>

        <div class="search-container">
            <input type="text" id="search-input" placeholder="{search_placeholder}" aria-label="{search_placeholder}">
        </div>
        <p id="search-notice" class="search-notice" role="status" hidden></p>

        <div class="governance-model" id="governance-model"></div>

        <div class="export-container">
            <button id="export-pdf" class="btn btn-pdf">{export_pdf}</button>
            <button id="export-md" class="btn btn-md">{export_markdown}</button>
        </div>

        <footer>
            <p>{generated_on} {timestamp}</p>
            <p class="fingerprint">{fingerprint_short}</p>
        </footer>
    </div>

    <script id="governance-data" type="application/json">{model_json}</script>
    <script id="governance-labels" type="application/json">{labels_json}</script>
    <script id="governance-layout" type="application/json">{layout_json}</script>
    <script src="{pdf_library}"></script>
    <script>
{script}
    </script>
</body>
</html>
"#,
            lang = escape_html(&labels.lang),
            generator = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
            title = escape_html(&labels.title),
            subtitle = escape_html(&labels.subtitle),
            search_placeholder = escape_html(&labels.search_placeholder),
            export_pdf = escape_html(&labels.export_pdf),
            export_markdown = escape_html(&labels.export_markdown),
            generated_on = escape_html(&labels.generated_on),
            fingerprint_short = &fingerprint[..12],
            stylesheet = embedded::STYLESHEET,
            pdf_library = embedded::PDF_LIBRARY_URL,
            script = embedded::SCRIPT,
        );

        tracing::debug!(bytes = document.len(), "emitted document");
        Ok(document)
    }
}

/// Serializes a value as JSON that is safe to place inside a `<script>`
/// element. `<`, `>` and `&` are written as unicode escapes, so the payload
/// can never close the element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Escapes text for use in HTML content and double-quoted attributes.
fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
