//! Paginated PDF export.
//!
//! Export happens in two steps. [`layout`] places every line of text on A4
//! pages using a running vertical cursor, then adds the page footers once
//! the page count is known. [`write`] renders the laid-out pages with the
//! built-in Helvetica faces.

use std::{borrow::Cow, mem};

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Delimiter, Labels, Selection},
    export::{ExportError, paragraphs, split_name},
};

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Average Helvetica glyph width, in ems. Used to estimate line widths.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

/// Baseline-to-baseline distance within a block, in multiples of the font
/// size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;

const LAYER: &str = "Layer 1";

/// Page geometry of the PDF export, in millimetres measured from the top
/// left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfLayout {
    /// Page width.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Left and right margin.
    pub margin: f32,
    /// Cursor position at the top of each page.
    pub top: f32,
    /// A heading starting below this position goes to a new page.
    pub heading_break: f32,
    /// A paragraph that would extend below this position goes to a new page.
    pub paragraph_break: f32,
    /// Baseline of the page footer.
    pub footer_y: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            top: 20.0,
            heading_break: 270.0,
            paragraph_break: 280.0,
            footer_y: 290.0,
        }
    }
}

impl PdfLayout {
    /// The width available to text between the margins.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.margin.mul_add(-2.0, self.page_width)
    }
}

/// The typeface of a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// Helvetica.
    Regular,
    /// Helvetica Bold.
    Bold,
    /// Helvetica Oblique.
    Italic,
}

/// A single line of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// The text.
    pub text: String,
    /// Left edge, in millimetres.
    pub x: f32,
    /// Baseline, in millimetres from the top of the page.
    pub y: f32,
    /// Font size, in points.
    pub size: f32,
    /// Typeface.
    pub style: FontStyle,
}

/// The lines of one page, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// The lines of text on the page.
    pub lines: Vec<TextLine>,
}

/// Lays out a selection on pages.
///
/// The first page opens with the title, the generation date and a section
/// heading. Included principles are numbered `1.`, `2.`, ... and their
/// checked requirements `1.1.`, `1.2.`, ...; each requirement is followed by
/// its guidelines. Every page gets a footer with its number and the total.
#[must_use]
pub fn layout(
    selection: &Selection<'_>,
    labels: &Labels,
    layout: &PdfLayout,
    date: NaiveDate,
) -> Vec<Page> {
    let mut paginator = Paginator::new(layout);

    paginator.centered(&labels.title, 20.0, FontStyle::Bold, 12.0);
    paginator.centered(
        &format!("{} {}", labels.document_generated_on, date.format("%d/%m/%Y")),
        10.0,
        FontStyle::Italic,
        15.0,
    );
    paginator.heading(&labels.selected_heading, 1);

    let mut has_content = false;

    for (index, (principle, requirements)) in selection.included().enumerate() {
        has_content = true;
        let number = index + 1;

        let (name, explanation) = split_name(principle.name(), Delimiter::Period);
        paginator.heading(&format!("{number}. {name}"), 2);
        if !explanation.is_empty() {
            paginator.paragraph(explanation);
        }

        for (index, requirement) in requirements.iter().enumerate() {
            let (name, explanation) = split_name(requirement.name(), Delimiter::Colon);
            paginator.heading(&format!("{number}.{}. {name}", index + 1), 3);
            if !explanation.is_empty() {
                paginator.paragraph(explanation);
            }
            paginator.paragraph(&format!("{}: {}", labels.guidelines, requirement.guidelines()));
        }
    }

    if !has_content {
        paginator.paragraph(&labels.nothing_selected_pdf);
    }

    let pages = paginator.finish(labels);
    tracing::debug!(pages = pages.len(), "laid out PDF export");
    pages
}

/// Renders laid-out pages as a PDF document.
///
/// # Errors
///
/// Returns an error if the fonts cannot be embedded or the document cannot
/// be serialized.
pub fn write(pages: &[Page], title: &str, layout: &PdfLayout) -> Result<Vec<u8>, ExportError> {
    let width = Mm(layout.page_width);
    let height = Mm(layout.page_height);

    let (document, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER);

    let fonts = Fonts {
        regular: document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
        italic: document
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            document.add_page(width, height, LAYER)
        };
        let layer = document.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            layer.use_text(
                line.text.as_str(),
                line.size,
                Mm(line.x),
                Mm(layout.page_height - line.y),
                fonts.get(line.style),
            );
        }
    }

    document.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(error: printpdf::Error) -> ExportError {
    ExportError::Pdf(error.to_string())
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    const fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Places blocks of text with a running vertical cursor.
struct Paginator<'a> {
    layout: &'a PdfLayout,
    finished: Vec<Page>,
    current: Page,
    y: f32,
}

impl<'a> Paginator<'a> {
    fn new(layout: &'a PdfLayout) -> Self {
        Self {
            layout,
            finished: Vec::new(),
            current: Page::default(),
            y: layout.top,
        }
    }

    fn break_page(&mut self) {
        self.finished.push(mem::take(&mut self.current));
        self.y = self.layout.top;
    }

    fn centered(&mut self, text: &str, size: f32, style: FontStyle, advance: f32) {
        let x = ((self.layout.page_width - text_width(text, size)) / 2.0).max(self.layout.margin);
        self.current.lines.push(TextLine {
            text: text.to_string(),
            x,
            y: self.y,
            size,
            style,
        });
        self.y += advance;
    }

    fn block(&mut self, lines: &[String], size: f32, style: FontStyle) {
        let line_height = size * LINE_HEIGHT_FACTOR * PT_TO_MM;
        for (index, text) in lines.iter().enumerate() {
            self.current.lines.push(TextLine {
                text: text.clone(),
                x: self.layout.margin,
                y: line_height.mul_add(count(index), self.y),
                size,
                style,
            });
        }
    }

    fn heading(&mut self, text: &str, level: u8) {
        let (size, pitch, spacing): (f32, f32, f32) = match level {
            1 => (16.0, 7.0, 5.0),
            2 => (14.0, 6.0, 1.0),
            _ => (12.0, 5.0, 1.0),
        };

        if self.y > self.layout.heading_break {
            self.break_page();
        }

        let lines = wrap(text, self.layout.content_width(), size);
        self.block(&lines, size, FontStyle::Bold);
        self.y += pitch.mul_add(count(lines.len()), spacing);
    }

    fn paragraph(&mut self, text: &str) {
        const SIZE: f32 = 11.0;
        const RESERVED: f32 = 6.0;
        const PITCH: f32 = 5.0;

        let lines = wrap(&paragraphs(text), self.layout.content_width(), SIZE);
        let mut remaining = lines.as_slice();

        while !remaining.is_empty() {
            let fresh = (self.y - self.layout.top).abs() < f32::EPSILON;
            let bottom = RESERVED.mul_add(count(remaining.len()), self.y);
            if !fresh && bottom > self.layout.paragraph_break {
                self.break_page();
            }

            let fit = fitting(self.layout.paragraph_break - self.y, RESERVED)
                .clamp(1, remaining.len());
            let (placed, rest) = remaining.split_at(fit);
            self.block(placed, SIZE, FontStyle::Regular);
            self.y = PITCH.mul_add(count(placed.len()), self.y);

            remaining = rest;
            if !remaining.is_empty() {
                self.break_page();
            }
        }

        self.y += PITCH;
    }

    fn finish(mut self, labels: &Labels) -> Vec<Page> {
        self.finished.push(self.current);
        let total = self.finished.len();
        let layout = self.layout;

        for (index, page) in self.finished.iter_mut().enumerate() {
            let text = labels.page_footer(index + 1, total);
            let x = ((layout.page_width - text_width(&text, 8.0)) / 2.0).max(layout.margin);
            page.lines.push(TextLine {
                text,
                x,
                y: layout.footer_y,
                size: 8.0,
                style: FontStyle::Italic,
            });
        }

        self.finished
    }
}

/// Estimated width of a line of text, in millimetres.
fn text_width(text: &str, size: f32) -> f32 {
    count(text.chars().count()) * glyph_width(size)
}

fn glyph_width(size: f32) -> f32 {
    size * PT_TO_MM * AVERAGE_GLYPH_WIDTH
}

/// Splits text into lines no wider than `width`, breaking between words.
///
/// Line breaks in the text are kept; a blank line stays blank. A single word
/// wider than `width` is kept whole on its own line.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let options = textwrap::Options::new(fitting(width, glyph_width(size)).max(1))
        .break_words(false)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);

    text.split('\n')
        .flat_map(|line| textwrap::wrap(line.trim(), &options))
        .map(Cow::into_owned)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
const fn count(n: usize) -> f32 {
    n as f32
}

/// How many steps of `step` fit in `space`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fitting(space: f32, step: f32) -> usize {
    (space / step).floor().max(0.0) as usize
}
