use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The language of the generated document and exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// The built-in labels for this locale.
    #[must_use]
    pub fn labels(self) -> Labels {
        match self {
            Self::En => Labels::english(),
            Self::Es => Labels::spanish(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Es => write!(f, "es"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "es" | "spanish" | "español" => Ok(Self::Es),
            other => Err(format!("unknown locale '{other}' (expected 'en' or 'es')")),
        }
    }
}

/// User-facing text of the generated document and exports.
///
/// Labels are serialized into the document alongside the model, so the
/// embedded script carries no text of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Labels {
    /// The `lang` attribute of the document.
    pub lang: String,
    /// Document and export title.
    pub title: String,
    /// Line shown under the title.
    pub subtitle: String,
    /// Placeholder of the search box.
    pub search_placeholder: String,
    /// Caption of the PDF export button.
    pub export_pdf: String,
    /// Caption of the Markdown export button.
    pub export_markdown: String,
    /// Label prefixed to principle names.
    pub principle: String,
    /// Label prefixed to requirement names.
    pub requirement: String,
    /// Heading of a requirement's guidelines.
    pub guidelines: String,
    /// Accessible label of a principle checkbox.
    pub select_principle: String,
    /// Accessible label of a requirement checkbox.
    pub select_requirement: String,
    /// Suffix of the Markdown export title.
    pub selection: String,
    /// Section heading of the PDF export.
    pub selected_heading: String,
    /// Notice shown when a search matches nothing.
    pub no_results: String,
    /// Markdown export body when nothing is selected.
    pub nothing_selected: String,
    /// PDF export body when nothing is selected.
    pub nothing_selected_pdf: String,
    /// Footer prefix of the generated document.
    pub generated_on: String,
    /// Prefix of the date line in the PDF export.
    pub document_generated_on: String,
    /// "Page" in the PDF footer.
    pub page: String,
    /// "of" in the PDF footer.
    pub of: String,
    /// File name (without extension) of the exports.
    pub file_stem: String,
}

impl Labels {
    fn english() -> Self {
        Self {
            lang: "en".into(),
            title: "Ontology Governance Framework".into(),
            subtitle: "Select framework elements to create your own governance model".into(),
            search_placeholder: "Search in the framework...".into(),
            export_pdf: "Export selection to PDF".into(),
            export_markdown: "Export selection to Markdown".into(),
            principle: "Principle".into(),
            requirement: "Requirement".into(),
            guidelines: "Guidelines".into(),
            select_principle: "Select principle".into(),
            select_requirement: "Select requirement".into(),
            selection: "Selection".into(),
            selected_heading: "Selected Principles and Requirements".into(),
            no_results: "No results found for your search.".into(),
            nothing_selected: "No principles or requirements have been selected.".into(),
            nothing_selected_pdf:
                "No principles or requirements have been selected for this governance framework."
                    .into(),
            generated_on: "Generated on".into(),
            document_generated_on: "Document generated on".into(),
            page: "Page".into(),
            of: "of".into(),
            file_stem: "ontology_governance_framework".into(),
        }
    }

    fn spanish() -> Self {
        Self {
            lang: "es".into(),
            title: "Modelo de Gobernanza de Ontologías".into(),
            subtitle: "Seleccione elementos del modelo para crear su propio modelo de gobernanza"
                .into(),
            search_placeholder: "Buscar en el modelo...".into(),
            export_pdf: "Exportar selección a PDF".into(),
            export_markdown: "Exportar selección a Markdown".into(),
            principle: "Principio".into(),
            requirement: "Requisito".into(),
            guidelines: "Guías".into(),
            select_principle: "Seleccionar principio".into(),
            select_requirement: "Seleccionar requisito".into(),
            selection: "Selección".into(),
            selected_heading: "Principios y Requisitos Seleccionados".into(),
            no_results: "No se encontraron resultados para la búsqueda.".into(),
            nothing_selected: "No se han seleccionado principios o requisitos.".into(),
            nothing_selected_pdf:
                "No se han seleccionado principios o requisitos para este modelo de gobernanza."
                    .into(),
            generated_on: "Generado el".into(),
            document_generated_on: "Documento generado el".into(),
            page: "Página".into(),
            of: "de".into(),
            file_stem: "modelo_gobernanza_ontologias".into(),
        }
    }

    /// The footer text of a PDF page.
    #[must_use]
    pub fn page_footer(&self, page: usize, total: usize) -> String {
        format!("{} - {} {page} {} {total}", self.title, self.page, self.of)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Locale::default().labels()
    }
}
