//! Governance framework explorer
//!
//! Reads a three-column (Principle / Requirement / Guidelines) spreadsheet,
//! folds it into a hierarchical [`GovernanceModel`], and emits a
//! self-contained interactive HTML document for browsing, searching and
//! exporting selections of the framework.

pub mod domain;
pub use domain::{
    Config, GovernanceModel, Labels, Locale, ModelBuilder, NodeId, PrincipleNode,
    PrincipleStatus, RequirementNode, Selection, SourceRow,
};

/// Reading tabular sources (spreadsheets and delimited text).
pub mod storage;
pub use storage::{Columns, SourceError, Table};

/// The self-contained interactive HTML document.
pub mod document;
pub use document::{EmitError, HtmlEmitter};

/// Markdown and PDF exports of a selection.
pub mod export;
pub use export::{ExportError, ExportFormat, PdfLayout};
