//! Domain models for the governance framework.
//!
//! This module contains the core domain types: the rows read from a tabular
//! source, the hierarchical model built from them, node identifiers,
//! configuration, and the selection and search state of a browsing session.

/// Folding source rows into a [`GovernanceModel`].
pub mod builder;
pub use builder::{ModelBuilder, build};

mod config;
pub use config::{Config, ConfigError};

mod locale;
pub use locale::{Labels, Locale};

/// The hierarchical governance model.
pub mod model;
pub use model::{GovernanceModel, PrincipleNode, RequirementNode, SourceRow};

/// Principle and requirement identifiers.
pub mod node_id;
pub use node_id::{Delimiter, IdStrategy, NodeId};

/// Free-text search over the model.
pub mod search;

/// Checkbox selection state and derived principle status.
pub mod selection;
pub use selection::{PrincipleStatus, Selection, SelectionError};
