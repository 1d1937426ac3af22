use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Labels, Locale, builder::IdOptions},
    export::PdfLayout,
    storage::Columns,
};

/// Configuration for document generation.
///
/// This struct holds settings that control how the source is read, how node
/// identifiers are produced, and the language and layout of the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The language of the document and exports.
    pub locale: Locale,

    /// Overrides the title of the selected locale.
    title: Option<String>,

    /// How node identifiers are produced.
    pub ids: IdOptions,

    /// The header names of the three source columns.
    pub columns: Columns,

    /// Page geometry of the PDF export.
    pub pdf: PdfLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            title: None,
            ids: IdOptions::default(),
            columns: Columns::default(),
            pdf: PdfLayout::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The title override, if configured.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Sets the title override.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title.filter(|t| !t.trim().is_empty());
    }

    /// The labels of the configured locale, with the title override applied.
    #[must_use]
    pub fn labels(&self) -> Labels {
        let mut labels = self.locale.labels();
        if let Some(title) = &self.title {
            labels.title.clone_from(title);
        }
        labels
    }
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] io::Error),

    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        locale: Locale,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,

        #[serde(default)]
        ids: IdOptions,

        #[serde(default)]
        columns: Columns,

        #[serde(default)]
        pdf: PdfLayout,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                locale,
                title,
                ids,
                columns,
                pdf,
            } => {
                let mut config = Self {
                    locale,
                    title: None,
                    ids,
                    columns,
                    pdf,
                };
                config.set_title(title);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            locale: config.locale,
            title: config.title,
            ids: config.ids,
            columns: config.columns,
            pdf: config.pdf,
        }
    }
}
