//! Documentation build configuration
//!
//! Read from an `hdc.toml` file at the project root. Every field has a
//! default, so an absent file or an empty table yields the stock layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file looked up in a project root
pub const CONFIG_FILE_NAME: &str = "hdc.toml";

/// Default number of characters kept in a page's meta description
const DEFAULT_META_DESCRIPTION_LIMIT: usize = 160;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How the asset tree scanner classifies files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extension of program source files
    pub source_extension: String,
    /// Extension of documentation articles
    pub article_extension: String,
    /// Stem of the article documenting its folder
    pub index_stem: String,
    /// Stem of the internal variant of the folder article
    pub internal_index_stem: String,
    /// Visit entries whose name starts with a dot
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_extension: "hylo".to_string(),
            article_extension: "hylodoc".to_string(),
            index_stem: "index".to_string(),
            internal_index_stem: "index.internal".to_string(),
            include_hidden: false,
        }
    }
}

impl ScanConfig {
    /// Returns true if `file_name` names a folder's documenting article
    #[must_use]
    pub fn is_index_article(&self, file_name: &str) -> bool {
        file_name
            .strip_suffix(&self.article_extension)
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|stem| stem == self.index_stem || stem == self.internal_index_stem)
    }
}

/// How targets are laid out in the output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Extension of generated pages
    pub page_extension: String,
    /// Maximum length of a meta description, in characters
    pub meta_description_limit: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            page_extension: "html".to_string(),
            meta_description_limit: DEFAULT_META_DESCRIPTION_LIMIT,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    pub scan: ScanConfig,
    pub resolve: ResolveConfig,
}

impl DocConfig {
    /// Parse a configuration from TOML text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `hdc.toml` from `root`, falling back to defaults if it is absent
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let extensions = [
            ("scan.source_extension", &self.scan.source_extension),
            ("scan.article_extension", &self.scan.article_extension),
            ("resolve.page_extension", &self.resolve.page_extension),
        ];
        for (field, value) in extensions {
            if value.is_empty() || value.starts_with('.') {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("`{value}` is not a bare file extension"),
                });
            }
        }
        if self.scan.source_extension == self.scan.article_extension {
            return Err(ConfigError::Invalid {
                field: "scan.article_extension",
                reason: "must differ from the source extension".to_string(),
            });
        }
        if self.resolve.meta_description_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "resolve.meta_description_limit",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
