//! Configuration loaded from TOML.
//!
//! Every section is optional; a missing file section falls back to defaults.
//!
//! ```toml
//! [tables]
//! posts = "blog_posts"
//! works = "literary_works"
//!
//! [fetch]
//! discard_stale_results = false
//!
//! [listing]
//! words_per_minute = 200
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Post, ResourceKind, Work};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub tables: TableNames,
    pub fetch: FetchPolicy,
    pub listing: ListingConfig,
}

/// Remote table per resource kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub posts: String,
    pub works: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            posts: Post::DEFAULT_TABLE.to_string(),
            works: Work::DEFAULT_TABLE.to_string(),
        }
    }
}

/// How overlapping fetches resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    /// Drop a fetch result when a newer fetch was dispatched after it.
    ///
    /// Off by default: the last fetch to resolve wins, even over a record
    /// created while it was in flight.
    pub discard_stale_results: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub words_per_minute: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.tables.posts.trim().is_empty() || self.tables.works.trim().is_empty() {
            return Err(ConfigError::Invalid("table names must not be empty".into()));
        }
        if self.listing.words_per_minute == 0 {
            return Err(ConfigError::Invalid(
                "listing.words_per_minute must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
