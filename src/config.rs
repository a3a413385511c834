//! Configuration for bookstore
//!
//! Read from an optional JSON file; every field has a default. A missing
//! file yields the defaults. Environment variables override the file:
//!
//! - `BOOKSTORE_DATA_PATH` replaces `data_path`
//! - `BOOKSTORE_SCHEMA_PATH` sets `schema_path`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::query::MAX_PAGE_SIZE;
use crate::schema::SchemaLoader;
use crate::storage::{StorageError, StorageResult, StoreOptions, DEFAULT_MAX_DOCUMENT_BYTES};

/// Environment variable overriding `data_path`
pub const ENV_DATA_PATH: &str = "BOOKSTORE_DATA_PATH";

/// Environment variable overriding `schema_path`
pub const ENV_SCHEMA_PATH: &str = "BOOKSTORE_SCHEMA_PATH";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the persisted document
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Schema enforced on every load (optional)
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Documents larger than this are rejected on load
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,

    /// Page size used when a list asks for none, in [1, 200]
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Minimum log severity: trace, info, warn, error or fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/bookstore.json")
}
fn default_max_document_bytes() -> u64 {
    DEFAULT_MAX_DOCUMENT_BYTES
}
fn default_page_size() -> usize {
    20
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            schema_path: None,
            max_document_bytes: default_max_document_bytes(),
            default_page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, applies process environment
    /// overrides and validates the result.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with<F>(path: &Path, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Config::default()
        };

        config.apply_overrides(env);
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_blank(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(path) = non_blank(ENV_SCHEMA_PATH) {
            self.schema_path = Some(PathBuf::from(path));
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_path must not be empty".into()));
        }

        if self.max_document_bytes == 0 {
            return Err(ConfigError::Invalid("max_document_bytes must be > 0".into()));
        }

        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "default_page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.default_page_size
            )));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    /// Store options, loading the schema file if one is configured.
    ///
    /// # Errors
    ///
    /// A configured schema that is missing or malformed is a
    /// `BOOK_SCHEMA_VIOLATION`.
    pub fn store_options(&self) -> StorageResult<StoreOptions> {
        let schema = match &self.schema_path {
            Some(path) => {
                let schema = SchemaLoader::load(path).map_err(StorageError::schema_violation)?;
                log_event_with_fields(
                    Event::SchemaLoaded,
                    &[
                        ("path", &path.display().to_string()),
                        ("schema_id", &schema.schema_id),
                        ("schema_version", &schema.schema_version),
                    ],
                );
                Some(schema)
            }
            None => None,
        };

        Ok(StoreOptions {
            schema,
            max_document_bytes: self.max_document_bytes,
        })
    }
}
