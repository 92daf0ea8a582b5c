//! Layered YAML configuration
//!
//! Config files are located per tier by [`sources::resolve`], decoded into
//! [`Mapping`]s with canonical keys, and combined with [`merge::merge`] from
//! lowest to highest priority.

pub mod environment;
pub mod merge;
pub mod sources;

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

pub use environment::Environment;
pub use merge::{merge, merge_into};
pub use sources::{resolve, ConfigPaths, SearchStyle, CONFIG_BASE};

/// Application name used for directory names and environment variables
pub const APP_NAME: &str = "labrat";

/// Errors reading a config file that exists and is readable
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file {} must contain a mapping at the top level", path.display())]
    NotAMapping { path: PathBuf },
}

/// Canonical spelling of a settings key: trimmed, underscores for hyphens
pub fn canonical_key(key: &str) -> String {
    key.trim().replace('-', "_")
}

/// String form of a mapping key, if it is a scalar
pub fn key_str(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Copy of `map` with every top-level key in canonical form
pub fn canonicalize(map: &Mapping) -> Mapping {
    map.iter()
        .filter_map(|(k, v)| key_str(k).map(|k| (Value::String(canonical_key(&k)), v.clone())))
        .collect()
}

/// Decode a YAML document into a mapping; an empty document is empty
pub fn parse_mapping(source: &str, path: &Path) -> Result<Mapping, ConfigError> {
    let value: Value = serde_yaml::from_str(source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Read one config file fully into a mapping
pub fn read_mapping(path: &Path) -> Result<Mapping, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mapping(&source, path)
}

/// Where and how to look for configuration files
#[derive(Debug, Clone)]
pub struct ConfigSources {
    app: String,
    prefix: PathBuf,
    env: Environment,
    style: SearchStyle,
}

impl ConfigSources {
    /// Search the real filesystem for `app` using `env`
    pub fn new(app: impl Into<String>, env: Environment) -> Self {
        Self {
            app: app.into(),
            prefix: PathBuf::new(),
            env,
            style: SearchStyle::default(),
        }
    }

    /// Re-root every search location beneath `prefix`
    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_style(mut self, style: SearchStyle) -> Self {
        self.style = style;
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Readable files for `base`, per tier
    pub fn paths(&self, base: &str) -> ConfigPaths {
        resolve(&self.app, base, &self.prefix, &self.env, self.style)
    }

    /// Decoded files for `base`, lowest priority first
    pub fn layers(&self, base: &str) -> Result<Vec<Mapping>, ConfigError> {
        self.paths(base)
            .ordered()
            .map(|path| read_mapping(path))
            .collect()
    }

    /// All files for `base` merged into one mapping with canonical keys
    pub fn read(&self, base: &str) -> Result<Mapping, ConfigError> {
        let layers: Vec<Mapping> = self.layers(base)?.iter().map(canonicalize).collect();
        Ok(merge(&layers))
    }
}
