//! Snapshot of the process environment used for config discovery

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Environment variables and home directory consulted while locating
/// configuration files.
///
/// The pipeline never reads `std::env` directly; callers take a snapshot
/// with [`Environment::from_process`] or build one by hand in tests.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    home: Option<PathBuf>,
}

impl Environment {
    /// Create an empty environment with no variables and no home directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    pub fn from_process() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let home = home_from(&vars, dirs::home_dir);
        Self { vars, home }
    }

    /// Set a variable
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Set the home directory used for `~` expansion
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Value of a variable, treating empty values as unset
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Expand a leading `~` to the home directory.
    ///
    /// Returns `None` when the path needs a home directory and none is known.
    pub fn expand(&self, path: &str) -> Option<PathBuf> {
        let path = path.trim();
        if path == "~" {
            return self.home.clone();
        }
        match path.strip_prefix("~/") {
            Some(rest) => self.home.as_ref().map(|h| h.join(rest)),
            None => Some(PathBuf::from(path)),
        }
    }
}

/// `HOME` when set, otherwise the platform's idea of the home directory
fn home_from(
    vars: &HashMap<String, String>,
    fallback: impl FnOnce() -> Option<PathBuf>,
) -> Option<PathBuf> {
    vars.get("HOME")
        .filter(|h| !h.trim().is_empty())
        .map(PathBuf::from)
        .or_else(fallback)
}

/// Re-root `path` beneath `prefix`, so `/etc/xdg` under `/tmp/sandbox`
/// becomes `/tmp/sandbox/etc/xdg`. An empty prefix leaves the path alone.
pub fn under_prefix(prefix: &Path, path: &Path) -> PathBuf {
    if prefix.as_os_str().is_empty() {
        return path.to_path_buf();
    }
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    prefix.join(relative)
}
