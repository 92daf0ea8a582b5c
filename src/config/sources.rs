//! Discovery of layered configuration files
//!
//! Each tier (system, user) is searched independently. Within a tier an
//! environment variable naming a readable file wins outright and the
//! directory search is skipped; otherwise XDG directories are searched
//! first (lowest priority) followed by the classic dot-file locations.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::environment::{under_prefix, Environment};

/// File name variants tried for a base name, in order
const BASE_SUFFIXES: [&str; 5] = ["", ".yml", ".yaml", ".cfg", ".config"];

/// Base name of the application's own settings file
pub const CONFIG_BASE: &str = "config";

/// Which families of locations to search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStyle {
    pub xdg: bool,
    pub classic: bool,
}

impl Default for SearchStyle {
    fn default() -> Self {
        Self {
            xdg: true,
            classic: true,
        }
    }
}

impl SearchStyle {
    pub fn xdg_only() -> Self {
        Self {
            xdg: true,
            classic: false,
        }
    }

    pub fn classic_only() -> Self {
        Self {
            xdg: false,
            classic: true,
        }
    }
}

/// Readable config files per tier, lowest priority first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    pub system: Vec<PathBuf>,
    pub user: Vec<PathBuf>,
}

impl ConfigPaths {
    /// All paths, system tier before user tier
    pub fn ordered(&self) -> impl Iterator<Item = &PathBuf> {
        self.system.iter().chain(self.user.iter())
    }
}

/// Locate the config files for `app` with base name `base`.
///
/// Every search location is re-rooted beneath `prefix` (use an empty path
/// for the real filesystem). Only existing, readable files are returned.
pub fn resolve(
    app: &str,
    base: &str,
    prefix: &Path,
    env: &Environment,
    style: SearchStyle,
) -> ConfigPaths {
    let base = if base.trim().is_empty() { app } else { base.trim() };
    let upper = app.to_uppercase();

    let system = env_file(env, &format!("{upper}_SYS_CONFIG"), prefix).unwrap_or_else(|| {
        let mut found = Vec::new();
        if style.xdg {
            found.extend(xdg_files(env, "XDG_CONFIG_DIRS", "/etc/xdg", app, base, prefix));
        }
        if style.classic {
            found.extend(classic_system_file(app, base, prefix));
        }
        found
    });

    let user = env_file(env, &format!("{upper}_CONFIG"), prefix).unwrap_or_else(|| {
        let mut found = Vec::new();
        if style.xdg {
            found.extend(xdg_files(env, "XDG_CONFIG_HOME", "~/.config", app, base, prefix));
        }
        if style.classic {
            found.extend(classic_user_file(env, app, base, prefix));
        }
        found
    });

    tracing::debug!(app, base, ?system, ?user, "resolved config sources");
    ConfigPaths { system, user }
}

/// A readable file named by `var`, if any
fn env_file(env: &Environment, var: &str, prefix: &Path) -> Option<Vec<PathBuf>> {
    let path = env.expand(env.var(var)?)?;
    let path = under_prefix(prefix, &path);
    if is_readable(&path) {
        Some(vec![path])
    } else {
        tracing::debug!(var, path = %path.display(), "ignoring unreadable config file");
        None
    }
}

/// Search a colon-separated directory list from `var` (or `default_dir`).
///
/// The first listed directory has the highest priority so the list is
/// walked in reverse, yielding lowest priority first.
fn xdg_files(
    env: &Environment,
    var: &str,
    default_dir: &str,
    app: &str,
    base: &str,
    prefix: &Path,
) -> Vec<PathBuf> {
    let dirs: Vec<&str> = match env.var(var) {
        Some(list) => list.split(':').filter(|d| !d.trim().is_empty()).collect(),
        None => vec![default_dir],
    };
    dirs.iter()
        .rev()
        .filter_map(|dir| env.expand(dir))
        .filter_map(|dir| first_variant(&under_prefix(prefix, &dir.join(app)), base))
        .collect()
}

fn classic_system_file(app: &str, base: &str, prefix: &Path) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if base == CONFIG_BASE {
        candidates.push(PathBuf::from(format!("/etc/{app}")));
        candidates.push(PathBuf::from(format!("/etc/{app}rc")));
    }
    candidates
        .into_iter()
        .map(|p| under_prefix(prefix, &p))
        .find(|p| is_readable(p))
        .or_else(|| first_variant(&under_prefix(prefix, Path::new(&format!("/etc/{app}"))), base))
}

fn classic_user_file(env: &Environment, app: &str, base: &str, prefix: &Path) -> Option<PathBuf> {
    let home = env.home()?;
    if base == CONFIG_BASE {
        let rc = under_prefix(prefix, &home.join(format!(".{app}rc")));
        if is_readable(&rc) {
            return Some(rc);
        }
    }
    first_variant(&under_prefix(prefix, &home.join(format!(".{app}"))), base)
}

/// First readable `base` variant inside `dir`
fn first_variant(dir: &Path, base: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    BASE_SUFFIXES
        .iter()
        .map(|suffix| dir.join(format!("{base}{suffix}")))
        .find(|p| is_readable(p))
}

fn is_readable(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
