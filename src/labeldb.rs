//! Database of named label presets
//!
//! Entries come from a built-in table overlaid by the system and user
//! `labeldb` files. The database is loaded on first access and kept until
//! [`LabelDb::reset`] is called.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::config::{self, canonicalize, key_str, merge, ConfigError, ConfigSources};
use crate::settings::LABEL_KEY;

/// Base name of label-database files
pub const LABELDB_BASE: &str = "labeldb";

const BUILTIN_LABELDB: &str = include_str!("../resources/labeldb.yml");

/// Errors resolving a label name
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LabelDbError {
    #[error("unknown label name '{name}'")]
    UnknownName { name: String },

    #[error("circular label reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },
}

/// Canonical spelling of a label name
pub fn canonical_name(name: &str) -> String {
    name.trim().to_string()
}

/// Named label presets, loaded lazily
#[derive(Debug, Clone)]
pub struct LabelDb {
    sources: Option<ConfigSources>,
    builtin: bool,
    entries: Option<Mapping>,
}

impl LabelDb {
    /// Built-in entries overlaid by the `labeldb` files found through `sources`
    pub fn new(sources: ConfigSources) -> Self {
        Self {
            sources: Some(sources),
            builtin: true,
            entries: None,
        }
    }

    /// The built-in entries only
    pub fn builtin() -> Self {
        Self {
            sources: None,
            builtin: true,
            entries: None,
        }
    }

    /// A database holding exactly `entries`; a reset leaves it empty
    pub fn from_mapping(entries: &Mapping) -> Self {
        Self {
            sources: None,
            builtin: false,
            entries: Some(normalize(entries)),
        }
    }

    /// Read and merge every source, replacing any cached entries
    pub fn load(&mut self) -> Result<(), ConfigError> {
        let mut layers = Vec::new();
        if self.builtin {
            layers.push(config::parse_mapping(
                BUILTIN_LABELDB,
                Path::new("<built-in labeldb>"),
            )?);
        }
        if let Some(sources) = &self.sources {
            layers.extend(sources.layers(LABELDB_BASE)?);
        }
        let layers: Vec<Mapping> = layers.iter().map(normalize).collect();
        let entries = merge(&layers);
        tracing::debug!(layers = layers.len(), labels = entries.len(), "loaded label database");
        self.entries = Some(entries);
        Ok(())
    }

    /// Drop cached entries so the next access loads again
    pub fn reset(&mut self) {
        self.entries = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    fn entries(&mut self) -> Result<&Mapping, ConfigError> {
        if self.entries.is_none() {
            self.load()?;
        }
        Ok(self.entries.get_or_insert_with(Mapping::new))
    }

    /// Raw entry for `name`, empty when unknown; aliases are not followed
    pub fn get(&mut self, name: &str) -> Result<Mapping, ConfigError> {
        let entries = self.entries()?;
        Ok(match entries.get(canonical_name(name).as_str()) {
            Some(Value::Mapping(entry)) => entry.clone(),
            _ => Mapping::new(),
        })
    }

    /// Add or replace the entry for `name`
    pub fn set(&mut self, name: &str, entry: &Mapping) -> Result<(), ConfigError> {
        self.entries()?;
        if let Some(entries) = self.entries.as_mut() {
            entries.insert(
                Value::String(canonical_name(name)),
                Value::Mapping(canonicalize(entry)),
            );
        }
        Ok(())
    }

    /// Sorted names of every entry
    pub fn known_names(&mut self) -> Result<Vec<String>, ConfigError> {
        let mut names: Vec<String> = self.entries()?.keys().filter_map(key_str).collect();
        names.sort();
        Ok(names)
    }

    /// Settings for `name` with every inherited entry merged beneath it.
    ///
    /// The returned mapping has no `label` key.
    pub fn resolve(&mut self, name: &str) -> crate::Result<Mapping> {
        let entries = self.entries()?;
        let mut chain = Vec::new();
        let resolved = resolve_chain(entries, &canonical_name(name), &mut chain)?;
        tracing::debug!(chain = %chain.join(" -> "), keys = resolved.len(), "resolved label");
        Ok(resolved)
    }
}

/// Follow `label` references from `name`, recording visited names in `chain`
fn resolve_chain(
    entries: &Mapping,
    name: &str,
    chain: &mut Vec<String>,
) -> Result<Mapping, LabelDbError> {
    if chain.iter().any(|seen| seen == name) {
        let mut cycle = chain.clone();
        cycle.push(name.to_string());
        return Err(LabelDbError::CircularReference { chain: cycle });
    }
    let Some(Value::Mapping(entry)) = entries.get(name) else {
        return Err(LabelDbError::UnknownName {
            name: name.to_string(),
        });
    };
    chain.push(name.to_string());

    let mut parent = None;
    let own: Mapping = entry
        .iter()
        .filter(|(key, value)| {
            if key.as_str() == Some(LABEL_KEY) {
                parent = key_str(value);
                false
            } else {
                true
            }
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    match parent {
        Some(parent) => {
            let inherited = resolve_chain(entries, &canonical_name(&parent), chain)?;
            Ok(merge([&inherited, &own]))
        }
        None => Ok(own),
    }
}

/// Canonical label names at the top level and canonical keys within entries
fn normalize(db: &Mapping) -> Mapping {
    db.iter()
        .filter_map(|(name, entry)| {
            let name = canonical_name(&key_str(name)?);
            match entry {
                Value::Mapping(entry) => {
                    Some((Value::String(name), Value::Mapping(canonicalize(entry))))
                }
                Value::Null => Some((Value::String(name), Value::Mapping(Mapping::new()))),
                _ => {
                    tracing::warn!(label = %name, "ignoring label entry that is not a mapping");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, APP_NAME};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn yaml(src: &str) -> Mapping {
        serde_yaml::from_str(src).unwrap()
    }

    fn put(root: &Path, path: &str, content: &str) {
        let full = config::environment::under_prefix(root, Path::new(path));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn circular_db() -> LabelDb {
        LabelDb::from_mapping(&yaml(
            "label1: {page-width: 18, label: label3}\n\
             label2: {page-width: 36, label: label1}\n\
             label3: {page-width: 45, label: label2}\n",
        ))
    }

    #[test]
    fn test_builtin_entries_are_available() {
        let mut db = LabelDb::builtin();
        let names = db.known_names().unwrap();
        assert!(names.contains(&"avery5160".to_string()));
        assert!(names.contains(&"dymo30327".to_string()));
        let entry = db.get("avery5160").unwrap();
        assert_eq!(entry.get("rows"), Some(&Value::from(10)));
        assert_eq!(entry.get("page_width"), Some(&Value::from("8.5in")));
    }

    #[test]
    fn test_known_names_are_sorted() {
        let mut db = LabelDb::from_mapping(&yaml("zeta: {}\nalpha: {rows: 2}\nmid: {}\n"));
        assert_eq!(db.known_names().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_unknown_raw_lookup_is_empty() {
        let mut db = LabelDb::builtin();
        assert!(db.get("no-such-label").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_follows_aliases_with_own_keys_winning() {
        let mut db = LabelDb::from_mapping(&yaml(
            "base: {rows: 10, columns: 3, page-width: 8.5in}\n\
             middle: {label: base, columns: 2}\n\
             top: {label: middle, font-size: 9}\n",
        ));
        assert_eq!(
            db.resolve("top").unwrap(),
            yaml("rows: 10\ncolumns: 2\npage_width: 8.5in\nfont_size: 9\n")
        );
    }

    #[test]
    fn test_builtin_alias_resolves() {
        let mut db = LabelDb::builtin();
        let alias = db.resolve("avery8160").unwrap();
        let base = db.resolve("avery5160").unwrap();
        assert_eq!(alias, base);
        assert!(alias.get(LABEL_KEY).is_none());
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let mut db = LabelDb::from_mapping(&yaml("known: {rows: 2}\nbroken: {label: missing}\n"));
        let err = db.resolve("nosuch").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::LabelDb(LabelDbError::UnknownName { ref name }) if name == "nosuch"
        ));
        let err = db.resolve("broken").unwrap_err();
        assert_eq!(err.to_string(), "unknown label name 'missing'");
    }

    #[test]
    fn test_circular_reference_is_detected() {
        let err = circular_db().resolve("label3").unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"circular label reference: label3 -> label2 -> label1 -> label3"
        );
    }

    #[test]
    fn test_self_reference_is_circular() {
        let mut db = LabelDb::from_mapping(&yaml("loop: {rows: 2, label: loop}\n"));
        assert!(matches!(
            db.resolve("loop"),
            Err(crate::Error::LabelDb(LabelDbError::CircularReference { .. }))
        ));
    }

    #[test]
    fn test_set_and_reset() {
        let mut db = LabelDb::from_mapping(&Mapping::new());
        db.set(" custom ", &yaml("page-width: 18\n")).unwrap();
        assert_eq!(db.get("custom").unwrap(), yaml("page_width: 18\n"));
        db.reset();
        assert!(!db.is_loaded());
        assert!(db.get("custom").unwrap().is_empty());
        assert!(db.is_loaded());
    }

    #[test]
    fn test_user_db_overrides_system_db_and_builtin() {
        let sandbox = tempfile::tempdir().unwrap();
        put(
            sandbox.path(),
            "/etc/xdg/labrat/labeldb.yml",
            "avery5160:\n  rows: 11\n  columns: 3\nshop-tag:\n  rows: 4\n",
        );
        put(
            sandbox.path(),
            "/home/ded/.config/labrat/labeldb.yml",
            "avery5160:\n  columns: 4\n",
        );
        let env = Environment::new().with_home("/home/ded");
        let sources = ConfigSources::new(APP_NAME, env).with_prefix(sandbox.path());
        let mut db = LabelDb::new(sources);

        let entry = db.get("avery5160").unwrap();
        assert_eq!(entry.get("rows"), Some(&Value::from(11)));
        assert_eq!(entry.get("columns"), Some(&Value::from(4)));
        assert_eq!(entry.get("page_width"), Some(&Value::from("8.5in")));
        assert!(db.known_names().unwrap().contains(&"shop-tag".to_string()));
    }

    #[test]
    fn test_tier_precedence_ignores_key_spelling() {
        let sandbox = tempfile::tempdir().unwrap();
        put(
            sandbox.path(),
            "/etc/xdg/labrat/labeldb.yml",
            "dymo30327:\n  page_width: 30mm\n  font-size: 8\n",
        );
        put(
            sandbox.path(),
            "/home/ded/.config/labrat/labeldb.yml",
            "dymo30327:\n  page-width: 40mm\n  font_size: 10\n",
        );
        let env = Environment::new().with_home("/home/ded");
        let sources = ConfigSources::new(APP_NAME, env).with_prefix(sandbox.path());
        let mut db = LabelDb::new(sources);

        let entry = db.get("dymo30327").unwrap();
        assert_eq!(entry.get("page_width"), Some(&Value::from("40mm")));
        assert_eq!(entry.get("font_size"), Some(&Value::from(10)));
        assert_eq!(entry.get("page_height"), Some(&Value::from("87mm")));
        assert!(entry.get("page-width").is_none());
    }

    #[test]
    fn test_reset_picks_up_changed_files() {
        let sandbox = tempfile::tempdir().unwrap();
        put(sandbox.path(), "/etc/xdg/labrat/labeldb.yml", "mine:\n  rows: 2\n");
        let sources =
            ConfigSources::new(APP_NAME, Environment::new()).with_prefix(sandbox.path());
        let mut db = LabelDb::new(sources);
        assert_eq!(db.get("mine").unwrap(), yaml("rows: 2\n"));

        put(sandbox.path(), "/etc/xdg/labrat/labeldb.yml", "mine:\n  rows: 5\n");
        assert_eq!(db.get("mine").unwrap(), yaml("rows: 2\n"));
        db.reset();
        assert_eq!(db.get("mine").unwrap(), yaml("rows: 5\n"));
    }
}
