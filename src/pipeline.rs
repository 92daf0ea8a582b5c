//! Resolution of the final settings for one job
//!
//! Built-in defaults are overlaid by the merged config files and then by the
//! command line. Wherever a `label` key appears, in a config file or as
//! `--label`, the resolved label-database entry is merged at that point, so
//! later keys override the label and the label overrides earlier keys.

use serde_yaml::Mapping;

use crate::config::{canonical_key, key_str, ConfigSources, CONFIG_BASE};
use crate::labeldb::{canonical_name, LabelDb};
use crate::settings::{ArgEvent, OptionError, ParsedArgs, Settings, LABEL_KEY};

/// Resolve settings from defaults, config files, and `args`
pub fn resolve(args: &ParsedArgs, sources: &ConfigSources, db: &mut LabelDb) -> crate::Result<Settings> {
    let mut settings = Settings::defaults(sources.env());

    let config = sources.read(CONFIG_BASE)?;
    tracing::debug!(keys = config.len(), "merged config files");
    apply_mapping(&mut settings, &config, db)?;

    apply_args(&mut settings, args, db)?;
    if settings.verbose {
        settings.report("Resolved settings");
    }
    Ok(settings)
}

/// Apply `map` in order, expanding `label` keys through `db`
pub fn apply_mapping(settings: &mut Settings, map: &Mapping, db: &mut LabelDb) -> crate::Result<()> {
    for (key, value) in map {
        let Some(key) = key_str(key) else {
            continue;
        };
        if canonical_key(&key) == LABEL_KEY {
            let name = key_str(value).ok_or_else(|| {
                OptionError::new(format!("invalid argument: --label {value:?} (expected a NAME)"))
            })?;
            apply_label(settings, &name, db)?;
        } else if !settings.set(&key, value)? {
            tracing::warn!(key = %key, "ignoring unknown setting");
        }
    }
    Ok(())
}

/// Apply command-line events in the order they were given
pub fn apply_args(settings: &mut Settings, args: &ParsedArgs, db: &mut LabelDb) -> crate::Result<()> {
    for event in &args.events {
        match event {
            ArgEvent::Set { key, value } => {
                settings.set(key, value)?;
            }
            ArgEvent::Label(name) => apply_label(settings, name, db)?,
            ArgEvent::Text(_) => {}
        }
    }
    Ok(())
}

/// Merge the alias-resolved entry for `name` into `settings`
pub fn apply_label(settings: &mut Settings, name: &str, db: &mut LabelDb) -> crate::Result<()> {
    let preset = db.resolve(name)?;
    settings.merge_mapping(&preset)?;
    settings.label = Some(canonical_name(name));
    Ok(())
}
