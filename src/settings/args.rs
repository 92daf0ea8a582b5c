//! Command-line grammar built from the field table
//!
//! Options are reported in the order they were written so that a `--label`
//! lookup lands between the options before it and the options after it.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use serde_yaml::Value;

use crate::dimension::VALID_UNITS;

use super::fields::{Field, Setter, FIELDS};
use super::{OptionError, LABEL_KEY};

const TEXT_ID: &str = "text";
const LIST_LABELS_ID: &str = "list_labels";

/// One item of the command line
#[derive(Debug, Clone, PartialEq)]
pub enum ArgEvent {
    /// Assign the setting with canonical key `key` from a raw argument
    Set { key: &'static str, value: Value },
    /// Merge a label-database entry at this point
    Label(String),
    /// A word of label text
    Text(String),
}

/// Command-line items in encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    pub events: Vec<ArgEvent>,
    pub list_labels: bool,
}

impl ParsedArgs {
    /// Positional words joined into a single label text, if any were given
    pub fn text(&self) -> Option<String> {
        let words: Vec<&str> = self
            .events
            .iter()
            .filter_map(|e| match e {
                ArgEvent::Text(word) => Some(word.as_str()),
                _ => None,
            })
            .collect();
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}

/// Outcome of parsing a command line
#[derive(Debug, Clone, PartialEq)]
pub enum CommandLine {
    /// Settings to apply and text to print
    Run(ParsedArgs),
    /// Help or version text to show instead of running
    Message(String),
}

/// The `labrat` command, one option per field
pub fn command() -> Command {
    let mut cmd = Command::new("labrat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print or view (with -V) labels with the given text")
        .after_help(format!(
            "All non-option arguments are joined into the label text, with '++' (or the\n\
             --nl-sep marker) standing for a line break.\n\n\
             For DIMENSION, valid units are: {VALID_UNITS}; with no unit, pt is assumed."
        ))
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .color(ColorChoice::Never);

    for field in FIELDS {
        cmd = cmd.args(field_args(field));
    }

    cmd.arg(
        Arg::new(LABEL_KEY)
            .short('l')
            .long("label")
            .value_name("NAME")
            .help("Use the settings of the named label from the label database")
            .action(ArgAction::Append),
    )
    .arg(
        Arg::new(LIST_LABELS_ID)
            .long("list-labels")
            .alias("list_labels")
            .help("List the names of all known labels")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("help")
            .long("help")
            .help("Show this message")
            .action(ArgAction::Help),
    )
    .arg(
        Arg::new("version")
            .long("version")
            .help("Show version")
            .action(ArgAction::Version),
    )
    .arg(
        Arg::new(TEXT_ID)
            .value_name("LABEL-TEXT")
            .num_args(1..)
            .action(ArgAction::Append),
    )
}

fn field_args(field: &'static Field) -> Vec<Arg> {
    let long = field.long();
    let with_aliases = |mut arg: Arg, long: &str| {
        let underscored = long.replace('-', "_");
        if underscored != long {
            arg = arg.alias(underscored);
        }
        arg
    };

    if field.is_flag() {
        let mut on = Arg::new(field.key)
            .long(long.clone())
            .help(format!("{} (negate with --no-{long})", field.help))
            .action(ArgAction::SetTrue);
        if let Some(short) = field.short {
            on = on.short(short);
        }
        let negated = format!("no-{long}");
        let off = Arg::new(negated_id(field))
            .long(negated.clone())
            .hide(true)
            .action(ArgAction::SetTrue);
        return vec![with_aliases(on, &long), with_aliases(off, &negated)];
    }

    let mut arg = Arg::new(field.key)
        .long(long.clone())
        .value_name(field.value_name)
        .help(field.help)
        .num_args(1)
        .action(ArgAction::Append);
    if let Some(short) = field.short {
        arg = arg.short(short);
    }
    if matches!(field.setter, Setter::Dimension(_)) {
        arg = arg.allow_hyphen_values(true);
    }
    vec![with_aliases(arg, &long)]
}

fn negated_id(field: &Field) -> String {
    format!("no_{}", field.key)
}

/// Parse command-line arguments (without the program name).
///
/// Fails with an [`OptionError`] naming the offending token on an unknown
/// option or a missing option argument. Values are not decoded here; that
/// happens when the events are applied to a [`super::Settings`].
pub fn parse_args<I, T>(args: I) -> Result<CommandLine, OptionError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Ok(CommandLine::Message(err.to_string()))
                }
                _ => Err(OptionError::new(err.to_string().trim_end())),
            };
        }
    };

    let mut indexed: Vec<(usize, ArgEvent)> = Vec::new();
    for field in FIELDS {
        if field.is_flag() {
            let negated = negated_id(field);
            for (id, on) in [(field.key, true), (negated.as_str(), false)] {
                if let Some(index) = flag_index(&matches, id) {
                    let value = Value::Bool(on);
                    indexed.push((index, ArgEvent::Set { key: field.key, value }));
                }
            }
        } else {
            for (index, value) in values(&matches, field.key) {
                let value = Value::String(value);
                indexed.push((index, ArgEvent::Set { key: field.key, value }));
            }
        }
    }
    for (index, name) in values(&matches, LABEL_KEY) {
        indexed.push((index, ArgEvent::Label(name.trim().to_string())));
    }
    for (index, word) in values(&matches, TEXT_ID) {
        indexed.push((index, ArgEvent::Text(word)));
    }
    indexed.sort_by_key(|(index, _)| *index);

    let parsed = ParsedArgs {
        events: indexed.into_iter().map(|(_, event)| event).collect(),
        list_labels: matches.get_flag(LIST_LABELS_ID),
    };
    tracing::debug!(events = parsed.events.len(), "parsed command line");
    Ok(CommandLine::Run(parsed))
}

fn flag_index(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.index_of(id)
}

fn values(matches: &ArgMatches, id: &str) -> Vec<(usize, String)> {
    match (matches.indices_of(id), matches.get_many::<String>(id)) {
        (Some(indices), Some(values)) => indices.zip(values.cloned()).collect(),
        _ => Vec::new(),
    }
}
