//! The resolved settings for one print job
//!
//! Settings start from built-in defaults and are updated in place, one key
//! at a time, through the field table in [`fields`]. Dimensions are always
//! stored in points.

pub mod args;
pub mod fields;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::config::{canonical_key, key_str, Environment};

pub use args::{parse_args, ArgEvent, CommandLine, ParsedArgs};
pub use fields::{field, Field, Setter, FIELDS};

/// Key naming a label-database entry in config mappings and on the command line
pub const LABEL_KEY: &str = "label";

const MM: f64 = 72.0 / 25.4;

/// Malformed invocation: unknown option, missing or invalid argument
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct OptionError {
    pub message: String,
}

impl OptionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Horizontal placement of text within a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical placement of text within a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl HAlign {
    pub const NAMES: &'static [&'static str] = &["left", "center", "right", "justify"];
}

impl VAlign {
    pub const NAMES: &'static [&'static str] = &["top", "center", "bottom"];
}

impl FontStyle {
    pub const NAMES: &'static [&'static str] = &["normal", "bold", "italic", "bold-italic"];

    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

fn invalid_choice(value: &str, names: &[&str]) -> String {
    format!("'{value}' is not one of {}", names.join(", "))
}

impl FromStr for HAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(HAlign::Left),
            "center" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            "justify" => Ok(HAlign::Justify),
            other => Err(invalid_choice(other, Self::NAMES)),
        }
    }
}

impl FromStr for VAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(VAlign::Top),
            "center" => Ok(VAlign::Center),
            "bottom" => Ok(VAlign::Bottom),
            other => Err(invalid_choice(other, Self::NAMES)),
        }
    }
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" => Ok(FontStyle::Normal),
            "bold" => Ok(FontStyle::Bold),
            "italic" => Ok(FontStyle::Italic),
            "bold-italic" | "bold_italic" => Ok(FontStyle::BoldItalic),
            other => Err(invalid_choice(other, Self::NAMES)),
        }
    }
}

/// All settings for a single print or view job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Label-database entry the settings were taken from, if any
    pub label: Option<String>,

    // Page geometry, named as the page comes out of the printer
    pub page_width: f64,
    pub page_height: f64,
    pub left_page_margin: f64,
    pub right_page_margin: f64,
    pub top_page_margin: f64,
    pub bottom_page_margin: f64,
    pub rows: u32,
    pub columns: u32,
    pub row_gap: f64,
    pub column_gap: f64,
    pub grid: bool,
    /// 1-based cell on the first page at which printing starts
    pub start_label: u32,
    pub landscape: bool,

    // Label box
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub left_pad: f64,
    pub right_pad: f64,
    pub top_pad: f64,
    pub bottom_pad: f64,
    pub delta_x: f64,
    pub delta_y: f64,

    // Typography
    pub font_name: String,
    pub font_style: FontStyle,
    pub font_size: f64,

    // Input
    pub in_file: Option<String>,
    pub nl_sep: String,
    pub copies: u32,

    // Output
    pub printer: String,
    pub out_file: String,
    pub print_command: String,
    pub view_command: String,
    pub view: bool,
    pub template: bool,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label: None,
            page_width: 24.0 * MM,
            page_height: 87.0 * MM,
            left_page_margin: 5.0 * MM,
            right_page_margin: 5.0 * MM,
            top_page_margin: 0.0,
            bottom_page_margin: 0.0,
            rows: 1,
            columns: 1,
            row_gap: 0.0,
            column_gap: 0.0,
            grid: false,
            start_label: 1,
            landscape: false,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            left_pad: 4.5 * MM,
            right_pad: 4.5 * MM,
            top_pad: 0.0,
            bottom_pad: 0.0,
            delta_x: 0.0,
            delta_y: 0.0,
            font_name: "Helvetica".to_string(),
            font_style: FontStyle::Normal,
            font_size: 12.0,
            in_file: None,
            nl_sep: "++".to_string(),
            copies: 1,
            printer: "dymo".to_string(),
            out_file: "labrat.svg".to_string(),
            print_command: "lpr -P %p %o".to_string(),
            view_command: "xdg-open %o".to_string(),
            view: false,
            template: false,
            verbose: false,
        }
    }
}

impl Settings {
    /// Built-in defaults, with the printer taken from `PRINTER` when set
    pub fn defaults(env: &Environment) -> Self {
        let mut settings = Self::default();
        if let Some(printer) = env.var("PRINTER") {
            settings.printer = printer.to_string();
        }
        settings
    }

    /// Assign one setting from a raw value.
    ///
    /// Returns `Ok(false)` when `key` names no setting. The `label` key is
    /// not a plain setting and is reported as unknown here; label lookups
    /// are driven by [`crate::pipeline`].
    pub fn set(&mut self, key: &str, value: &Value) -> crate::Result<bool> {
        match field(&canonical_key(key)) {
            Some(f) => {
                f.apply(self, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply every known key of `map` in order, ignoring unknown keys
    pub fn merge_mapping(&mut self, map: &Mapping) -> crate::Result<()> {
        for (key, value) in map {
            let Some(key) = key_str(key) else {
                continue;
            };
            if !self.set(&key, value)? {
                tracing::warn!(key = %key, "ignoring unknown setting");
            }
        }
        Ok(())
    }

    /// Number of label cells on one page
    pub fn labels_per_page(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Canonical mapping of every setting, dimensions in points
    pub fn to_mapping(&self) -> Mapping {
        match serde_yaml::to_value(self) {
            Ok(Value::Mapping(map)) => map,
            _ => Mapping::new(),
        }
    }

    /// Log every setting under `title`
    pub fn report(&self, title: &str) {
        tracing::info!("{title}:\n{self}");
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.to_mapping() {
            let key = key_str(&key).unwrap_or_default();
            match value {
                Value::Number(n) if n.is_f64() => {
                    writeln!(f, "  {key}: {:.2}pt", n.as_f64().unwrap_or_default())?
                }
                Value::String(s) => writeln!(f, "  {key}: {s}")?,
                Value::Null => writeln!(f, "  {key}: ~")?,
                other => {
                    let rendered = serde_yaml::to_string(&other).unwrap_or_default();
                    writeln!(f, "  {key}: {}", rendered.trim_end())?
                }
            }
        }
        Ok(())
    }
}
