//! Enumerated table of assignable settings
//!
//! Each entry names a canonical key, how its raw value is decoded, and the
//! setter that stores it. The command-line grammar and the config-mapping
//! merge both go through this table, so a key unknown here is ignored
//! everywhere.

use serde_yaml::Value;

use crate::dimension;

use super::{FontStyle, HAlign, OptionError, Settings, VAlign};

/// Decoder and setter for one field
#[derive(Clone, Copy)]
pub enum Setter {
    /// A length, parsed with [`dimension::parse`]
    Dimension(fn(&mut Settings, f64)),
    /// An integer of at least 1
    Count(fn(&mut Settings, u32)),
    /// A positive size in points
    Size(fn(&mut Settings, f64)),
    /// Free text, trimmed
    Text(fn(&mut Settings, String)),
    /// Free text kept verbatim
    RawText(fn(&mut Settings, String)),
    /// A boolean switch; also gets a `--no-` form on the command line
    Flag(fn(&mut Settings, bool)),
    HAlign(fn(&mut Settings, HAlign)),
    VAlign(fn(&mut Settings, VAlign)),
    FontStyle(fn(&mut Settings, FontStyle)),
}

/// One assignable setting
pub struct Field {
    /// Canonical key (underscores)
    pub key: &'static str,
    pub short: Option<char>,
    pub value_name: &'static str,
    pub help: &'static str,
    pub setter: Setter,
}

impl Field {
    /// Hyphenated spelling used for long options and messages
    pub fn long(&self) -> String {
        self.key.replace('_', "-")
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.setter, Setter::Flag(_))
    }

    /// Decode `value` and store it in `settings`
    pub fn apply(&self, settings: &mut Settings, value: &Value) -> crate::Result<()> {
        match self.setter {
            Setter::Dimension(set) => set(settings, self.dimension(value)?),
            Setter::Count(set) => set(settings, self.count(value)?),
            Setter::Size(set) => set(settings, self.size(value)?),
            Setter::Text(set) => set(settings, self.text(value)?.trim().to_string()),
            Setter::RawText(set) => set(settings, self.text(value)?),
            Setter::Flag(set) => set(settings, self.flag(value)?),
            Setter::HAlign(set) => set(settings, self.choice(value)?),
            Setter::VAlign(set) => set(settings, self.choice(value)?),
            Setter::FontStyle(set) => set(settings, self.choice(value)?),
        }
        Ok(())
    }

    fn invalid(&self, value: &Value, expected: &str) -> OptionError {
        OptionError::new(format!(
            "invalid argument: --{} {} ({expected})",
            self.long(),
            describe(value)
        ))
    }

    fn dimension(&self, value: &Value) -> crate::Result<f64> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| self.invalid(value, "expected a DIMENSION").into()),
            Value::String(s) => Ok(dimension::parse(s, &self.long())?),
            _ => Err(self.invalid(value, "expected a DIMENSION").into()),
        }
    }

    fn count(&self, value: &Value) -> Result<u32, OptionError> {
        let parsed = match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        parsed
            .filter(|n| *n >= 1)
            .ok_or_else(|| self.invalid(value, "expected an integer of at least 1"))
    }

    fn size(&self, value: &Value) -> crate::Result<f64> {
        let size = self.dimension(value)?;
        if size > 0.0 {
            Ok(size)
        } else {
            Err(self.invalid(value, "expected a positive size").into())
        }
    }

    fn text(&self, value: &Value) -> Result<String, OptionError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(self.invalid(value, "expected text")),
        }
    }

    fn flag(&self, value: &Value) -> Result<bool, OptionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Ok(true),
                "false" | "no" | "off" => Ok(false),
                _ => Err(self.invalid(value, "expected true or false")),
            },
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn choice<T>(&self, value: &Value) -> Result<T, OptionError>
    where
        T: std::str::FromStr<Err = String>,
    {
        let text = self.text(value)?;
        text.parse::<T>().map_err(|reason| self.invalid(value, &reason))
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("short", &self.short)
            .finish()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Find a field by canonical key
pub fn field(key: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.key == key)
}

macro_rules! field {
    ($key:literal, $short:expr, $value_name:literal, $help:literal, $setter:expr) => {
        Field {
            key: $key,
            short: $short,
            value_name: $value_name,
            help: $help,
            setter: $setter,
        }
    };
}

/// Every assignable setting, in help order
pub static FIELDS: &[Field] = &[
    // Page geometry
    field!("page_width", Some('w'), "DIMENSION",
        "Horizontal dimension of a page of labels as it comes out of the printer",
        Setter::Dimension(|s, v| s.page_width = v)),
    field!("page_height", Some('h'), "DIMENSION",
        "Vertical dimension of a page of labels as it comes out of the printer",
        Setter::Dimension(|s, v| s.page_height = v)),
    field!("rows", Some('R'), "NUM_ROWS", "Number of rows of labels on a page",
        Setter::Count(|s, v| s.rows = v)),
    field!("columns", Some('C'), "NUM_COLUMNS", "Number of columns of labels on a page",
        Setter::Count(|s, v| s.columns = v)),
    field!("start_label", Some('S'), "NUM",
        "Label number (from 1, left-to-right, top-to-bottom) on the first page at which to start",
        Setter::Count(|s, v| s.start_label = v)),
    field!("row_gap", None, "DIMENSION", "Vertical space between rows of labels",
        Setter::Dimension(|s, v| s.row_gap = v)),
    field!("column_gap", None, "DIMENSION", "Horizontal space between columns of labels",
        Setter::Dimension(|s, v| s.column_gap = v)),
    // Page margins, named in portrait
    field!("left_page_margin", None, "DIMENSION", "Distance from left side of page to print area",
        Setter::Dimension(|s, v| s.left_page_margin = v)),
    field!("right_page_margin", None, "DIMENSION", "Distance from right side of page to print area",
        Setter::Dimension(|s, v| s.right_page_margin = v)),
    field!("top_page_margin", None, "DIMENSION", "Distance from top side of page to print area",
        Setter::Dimension(|s, v| s.top_page_margin = v)),
    field!("bottom_page_margin", None, "DIMENSION", "Distance from bottom side of page to print area",
        Setter::Dimension(|s, v| s.bottom_page_margin = v)),
    field!("h_page_margin", None, "DIMENSION", "Left and right page margins",
        Setter::Dimension(|s, v| {
            s.left_page_margin = v;
            s.right_page_margin = v;
        })),
    field!("v_page_margin", None, "DIMENSION", "Top and bottom page margins",
        Setter::Dimension(|s, v| {
            s.top_page_margin = v;
            s.bottom_page_margin = v;
        })),
    field!("page_margin", None, "DIMENSION", "All four page margins",
        Setter::Dimension(|s, v| {
            s.left_page_margin = v;
            s.right_page_margin = v;
            s.top_page_margin = v;
            s.bottom_page_margin = v;
        })),
    field!("grid", Some('g'), "", "Draw the outline of every label cell",
        Setter::Flag(|s, v| s.grid = v)),
    field!("landscape", Some('L'), "",
        "Rotate the label so its text runs along the length of the page",
        Setter::Flag(|s, v| s.landscape = v)),
    field!("portrait", Some('P'), "", "Do not rotate the label; negated landscape",
        Setter::Flag(|s, v| s.landscape = !v)),
    // Label box
    field!("h_align", None, "left|center|right|justify", "Horizontal alignment of label text",
        Setter::HAlign(|s, v| s.h_align = v)),
    field!("v_align", None, "top|center|bottom", "Vertical alignment of label text",
        Setter::VAlign(|s, v| s.v_align = v)),
    field!("left_pad", None, "DIMENSION", "Space between left side of label and its text",
        Setter::Dimension(|s, v| s.left_pad = v)),
    field!("right_pad", None, "DIMENSION", "Space between right side of label and its text",
        Setter::Dimension(|s, v| s.right_pad = v)),
    field!("top_pad", None, "DIMENSION", "Space between top side of label and its text",
        Setter::Dimension(|s, v| s.top_pad = v)),
    field!("bottom_pad", None, "DIMENSION", "Space between bottom side of label and its text",
        Setter::Dimension(|s, v| s.bottom_pad = v)),
    field!("h_pad", None, "DIMENSION", "Left and right label padding",
        Setter::Dimension(|s, v| {
            s.left_pad = v;
            s.right_pad = v;
        })),
    field!("v_pad", None, "DIMENSION", "Top and bottom label padding",
        Setter::Dimension(|s, v| {
            s.top_pad = v;
            s.bottom_pad = v;
        })),
    field!("pad", None, "DIMENSION", "All four label paddings",
        Setter::Dimension(|s, v| {
            s.left_pad = v;
            s.right_pad = v;
            s.top_pad = v;
            s.bottom_pad = v;
        })),
    field!("delta_x", Some('x'), "DIMENSION", "Left-right adjustment as label text is oriented",
        Setter::Dimension(|s, v| s.delta_x = v)),
    field!("delta_y", Some('y'), "DIMENSION", "Up-down adjustment as label text is oriented",
        Setter::Dimension(|s, v| s.delta_y = v)),
    // Typography
    field!("font_name", None, "NAME", "Name of font to use (default Helvetica)",
        Setter::Text(|s, v| s.font_name = v)),
    field!("font_style", None, "normal|bold|italic|bold-italic", "Style of font to use",
        Setter::FontStyle(|s, v| s.font_style = v)),
    field!("font_size", None, "POINTS", "Size of font to use (default 12)",
        Setter::Size(|s, v| s.font_size = v)),
    // Input
    field!("in_file", Some('f'), "FILENAME", "Read labels from the given file",
        Setter::Text(|s, v| s.in_file = Some(v))),
    field!("nl_sep", Some('n'), "SEPARATOR", "Text to be read as a line break (default '++')",
        Setter::RawText(|s, v| s.nl_sep = v)),
    field!("copies", Some('c'), "NUMBER", "Number of copies of each label to print",
        Setter::Count(|s, v| s.copies = v)),
    // Output
    field!("printer", Some('p'), "NAME", "Name of the printer to print on",
        Setter::Text(|s, v| s.printer = v)),
    field!("out_file", Some('o'), "FILENAME", "Write the generated labels to the given file",
        Setter::Text(|s, v| s.out_file = with_svg_suffix(v))),
    field!("print_command", Some('%'), "PRINTCMD",
        "Command used to print: %p for printer name, %o for label file name",
        Setter::Text(|s, v| s.print_command = v)),
    field!("view_command", Some(':'), "VIEWCMD", "Command used to view: %o for label file name",
        Setter::Text(|s, v| s.view_command = v)),
    field!("template", Some('T'), "", "Print a numbered grid of cells instead of text",
        Setter::Flag(|s, v| s.template = v)),
    field!("view", Some('V'), "", "View rather than print",
        Setter::Flag(|s, v| s.view = v)),
    field!("verbose", Some('v'), "", "Report settings and commands",
        Setter::Flag(|s, v| s.verbose = v)),
];

fn with_svg_suffix(file: String) -> String {
    if file.to_ascii_lowercase().ends_with(".svg") {
        file
    } else {
        format!("{file}.svg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const EPS: f64 = 0.000001;
    const MM: f64 = 72.0 / 25.4;

    fn apply(key: &str, value: Value) -> crate::Result<Settings> {
        let mut s = Settings::default();
        field(key).expect("known field").apply(&mut s, &value)?;
        Ok(s)
    }

    #[test]
    fn test_keys_and_shorts_are_unique() {
        let keys: HashSet<_> = FIELDS.iter().map(|f| f.key).collect();
        assert_eq!(keys.len(), FIELDS.len());
        let shorts: Vec<_> = FIELDS.iter().filter_map(|f| f.short).collect();
        let unique: HashSet<_> = shorts.iter().collect();
        assert_eq!(unique.len(), shorts.len());
        assert!(FIELDS.iter().all(|f| !f.key.contains('-')));
    }

    #[test]
    fn test_dimension_from_string_and_number() {
        let s = apply("page_width", Value::from("4cm")).unwrap();
        assert!((s.page_width - 40.0 * MM).abs() < EPS);
        let s = apply("page_width", Value::from(18)).unwrap();
        assert_eq!(s.page_width, 18.0);
    }

    #[test]
    fn test_dimension_errors_carry_the_option_name() {
        let err = apply("delta_x", Value::from("5mi")).unwrap_err();
        assert!(matches!(err, crate::Error::Dimension(_)));
        assert!(err.to_string().contains("delta-x"));
        assert!(err.to_string().contains("'mi'"));
    }

    #[test]
    fn test_composite_margins_and_pads() {
        let s = apply("page_margin", Value::from("2mm")).unwrap();
        for m in [s.left_page_margin, s.right_page_margin, s.top_page_margin, s.bottom_page_margin] {
            assert!((m - 2.0 * MM).abs() < EPS);
        }
        let s = apply("v_pad", Value::from("1mm")).unwrap();
        assert!((s.top_pad - MM).abs() < EPS);
        assert!((s.bottom_pad - MM).abs() < EPS);
        assert!((s.left_pad - 4.5 * MM).abs() < EPS);
    }

    #[test]
    fn test_counts_must_be_at_least_one() {
        assert_eq!(apply("copies", Value::from("5")).unwrap().copies, 5);
        assert_eq!(apply("rows", Value::from(10)).unwrap().rows, 10);
        for bad in [Value::from(0), Value::from("-2"), Value::from("many"), Value::from(2.5)] {
            let err = apply("rows", bad).unwrap_err();
            assert!(matches!(err, crate::Error::Option(_)));
            assert!(err.to_string().contains("--rows"));
        }
    }

    #[test]
    fn test_font_size_must_be_positive() {
        assert_eq!(apply("font_size", Value::from("16")).unwrap().font_size, 16.0);
        assert!(apply("font_size", Value::from(0)).is_err());
    }

    #[test]
    fn test_portrait_negates_landscape() {
        assert!(!apply("portrait", Value::Bool(true)).unwrap().landscape);
        assert!(apply("portrait", Value::Bool(false)).unwrap().landscape);
        assert!(apply("landscape", Value::from("yes")).unwrap().landscape);
    }

    #[test]
    fn test_text_fields() {
        let s = apply("in_file", Value::from("  file with some spaces \t")).unwrap();
        assert_eq!(s.in_file.as_deref(), Some("file with some spaces"));
        assert_eq!(apply("out_file", Value::from("junk")).unwrap().out_file, "junk.svg");
        assert_eq!(apply("out_file", Value::from("junk.SVG")).unwrap().out_file, "junk.SVG");
        assert_eq!(apply("nl_sep", Value::from(" %% ")).unwrap().nl_sep, " %% ");
    }

    #[test]
    fn test_choice_fields_validate() {
        assert_eq!(apply("v_align", Value::from("top")).unwrap().v_align, VAlign::Top);
        assert_eq!(apply("h_align", Value::from("right")).unwrap().h_align, HAlign::Right);
        let err = apply("h_align", Value::from("middle")).unwrap_err();
        assert!(err.to_string().contains("left, center, right, justify"));
    }
}
