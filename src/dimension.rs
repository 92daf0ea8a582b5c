//! Parsing of physical dimensions such as `33mm` or `0.5in`
//!
//! Every dimension in the crate is stored in PostScript points (1/72 inch).

use thiserror::Error;

/// Units accepted after the numeric part of a dimension, in help order
pub const VALID_UNITS: &str = "pt, mm, cm, dm, m, in, ft, yd";

const POINTS_PER_INCH: f64 = 72.0;
const POINTS_PER_MM: f64 = POINTS_PER_INCH / 25.4;

/// Errors produced while parsing a dimension string
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DimensionError {
    #[error("illegal {context} dimension: '{text}'")]
    Malformed { context: String, text: String },

    #[error("unknown {context} unit: '{unit}'\n  valid units are: {VALID_UNITS}")]
    UnknownUnit { context: String, unit: String },
}

/// A recognized unit of length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Point,
    Millimeter,
    Centimeter,
    Decimeter,
    Meter,
    Inch,
    Foot,
    Yard,
}

impl Unit {
    /// Look up a unit by its (case-sensitive) suffix
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix {
            "pt" => Unit::Point,
            "mm" => Unit::Millimeter,
            "cm" => Unit::Centimeter,
            "dm" => Unit::Decimeter,
            "m" => Unit::Meter,
            "in" => Unit::Inch,
            "ft" => Unit::Foot,
            "yd" => Unit::Yard,
            _ => return None,
        };
        Some(unit)
    }

    /// Number of points in one of this unit
    pub fn points(self) -> f64 {
        match self {
            Unit::Point => 1.0,
            Unit::Millimeter => POINTS_PER_MM,
            Unit::Centimeter => POINTS_PER_MM * 10.0,
            Unit::Decimeter => POINTS_PER_MM * 100.0,
            Unit::Meter => POINTS_PER_MM * 1000.0,
            Unit::Inch => POINTS_PER_INCH,
            Unit::Foot => POINTS_PER_INCH * 12.0,
            Unit::Yard => POINTS_PER_INCH * 36.0,
        }
    }
}

/// Parse `text` into points.
///
/// The grammar is an optional sign, digits with an optional fraction, and an
/// optional alphabetic unit; surrounding whitespace and whitespace between
/// the number and the unit are allowed. A missing unit means points.
/// `context` names the setting being parsed and appears in error messages.
pub fn parse(text: &str, context: &str) -> Result<f64, DimensionError> {
    let malformed = || DimensionError::Malformed {
        context: context.to_string(),
        text: text.to_string(),
    };

    let trimmed = text.trim();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if trimmed.len() - unsigned.len() > 1 {
        return Err(malformed());
    }

    let number_len = unsigned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(unsigned.len());
    let (number, rest) = unsigned.split_at(number_len);
    if !number.chars().any(|c| c.is_ascii_digit()) || number.matches('.').count() > 1 {
        return Err(malformed());
    }

    let unit = rest.trim_start();
    if !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(malformed());
    }

    let signed = &trimmed[..trimmed.len() - unsigned.len() + number_len];
    let measure: f64 = signed.parse().map_err(|_| malformed())?;

    if unit.is_empty() {
        return Ok(measure);
    }
    let unit = Unit::from_suffix(unit).ok_or_else(|| DimensionError::UnknownUnit {
        context: context.to_string(),
        unit: unit.to_string(),
    })?;
    Ok(measure * unit.points())
}
