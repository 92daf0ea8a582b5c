//! Error types for settings resolution, placement, and output

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::dimension::DimensionError;
use crate::labeldb::LabelDbError;
use crate::layout::LayoutError;
use crate::settings::OptionError;

/// Errors that end a labrat invocation
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed dimension or unknown unit
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// Malformed command line or invalid setting value
    #[error(transparent)]
    Option(#[from] OptionError),

    /// Unknown label name or circular label reference
    #[error(transparent)]
    LabelDb(#[from] LabelDbError),

    /// A config file exists but could not be decoded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Nothing worth printing
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// An explicitly named label file is missing or unreadable
    #[error("cannot open label file '{}' for reading: {source}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generated document could not be written
    #[error("failed to write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A print or view command could not be started
    #[error("failed to run '{command}': {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Errors caused by what the user typed, as opposed to the environment
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::Dimension(_) | Error::Option(_) | Error::LabelDb(_) | Error::Layout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
