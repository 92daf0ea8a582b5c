//! Error types for label placement

use thiserror::Error;

/// Errors that can occur while placing labels
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Every label text is empty or blank and the job would print nothing
    #[error("refusing to print empty labels: no label text was given")]
    EmptyLabel,
}
