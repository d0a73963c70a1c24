//! Error type for presentation rendering.

use thiserror::Error;

/// Errors returned while rendering a deck from the template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template archive could not be opened or is missing a part.
    #[error("template error: {0}")]
    Template(String),
    /// A configured layout index does not exist in the template.
    #[error("layout index {index} out of range: template has {available} layouts")]
    LayoutIndex {
        /// Requested layout index.
        index: usize,
        /// Number of layouts the template provides.
        available: usize,
    },
    /// Writing the output archive failed.
    #[error("failed to write deck: {0}")]
    Write(String),
    /// Filesystem error while reading the template or creating output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
