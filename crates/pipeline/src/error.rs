//! Pipeline error types.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The browser failed to print a document.
    #[display("failed to render {}", _0.display())]
    Render(#[error(not(source))] PathBuf),
    /// Text could not be read back out of a first-pass render.
    #[display("failed to extract text from {}", _0.display())]
    Extract(#[error(not(source))] PathBuf),
    #[display("failed to merge {}", _0.display())]
    Merge(#[error(not(source))] PathBuf),
    /// A cover or page template failed to render.
    #[display("failed to apply page template for {_0:?}")]
    Template(#[error(not(source))] String),
    /// Links in a document could not be rewritten.
    #[display("failed to prepare document {_0:?}")]
    Prepare(#[error(not(source))] String),
    #[display("filesystem error at {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Jobs can no longer be queued once the run is finalizing.
    #[display("scheduler has finished; no further jobs are accepted")]
    Closed,
    #[display("failed to consolidate current version output")]
    Consolidate,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Render(_) | Self::Io(_))
    }
}
