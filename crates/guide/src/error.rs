//! Guide Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A guide error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for guide operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An input file (catalog or sidebar) could not be read.
    #[display("could not read input file: {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// The catalog manifest is not valid JSON or is missing fields.
    #[display("malformed catalog: {_0}")]
    MalformedCatalog(#[error(not(source))] String),
    /// The sidebar file does not follow the group/document-list structure.
    #[display("malformed sidebar: {_0}")]
    MalformedSidebar(#[error(not(source))] String),
    /// The current version is not part of the configured version list.
    #[display("unknown version: {_0}")]
    UnknownVersion(#[error(not(source))] String),
    /// HTML could not be rewritten.
    #[display("failed to rewrite HTML")]
    Rewrite,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Inputs are static files for the duration of a run.
        false
    }
}
