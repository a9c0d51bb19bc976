//! PDF Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A PDF error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for PDF operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file is not a PDF that `lopdf` can parse.
    #[display("unreadable PDF: {}", _0.display())]
    InvalidPdf(#[error(not(source))] PathBuf),
    /// Text could not be extracted from a page.
    #[display("text extraction failed on page {_0}")]
    Extraction(#[error(not(source))] u32),
    /// The inputs of a merge carry no page tree to combine.
    #[display("nothing to merge")]
    NothingToMerge,
    /// The blocking worker running the PDF operation panicked or was cancelled.
    Worker,
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
