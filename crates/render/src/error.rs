//! Render error types.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("chrome/chromium not detected on your system")]
    ChromeNotFound,
    /// A configured browser executable does not exist.
    #[display("browser executable not found: {}", _0.display())]
    ExecutableNotFound(#[error(not(source))] PathBuf),
    /// Chrome exited with a non-zero exit code.
    #[display("Chrome exited with code: {_0}")]
    ChromeFailed(#[error(not(source))] i32),
    /// Chrome was killed by a signal before finishing.
    #[display("Chrome terminated without an exit code")]
    ChromeTerminated,
    /// Chrome exited successfully but the PDF it was asked for is not there.
    #[display("Chrome produced no PDF at {}", _0.display())]
    NoOutput(#[error(not(source))] PathBuf),
    /// Asset was not loadable (either file or builtin).
    AssetNotFound(#[error(not(source))] String),
    /// A page template failed to compile or render.
    #[display("template error: {_0}")]
    Template(#[error(not(source))] String),
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChromeTerminated | Self::NoOutput(_))
    }
}
