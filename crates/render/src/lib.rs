//! Headless Chrome rendering of HTML documents to PDF.

mod chrome;
pub mod error;
mod render;
mod style;
mod template;

use crate::chrome::Chrome;
use crate::error::{ErrorKind, Result};
pub use crate::render::Layout;
pub use crate::style::{COVER_CSS, CssVariables, PRINT_CSS, StyleConfig};
pub use crate::template::{CoverContext, PageContext, Templates, escape_html};
use exn::ResultExt;
use std::path::PathBuf;

pub type TempFile = tempfile::NamedTempFile;

/// A browser session shared by every render of a run.
///
/// The session is one discovered executable plus one browser profile that
/// lives as long as the renderer; each render is a separate headless print.
pub struct Renderer {
    chrome: Chrome,
    profile: tempfile::TempDir,
    content_styles: StyleConfig,
    cover_styles: StyleConfig,
}
impl Renderer {
    /// Discovers Chrome on this system, or uses `executable` when given.
    pub fn new(
        executable: Option<PathBuf>,
        content_styles: StyleConfig,
        cover_styles: StyleConfig,
    ) -> Result<Self> {
        let chrome = match executable {
            Some(path) => Chrome::at(path)?,
            None => Chrome::discover()?,
        };
        let profile = tempfile::Builder::new().prefix("docprint-chrome-").tempdir().or_raise(|| ErrorKind::Io)?;
        tracing::debug!(chrome = ?chrome, profile = %profile.path().display(), "Browser session opened");
        Ok(Self { chrome, profile, content_styles, cover_styles })
    }
}
