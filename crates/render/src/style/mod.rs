//! CSS style management for rendered documents.
//!
//! Styles are assembled through [`StyleConfig`]'s builder API, combining
//! compile-time embedded builtins (see [`StyleConfig::list_builtins`]) with
//! user-provided files or raw CSS content. All styles are read eagerly at
//! construction time so that missing files fail fast rather than at render time.

mod assets;
mod variables;

pub use self::variables::CssVariables;
pub(crate) use crate::style::assets::Templates as TemplateAssets;
use crate::error::{ErrorKind, Result};
use crate::style::assets::Builtins;
use exn::ResultExt;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Builtin stylesheet for content pages: page box, running header/footer,
/// heading counters and the contents list.
pub const PRINT_CSS: &str = "print.css";
/// Builtin stylesheet for the cover page.
pub const COVER_CSS: &str = "cover.css";

enum Style {
    Builtin(Cow<'static, [u8]>),
    UserContent(String),
}
impl Style {
    fn write_all_to(&self, w: &mut impl Write) -> std::io::Result<()> {
        let content = match self {
            Self::Builtin(content) => content.as_ref(),
            Self::UserContent(content) => content.as_bytes(),
        };
        w.write_all(b"<style>")?;
        w.write_all(content)?;
        w.write_all(b"</style>\n")
    }
}

/// An ordered collection of CSS stylesheets to inject into rendered documents.
///
/// Styles are applied in insertion order, later styles override earlier ones.
///
/// # Example
///
/// ```no_run
/// use docprint_render::StyleConfig;
/// # use docprint_render::error::Result;
///
/// # fn get_styles() -> Result<StyleConfig> {
/// let styles = StyleConfig::new()
///     .with_builtin("print.css")?
///     .with_file("/path/to/custom.css")?;
/// # Ok(styles)
/// # }
/// ```
#[derive(Default)]
pub struct StyleConfig {
    styles: Vec<Style>,
}
impl StyleConfig {
    /// Creates an empty style configuration with no stylesheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin stylesheets content pages are printed with.
    pub fn content() -> Result<Self> {
        Self::new().with_builtin(PRINT_CSS)
    }

    /// The builtin stylesheets cover pages are printed with.
    pub fn cover() -> Result<Self> {
        Self::new().with_builtin(COVER_CSS)
    }

    /// Returns the names of all embedded builtin stylesheets (e.g. `"print.css"`).
    pub fn list_builtins() -> Vec<Cow<'static, str>> {
        Builtins::list()
    }

    /// Appends a builtin stylesheet by name.
    ///
    /// Returns [`ErrorKind::AssetNotFound`](crate::error::ErrorKind::AssetNotFound)
    /// if `name` does not match any embedded asset.
    pub fn with_builtin(mut self, name: impl AsRef<str>) -> Result<Self> {
        let content = Builtins::load(name)?;
        self.styles.push(Style::Builtin(content));
        Ok(self)
    }

    /// Appends a stylesheet read from a file on disk.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            exn::bail!(ErrorKind::AssetNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).or_raise(|| ErrorKind::Io)?;
        self.styles.push(Style::UserContent(content));
        Ok(self)
    }

    /// Appends raw CSS content as a stylesheet.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.styles.push(Style::UserContent(content.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub(crate) fn write_all_to(&self, w: &mut impl Write) -> std::io::Result<usize> {
        for style in &self.styles {
            style.write_all_to(w)?;
        }
        Ok(self.styles.len())
    }
}
