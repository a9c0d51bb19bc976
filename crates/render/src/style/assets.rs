//! Embedded assets for rendering.
//!
//! CSS styles and page templates are embedded into the binary at compile time
//! using [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use rust_embed::Embed;
use std::borrow::Cow;

#[derive(Embed)]
#[folder = "../../assets/styles/"]
pub struct Builtins;
impl Builtins {
    /// Get the CSS content for a builtin style by name.
    pub fn load(name: impl AsRef<str>) -> Result<Cow<'static, [u8]>> {
        Self::get(name.as_ref()).map(|f| f.data).ok_or_raise(|| ErrorKind::AssetNotFound(Self::identifier(name)))
    }

    /// List all available builtin style names.
    pub fn list() -> Vec<Cow<'static, str>> {
        Self::iter().filter(|f| f.ends_with(".css")).collect()
    }

    pub(crate) fn identifier(name: impl AsRef<str>) -> String {
        format!("builtin:{}", name.as_ref().trim().trim_start_matches("builtin:"))
    }
}

#[derive(Embed)]
#[folder = "../../assets/templates/"]
pub struct Templates;
impl Templates {
    /// Get the source of a builtin template by name.
    pub fn source(name: &str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(Builtins::identifier(name)))?;
        Ok(String::from_utf8_lossy(&file.data).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_print_style() {
        let css = Builtins::load("print.css");
        assert!(css.is_ok());
        assert!(!css.unwrap().is_empty());
    }

    #[test]
    fn list_includes_cover() {
        let styles = Builtins::list();
        assert!(styles.iter().any(|s| s == "cover.css"));
    }

    #[test]
    fn templates_are_embedded() {
        assert!(Templates::source("cover.html").unwrap().contains("{{ title | escape }}"));
        assert!(Templates::source("page.html").unwrap().contains("{{ body }}"));
    }
}
