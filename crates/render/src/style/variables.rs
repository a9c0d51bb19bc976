//! CSS custom properties (variables) for rendered documents.
//!
//! [`CssVariables`] is rendered as a `<style>` block setting `:root` custom
//! properties prefixed with `--doc-`. These are injected alongside stylesheets
//! so that CSS rules can reference the project, version and title of the
//! document being printed without template preprocessing.

use rslug::slugify;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A set of CSS custom properties injected as `:root` variables.
///
/// Each entry becomes `--doc-{key}: "{value}"` in a `<style>` block.
/// Values are escaped per the [W3C CSS string token grammar][spec].
///
/// [spec]: https://www.w3.org/TR/css-syntax-3/#consume-string-token
#[derive(Debug, Clone, Default)]
pub struct CssVariables {
    variables: BTreeMap<String, String>,
}

impl CssVariables {
    /// Creates a new set of CSS variables from any map-like type.
    pub fn new(map: impl Into<BTreeMap<String, String>>) -> Self {
        Self { variables: map.into() }
    }

    /// The variables every printed document carries.
    pub fn for_document(project: &str, version: &str, title: &str) -> Self {
        [("project", project), ("version", version), ("title", title)].into_iter().collect()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CssVariables {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let variables = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { variables }
    }
}
impl Display for CssVariables {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "<style>\n:root {{")?;
        for (key, value) in self.variables.iter() {
            writeln!(f, "    --doc-{}: \"{}\";", slugify!(key), css_escape_string(value))?;
        }
        write!(f, "}}\n</style>")
    }
}

/// https://www.w3.org/TR/css-syntax-3/#consume-string-token
fn css_escape_string(value: impl AsRef<str>) -> String {
    value
        .as_ref()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\a ")
        .replace('\r', "\\d ")
        .replace('\x0C', "\\c ")
        .replace('\0', "\\fffd ")
        .replace('<', "\\3c ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_root_block() {
        let css = CssVariables::for_document("Acme", "2.0", "Say \"hi\"").to_string();
        assert!(css.starts_with("<style>\n:root {"));
        assert!(css.contains("--doc-project: \"Acme\";"));
        assert!(css.contains("--doc-title: \"Say \\\"hi\\\"\";"));
        assert!(css.ends_with("}\n</style>"));
    }

    #[test]
    fn closing_tags_cannot_escape_the_block() {
        let css = CssVariables::new(BTreeMap::from([("title".to_string(), "</style>".to_string())])).to_string();
        assert_eq!(css.matches("</style>").count(), 1);
    }
}
