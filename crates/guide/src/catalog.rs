//! Document catalog.
//!
//! The catalog is the ordered list of documents handed over by the site
//! build, read from a JSON manifest of the form:
//!
//! ```json
//! {
//!   "documents": [
//!     { "id": "intro", "version": "2.0", "permalink": "docs/2.0/intro.html",
//!       "title": "Introduction", "language": "en", "html": "<p>Hello</p>" },
//!     { "id": "setup", "version": "2.0", "permalink": "docs/2.0/setup.html",
//!       "title": "Setup", "markdown": "Install it." }
//!   ]
//! }
//! ```
//!
//! Each record carries either rendered `html` or raw `markdown`.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use pulldown_cmark::{Options, Parser, html::push_html};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use tracing::instrument;

/// Content of a document as supplied by the site build.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentBody {
    Html(String),
    Markdown(String),
}
impl DocumentBody {
    pub fn to_html(&self) -> Cow<'_, str> {
        match self {
            Self::Html(html) => Cow::Borrowed(html),
            Self::Markdown(markdown) => {
                let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
                let mut html = String::with_capacity(markdown.len() * 3 / 2);
                push_html(&mut html, Parser::new_ext(markdown, options));
                Cow::Owned(html)
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub version: String,
    pub permalink: String,
    pub title: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(flatten)]
    pub body: DocumentBody,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Deserialize)]
struct Manifest {
    documents: Vec<DocumentRecord>,
}

/// Ordered, immutable set of [`DocumentRecord`]s.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    documents: Vec<DocumentRecord>,
}
impl Catalog {
    pub fn new(documents: Vec<DocumentRecord>) -> Self {
        Self { documents }
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(documents = catalog.len(), "Document catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(json).or_raise(|| ErrorKind::MalformedCatalog("invalid manifest".to_string()))?;
        Ok(Self::new(manifest.documents))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "documents": [
            {"id": "intro", "version": "2.0", "permalink": "docs/intro.html", "title": "Intro", "html": "<p>Hi</p>"},
            {"id": "setup", "version": "1.0", "permalink": "docs/1.0/setup.html", "title": "Setup",
             "language": "de", "markdown": "Some *emphasis*"}
        ]
    }"#;

    #[test]
    fn parses_manifest_in_order() {
        let catalog = Catalog::from_json(MANIFEST).unwrap();
        let ids: Vec<_> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["intro", "setup"]);
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.language, "en");
        assert_eq!(first.body, DocumentBody::Html("<p>Hi</p>".to_string()));
    }

    #[test]
    fn renders_markdown_bodies() {
        let catalog = Catalog::from_json(MANIFEST).unwrap();
        let setup = catalog.iter().nth(1).unwrap();
        assert_eq!(setup.language, "de");
        assert!(setup.body.to_html().contains("<em>emphasis</em>"));
    }

    #[test]
    fn rejects_records_without_body() {
        let json = r#"{"documents": [{"id": "a", "version": "1", "permalink": "a", "title": "A"}]}"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Catalog::load(dir.path().join("missing.json")).is_err());
    }
}
