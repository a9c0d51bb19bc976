//! Page shells printed by the renderer.
//!
//! Two [upon] templates wrap every document: the cover page and the content
//! page. Builtins are embedded at compile time; either may be replaced by a
//! user-provided template file. Text values go through the `escape`
//! formatter, `contents` and `body` are inserted as markup.

use crate::error::{ErrorKind, Result};
use crate::style::TemplateAssets;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;
use upon::{Engine, Template, Value, fmt as upon_fmt};

const COVER: &str = "cover.html";
const PAGE: &str = "page.html";

/// Fields shown on a cover page.
#[derive(Debug, Clone, Copy)]
pub struct CoverContext<'a> {
    pub project: &'a str,
    pub site_url: &'a str,
    pub title: &'a str,
    pub version: &'a str,
}

/// Fields of a content page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub project: &'a str,
    pub site_url: &'a str,
    pub title: &'a str,
    pub version: &'a str,
    pub language: &'a str,
    /// Contents list markup, empty when the document has none.
    pub contents: &'a str,
    pub body: &'a str,
}

pub struct Templates {
    engine: Engine<'static>,
    cover: Template<'static>,
    page: Template<'static>,
}
impl Templates {
    /// Compiles the builtin cover and page templates.
    pub fn builtin() -> Result<Self> {
        Self::compile(TemplateAssets::source(COVER)?, TemplateAssets::source(PAGE)?)
    }

    /// Compiles the builtin templates, replacing either with the file given.
    pub fn with_overrides(cover: Option<&Path>, page: Option<&Path>) -> Result<Self> {
        let load = |path: Option<&Path>, builtin: &str| match path {
            Some(path) => std::fs::read_to_string(path)
                .or_raise(|| ErrorKind::AssetNotFound(path.display().to_string())),
            None => TemplateAssets::source(builtin),
        };
        Self::compile(load(cover, COVER)?, load(page, PAGE)?)
    }

    fn compile(cover: String, page: String) -> Result<Self> {
        let mut engine = Engine::new();
        engine.add_formatter("escape", escape_formatter);
        let cover = engine.compile(cover).or_raise(|| ErrorKind::Template(COVER.into()))?;
        let page = engine.compile(page).or_raise(|| ErrorKind::Template(PAGE.into()))?;
        Ok(Self { engine, cover, page })
    }

    #[instrument(level = "trace", skip_all, fields(title = context.title))]
    pub fn cover(&self, context: &CoverContext<'_>) -> Result<String> {
        let value = upon::value! {
            project: context.project,
            site_url: context.site_url,
            title: context.title,
            version: context.version,
        };
        self.cover.render(&self.engine, value).to_string().or_raise(|| ErrorKind::Template(COVER.into()))
    }

    #[instrument(level = "trace", skip_all, fields(title = context.title))]
    pub fn page(&self, context: &PageContext<'_>) -> Result<String> {
        let value = upon::value! {
            project: context.project,
            site_url: context.site_url,
            title: context.title,
            version: context.version,
            language: context.language,
            contents: context.contents,
            body: context.body,
        };
        self.page.render(&self.engine, value).to_string().or_raise(|| ErrorKind::Template(PAGE.into()))
    }
}

/// Escapes `text` for use in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn escape_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
    use std::fmt::Write;
    match value {
        Value::String(s) => f.write_str(&escape_html(s))?,
        v => upon_fmt::default(f, v)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(title: &'a str, contents: &'a str, body: &'a str) -> PageContext<'a> {
        PageContext {
            project: "Acme",
            site_url: "https://docs.acme.test",
            title,
            version: "2.0",
            language: "en",
            contents,
            body,
        }
    }

    #[test]
    fn page_inserts_markup_and_escapes_text() {
        let templates = Templates::builtin().unwrap();
        let html = templates.page(&page("A <b> & C", "<ol class=\"toc\"></ol>", "<h1>Intro</h1>")).unwrap();
        assert!(html.contains("A &lt;b&gt; &amp; C"));
        assert!(html.contains("<ol class=\"toc\"></ol>"));
        assert!(html.contains("<h1>Intro</h1>"));
        assert!(html.contains("</head>"));
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn cover_shows_version() {
        let templates = Templates::builtin().unwrap();
        let html = templates
            .cover(&CoverContext { project: "Acme", site_url: "https://docs.acme.test", title: "Guide", version: "1.0" })
            .unwrap();
        assert!(html.contains("Guide"));
        assert!(html.contains("1.0"));
    }

    #[test]
    fn overrides_replace_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let cover = dir.path().join("cover.html");
        std::fs::write(&cover, "<html><head></head><body>{{ project }}/{{ version }}</body></html>").unwrap();
        let templates = Templates::with_overrides(Some(&cover), None).unwrap();
        let html = templates
            .cover(&CoverContext { project: "Acme", site_url: "", title: "", version: "3.1" })
            .unwrap();
        assert_eq!(html, "<html><head></head><body>Acme/3.1</body></html>");
    }

    #[test]
    fn broken_override_fails_to_compile() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, "{{ body ").unwrap();
        assert!(Templates::with_overrides(None, Some(&page)).is_err());
    }
}
