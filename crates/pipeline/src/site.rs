use crate::error::{ErrorKind, Result};
use docprint_guide::TocEntry;
use docprint_guide::toc::{IGNORE_CLASS, PLACEHOLDER};
use docprint_render::{CoverContext, CssVariables, PageContext, Templates, escape_html};
use exn::ResultExt;

/// Site-wide values every printed page is built from.
pub struct Site {
    pub project: String,
    pub site_url: String,
    templates: Templates,
}
impl Site {
    pub fn new(project: impl Into<String>, site_url: impl Into<String>, templates: Templates) -> Self {
        Self { project: project.into(), site_url: site_url.into(), templates }
    }

    /// Cover page markup for a document.
    pub fn cover(&self, title: &str, version: &str) -> Result<String> {
        let context = CoverContext { project: &self.project, site_url: &self.site_url, title, version };
        self.templates.cover(&context).or_raise(|| ErrorKind::Template(title.to_string()))
    }

    /// Wraps `body` in the page shell, with a contents list when `toc` is given.
    pub fn page(&self, title: &str, version: &str, language: &str, toc: Option<&[TocEntry]>, body: &str) -> Result<String> {
        let contents = toc.map(contents_markup).unwrap_or_default();
        let context = PageContext {
            project: &self.project,
            site_url: &self.site_url,
            title,
            version,
            language,
            contents: &contents,
            body,
        };
        self.templates.page(&context).or_raise(|| ErrorKind::Template(title.to_string()))
    }

    pub fn variables(&self, title: &str, version: &str) -> CssVariables {
        CssVariables::for_document(&self.project, version, title).with("site-url", self.site_url.as_str())
    }
}

/// Renders the printed contents section: one list item per numbered entry,
/// each ending in a [`PLACEHOLDER`].
pub fn contents_markup(toc: &[TocEntry]) -> String {
    let mut html = format!(r#"<h1 class="{IGNORE_CLASS}">Contents</h1>"#);
    html.push_str("\n<ol class=\"toc\">\n");
    for entry in toc.iter().filter(|entry| entry.is_numbered()) {
        html.push_str(&format!(
            "<li class=\"toc-level-{}\"><span class=\"tocText\">{}</span>{PLACEHOLDER}</li>\n",
            entry.level,
            escape_html(&entry.text)
        ));
    }
    html.push_str("</ol>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_has_placeholder_per_numbered_entry() {
        let toc = [TocEntry::new(1, "A & B"), TocEntry::new(4, "Deep"), TocEntry::new(3, "C")];
        let html = contents_markup(&toc);
        assert_eq!(html.matches(PLACEHOLDER).count(), 2);
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("Deep"));
        assert!(html.starts_with(r#"<h1 class="ignoreCounter">Contents</h1>"#));
    }

    #[test]
    fn page_without_toc_has_no_contents() {
        let site = Site::new("Acme", "https://docs.acme.test", Templates::builtin().unwrap());
        let html = site.page("Intro", "1.0", "en", None, "<h1>Intro</h1>").unwrap();
        assert!(!html.contains(PLACEHOLDER));
        assert!(html.contains("<h1>Intro</h1>"));
    }
}
