//! Hyperlink rewriting for printed documents.
//!
//! Relative links only make sense on the web site. Once several documents
//! are merged into one PDF they must point back at the published site,
//! version-aware:
//!
//! | href                               | result                                          |
//! |------------------------------------|-------------------------------------------------|
//! | `http…`, `https…`, other schemes   | unchanged                                       |
//! | `#fragment`                        | unchanged                                       |
//! | `./relative`, `../relative`        | unchanged (hand-curated)                        |
//! | `<baseUrl>…`                       | `<origin><href>`                                |
//! | anything else                      | `<origin><baseUrl>docs/[<version>/]<href>`      |
//!
//! The version segment is omitted for the current version.

use crate::VersionSet;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lol_html::{RewriteStrSettings, element, rewrite_str};

#[derive(Clone, Debug)]
pub struct LinkRewriter {
    origin: String,
    base_url: String,
    versions: VersionSet,
}
impl LinkRewriter {
    pub fn new(site_url: impl AsRef<str>, base_url: impl AsRef<str>, versions: VersionSet) -> Self {
        let base_url = format!("/{}/", base_url.as_ref().trim_matches('/')).replace("//", "/");
        Self { origin: site_url.as_ref().trim_end_matches('/').to_string(), base_url, versions }
    }

    /// Returns the replacement for `href`, or `None` when it stays as is.
    pub fn rewrite_href(&self, href: &str, version: &str) -> Option<String> {
        if href.is_empty() || href.starts_with("http") || href.starts_with('#') || href.starts_with('.') {
            return None;
        }
        if has_scheme(href) {
            return None;
        }
        if href.starts_with(&self.base_url) {
            return Some(format!("{}{href}", self.origin));
        }
        let version = if self.versions.is_current(version) { String::new() } else { format!("{version}/") };
        Some(format!("{}{}docs/{version}{}", self.origin, self.base_url, href.trim_start_matches('/')))
    }

    /// Rewrites the `href` of every anchor in `html` as rendered for `version`.
    pub fn rewrite(&self, html: &str, version: &str) -> Result<String> {
        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href")
                        && let Some(rewritten) = self.rewrite_href(&href, version)
                    {
                        el.set_attribute("href", &rewritten)?;
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::default()
            },
        )
        .or_raise(|| ErrorKind::Rewrite)
    }
}

/// `mailto:`, `tel:`, `ftp:` and friends.
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rewriter() -> LinkRewriter {
        let versions = VersionSet::new(vec!["3.0".into(), "2.0".into()], Some("3.0".into())).unwrap();
        LinkRewriter::new("https://ex.com", "/docs/", versions)
    }

    #[rstest]
    #[case("./x", None)]
    #[case("../y", None)]
    #[case("#a", None)]
    #[case("http://ext.com", None)]
    #[case("https://ext.com/page", None)]
    #[case("mailto:docs@ex.com", None)]
    #[case("", None)]
    #[case("/foo", Some("https://ex.com/docs/docs/2.0/foo"))]
    #[case("foo.html", Some("https://ex.com/docs/docs/2.0/foo.html"))]
    #[case("/docs/2.0/bar", Some("https://ex.com/docs/2.0/bar"))]
    fn rewrites_for_older_version(#[case] href: &str, #[case] expected: Option<&str>) {
        assert_eq!(rewriter().rewrite_href(href, "2.0").as_deref(), expected);
    }

    #[test]
    fn current_version_has_no_segment() {
        assert_eq!(rewriter().rewrite_href("/foo", "3.0").as_deref(), Some("https://ex.com/docs/docs/foo"));
    }

    #[test]
    fn normalizes_base_url_and_origin() {
        let versions = VersionSet::new(vec!["1.0".into()], None).unwrap();
        let rewriter = LinkRewriter::new("https://ex.com/", "", versions);
        assert_eq!(rewriter.rewrite_href("guide", "1.0").as_deref(), Some("https://ex.com/docs/guide"));
    }

    #[test]
    fn rewrites_anchors_in_html() {
        let html = r##"<p><a href="/foo">Foo</a> <a href="#a">A</a> <a name="x">X</a></p>"##;
        let rewritten = rewriter().rewrite(html, "2.0").unwrap();
        assert_eq!(
            rewritten,
            r##"<p><a href="https://ex.com/docs/docs/2.0/foo">Foo</a> <a href="#a">A</a> <a name="x">X</a></p>"##
        );
    }
}
