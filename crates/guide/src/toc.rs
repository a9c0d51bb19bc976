//! Table of contents.
//!
//! The outline is read back out of the document's headings. A printed
//! contents list carries one page-number [`PLACEHOLDER`] per numbered heading
//! (levels 1 to 3) which is resolved after a first render pass.

use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Page number marker awaiting resolution.
pub const PLACEHOLDER: &str = r#"<span class="pageNumber">_</span>"#;
/// Deepest heading level that is numbered by the print stylesheet.
pub const MAX_NUMBERED_LEVEL: u8 = 3;
/// Headings carrying this class are neither numbered nor listed.
pub const IGNORE_CLASS: &str = "ignoreCounter";

static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

/// Resolved form of [`PLACEHOLDER`].
pub fn page_number(page: usize) -> String {
    format!(r#"<span class="pageNumber">{page}</span>"#)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
}
impl TocEntry {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self { level, text: text.into() }
    }

    pub fn is_numbered(&self) -> bool {
        (1..=MAX_NUMBERED_LEVEL).contains(&self.level)
    }
}

/// Collects the headings of an HTML fragment in document order.
pub fn extract_toc(html: &str) -> Vec<TocEntry> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&HEADING_SELECTOR)
        .filter(|el| !el.value().classes().any(|class| class == IGNORE_CLASS))
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            let text = el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then(|| TocEntry::new(level, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_headings_in_order() {
        let html = r#"<h1>Intro</h1><p>text</p><h2>Install   the
            tool</h2><h1 class="ignoreCounter">Skip</h1><h4>Deep</h4><h3><code>C++</code> API (v2)</h3>"#;
        assert_eq!(
            extract_toc(html),
            vec![
                TocEntry::new(1, "Intro"),
                TocEntry::new(2, "Install the tool"),
                TocEntry::new(4, "Deep"),
                TocEntry::new(3, "C++ API (v2)"),
            ]
        );
    }

    #[test]
    fn empty_headings_are_dropped() {
        assert!(extract_toc("<h1> </h1><p>none</p>").is_empty());
    }

    #[test]
    fn resolved_placeholder_keeps_markup() {
        assert_eq!(page_number(4), r#"<span class="pageNumber">4</span>"#);
        assert_eq!(PLACEHOLDER.replace('_', "4"), page_number(4));
    }
}
