//! Page number reconciliation.
//!
//! A document is rendered once with every contents entry showing
//! [`PLACEHOLDER`]. The text of that render is split into pages and each
//! numbered entry is looked up in it; the placeholder belonging to the entry
//! is then replaced with the page it was found on.
//!
//! Entries are searched in document order from a cursor that only moves
//! forward, so all lookups together scan each page a bounded number of times.

use docprint_guide::TocEntry;
use docprint_guide::toc::{PLACEHOLDER, page_number};
use regex::Regex;

/// Locates headings in the extracted text of a rendered document.
pub trait PageLocator: Send + Sync {
    /// Splits the extracted text into pages.
    fn pages<'t>(&self, text: &'t str) -> Vec<&'t str>;

    /// Index of the first page at or after `from` that shows `entry`.
    fn locate(&self, pages: &[&str], entry: &TocEntry, from: usize) -> Option<usize>;
}

/// Finds headings by their printed auto-numbered form.
///
/// Pages are delimited by the running footer; without a footer pattern, or
/// when it never matches, the whole text is one page.
#[derive(Clone, Debug, Default)]
pub struct RegexPageLocator {
    footer: Option<Regex>,
}
impl RegexPageLocator {
    pub fn new(footer: Option<Regex>) -> Self {
        Self { footer }
    }

    /// Line pattern of a numbered heading: its counter, two spaces and the
    /// heading text. Whitespace inside the text may be a line break.
    pub fn heading_pattern(entry: &TocEntry) -> Option<String> {
        let counter = match entry.level {
            1 => r"\d+",
            2 => r"\d+\.\d+",
            3 => r"\d+\.\d+\.\d+",
            _ => return None,
        };
        let text = entry.text.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s\n?");
        Some(format!(r"(?m)^{counter}\s{{2}}{text}[^\S\n]*$"))
    }
}
impl PageLocator for RegexPageLocator {
    fn pages<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match &self.footer {
            Some(footer) => footer.split(text).collect(),
            None => vec![text],
        }
    }

    fn locate(&self, pages: &[&str], entry: &TocEntry, from: usize) -> Option<usize> {
        let pattern = Self::heading_pattern(entry)?;
        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(err) => {
                tracing::warn!(heading = %entry.text, error = %err, "Heading pattern does not compile");
                return None;
            },
        };
        pages.iter().enumerate().skip(from).find(|(_, page)| regex.is_match(page)).map(|(index, _)| index)
    }
}

/// Outcome of reconciling one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub html: String,
    /// Page found for each numbered entry, in document order.
    pub pages: Vec<Option<usize>>,
}
impl Reconciliation {
    pub fn resolved(&self) -> usize {
        self.pages.iter().flatten().count()
    }

    pub fn unresolved(&self) -> usize {
        self.pages.len() - self.resolved()
    }
}

/// Resolves the placeholders in `html` against the extracted `text`.
///
/// The n-th placeholder belongs to the n-th numbered entry of `toc`, the
/// order the contents list is printed in. Without a `toc` the HTML is
/// returned untouched.
pub fn reconcile(locator: &dyn PageLocator, html: &str, toc: Option<&[TocEntry]>, text: &str) -> Reconciliation {
    let Some(toc) = toc else {
        return Reconciliation { html: html.to_string(), pages: Vec::new() };
    };
    let pages = locator.pages(text);
    tracing::debug!(pages = pages.len(), entries = toc.len(), "Reconciling page numbers");

    let mut cursor = 0;
    let mut found = Vec::new();
    for entry in toc.iter().filter(|entry| entry.is_numbered()) {
        let page = locator.locate(&pages, entry, cursor);
        match page {
            Some(page) => cursor = page,
            None => tracing::warn!(heading = %entry.text, level = entry.level, "Heading not found; page number left unresolved"),
        }
        found.push(page);
    }

    let mut segments = html.split(PLACEHOLDER);
    let mut patched = String::with_capacity(html.len());
    patched.push_str(segments.next().unwrap_or_default());
    for (index, segment) in segments.enumerate() {
        match found.get(index).copied().flatten() {
            Some(page) => patched.push_str(&page_number(page)),
            None => patched.push_str(PLACEHOLDER),
        }
        patched.push_str(segment);
    }
    Reconciliation { html: patched, pages: found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::contents_markup;
    use rstest::rstest;

    const FOOTER: &str = "Printed from https://docs.test";

    fn locator() -> RegexPageLocator {
        RegexPageLocator::new(Some(Regex::new(r"Printed from \S*").unwrap()))
    }

    fn text(pages: &[&[&str]]) -> String {
        pages.iter().map(|lines| format!("{}\n{FOOTER}\n", lines.join("\n"))).collect()
    }

    fn html(toc: &[TocEntry]) -> String {
        format!("<section>{}</section><main>body</main>", contents_markup(toc))
    }

    #[test]
    fn resolves_each_entry_to_its_page() {
        let toc = vec![TocEntry::new(1, "Intro"), TocEntry::new(2, "Setup"), TocEntry::new(1, "Usage")];
        let text = text(&[&["Contents"], &["1  Intro", "1.1  Setup"], &["2  Usage"]]);
        let result = reconcile(&locator(), &html(&toc), Some(&toc[..]), &text);
        assert_eq!(result.pages, vec![Some(1), Some(1), Some(2)]);
        assert!(!result.html.contains(PLACEHOLDER));
        let first = result.html.find(&page_number(1)).unwrap();
        let last = result.html.find(&page_number(2)).unwrap();
        assert!(first < last);
    }

    #[test]
    fn heading_with_metacharacters_matches_literally() {
        let toc = vec![TocEntry::new(1, "C++ API (v2)")];
        let text = text(&[&["Contents"], &["1  C++ API (v2)"]]);
        let result = reconcile(&locator(), &html(&toc), Some(&toc[..]), &text);
        assert_eq!(result.pages, vec![Some(1)]);

        let lookalike = text.replace("C++ API (v2)", "CCC API v2");
        assert_eq!(reconcile(&locator(), &html(&toc), Some(&toc[..]), &lookalike).pages, vec![None]);
    }

    #[test]
    fn wrapped_heading_matches() {
        let toc = vec![TocEntry::new(2, "Configuring the build server")];
        let text = text(&[&["1.1  Configuring the build", "server"]]);
        assert_eq!(reconcile(&locator(), &html(&toc), Some(&toc[..]), &text).pages, vec![Some(0)]);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Regex::new("never printed").unwrap()))]
    fn without_footer_everything_is_page_zero(#[case] footer: Option<Regex>) {
        let locator = RegexPageLocator::new(footer);
        let text = "1  Intro\nfooter\n2  Usage\nfooter\n";
        assert_eq!(locator.pages(text), vec![text]);
        let toc = vec![TocEntry::new(1, "Intro"), TocEntry::new(1, "Missing")];
        let result = reconcile(&locator, &html(&toc), Some(&toc[..]), text);
        assert_eq!(result.pages, vec![Some(0), None]);
    }

    #[test]
    fn cursor_never_moves_backwards() {
        // "Intro" also appears on page 1, but after "Usage" was found on page 2.
        let toc = vec![TocEntry::new(1, "Usage"), TocEntry::new(1, "Intro"), TocEntry::new(1, "Appendix")];
        let text = text(&[&["Contents"], &["1  Intro"], &["2  Usage"], &["3  Intro"], &["4  Appendix"]]);
        let result = reconcile(&locator(), &html(&toc), Some(&toc[..]), &text);
        assert_eq!(result.pages, vec![Some(2), Some(3), Some(4)]);
        let resolved: Vec<usize> = result.pages.iter().flatten().copied().collect();
        assert!(resolved.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn unmatched_entry_keeps_its_own_placeholder() {
        let toc = vec![TocEntry::new(1, "Intro"), TocEntry::new(1, "Ghost"), TocEntry::new(1, "Usage")];
        let text = text(&[&["Contents"], &["1  Intro"], &["2  Usage"]]);
        let result = reconcile(&locator(), &html(&toc), Some(&toc[..]), &text);
        assert_eq!(result.pages, vec![Some(1), None, Some(2)]);
        assert_eq!((result.resolved(), result.unresolved()), (2, 1));
        let ghost = result.html.find("Ghost").unwrap();
        let placeholder = result.html.find(PLACEHOLDER).unwrap();
        let usage = result.html.find("Usage").unwrap();
        assert!(ghost < placeholder && placeholder < usage);
    }

    #[test]
    fn deep_entries_are_not_looked_up() {
        let toc = vec![TocEntry::new(4, "Detail"), TocEntry::new(1, "Intro")];
        let text = text(&[&["Detail", "1  Intro"]]);
        let result = reconcile(&locator(), &html(&toc), Some(&toc[..]), &text);
        assert_eq!(result.pages, vec![Some(0)]);
        assert!(RegexPageLocator::heading_pattern(&toc[0]).is_none());
    }

    #[test]
    fn missing_toc_is_a_no_op() {
        let html = "<main><p>No outline</p></main>";
        let result = reconcile(&locator(), html, None, "anything");
        assert_eq!(result.html, html);
        assert!(result.pages.is_empty());
    }
}
