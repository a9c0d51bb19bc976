//! Guide grouping.
//!
//! A guide is a named, ordered list of documents printed as one unit. Guides
//! are flattened out of the sidebar tree: every group with at least one
//! direct document becomes a guide holding all documents of its subtree, in
//! sidebar order. Groups without direct documents are only containers.
//!
//! Entries start out as document ids and are swapped for rendered content as
//! documents are prepared, so assembling a guide is a plain concatenation.

use crate::sidebar::{Sidebar, SidebarNode};
use std::collections::{BTreeMap, HashMap};

/// Returns `true` when any non-empty ignore pattern occurs within `id`.
pub fn is_ignored(id: &str, ignore: &[String]) -> bool {
    ignore.iter().any(|pattern| !pattern.is_empty() && id.contains(pattern.as_str()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuideEntry {
    /// A document id whose content is not available yet.
    Pending(String),
    Content(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guide {
    pub name: String,
    pub entries: Vec<GuideEntry>,
}
impl Guide {
    /// Ids still waiting for content.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            GuideEntry::Pending(id) => Some(id.as_str()),
            GuideEntry::Content(_) => None,
        })
    }

    /// Joins all substituted content without separators.
    ///
    /// Ids that never received content (documents absent from the catalog)
    /// are left out with a warning.
    pub fn concatenate(&self) -> String {
        let mut html = String::new();
        for entry in &self.entries {
            match entry {
                GuideEntry::Content(content) => html.push_str(content),
                GuideEntry::Pending(id) => {
                    tracing::warn!(guide = %self.name, id = %id, "Document listed in sidebar was never rendered");
                },
            }
        }
        html
    }
}

/// `version → guides`, each version's guides in sidebar order.
#[derive(Clone, Debug, Default)]
pub struct GuideGroup {
    versions: BTreeMap<String, Vec<Guide>>,
}
impl GuideGroup {
    pub fn from_sidebars(sidebars: &HashMap<String, Sidebar>, ignore: &[String]) -> Self {
        let mut group = Self::default();
        for (version, sidebar) in sidebars {
            group.insert_sidebar(version, sidebar, ignore);
        }
        group
    }

    pub fn insert_sidebar(&mut self, version: impl Into<String>, sidebar: &Sidebar, ignore: &[String]) {
        let guides = self.versions.entry(version.into()).or_default();
        for node in &sidebar.roots {
            collect_guides(node, ignore, guides);
        }
    }

    /// Replaces every pending occurrence of `id` within `version`'s guides
    /// with `content`, returning how many entries were replaced.
    pub fn substitute(&mut self, version: &str, id: &str, content: &str) -> usize {
        let Some(guides) = self.versions.get_mut(version) else {
            return 0;
        };
        let mut replaced = 0;
        for entry in guides.iter_mut().flat_map(|guide| guide.entries.iter_mut()) {
            if matches!(entry, GuideEntry::Pending(pending) if pending == id) {
                *entry = GuideEntry::Content(content.to_string());
                replaced += 1;
            }
        }
        replaced
    }

    pub fn guides(&self, version: &str) -> &[Guide] {
        self.versions.get(version).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn guide(&self, version: &str, name: &str) -> Option<&Guide> {
        self.guides(version).iter().find(|guide| guide.name == name)
    }
}

fn collect_guides(node: &SidebarNode, ignore: &[String], guides: &mut Vec<Guide>) {
    let SidebarNode::Group { name, children } = node else {
        return;
    };
    if !children.iter().any(|child| matches!(child, SidebarNode::DocumentRef(_))) {
        for child in children {
            collect_guides(child, ignore, guides);
        }
        return;
    }
    let mut entries = Vec::new();
    let mut stack: Vec<&SidebarNode> = children.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            SidebarNode::DocumentRef(id) if is_ignored(id, ignore) => (),
            SidebarNode::DocumentRef(id) => entries.push(GuideEntry::Pending(id.clone())),
            SidebarNode::Group { children, .. } => stack.extend(children.iter().rev()),
        }
    }
    // Groups sharing a name form one guide; their documents accumulate.
    match guides.iter_mut().find(|guide| &guide.name == name) {
        Some(existing) => existing.entries.extend(entries),
        None => guides.push(Guide { name: name.clone(), entries }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn group(json: &str, ignore: &[&str]) -> GuideGroup {
        let ignore: Vec<String> = ignore.iter().map(|s| s.to_string()).collect();
        let mut group = GuideGroup::default();
        group.insert_sidebar("1.0", &Sidebar::from_json(json).unwrap(), &ignore);
        group
    }

    #[test]
    fn ignore_list_filters_guide_entries() {
        let group = group(r#"{"Guides": {"G1": ["doc-a", "doc-b"]}}"#, &["doc-b"]);
        let guide = group.guide("1.0", "G1").unwrap();
        assert_eq!(guide.pending().collect::<Vec<_>>(), ["doc-a"]);
    }

    #[rstest]
    #[case("doc-b", true)]
    #[case("legacy-doc-b-old", true)]
    #[case("doc-a", false)]
    #[case("", false)]
    fn ignore_matches_substrings(#[case] id: &str, #[case] expected: bool) {
        assert_eq!(is_ignored(id, &["doc-b".to_string(), String::new()]), expected);
    }

    #[test]
    fn nested_subcategories_join_enclosing_guide() {
        let json = r#"{"docs": {"Ref": ["a", {"type": "subcategory", "label": "Sub", "ids": ["b", "c"]}, "d"]}}"#;
        let group = group(json, &[]);
        assert_eq!(group.guides("1.0").len(), 1);
        assert_eq!(group.guide("1.0", "Ref").unwrap().pending().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn containers_are_not_guides() {
        let group = group(r#"{"docs": {"First": ["a"], "Second": ["b"]}, "api": {"Third": ["c"]}}"#, &[]);
        let names: Vec<_> = group.guides("1.0").iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn substitution_preserves_order() {
        let mut group = group(r#"{"docs": {"G": ["a", "b", "c"], "H": ["b"]}}"#, &[]);
        assert_eq!(group.substitute("1.0", "b", "<p>B</p>"), 2);
        assert_eq!(group.substitute("1.0", "a", "<p>A</p>"), 1);
        assert_eq!(group.substitute("2.0", "a", "<p>A</p>"), 0);
        let guide = group.guide("1.0", "G").unwrap();
        assert_eq!(
            guide.entries,
            vec![
                GuideEntry::Content("<p>A</p>".into()),
                GuideEntry::Content("<p>B</p>".into()),
                GuideEntry::Pending("c".into()),
            ]
        );
        assert_eq!(guide.concatenate(), "<p>A</p><p>B</p>");
    }

    #[test]
    fn duplicate_guide_names_share_one_guide() {
        let group = group(r#"{"docs": {"Setup": ["a", "b"]}, "api": {"Setup": ["c"], "Other": ["d"]}}"#, &[]);
        let names: Vec<_> = group.guides("1.0").iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Setup", "Other"]);
        assert_eq!(group.guide("1.0", "Setup").unwrap().pending().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn unknown_version_has_no_guides() {
        assert!(group(r#"{"docs": {"G": ["a"]}}"#, &[]).guides("9.9").is_empty());
    }
}
