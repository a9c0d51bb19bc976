//! Sidebar files.
//!
//! A sidebar file is a JSON object whose keys are group names. A value is
//! either another object (nested groups) or an ordered list of documents. A
//! list element is a document id, or a subcategory object whose ids belong to
//! the enclosing list:
//!
//! ```json
//! {
//!   "docs": {
//!     "Getting Started": ["intro", "install"],
//!     "Reference": ["api", {"type": "subcategory", "label": "CLI", "ids": ["cli-build"]}]
//!   }
//! }
//! ```
//!
//! Older versions may ship their own sidebar as
//! `<dir>/version-<version>-sidebars.json`; versions without one use the
//! default sidebar.

use crate::VersionSet;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::instrument;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarNode {
    Group { name: String, children: Vec<SidebarNode> },
    DocumentRef(String),
}
impl SidebarNode {
    fn group(name: impl Into<String>, value: &Value) -> Result<Self> {
        let name = name.into();
        let children = match value {
            Value::Object(map) => map.iter().map(|(key, value)| Self::group(key, value)).collect::<Result<_>>()?,
            Value::Array(items) => items.iter().map(Self::item).collect::<Result<_>>()?,
            _ => exn::bail!(ErrorKind::MalformedSidebar(format!("group `{name}` is neither an object nor a list"))),
        };
        Ok(Self::Group { name, children })
    }

    fn item(value: &Value) -> Result<Self> {
        match value {
            Value::String(id) => Ok(Self::DocumentRef(id.clone())),
            Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("subcategory") => {
                let label = map.get("label").and_then(Value::as_str).unwrap_or_default();
                let Some(Value::Array(ids)) = map.get("ids") else {
                    exn::bail!(ErrorKind::MalformedSidebar(format!("subcategory `{label}` has no id list")));
                };
                let children = ids.iter().map(Self::item).collect::<Result<_>>()?;
                Ok(Self::Group { name: label.to_string(), children })
            },
            other => exn::bail!(ErrorKind::MalformedSidebar(format!("unexpected sidebar entry: {other}"))),
        }
    }
}

/// The top-level groups of one sidebar file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sidebar {
    pub roots: Vec<SidebarNode>,
}
impl Sidebar {
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            exn::bail!(ErrorKind::MalformedSidebar("top level must be an object".to_string()));
        };
        let roots = map.iter().map(|(name, value)| SidebarNode::group(name, value)).collect::<Result<_>>()?;
        Ok(Self { roots })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).or_raise(|| ErrorKind::MalformedSidebar("invalid JSON".to_string()))?;
        Self::from_value(&value)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
        Self::from_json(&json)
    }
}

/// Loads one sidebar per version.
///
/// The default sidebar must be valid. A malformed versioned sidebar is logged
/// and its version is left out of the result, so that version produces no
/// guides.
#[instrument(skip_all, fields(default = %default.display()))]
pub fn load_sidebars(
    default: &Path,
    versioned_dir: Option<&Path>,
    versions: &VersionSet,
) -> Result<HashMap<String, Sidebar>> {
    let fallback = Sidebar::load(default)?;
    let mut sidebars = HashMap::new();
    for version in versions.iter() {
        let versioned = versioned_dir
            .map(|dir| dir.join(format!("version-{version}-sidebars.json")))
            .filter(|path| path.is_file());
        let Some(path) = versioned else {
            sidebars.insert(version.to_string(), fallback.clone());
            continue;
        };
        match Sidebar::load(&path) {
            Ok(sidebar) => {
                sidebars.insert(version.to_string(), sidebar);
            },
            Err(err) => {
                tracing::error!(version, path = %path.display(), error = ?err, "Skipping guides for version; sidebar is malformed");
            },
        }
    }
    Ok(sidebars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> SidebarNode {
        SidebarNode::DocumentRef(id.to_string())
    }

    #[test]
    fn parses_nested_groups_in_file_order() {
        let sidebar = Sidebar::from_json(r#"{"Guides": {"Zeta": ["z"], "Alpha": ["a", "b"]}}"#).unwrap();
        assert_eq!(
            sidebar.roots,
            vec![SidebarNode::Group {
                name: "Guides".into(),
                children: vec![
                    SidebarNode::Group { name: "Zeta".into(), children: vec![doc("z")] },
                    SidebarNode::Group { name: "Alpha".into(), children: vec![doc("a"), doc("b")] },
                ],
            }]
        );
    }

    #[test]
    fn parses_subcategories() {
        let json = r#"{"docs": {"Ref": ["api", {"type": "subcategory", "label": "CLI", "ids": ["build"]}]}}"#;
        let sidebar = Sidebar::from_json(json).unwrap();
        let SidebarNode::Group { children, .. } = &sidebar.roots[0] else { panic!("expected group") };
        let SidebarNode::Group { children, .. } = &children[0] else { panic!("expected group") };
        assert_eq!(children[0], doc("api"));
        assert_eq!(children[1], SidebarNode::Group { name: "CLI".into(), children: vec![doc("build")] });
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(Sidebar::from_json(r#"["not", "an", "object"]"#).is_err());
        assert!(Sidebar::from_json(r#"{"docs": 42}"#).is_err());
        assert!(Sidebar::from_json(r#"{"docs": [42]}"#).is_err());
    }

    #[test]
    fn malformed_versioned_sidebar_skips_version() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("sidebars.json");
        std::fs::write(&default, r#"{"docs": {"G": ["a"]}}"#).unwrap();
        std::fs::write(dir.path().join("version-1.0-sidebars.json"), "{ nope").unwrap();
        std::fs::write(dir.path().join("version-1.5-sidebars.json"), r#"{"docs": {"Old": ["x"]}}"#).unwrap();
        let versions = VersionSet::new(vec!["2.0".into(), "1.5".into(), "1.0".into()], None).unwrap();

        let sidebars = load_sidebars(&default, Some(dir.path()), &versions).unwrap();
        assert!(sidebars.contains_key("2.0"));
        assert!(!sidebars.contains_key("1.0"));
        let SidebarNode::Group { children, .. } = &sidebars["1.5"].roots[0] else { panic!("expected group") };
        assert!(matches!(&children[0], SidebarNode::Group { name, .. } if name == "Old"));
    }
}
