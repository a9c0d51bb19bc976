use crate::error::{ErrorKind, Result};

/// Product versions known to a run, with one designated as current.
///
/// The current version publishes at the root of the output tree; every other
/// version stays under a version-tagged subdirectory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionSet {
    versions: Vec<String>,
    current: String,
}
impl VersionSet {
    /// When `current` is omitted, the first listed version is current.
    pub fn new(versions: Vec<String>, current: Option<String>) -> Result<Self> {
        let current = match current {
            Some(current) => current,
            None => match versions.first() {
                Some(first) => first.clone(),
                None => exn::bail!(ErrorKind::UnknownVersion(String::new())),
            },
        };
        if !versions.contains(&current) {
            exn::bail!(ErrorKind::UnknownVersion(current));
        }
        Ok(Self { versions, current })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_current(&self, version: &str) -> bool {
        self.current == version
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_version() {
        let set = VersionSet::new(vec!["2.0".into(), "1.0".into()], None).unwrap();
        assert_eq!(set.current(), "2.0");
        assert!(set.is_current("2.0"));
        assert!(!set.is_current("1.0"));
    }

    #[test]
    fn rejects_unknown_current() {
        assert!(VersionSet::new(vec!["1.0".into()], Some("3.0".into())).is_err());
        assert!(VersionSet::new(vec![], None).is_err());
    }
}
