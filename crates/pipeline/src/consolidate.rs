//! Publishing the current version at the root of the output tree.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Moves the current version's output up into the docs root.
#[derive(Clone, Debug)]
pub struct Consolidator {
    docs_root: PathBuf,
    current: String,
}

/// What a consolidation moved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Consolidation {
    pub moved: Vec<PathBuf>,
}

impl Consolidator {
    pub fn new(docs_root: impl Into<PathBuf>, current: impl Into<String>) -> Self {
        Self { docs_root: docs_root.into(), current: current.into() }
    }

    pub fn source(&self) -> PathBuf {
        self.docs_root.join(&self.current)
    }

    /// Moves every file under `<docs_root>/<current>` to the same relative
    /// path under `<docs_root>`, then removes the emptied directory.
    ///
    /// Returns `None` when the current version produced no output.
    #[instrument(skip_all, fields(current = %self.current))]
    pub async fn consolidate(&self) -> Result<Option<Consolidation>> {
        let source = self.source();
        if !fs::try_exists(&source).await.or_raise(|| ErrorKind::Io(source.clone()))? {
            tracing::debug!(path = %source.display(), "Nothing to consolidate");
            return Ok(None);
        }
        let mut moved = Vec::new();
        let mut stack = vec![source.clone()];
        while let Some(current) = stack.pop() {
            let mut entries = fs::read_dir(&current).await.or_raise(|| ErrorKind::Io(current.clone()))?;
            while let Some(entry) = entries.next_entry().await.or_raise(|| ErrorKind::Io(current.clone()))? {
                let path = entry.path();
                let file_type = entry.file_type().await.or_raise(|| ErrorKind::Io(path.clone()))?;
                if file_type.is_dir() {
                    stack.push(path);
                    continue;
                }
                let destination = self.destination(&source, &path);
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
                }
                fs::rename(&path, &destination).await.or_raise(|| ErrorKind::Io(destination.clone()))?;
                tracing::trace!(from = %path.display(), to = %destination.display(), "Moved");
                moved.push(destination);
            }
        }
        fs::remove_dir_all(&source).await.or_raise(|| ErrorKind::Io(source.clone()))?;
        tracing::info!(files = moved.len(), "Current version published at the docs root");
        Ok(Some(Consolidation { moved }))
    }

    fn destination(&self, source: &Path, file: &Path) -> PathBuf {
        match file.strip_prefix(source) {
            Ok(relative) => self.docs_root.join(relative),
            Err(_) => self.docs_root.join(file.file_name().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flattens_current_version() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(docs.join("2.0/guides")).unwrap();
        std::fs::create_dir_all(docs.join("1.0")).unwrap();
        std::fs::write(docs.join("2.0/acme.pdf"), b"a").unwrap();
        std::fs::write(docs.join("2.0/guides/install.pdf"), b"b").unwrap();
        std::fs::write(docs.join("1.0/acme.pdf"), b"c").unwrap();

        let result = Consolidator::new(&docs, "2.0").consolidate().await.unwrap().unwrap();
        assert_eq!(result.moved.len(), 2);
        assert!(docs.join("acme.pdf").is_file());
        assert!(docs.join("guides/install.pdf").is_file());
        assert!(!docs.join("2.0").exists());
        assert_eq!(std::fs::read(docs.join("1.0/acme.pdf")).unwrap(), b"c");
    }

    #[tokio::test]
    async fn missing_current_version_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Consolidator::new(dir.path(), "2.0").consolidate().await.unwrap(), None);
    }
}
