use docprint_guide::TocEntry;
use std::path::{Path, PathBuf};

/// One unit of rendering work, producing exactly one merged PDF at `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderJob {
    pub target: PathBuf,
    /// Complete HTML document, contents list included.
    pub html: String,
    pub version: String,
    /// `None` when the document has no outline; reconciliation is skipped.
    pub toc: Option<Vec<TocEntry>>,
    pub title: String,
}
impl RenderJob {
    pub fn artifacts(&self) -> Artifacts {
        Artifacts::for_target(&self.target)
    }
}

/// Transient files written while processing a job, next to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    pub cover: PathBuf,
    pub raw: PathBuf,
    pub content: PathBuf,
}
impl Artifacts {
    pub fn for_target(target: &Path) -> Self {
        Self {
            cover: target.with_extension("title.pdf"),
            raw: target.with_extension("content.raw.pdf"),
            content: target.with_extension("content.pdf"),
        }
    }

    pub fn paths(&self) -> [&Path; 3] {
        [self.cover.as_path(), self.raw.as_path(), self.content.as_path()]
    }

    /// Removes whichever of the transient files exist.
    pub async fn remove(&self) {
        for path in self.paths() {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::trace!(path = %path.display(), "Removed transient file"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
                Err(err) => tracing::warn!(path = %path.display(), error = %err, "Could not remove transient file"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_sit_next_to_target() {
        let artifacts = Artifacts::for_target(Path::new("out/docs/1.0/getting-started.pdf"));
        assert_eq!(artifacts.cover, Path::new("out/docs/1.0/getting-started.title.pdf"));
        assert_eq!(artifacts.raw, Path::new("out/docs/1.0/getting-started.content.raw.pdf"));
        assert_eq!(artifacts.content, Path::new("out/docs/1.0/getting-started.content.pdf"));
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = Artifacts::for_target(&dir.path().join("x.pdf"));
        std::fs::write(&artifacts.raw, b"raw").unwrap();
        artifacts.remove().await;
        assert!(!artifacts.raw.exists());
    }
}
