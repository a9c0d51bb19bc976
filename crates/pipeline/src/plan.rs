//! Turning the catalog and its guides into render jobs.

use crate::error::{ErrorKind, Result};
use crate::job::RenderJob;
use crate::site::Site;
use docprint_guide::toc::extract_toc;
use docprint_guide::{Catalog, GuideGroup, LinkRewriter, TocEntry, VersionSet, is_ignored};
use docprint_render::escape_html;
use exn::ResultExt;
use rslug::slugify;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// Separator between guides in a version's complete documentation.
const GUIDE_SEPARATOR: &str = " \n ";

/// Where printed documents are written.
///
/// Everything lives under `<build_root>/<project slug>/docs`, each version in
/// its own subdirectory until the current version is consolidated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    docs_root: PathBuf,
}
impl OutputLayout {
    pub fn new(build_root: impl AsRef<Path>, project: &str) -> Self {
        Self { docs_root: build_root.as_ref().join(slugify!(project)).join("docs") }
    }

    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.docs_root.join(version)
    }

    /// Target of a single document, mirroring its permalink (without any
    /// `.html` extension) below the version directory.
    pub fn document_target(&self, permalink: &str, base_url: &str, version: &str) -> PathBuf {
        let mut path = permalink.trim();
        for prefix in [base_url, "/", "docs/"] {
            path = path.strip_prefix(prefix).unwrap_or(path);
        }
        path = match path.strip_prefix(version) {
            Some("") => "",
            Some(rest) if rest.starts_with('/') => &rest[1..],
            _ => path,
        };
        let path = path.trim_matches('/');
        let path = path.strip_suffix(".html").unwrap_or(path);
        let relative: PathBuf = Path::new(path)
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        let relative = if relative.as_os_str().is_empty() { PathBuf::from("index") } else { relative };
        let mut target = self.version_dir(version).join(relative).into_os_string();
        target.push(".pdf");
        PathBuf::from(target)
    }

    pub fn guide_target(&self, version: &str, guide: &str) -> PathBuf {
        self.version_dir(version).join(format!("{}.pdf", slugify!(guide)))
    }

    /// Target of a version's complete documentation.
    pub fn aggregate_target(&self, version: &str, project: &str) -> PathBuf {
        self.guide_target(version, project)
    }
}

/// Builds every render job of a run.
pub struct JobPlanner<'a> {
    pub site: &'a Site,
    pub links: &'a LinkRewriter,
    pub layout: &'a OutputLayout,
    pub base_url: &'a str,
    /// Id fragments of documents that are not printed at all.
    pub ignore: &'a [String],
}
impl JobPlanner<'_> {
    /// Plans one job per document, then per guide, then per version.
    ///
    /// Every document body opens with its title as a top-level heading, so
    /// each document is a numbered chapter of the guides it appears in.
    /// Guide entries are substituted with that body as documents are
    /// planned. Ignored documents and documents of versions outside
    /// `versions` are skipped.
    #[instrument(skip_all, fields(documents = catalog.len()))]
    pub fn plan(&self, catalog: &Catalog, guides: &mut GuideGroup, versions: &VersionSet) -> Result<Vec<RenderJob>> {
        let mut jobs = Vec::new();
        let mut languages: HashMap<&str, &str> = HashMap::new();
        for record in catalog.iter() {
            if is_ignored(&record.id, self.ignore) {
                tracing::debug!(id = %record.id, "Skipping ignored document");
                continue;
            }
            if !versions.contains(&record.version) {
                tracing::warn!(id = %record.id, version = %record.version, "Skipping document of unknown version");
                continue;
            }
            languages.entry(record.version.as_str()).or_insert(record.language.as_str());
            let content = self
                .links
                .rewrite(&record.body.to_html(), &record.version)
                .or_raise(|| ErrorKind::Prepare(record.id.clone()))?;
            let body = format!("<h1>{}</h1>\n{content}", escape_html(&record.title));
            let toc = outline(&body);
            let html = self.site.page(&record.title, &record.version, &record.language, toc.as_deref(), &body)?;
            jobs.push(RenderJob {
                target: self.layout.document_target(&record.permalink, self.base_url, &record.version),
                html,
                version: record.version.clone(),
                toc,
                title: record.title.clone(),
            });
            let substituted = guides.substitute(&record.version, &record.id, &body);
            tracing::trace!(id = %record.id, guides = substituted, "Planned document");
        }

        for version in versions.iter() {
            let language = languages.get(version).copied().unwrap_or("en");
            let mut complete = Vec::new();
            for guide in guides.guides(version) {
                let body = guide.concatenate();
                if body.trim().is_empty() {
                    tracing::warn!(guide = %guide.name, version, "Guide has no rendered documents; skipping");
                    continue;
                }
                let toc = outline(&body);
                let html = self.site.page(&guide.name, version, language, toc.as_deref(), &body)?;
                jobs.push(RenderJob {
                    target: self.layout.guide_target(version, &guide.name),
                    html,
                    version: version.to_string(),
                    toc,
                    title: guide.name.clone(),
                });
                complete.push(body);
            }
            if complete.is_empty() {
                continue;
            }
            let body = complete.join(GUIDE_SEPARATOR);
            let toc = outline(&body);
            let project = &self.site.project;
            let html = self.site.page(project, version, language, toc.as_deref(), &body)?;
            jobs.push(RenderJob {
                target: self.layout.aggregate_target(version, project),
                html,
                version: version.to_string(),
                toc,
                title: project.clone(),
            });
        }
        for target in duplicate_targets(&jobs) {
            tracing::warn!(output = %target.display(), "Several jobs print to the same file; the last one processed wins");
        }
        tracing::info!(jobs = jobs.len(), "Planned render jobs");
        Ok(jobs)
    }
}

/// Targets planned more than once, each reported once in planning order.
pub fn duplicate_targets(jobs: &[RenderJob]) -> Vec<&Path> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for job in jobs {
        let target = job.target.as_path();
        if !seen.insert(target) && !duplicates.contains(&target) {
            duplicates.push(target);
        }
    }
    duplicates
}

fn outline(html: &str) -> Option<Vec<TocEntry>> {
    let toc = extract_toc(html);
    (!toc.is_empty()).then_some(toc)
}
