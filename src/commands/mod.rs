//! Subcommands, sharing the preparation of a run.

mod build;
mod plan;

pub(crate) use self::build::BuildArgs;
use crate::error::{ErrorKind, Result};
use docprint_config::Config;
use docprint_guide::{Catalog, GuideGroup, LinkRewriter, VersionSet, load_sidebars};
use docprint_pipeline::{JobPlanner, OutputLayout, RenderJob, Site};
use docprint_render::Templates;
use exn::ResultExt;

/// Everything a run needs before the first render.
pub(crate) struct Prepared {
    pub site: Site,
    pub layout: OutputLayout,
    pub versions: VersionSet,
    pub jobs: Vec<RenderJob>,
}

/// Loads the catalog and sidebars named by `config` and plans every job.
pub(crate) fn prepare(config: &Config) -> Result<Prepared> {
    let versions =
        VersionSet::new(config.versions.clone(), config.current_version.clone()).or_raise(|| ErrorKind::Config)?;
    let catalog = Catalog::load(&config.catalog).or_raise(|| ErrorKind::Input)?;
    let sidebars = load_sidebars(&config.sidebars, config.versioned_sidebars.as_deref(), &versions)
        .or_raise(|| ErrorKind::Input)?;
    let mut guides = GuideGroup::from_sidebars(&sidebars, &config.ignore_docs);

    let templates = Templates::with_overrides(config.templates.cover.as_deref(), config.templates.page.as_deref())
        .or_raise(|| ErrorKind::Input)?;
    let site = Site::new(&config.project_name, &config.site_url, templates);
    let links = LinkRewriter::new(&config.site_url, &config.base_url, versions.clone());
    let layout = OutputLayout::new(&config.build_root, &config.project_name);
    let planner = JobPlanner {
        site: &site,
        links: &links,
        layout: &layout,
        base_url: &config.base_url,
        ignore: &config.ignore_docs,
    };
    let jobs = planner.plan(&catalog, &mut guides, &versions).or_raise(|| ErrorKind::Plan)?;
    Ok(Prepared { site, layout, versions, jobs })
}

pub(crate) use self::build::build;
pub(crate) use self::plan::plan;
