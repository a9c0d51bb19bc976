//! `docprint build` renders every planned job.

use super::prepare;
use crate::error::{ErrorKind, Result};
use clap::Args;
use docprint_config::Config;
use docprint_pipeline::{Backends, Consolidator, FailurePolicy, RegexPageLocator, RenderScheduler, RunReport};
use docprint_render::{Renderer, StyleConfig};
use exn::ResultExt;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct BuildArgs {
    /// Keep rendering the remaining jobs after one fails.
    #[arg(long)]
    pub continue_on_error: bool,
}

pub(crate) async fn build(config: &Config, args: &BuildArgs) -> Result<RunReport> {
    let prepared = prepare(config)?;
    let renderer = Renderer::new(
        config.chrome.clone(),
        with_files(StyleConfig::content(), &config.styles.content)?,
        with_files(StyleConfig::cover(), &config.styles.cover)?,
    )
    .or_raise(|| ErrorKind::Browser)?;
    let locator = RegexPageLocator::new(config.footer_regex().or_raise(|| ErrorKind::Config)?);
    let consolidator = Consolidator::new(prepared.layout.docs_root(), prepared.versions.current());
    let policy = if args.continue_on_error || config.continue_on_error {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let mut scheduler = RenderScheduler::new(prepared.site, Backends::chrome(renderer), Box::new(locator), consolidator)
        .with_policy(policy);
    for job in prepared.jobs {
        scheduler.enqueue(job).or_raise(|| ErrorKind::Run)?;
    }
    scheduler.drain().await.or_raise(|| ErrorKind::Run)
}

fn with_files(styles: docprint_render::error::Result<StyleConfig>, files: &[PathBuf]) -> Result<StyleConfig> {
    let mut styles = styles.or_raise(|| ErrorKind::Input)?;
    for file in files {
        styles = styles.with_file(file).or_raise(|| ErrorKind::Input)?;
    }
    Ok(styles)
}
