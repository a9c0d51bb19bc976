//! `docprint plan` lists the jobs a build would run.

use super::prepare;
use crate::error::Result;
use docprint_config::Config;

pub(crate) fn plan(config: &Config) -> Result<()> {
    let prepared = prepare(config)?;
    println!("{} jobs, current version {}", prepared.jobs.len(), prepared.versions.current());
    // Processing order is the reverse of planning order.
    for (index, job) in prepared.jobs.iter().rev().enumerate() {
        let entries = job.toc.as_ref().map_or(0, Vec::len);
        println!("{:>4}. [{}] {} -> {} ({entries} headings)", index + 1, job.version, job.title, job.target.display());
    }
    Ok(())
}
