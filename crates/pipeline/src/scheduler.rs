//! The render queue.
//!
//! Jobs are pushed onto a stack and processed strictly one at a time through
//! the shared browser session, most recently queued first. Once the stack is
//! empty the current version's output is consolidated and the scheduler
//! stops accepting work.

use crate::backend::Backends;
use crate::consolidate::{Consolidation, Consolidator};
use crate::error::{Error, ErrorKind, Result};
use crate::job::{Artifacts, RenderJob};
use crate::reconcile::{PageLocator, reconcile};
use crate::site::Site;
use docprint_render::Layout;
use exn::ResultExt;
use std::path::PathBuf;
use tracing::instrument;

/// What happens to the rest of the run once a job fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and leave the output unconsolidated.
    #[default]
    Abort,
    /// Process every job and consolidate regardless.
    Continue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Accepting jobs; nothing is being processed.
    Idle,
    Draining,
    /// The queue ran dry (or was abandoned); no further jobs are accepted.
    Finalizing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobReport {
    pub target: PathBuf,
    pub title: String,
    pub version: String,
    /// Contents entries whose page number was found.
    pub resolved: usize,
    /// Contents entries printed without a page number.
    pub unresolved: usize,
}

#[derive(Debug)]
pub struct JobFailure {
    pub target: PathBuf,
    pub error: Error,
}

/// Outcome of a drained queue.
#[derive(Debug, Default)]
pub struct RunReport {
    /// In processing order.
    pub completed: Vec<JobReport>,
    pub failed: Vec<JobFailure>,
    /// Jobs dropped unprocessed after an aborting failure.
    pub skipped: usize,
    pub aborted: bool,
    /// `None` when the run aborted or the current version produced nothing.
    pub consolidation: Option<Consolidation>,
}
impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.aborted
    }

    pub fn unresolved(&self) -> usize {
        self.completed.iter().map(|job| job.unresolved).sum()
    }
}

pub struct RenderScheduler {
    queue: Vec<RenderJob>,
    state: State,
    policy: FailurePolicy,
    site: Site,
    backends: Backends,
    locator: Box<dyn PageLocator>,
    consolidator: Consolidator,
}
impl RenderScheduler {
    pub fn new(site: Site, backends: Backends, locator: Box<dyn PageLocator>, consolidator: Consolidator) -> Self {
        Self {
            queue: Vec::new(),
            state: State::Idle,
            policy: FailurePolicy::default(),
            site,
            backends,
            locator,
            consolidator,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queues a job; it will be processed before every job queued earlier.
    pub fn enqueue(&mut self, job: RenderJob) -> Result<()> {
        if self.state == State::Finalizing {
            exn::bail!(ErrorKind::Closed);
        }
        tracing::trace!(output = %job.target.display(), queued = self.queue.len() + 1, "Job queued");
        self.queue.push(job);
        Ok(())
    }

    /// Processes queued jobs until none remain (or one fails under
    /// [`FailurePolicy::Abort`]), then consolidates the current version.
    #[instrument(skip_all, fields(jobs = self.queue.len(), policy = ?self.policy))]
    pub async fn drain(&mut self) -> Result<RunReport> {
        if self.state != State::Idle {
            exn::bail!(ErrorKind::Closed);
        }
        self.state = State::Draining;
        let mut report = RunReport::default();
        while let Some(job) = self.queue.pop() {
            tracing::info!(output = %job.target.display(), remaining = self.queue.len(), "Processing job");
            match self.process(&job).await {
                Ok(job_report) => report.completed.push(job_report),
                Err(error) => {
                    tracing::error!(output = %job.target.display(), error = ?error, "Job failed");
                    report.failed.push(JobFailure { target: job.target, error });
                    if self.policy == FailurePolicy::Abort {
                        report.aborted = true;
                        report.skipped = self.queue.len();
                        self.queue.clear();
                        break;
                    }
                },
            }
        }
        self.state = State::Finalizing;
        if report.aborted {
            tracing::warn!(skipped = report.skipped, "Run aborted; output left unconsolidated");
            return Ok(report);
        }
        report.consolidation = self.consolidator.consolidate().await.or_raise(|| ErrorKind::Consolidate)?;
        Ok(report)
    }

    /// Runs the five steps of one job; transient files are removed whether or
    /// not they succeed.
    #[instrument(skip_all, fields(output = %job.target.display()))]
    pub async fn process(&self, job: &RenderJob) -> Result<JobReport> {
        let artifacts = job.artifacts();
        let result = self.run_steps(job, &artifacts).await;
        artifacts.remove().await;
        result
    }

    async fn run_steps(&self, job: &RenderJob, artifacts: &Artifacts) -> Result<JobReport> {
        if let Some(parent) = job.target.parent() {
            tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
        }
        let renderer = &self.backends.renderer;
        let variables = self.site.variables(&job.title, &job.version);

        let cover = self.site.cover(&job.title, &job.version)?;
        renderer.render(Layout::Cover, &cover, variables.clone(), &artifacts.cover).await?;

        renderer.render(Layout::Content, &job.html, variables.clone(), &artifacts.raw).await?;
        let text = self.backends.extractor.extract(&artifacts.raw).await?;

        let reconciliation = reconcile(self.locator.as_ref(), &job.html, job.toc.as_deref(), &text);
        let (resolved, unresolved) = (reconciliation.resolved(), reconciliation.unresolved());
        if unresolved > 0 {
            tracing::warn!(unresolved, resolved, "Contents entries printed without page numbers");
        }

        renderer.render(Layout::Content, &reconciliation.html, variables, &artifacts.content).await?;
        self.backends.merger.merge(&[artifacts.cover.clone(), artifacts.content.clone()], &job.target).await?;
        tracing::debug!(resolved, "Job complete");
        Ok(JobReport {
            target: job.target.clone(),
            title: job.title.clone(),
            version: job.version.clone(),
            resolved,
            unresolved,
        })
    }
}
