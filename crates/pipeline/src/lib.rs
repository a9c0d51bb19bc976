//! The print pipeline: planning render jobs, processing them one at a time
//! through a shared browser, reconciling page numbers and publishing the
//! current version.

pub mod backend;
mod consolidate;
pub mod error;
mod job;
mod plan;
pub mod reconcile;
mod scheduler;
mod site;

pub use crate::backend::Backends;
pub use crate::consolidate::{Consolidation, Consolidator};
pub use crate::job::{Artifacts, RenderJob};
pub use crate::plan::{JobPlanner, OutputLayout};
pub use crate::reconcile::{PageLocator, Reconciliation, RegexPageLocator, reconcile};
pub use crate::scheduler::{FailurePolicy, JobFailure, JobReport, RenderScheduler, RunReport, State};
pub use crate::site::{Site, contents_markup};
