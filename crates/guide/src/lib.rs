//! Inputs of the print pipeline: the document catalog, sidebar-declared
//! guides, link rewriting and the table of contents.

mod catalog;
pub mod error;
mod guides;
mod links;
mod sidebar;
pub mod toc;
mod version;

pub use crate::catalog::{Catalog, DocumentBody, DocumentRecord};
pub use crate::guides::{Guide, GuideEntry, GuideGroup, is_ignored};
pub use crate::links::LinkRewriter;
pub use crate::sidebar::{Sidebar, SidebarNode, load_sidebars};
pub use crate::toc::TocEntry;
pub use crate::version::VersionSet;
