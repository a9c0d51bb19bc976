pub mod error;
mod extract;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
mod merge;

pub use crate::extract::{extract_text, extract_text_from_bytes};
pub use crate::merge::{merge, merge_documents};
