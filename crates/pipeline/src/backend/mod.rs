//! Seams between the scheduler and the tools it drives.
//!
//! The scheduler only talks to a [`PdfRenderer`], a [`TextExtractor`] and a
//! [`PdfMerger`]; production runs use headless Chrome and `lopdf`, tests use
//! the in-memory fakes from the `mock` feature.

mod chrome;
mod lopdf;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::lopdf::Lopdf;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::{MockRenderer, RenderCall};
use crate::error::Result;
use async_trait::async_trait;
use docprint_render::{CssVariables, Layout};
use std::path::{Path, PathBuf};

/// Prints HTML documents to PDF, one at a time.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, layout: Layout, html: &str, variables: CssVariables, output: &Path) -> Result<()>;
}

/// Reads the plain text of a PDF, pages in order.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: &Path) -> Result<String>;
}

/// Concatenates PDFs page by page.
#[async_trait]
pub trait PdfMerger: Send + Sync {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

/// The tools one run is wired with.
pub struct Backends {
    pub renderer: Box<dyn PdfRenderer>,
    pub extractor: Box<dyn TextExtractor>,
    pub merger: Box<dyn PdfMerger>,
}
impl Backends {
    /// Chrome for rendering, `lopdf` for extraction and merging.
    pub fn chrome(renderer: docprint_render::Renderer) -> Self {
        Self { renderer: Box::new(renderer), extractor: Box::new(Lopdf), merger: Box::new(Lopdf) }
    }
}
