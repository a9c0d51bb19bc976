use super::{PdfMerger, TextExtractor};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// Text extraction and merging backed by `lopdf`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lopdf;

#[async_trait]
impl TextExtractor for Lopdf {
    async fn extract(&self, pdf: &Path) -> Result<String> {
        docprint_pdf::extract_text(pdf).await.or_raise(|| ErrorKind::Extract(pdf.to_path_buf()))
    }
}

#[async_trait]
impl PdfMerger for Lopdf {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        docprint_pdf::merge(inputs, output).await.or_raise(|| ErrorKind::Merge(output.to_path_buf()))
    }
}
