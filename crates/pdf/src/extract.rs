use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lopdf::Document;
use std::path::Path;
use tracing::instrument;

/// Extracts the plain text of every page of the PDF at `path`, in page order.
///
/// Each page ends with a line break. Page boundaries are not marked
/// otherwise; callers split pages by whatever running footer the document
/// was rendered with.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path).await.or_raise(|| ErrorKind::Io(path.clone()))?;
    let text = tokio::task::spawn_blocking(move || extract_text_from_bytes(&bytes, &path))
        .await
        .or_raise(|| ErrorKind::Worker)??;
    tracing::debug!(chars = text.len(), "Extracted text from PDF");
    Ok(text)
}

pub fn extract_text_from_bytes(bytes: &[u8], origin: &Path) -> Result<String> {
    let document = Document::load_mem(bytes).or_raise(|| ErrorKind::InvalidPdf(origin.to_path_buf()))?;
    let mut text = String::new();
    for page in document.get_pages().into_keys() {
        let page_text = document.extract_text(&[page]).or_raise(|| ErrorKind::Extraction(page))?;
        text.push_str(&page_text);
        if !text.ends_with('\n') {
            text.push('\n');
        }
    }
    Ok(text)
}
