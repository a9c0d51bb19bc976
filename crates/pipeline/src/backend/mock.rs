//! Chrome stand-in for testing.

use super::PdfRenderer;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use docprint_guide::toc::extract_toc;
use docprint_pdf::fixtures::text_pdf;
use docprint_render::{CssVariables, Layout};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A render request seen by [`MockRenderer`].
#[derive(Clone, Debug)]
pub struct RenderCall {
    pub layout: Layout,
    pub html: String,
    pub output: PathBuf,
}

/// Writes text-only PDFs laid out like the print stylesheet lays out pages.
///
/// Anything before the first level 1 heading (the contents list) is page 0,
/// every level 1 heading starts a new page, numbered headings carry their
/// counter followed by two spaces and every page ends with `footer`.
pub struct MockRenderer {
    footer: String,
    fail_on: Option<String>,
    calls: Mutex<Vec<RenderCall>>,
}
impl MockRenderer {
    pub fn new(footer: impl Into<String>) -> Self {
        Self { footer: footer.into(), fail_on: None, calls: Mutex::new(Vec::new()) }
    }

    /// Fails every render whose output path contains `fragment`.
    pub fn failing_on(mut self, fragment: impl Into<String>) -> Self {
        self.fail_on = Some(fragment.into());
        self
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn pages(&self, layout: Layout, html: &str) -> Vec<Vec<String>> {
        if layout == Layout::Cover {
            return vec![vec!["Cover".to_string()]];
        }
        let mut pages = vec![Vec::new()];
        let mut counters = [0usize; 3];
        for entry in extract_toc(html) {
            let line = match entry.level {
                1 => {
                    counters = [counters[0] + 1, 0, 0];
                    pages.push(Vec::new());
                    format!("{}  {}", counters[0], entry.text)
                },
                2 => {
                    counters[1] += 1;
                    counters[2] = 0;
                    format!("{}.{}  {}", counters[0], counters[1], entry.text)
                },
                3 => {
                    counters[2] += 1;
                    format!("{}.{}.{}  {}", counters[0], counters[1], counters[2], entry.text)
                },
                _ => entry.text,
            };
            if let Some(page) = pages.last_mut() {
                page.push(line);
            }
        }
        for page in &mut pages {
            page.push(self.footer.clone());
        }
        pages
    }
}

#[async_trait]
impl PdfRenderer for MockRenderer {
    async fn render(&self, layout: Layout, html: &str, _variables: CssVariables, output: &Path) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RenderCall { layout, html: html.to_string(), output: output.to_path_buf() });
        }
        if let Some(fragment) = &self.fail_on
            && output.to_string_lossy().contains(fragment.as_str())
        {
            exn::bail!(ErrorKind::Render(output.to_path_buf()));
        }
        let pages = self.pages(layout, html);
        let pages: Vec<Vec<&str>> = pages.iter().map(|lines| lines.iter().map(String::as_str).collect()).collect();
        let pages: Vec<&[&str]> = pages.iter().map(Vec::as_slice).collect();
        tokio::fs::write(output, text_pdf(&pages)).await.or_raise(|| ErrorKind::Io(output.to_path_buf()))
    }
}

#[async_trait]
impl PdfRenderer for std::sync::Arc<MockRenderer> {
    async fn render(&self, layout: Layout, html: &str, variables: CssVariables, output: &Path) -> Result<()> {
        self.as_ref().render(layout, html, variables, output).await
    }
}
