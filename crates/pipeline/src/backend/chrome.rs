use super::PdfRenderer;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use docprint_render::{CssVariables, Layout, Renderer};
use exn::ResultExt;
use std::path::Path;

#[async_trait]
impl PdfRenderer for Renderer {
    async fn render(&self, layout: Layout, html: &str, variables: CssVariables, output: &Path) -> Result<()> {
        self.render_to(layout, html, variables, output).await.or_raise(|| ErrorKind::Render(output.to_path_buf()))
    }
}
