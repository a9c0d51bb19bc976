use crate::error::{ErrorKind, Result};
use crate::{Renderer, StyleConfig, TempFile, style::CssVariables};
use exn::ResultExt;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

/// Which stylesheet set a document is printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Cover,
    Content,
}

impl Renderer {
    /// Prints `html` to a PDF at `save_to`, injecting the stylesheets of
    /// `layout` and the given CSS variables into its head.
    #[instrument(skip_all, fields(layout = ?layout, save_to = %save_to.as_ref().display()))]
    pub async fn render_to(
        &self,
        layout: Layout,
        html: &str,
        variables: impl Into<Option<CssVariables>>,
        save_to: impl AsRef<Path>,
    ) -> Result<()> {
        let styles = match layout {
            Layout::Cover => &self.cover_styles,
            Layout::Content => &self.content_styles,
        };
        let input = persist_html(html, styles, variables.into().as_ref()).await?;
        self.chrome.execute(input.path(), save_to.as_ref(), self.profile.path()).await
    }
}

async fn persist_html(html: &str, styles: &StyleConfig, variables: Option<&CssVariables>) -> Result<TempFile> {
    let tmp = tempfile::Builder::new().prefix("docprint-").suffix(".html").tempfile().or_raise(|| ErrorKind::Io)?;
    let document = splice_styles(html, styles, variables)?;
    tokio::fs::write(tmp.path(), document).await.or_raise(|| ErrorKind::Io)?;
    Ok(tmp)
}

/// Inserts the style blocks directly before the closing head tag.
fn splice_styles(html: &str, styles: &StyleConfig, variables: Option<&CssVariables>) -> Result<Vec<u8>> {
    const NEEDLE: &[u8] = b"</head";
    let bytes = html.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + 4096);
    match bytes.windows(NEEDLE.len()).position(|w| w.eq_ignore_ascii_case(NEEDLE)) {
        Some(pos) => {
            out.extend_from_slice(&bytes[..pos]);
            let blocks = inject_css(&mut out, styles, variables)?;
            out.extend_from_slice(&bytes[pos..]);
            tracing::debug!(position = pos, blocks = blocks, "Stylesheets injected into HTML");
        },
        None => {
            tracing::warn!("Stylesheets not injected; closing head tag not found");
            out.extend_from_slice(bytes);
        },
    }
    Ok(out)
}

fn inject_css(w: &mut impl Write, styles: &StyleConfig, variables: Option<&CssVariables>) -> Result<usize> {
    if let Some(vars) = variables {
        writeln!(w, "{}", vars).or_raise(|| ErrorKind::Io)?;
    }
    let blocks = styles.write_all_to(w).or_raise(|| ErrorKind::Io)?;
    Ok(if variables.is_some() { blocks.saturating_add(1) } else { blocks })
}
