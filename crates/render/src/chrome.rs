use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use tokio::process::Command;
use tracing::instrument;

/// Represents a Chrome/Chromium executable.
#[derive(Debug, Clone)]
pub(crate) enum Chrome {
    /// A directly executable binary.
    Binary { path: PathBuf },
    /// A Flatpak-installed application.
    Flatpak { flatpak: PathBuf, app_id: String },
}
impl Chrome {
    pub(crate) fn discover() -> Result<Self> {
        // TODO: What are the executable names on Windows? macOS?
        let executables = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];
        for exe in executables {
            if let Ok(path) = which::which(exe) {
                tracing::debug!(path = %path.display(), "Discovered Chrome executable");
                return Ok(Self::Binary { path });
            }
        }
        tracing::info!("Chrome executable not found in PATH");
        if let Ok(flatpak) = which::which("flatpak") {
            tracing::trace!(flatpak = %flatpak.display(), "Discovered Flatpak on system; searching installed apps");
            let flatpak_apps = ["com.google.Chrome", "org.chromium.Chromium"];
            for app_id in flatpak_apps {
                if StdCommand::new(&flatpak).args(["info", app_id]).output().is_ok_and(|o| o.status.success()) {
                    return Ok(Self::Flatpak { flatpak, app_id: app_id.to_string() });
                }
            }
        } else {
            tracing::info!("Flatpak not found; skipping containerized Chrome checks.");
        }
        exn::bail!(ErrorKind::ChromeNotFound);
    }

    /// Uses the executable at `path` instead of searching for one.
    pub(crate) fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let resolved = which::which(&path).ok().or_else(|| path.is_file().then(|| path.clone()));
        match resolved {
            Some(path) => Ok(Self::Binary { path }),
            None => exn::bail!(ErrorKind::ExecutableNotFound(path)),
        }
    }

    fn command(&self) -> Command {
        match self {
            Self::Binary { path } => Command::new(path),
            Self::Flatpak { flatpak, app_id } => {
                let mut command = Command::new(flatpak);
                command.args(["run", app_id]);
                command
            },
        }
    }

    /// Prints the HTML file at `input` to a PDF at `output`.
    ///
    /// Every invocation shares the browser profile at `profile`, so fonts and
    /// caches warmed by one render are reused by the next.
    #[instrument(level = "debug", skip_all, fields(input = %input.display(), output = %output.display()))]
    pub(crate) async fn execute(&self, input: &Path, output: &Path, profile: &Path) -> Result<()> {
        let mut command = self.command();
        command
            .args([
                "--headless",
                "--disable-gpu",
                "--no-sandbox",
                "--no-first-run",
                "--hide-scrollbars",
                "--no-pdf-header-footer",
                "--print-to-pdf-no-header",
            ])
            .arg(format!("--user-data-dir={}", profile.display()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let result = command.output().await.or_raise(|| ErrorKind::Io)?;
        match result.status.code() {
            Some(0) => {},
            Some(code) => {
                let stderr = String::from_utf8_lossy(&result.stderr);
                tracing::error!(code, stderr = %stderr.trim(), "Chrome failed to print PDF");
                exn::bail!(ErrorKind::ChromeFailed(code));
            },
            None => exn::bail!(ErrorKind::ChromeTerminated),
        }
        if !output.is_file() {
            exn::bail!(ErrorKind::NoOutput(output.to_path_buf()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_executable_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Chrome::at(dir.path().join("no-such-chrome")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::ExecutableNotFound(_)));
    }

    #[test]
    fn explicit_executable_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("chrome");
        std::fs::write(&fake, b"").unwrap();
        let Chrome::Binary { path } = Chrome::at(&fake).unwrap() else { panic!("expected a binary") };
        assert_eq!(path, fake);
    }
}
