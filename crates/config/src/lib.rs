//! Layered configuration for a docprint run.
//!
//! Sources are merged with [figment], later sources overriding earlier ones:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. `config.toml` in the platform configuration directory,
//! 3. `docprint.toml` in the working directory, or the file passed explicitly,
//! 4. `DOCPRINT_`-prefixed environment variables, with `__` separating
//!    nested keys (`DOCPRINT_TEMPLATES__COVER=cover.html`).
//!
//! Version labels are taken verbatim from the environment:
//! `DOCPRINT_CURRENT_VERSION=1.0` and `DOCPRINT_VERSIONS=2.0,1.10`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_FILE: &str = "docprint.toml";
/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "DOCPRINT_";
/// Keys read as plain text rather than parsed by the environment provider.
const VERBATIM_ENV_KEYS: [&str; 2] = ["current_version", "versions"];
/// Footer pattern matching the running footer of the builtin page template.
pub const DEFAULT_FOOTER_PATTERN: &str = r"Printed from \S*";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shown on cover pages; its slug names the output directory and the
    /// per-version aggregate PDF.
    pub project_name: String,
    /// Public origin of the documentation site, e.g. `https://docs.example.com`.
    pub site_url: String,
    /// Path prefix the site is served under, e.g. `/docs/`.
    pub base_url: String,
    pub build_root: PathBuf,
    /// JSON array of document records.
    pub catalog: PathBuf,
    /// Default sidebar, used for every version without a versioned sidebar.
    pub sidebars: PathBuf,
    /// Directory holding `version-<v>-sidebars.json` files.
    pub versioned_sidebars: Option<PathBuf>,
    #[serde(deserialize_with = "version_list")]
    pub versions: Vec<String>,
    /// Defaults to the first entry of `versions`.
    #[serde(deserialize_with = "optional_version")]
    pub current_version: Option<String>,
    /// Document ids (or id fragments) excluded from printing: they get no
    /// PDF of their own and are left out of guides.
    pub ignore_docs: Vec<String>,
    /// Regular expression matching the running footer of printed pages.
    /// Without one every document is treated as a single page.
    pub footer_pattern: Option<String>,
    pub templates: TemplateOverrides,
    pub styles: StyleOverrides,
    /// Chrome/Chromium executable; discovered from `PATH` when unset.
    pub chrome: Option<PathBuf>,
    /// Keep processing remaining jobs after one fails.
    pub continue_on_error: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: "Documentation".to_string(),
            site_url: String::new(),
            base_url: "/".to_string(),
            build_root: PathBuf::from("build"),
            catalog: PathBuf::from("catalog.json"),
            sidebars: PathBuf::from("sidebars.json"),
            versioned_sidebars: Some(PathBuf::from("versioned_sidebars")),
            versions: Vec::new(),
            current_version: None,
            ignore_docs: Vec::new(),
            footer_pattern: Some(DEFAULT_FOOTER_PATTERN.to_string()),
            templates: TemplateOverrides::default(),
            styles: StyleOverrides::default(),
            chrome: None,
            continue_on_error: false,
        }
    }
}

/// Replacements for the builtin page templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOverrides {
    pub cover: Option<PathBuf>,
    pub page: Option<PathBuf>,
}

/// Stylesheets appended after the builtin ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub content: Vec<PathBuf>,
    pub cover: Vec<PathBuf>,
}

impl Config {
    /// Loads and validates the configuration, reading `path` instead of the
    /// default file locations when given.
    #[instrument(skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(file_provider(path)?);
            },
            None => {
                for candidate in default_locations() {
                    if candidate.is_file() {
                        tracing::debug!(path = %candidate.display(), "Merging configuration file");
                        figment = figment.merge(file_provider(&candidate)?);
                    }
                }
            },
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&VERBATIM_ENV_KEYS));
        if let Some(current) = Env::var(&format!("{ENV_PREFIX}CURRENT_VERSION")) {
            figment = figment.merge(Serialized::default("current_version", current));
        }
        if let Some(list) = Env::var(&format!("{ENV_PREFIX}VERSIONS")) {
            let versions: Vec<&str> = list.split(',').map(str::trim).filter(|v| !v.is_empty()).collect();
            figment = figment.merge(Serialized::default("versions", versions));
        }
        let config: Config = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants a run depends on.
    pub fn validate(&self) -> Result<()> {
        if self.versions.is_empty() {
            exn::bail!(ErrorKind::NoVersions);
        }
        if let Some(current) = &self.current_version
            && !self.versions.contains(current)
        {
            exn::bail!(ErrorKind::UnknownCurrentVersion(current.clone()));
        }
        if let Some(pattern) = &self.footer_pattern {
            Regex::new(pattern).or_raise(|| ErrorKind::FooterPattern(pattern.clone()))?;
        }
        Ok(())
    }

    /// The compiled footer pattern, if one is configured.
    pub fn footer_regex(&self) -> Result<Option<Regex>> {
        self.footer_pattern
            .as_deref()
            .map(|pattern| Regex::new(pattern).or_raise(|| ErrorKind::FooterPattern(pattern.to_string())))
            .transpose()
    }
}

/// A version label as written in a configuration file. Unquoted labels
/// (`versions = [2, 1.5]`) arrive as numbers; quote them to keep trailing
/// zeros.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionLabel {
    Text(String),
    Integer(i64),
    Float(f64),
}
impl From<VersionLabel> for String {
    fn from(label: VersionLabel) -> Self {
        match label {
            VersionLabel::Text(text) => text,
            VersionLabel::Integer(number) => number.to_string(),
            VersionLabel::Float(number) => number.to_string(),
        }
    }
}

fn version_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let labels = Vec::<VersionLabel>::deserialize(deserializer)?;
    Ok(labels.into_iter().map(String::from).collect())
}

fn optional_version<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<VersionLabel>::deserialize(deserializer)?.map(String::from))
}

/// Lowest priority first.
fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::with_capacity(2);
    if let Some(dirs) = ProjectDirs::from("", "", "docprint") {
        locations.push(dirs.config_dir().join("config.toml"));
    }
    locations.push(PathBuf::from(LOCAL_FILE));
    locations
}

fn file_provider(path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    let provider = match extension.as_deref() {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn config(versions: &[&str], current: Option<&str>) -> Config {
        Config {
            versions: versions.iter().map(|v| v.to_string()).collect(),
            current_version: current.map(str::to_string),
            ..Config::default()
        }
    }

    #[rstest]
    #[case(&["2.0", "1.0"], None, true)]
    #[case(&["2.0", "1.0"], Some("1.0"), true)]
    #[case(&["2.0", "1.0"], Some("3.0"), false)]
    #[case(&[], None, false)]
    fn validates_versions(#[case] versions: &[&str], #[case] current: Option<&str>, #[case] valid: bool) {
        assert_eq!(config(versions, current).validate().is_ok(), valid);
    }

    #[test]
    fn invalid_footer_pattern_is_rejected() {
        let config = Config { footer_pattern: Some("(unclosed".into()), ..config(&["1.0"], None) };
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::FooterPattern(_)));
    }

    #[test]
    fn default_footer_matches_builtin_footer() {
        let regex = config(&["1.0"], None).footer_regex().unwrap().unwrap();
        assert!(regex.is_match("Printed from https://docs.example.com"));
    }

    #[test]
    fn local_file_then_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_FILE,
                r#"
                project_name = "Acme"
                site_url = "https://docs.acme.test"
                versions = ["2.0", "1.0"]
                ignore_docs = ["changelog"]

                [templates]
                cover = "cover.html"
                "#,
            )?;
            jail.set_env("DOCPRINT_CURRENT_VERSION", "1.0");
            jail.set_env("DOCPRINT_TEMPLATES__PAGE", "page.html");

            let config = Config::load(None).unwrap();
            assert_eq!(config.project_name, "Acme");
            assert_eq!(config.current_version.as_deref(), Some("1.0"));
            assert_eq!(config.ignore_docs, vec!["changelog".to_string()]);
            assert_eq!(config.templates.cover, Some(PathBuf::from("cover.html")));
            assert_eq!(config.templates.page, Some(PathBuf::from("page.html")));
            assert_eq!(config.base_url, "/");
            Ok(())
        });
    }

    #[test]
    fn environment_versions_are_taken_verbatim() {
        Jail::expect_with(|jail| {
            jail.create_file(LOCAL_FILE, "versions = [\"0.9\"]")?;
            jail.set_env("DOCPRINT_VERSIONS", "3.0, 2.10,");
            jail.set_env("DOCPRINT_CURRENT_VERSION", "2.10");

            let config = Config::load(None).unwrap();
            assert_eq!(config.versions, vec!["3.0".to_string(), "2.10".to_string()]);
            assert_eq!(config.current_version.as_deref(), Some("2.10"));
            Ok(())
        });
    }

    #[test]
    fn unquoted_versions_in_files_are_accepted() {
        Jail::expect_with(|jail| {
            jail.create_file(LOCAL_FILE, "versions = [2, 1.5]\ncurrent_version = 2")?;
            let config = Config::load(None).unwrap();
            assert_eq!(config.versions, vec!["2".to_string(), "1.5".to_string()]);
            assert_eq!(config.current_version.as_deref(), Some("2"));
            Ok(())
        });
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn explicit_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docprint.yaml");
        std::fs::write(&path, "project_name: Acme\nversions: ['1.0']\ncontinue_on_error: true\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(config.continue_on_error);
        assert_eq!(config.versions, vec!["1.0".to_string()]);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docprint.ini");
        std::fs::write(&path, "").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }
}
