//! Run configuration: command line, optional TOML file, defaults, in that
//! order of precedence.

use crate::e_cli::Cli;
use crate::e_projector::{NoiseFilter, ProjectionConfig};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_EDITION: &str = "2018";
pub const DEFAULT_RUSTC: &str = "prusti-rustc";
pub const DEFAULT_CARGO: &str = "cargo-prusti";

/// What the verifier is pointed at. Fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    /// A lone `.rs` file handed to the compiler driver.
    #[default]
    SingleFile,
    /// A crate directory built through the cargo wrapper.
    Project,
}

impl TargetMode {
    pub fn from_verify_crate(verify_crate: bool) -> Self {
        if verify_crate {
            TargetMode::Project
        } else {
            TargetMode::SingleFile
        }
    }
}

/// Keys accepted in a config file. Everything is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub path: Option<PathBuf>,
    pub verify_crate: Option<bool>,
    pub annotation_path: Option<PathBuf>,
    pub keep_abort_summaries: Option<bool>,
    pub edition: Option<String>,
    pub rustc: Option<String>,
    pub cargo: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateConfig {
    /// The `.rs` file (single-file mode) or crate directory (project mode).
    pub target_path: PathBuf,
    pub target_mode: TargetMode,
    /// Prefix for re-rooted project paths, relative to the reporting surface.
    pub annotation_root: PathBuf,
    pub keep_abort_summaries: bool,
    pub edition: String,
    pub rustc: String,
    pub cargo: String,
    pub extra_args: Vec<String>,
}

impl AnnotateConfig {
    pub fn new(target_path: impl Into<PathBuf>, target_mode: TargetMode) -> Self {
        AnnotateConfig {
            target_path: target_path.into(),
            target_mode,
            annotation_root: PathBuf::new(),
            keep_abort_summaries: false,
            edition: DEFAULT_EDITION.to_string(),
            rustc: DEFAULT_RUSTC.to_string(),
            cargo: DEFAULT_CARGO.to_string(),
            extra_args: Vec::new(),
        }
    }

    /// Reads `--config` if given and merges it under the command line.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match cli.config {
            Some(ref path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let target_path = cli
            .path
            .clone()
            .or(file.path)
            .ok_or_else(|| anyhow!("no target path given (use --path or `path` in the config file)"))?;
        let verify_crate = cli.verify_crate.or(file.verify_crate).unwrap_or(false);

        let mut config = AnnotateConfig::new(target_path, TargetMode::from_verify_crate(verify_crate));
        if let Some(root) = cli.annotation_path.clone().or(file.annotation_path) {
            config.annotation_root = root;
        }
        config.keep_abort_summaries =
            cli.keep_abort_summaries || file.keep_abort_summaries.unwrap_or(false);
        if let Some(edition) = cli.edition.clone().or(file.edition) {
            config.edition = edition;
        }
        if let Some(rustc) = cli.rustc.clone().or(file.rustc) {
            config.rustc = rustc;
        }
        if let Some(cargo) = cli.cargo.clone().or(file.cargo) {
            config.cargo = cargo;
        }
        config.extra_args = if cli.extra.is_empty() {
            file.extra_args.unwrap_or_default()
        } else {
            cli.extra.clone()
        };
        debug!("resolved config: {:?}", config);
        Ok(config)
    }

    pub fn projection(&self) -> ProjectionConfig {
        let noise = if self.keep_abort_summaries {
            NoiseFilter::disabled()
        } else {
            NoiseFilter::default()
        };
        ProjectionConfig {
            target_mode: self.target_mode,
            target_path: self.target_path.clone(),
            annotation_root: self.annotation_root.clone(),
            noise,
        }
    }
}
