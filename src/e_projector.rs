//! Projects a decoded diagnostic onto a single annotation: noise filter,
//! severity, display span, and the file path the reporting surface expects.

use crate::e_annotation::{Annotation, AnnotationLocation, Severity};
use crate::e_config::TargetMode;
use crate::e_diagnostic::{Diagnostic, DiagnosticSpan};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Title prefix used when no span exists anywhere in the diagnostic tree.
pub const NO_SPAN_MARKER: &str = "(No span found for message:) ";

/// Drops the compiler-wide "aborting due to ..." summaries. They repeat what
/// the individual diagnostics already said and carry no location.
///
/// The phrasing is matched literally, so a compiler that rewords the summary
/// slips through as a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseFilter {
    enabled: bool,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        NoiseFilter { enabled: true }
    }
}

impl NoiseFilter {
    pub fn disabled() -> Self {
        NoiseFilter { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_noise(&self, message: &str) -> bool {
        if !self.enabled {
            return false;
        }
        if message == "aborting due to previous error" {
            return true;
        }
        // "aborting due to 3 previous errors"
        message.starts_with("aborting due to ") && message.ends_with(" previous errors")
    }
}

/// The part of the run configuration the projector reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    pub target_mode: TargetMode,
    /// The `.rs` file or crate directory that was verified.
    pub target_path: PathBuf,
    pub annotation_root: PathBuf,
    pub noise: NoiseFilter,
}

impl ProjectionConfig {
    pub fn new(target_mode: TargetMode, target_path: impl Into<PathBuf>) -> Self {
        ProjectionConfig {
            target_mode,
            target_path: target_path.into(),
            annotation_root: PathBuf::new(),
            noise: NoiseFilter::default(),
        }
    }

    pub fn with_annotation_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.annotation_root = root.into();
        self
    }

    /// Path of a span's file as seen from the reporting surface.
    ///
    /// Single-file spans are already relative to where the compiler ran.
    /// Project spans are relative to the crate, so they get re-rooted under
    /// `annotation_root/target_path`.
    pub fn project_file(&self, file_name: &str) -> String {
        match self.target_mode {
            TargetMode::SingleFile => file_name.to_string(),
            TargetMode::Project => {
                let joined = self.annotation_root.join(&self.target_path).join(file_name);
                normalize_path(&joined)
            }
        }
    }
}

/// Lexical normalization: drops `.`, folds `..` where there is something to
/// fold, renders with `/`. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut prefix = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().to_string(),
            Component::RootDir => prefix.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if !prefix.ends_with('/') {
                    // above the root there is nothing to climb to
                    parts.push("..".to_string());
                }
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().to_string()),
        }
    }
    let joined = format!("{}{}", prefix, parts.join("/"));
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn locate(span: &DiagnosticSpan, config: &ProjectionConfig) -> AnnotationLocation {
    AnnotationLocation::new(
        config.project_file(&span.file_name),
        span.line_start,
        span.line_end,
        span.column_start,
        span.column_end,
    )
}

/// Turns one top-level diagnostic into at most one annotation.
pub fn project(diagnostic: &Diagnostic, config: &ProjectionConfig) -> Option<Annotation> {
    if config.noise.is_noise(&diagnostic.message) {
        debug!("dropping summary diagnostic: {}", diagnostic.message);
        return None;
    }

    let severity = Severity::from_level(&diagnostic.level);
    let body = diagnostic
        .rendered
        .clone()
        .unwrap_or_else(|| diagnostic.message.clone());

    let annotation = match diagnostic.display_span() {
        Some(span) => Annotation {
            severity,
            title: diagnostic.message.clone(),
            body,
            location: Some(locate(span, config)),
        },
        None => Annotation {
            severity,
            title: format!("{}{}", NO_SPAN_MARKER, diagnostic.message),
            body,
            location: None,
        },
    };
    Some(annotation)
}
