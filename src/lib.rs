#![doc = include_str!("../README.md")]

pub mod e_annotation;
pub use e_annotation::{Annotation, AnnotationLocation, Severity};
pub mod e_cli;
pub use e_cli::Cli;
pub mod e_command_builder;
pub mod e_config;
pub use e_config::{AnnotateConfig, TargetMode};
pub mod e_decoder;
pub use e_decoder::{decode, EnvelopeMode};
pub mod e_diagnostic;
pub use e_diagnostic::{Diagnostic, DiagnosticSpan};
pub mod e_projector;
pub use e_projector::{project, ProjectionConfig};
pub mod e_runner;
pub use e_runner::{process_lines, run_verifier, RunReport};
pub mod e_sink;
pub use e_sink::{AnnotationSink, CollectingSink, WorkflowCommandSink};
