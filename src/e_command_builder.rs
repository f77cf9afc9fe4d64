use crate::e_config::{AnnotateConfig, TargetMode};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// The output stream that carries the json diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStream {
    Stdout,
    Stderr,
}

/// A builder that constructs the verifier invocation for a target.
#[derive(Debug, Clone)]
pub struct VerifierCommandBuilder {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    stream: DiagnosticStream,
}

impl VerifierCommandBuilder {
    /// Creates a builder for the given program with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        VerifierCommandBuilder {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            stream: DiagnosticStream::Stdout,
        }
    }

    /// Configures program, json output flags and working directory from the
    /// run configuration.
    pub fn for_config(config: &AnnotateConfig) -> Self {
        let builder = match config.target_mode {
            TargetMode::SingleFile => {
                // the driver writes its json diagnostics to stderr
                let mut builder = VerifierCommandBuilder::new(config.rustc.clone());
                builder.stream = DiagnosticStream::Stderr;
                builder.args.push(format!("--edition={}", config.edition));
                builder.args.push("--error-format=json".into());
                builder
                    .args
                    .push(config.target_path.to_string_lossy().to_string());
                builder
            }
            TargetMode::Project => {
                // cargo forwards them to stdout inside its own envelope
                let mut builder = VerifierCommandBuilder::new(config.cargo.clone());
                builder.args.push("--message-format=json".into());
                builder.args.push("--features".into());
                builder.args.push("prusti-contracts/prusti".into());
                builder.current_dir = Some(config.target_path.clone());
                builder
            }
        };
        builder.with_extra_args(&config.extra_args)
    }

    /// Appends extra arguments to the command.
    pub fn with_extra_args(mut self, extra: &[String]) -> Self {
        self.args.extend(extra.iter().cloned());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    pub fn stream(&self) -> DiagnosticStream {
        self.stream
    }

    /// Builds the final vector of command-line arguments.
    pub fn build(self) -> Vec<String> {
        self.args
    }

    /// The command as it would be typed, for logs.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Builds a std::process::Command with the diagnostic stream piped for
    /// capture and the other one inherited.
    pub fn build_command(self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        match self.stream {
            DiagnosticStream::Stdout => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
            }
            DiagnosticStream::Stderr => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::piped());
            }
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_command() {
        let config = AnnotateConfig::new("tests/verify/pass.rs", TargetMode::SingleFile);
        let builder = VerifierCommandBuilder::for_config(&config);
        assert_eq!(builder.program(), "prusti-rustc");
        assert!(builder.current_dir().is_none());
        assert_eq!(builder.stream(), DiagnosticStream::Stderr);
        assert_eq!(
            builder.build(),
            vec![
                "--edition=2018".to_string(),
                "--error-format=json".to_string(),
                "tests/verify/pass.rs".to_string(),
            ]
        );
    }

    #[test]
    fn test_project_command_runs_in_crate_dir() {
        let mut config = AnnotateConfig::new("my_crate", TargetMode::Project);
        config.extra_args = vec!["--offline".to_string()];
        let builder = VerifierCommandBuilder::for_config(&config);
        assert_eq!(builder.program(), "cargo-prusti");
        assert_eq!(builder.current_dir(), Some(&PathBuf::from("my_crate")));
        assert_eq!(builder.stream(), DiagnosticStream::Stdout);
        assert_eq!(
            builder.display(),
            "cargo-prusti --message-format=json --features prusti-contracts/prusti --offline"
        );
    }

    #[test]
    fn test_custom_driver_and_edition() {
        let mut config = AnnotateConfig::new("a.rs", TargetMode::SingleFile);
        config.rustc = "rustc".into();
        config.edition = "2021".into();
        let args = VerifierCommandBuilder::for_config(&config).build();
        assert_eq!(args[0], "--edition=2021");
    }
}
