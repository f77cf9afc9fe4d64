//! # e_annotate
//!
//! Runs the verifier and prints one workflow command per diagnostic.
//! See the README for the flags.

use anyhow::Result;
use clap::Parser;
use e_annotate::e_runner::{annotate_input, run_verifier};
use e_annotate::{AnnotateConfig, Cli, WorkflowCommandSink};
use std::process::exit;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("E_ANNOTATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout is reserved for workflow commands
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    let config = AnnotateConfig::from_cli(cli)?;
    let mut sink = WorkflowCommandSink::stdout();
    let report = match cli.input {
        Some(ref input) => annotate_input(input, &config, &mut sink)?,
        None => run_verifier(&config, &mut sink)?,
    };
    debug!("run report: {:?}", report);
    Ok(report.success)
}

pub fn main() {
    init_logging();
    let cli = Cli::parse();
    debug!("CLI options: {:?}", cli);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            error!("{:#}", e);
            // surface the fatal error the same way a failed verification is
            println!("::error::{}", e_annotate::e_sink::escape_data(&format!("{:#}", e)));
            exit(1);
        }
    }
}
