use crate::e_command_builder::{DiagnosticStream, VerifierCommandBuilder};
use crate::e_config::AnnotateConfig;
use crate::e_decoder::{decode, EnvelopeMode};
use crate::e_projector::{project, ProjectionConfig};
use crate::e_sink::AnnotationSink;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    pub lines: usize,
    pub annotations: usize,
    /// `false` once the terminal failure has been reported.
    pub success: bool,
}

/// Decodes, projects and reports each line in order. Returns the number of
/// annotations handed to the sink.
pub fn process_lines<I, S>(
    lines: I,
    mode: EnvelopeMode,
    config: &ProjectionConfig,
    sink: &mut S,
) -> io::Result<usize>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    S: AnnotationSink + ?Sized,
{
    let mut emitted = 0;
    for line in lines {
        if process_line(line.as_ref(), mode, config, sink)? {
            emitted += 1;
        }
    }
    Ok(emitted)
}

fn process_line<S>(
    line: &str,
    mode: EnvelopeMode,
    config: &ProjectionConfig,
    sink: &mut S,
) -> io::Result<bool>
where
    S: AnnotationSink + ?Sized,
{
    let Some(diagnostic) = decode(line, mode) else {
        return Ok(false);
    };
    let Some(annotation) = project(&diagnostic, config) else {
        return Ok(false);
    };
    sink.report(&annotation)?;
    Ok(true)
}

/// Streams a reader line by line through the pipeline. Lines that are not
/// valid UTF-8 are decoded lossily; they are not diagnostics anyway.
pub fn process_reader<R, S>(
    mut reader: R,
    mode: EnvelopeMode,
    config: &ProjectionConfig,
    sink: &mut S,
) -> io::Result<RunReport>
where
    R: BufRead,
    S: AnnotationSink + ?Sized,
{
    let mut report = RunReport {
        success: true,
        ..Default::default()
    };
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        report.lines += 1;
        if process_line(line, mode, config, sink)? {
            report.annotations += 1;
        }
    }
    Ok(report)
}

/// Reads an already captured stream from a file, or stdin for `-`.
pub fn annotate_input<S>(input: &Path, config: &AnnotateConfig, sink: &mut S) -> Result<RunReport>
where
    S: AnnotationSink + ?Sized,
{
    let mode = EnvelopeMode::for_target(config.target_mode);
    let projection = config.projection();
    let report = if input == Path::new("-") {
        let stdin = io::stdin();
        process_reader(stdin.lock(), mode, &projection, sink)?
    } else {
        let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
        process_reader(BufReader::new(file), mode, &projection, sink)?
    };
    info!(
        "{} lines read, {} annotations reported",
        report.lines, report.annotations
    );
    Ok(report)
}

/// Runs the verifier on the configured target and annotates its output as it
/// arrives. A non-zero exit is reported once through `sink.fail` after the
/// stream is drained.
pub fn run_verifier<S>(config: &AnnotateConfig, sink: &mut S) -> Result<RunReport>
where
    S: AnnotationSink + ?Sized,
{
    let builder = VerifierCommandBuilder::for_config(config);
    let program = builder.program().to_string();
    let stream = builder.stream();
    info!("Running: {}", builder.display());

    let mut child = builder
        .build_command()
        .spawn()
        .with_context(|| format!("failed to start {}", program))?;
    let pipe: Box<dyn io::Read + Send> = match stream {
        DiagnosticStream::Stdout => Box::new(child.stdout.take().context("stdout was not captured")?),
        DiagnosticStream::Stderr => Box::new(child.stderr.take().context("stderr was not captured")?),
    };

    let child_arc = Arc::new(Mutex::new(child));
    let child_for_handler = Arc::clone(&child_arc);
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("Ctrl+C pressed, terminating verifier...");
        if let Ok(mut child) = child_for_handler.lock() {
            let _ = child.kill();
        }
    }) {
        // only one handler per process; a second run in the same process keeps the first
        debug!("Ctrl+C handler not installed: {}", e);
    }

    let mode = EnvelopeMode::for_target(config.target_mode);
    let projection = config.projection();
    let mut report = match process_reader(BufReader::new(pipe), mode, &projection, sink) {
        Ok(report) => report,
        Err(e) => {
            // the sink is gone; stop the verifier instead of leaving it running
            if let Ok(mut child) = child_arc.lock() {
                let _ = child.kill();
                let _ = child.wait();
            }
            return Err(e).with_context(|| format!("reporting output of {}", program));
        }
    };

    let status = child_arc
        .lock()
        .map_err(|_| anyhow::anyhow!("verifier process lock poisoned"))?
        .wait()
        .with_context(|| format!("waiting for {}", program))?;
    debug!("{} exited with status: {:?}", program, status.code());
    info!(
        "{} lines read, {} annotations reported",
        report.lines, report.annotations
    );

    if !status.success() {
        warn!("{} exited with status {:?}", program, status.code());
        sink.fail(&format!("{} exited with a non-zero exit code", program))?;
        report.success = false;
    }
    Ok(report)
}
