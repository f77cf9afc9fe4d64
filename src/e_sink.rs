//! Reporting sinks. The stock one prints GitHub Actions workflow commands,
//! which the runner turns into inline annotations.

use crate::e_annotation::Annotation;
use std::io::{self, Write};

/// Receives annotations in the order they were produced.
pub trait AnnotationSink {
    fn report(&mut self, annotation: &Annotation) -> io::Result<()>;

    /// Marks the whole run as failed. Called at most once, after every
    /// annotation has been reported.
    fn fail(&mut self, message: &str) -> io::Result<()>;
}

/// Escapes a command's message part.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a `key=value` property; `:` and `,` would end the value early.
pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

/// Renders a single annotation as a workflow command line (no newline).
pub fn workflow_command(annotation: &Annotation) -> String {
    let mut properties: Vec<String> = Vec::new();
    if !annotation.title.is_empty() {
        properties.push(format!("title={}", escape_property(&annotation.title)));
    }
    if let Some(ref location) = annotation.location {
        properties.push(format!("file={}", escape_property(&location.file)));
        properties.push(format!("line={}", location.start_line));
        properties.push(format!("endLine={}", location.end_line));
        if let Some((start, end)) = location.columns {
            properties.push(format!("col={}", start));
            properties.push(format!("endColumn={}", end));
        }
    }

    let mut command = format!("::{}", annotation.severity.as_str());
    if !properties.is_empty() {
        command.push(' ');
        command.push_str(&properties.join(","));
    }
    command.push_str("::");
    command.push_str(&escape_data(&annotation.body));
    command
}

/// Writes workflow commands to any writer, stdout by default.
pub struct WorkflowCommandSink<W: Write> {
    out: W,
}

impl WorkflowCommandSink<io::Stdout> {
    pub fn stdout() -> Self {
        WorkflowCommandSink { out: io::stdout() }
    }
}

impl<W: Write> WorkflowCommandSink<W> {
    pub fn new(out: W) -> Self {
        WorkflowCommandSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AnnotationSink for WorkflowCommandSink<W> {
    fn report(&mut self, annotation: &Annotation) -> io::Result<()> {
        writeln!(self.out, "{}", workflow_command(annotation))?;
        self.out.flush()
    }

    fn fail(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::error::{}", escape_data(message))?;
        self.out.flush()
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub annotations: Vec<Annotation>,
    pub failures: Vec<String>,
}

impl AnnotationSink for CollectingSink {
    fn report(&mut self, annotation: &Annotation) -> io::Result<()> {
        self.annotations.push(annotation.clone());
        Ok(())
    }

    fn fail(&mut self, message: &str) -> io::Result<()> {
        self.failures.push(message.to_string());
        Ok(())
    }
}
