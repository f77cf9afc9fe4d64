use std::fmt;

/// Severity of an emitted annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Error,
    Warning,
    #[default]
    Notice,
}

impl Severity {
    /// Maps a diagnostic `level`. Total: anything unrecognized is a notice.
    pub fn from_level(level: &str) -> Self {
        match level {
            "error" | "error: internal compiler error" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Notice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an annotation is placed. File and lines always travel together;
/// columns only exist for single-line locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationLocation {
    pub file: String,
    pub start_line: usize,
    pub end_line: usize,
    pub columns: Option<(usize, usize)>,
}

impl AnnotationLocation {
    /// Builds a location, dropping the columns when the range spans lines.
    pub fn new(
        file: String,
        start_line: usize,
        end_line: usize,
        start_column: usize,
        end_column: usize,
    ) -> Self {
        let columns = if start_line == end_line {
            Some((start_column, end_column))
        } else {
            None
        };
        AnnotationLocation {
            file,
            start_line,
            end_line,
            columns,
        }
    }

    pub fn start_column(&self) -> Option<usize> {
        self.columns.map(|(start, _)| start)
    }

    pub fn end_column(&self) -> Option<usize> {
        self.columns.map(|(_, end)| end)
    }
}

/// The normalized record handed to a reporting sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub location: Option<AnnotationLocation>,
}

impl Annotation {
    pub fn file(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.file.as_str())
    }

    pub fn start_line(&self) -> Option<usize> {
        self.location.as_ref().map(|l| l.start_line)
    }

    pub fn end_line(&self) -> Option<usize> {
        self.location.as_ref().map(|l| l.end_line)
    }

    pub fn start_column(&self) -> Option<usize> {
        self.location.as_ref().and_then(|l| l.start_column())
    }

    pub fn end_column(&self) -> Option<usize> {
        self.location.as_ref().and_then(|l| l.end_column())
    }
}
