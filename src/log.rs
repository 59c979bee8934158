/*
    This module buffers the diagnostics emitted by the pipeline stages
*/

use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Note => write!(f, "note: {}", self.message),
            Severity::Warning => write!(f, "\x1b[33;49;1mwarning:\x1b[0m {}", self.message),
            Severity::Error => write!(f, "\x1b[31;49;1merror:\x1b[0m {}", self.message),
        }
    }
}

/// Diagnostics in the order the stages reported them.
#[derive(Clone, Debug, Default)]
pub struct Log {
    diagnostics: Vec<Diagnostic>,
}

impl Log {
    pub fn new() -> Self {
        Log::default()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[cfg(test)]
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.diagnostics.iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.as_str())
            .collect()
    }
}

pub trait Logger {
    fn push(&mut self, severity: Severity, message: String);

    fn add_note(&mut self, message: impl Into<String>) {
        self.push(Severity::Note, message.into());
    }

    fn add_warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    fn add_error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }
}

impl Logger for Log {
    fn push(&mut self, severity: Severity, message: String) {
        self.diagnostics.push(Diagnostic { severity, message });
    }
}
