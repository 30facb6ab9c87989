//! Error types for schemagen.
//!
//! Every failure in the pipeline surfaces as an [`Error`]; nothing is retried
//! and no partial results are returned.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for schemagen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schemagen
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read YAML document {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Template file not found: {0}")]
    MissingTemplate(PathBuf),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single diagnostic reported by the SQL grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// 1-based line, 0 when the grammar did not report a position
    pub line: u64,
    pub column: u64,
    pub message: String,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// DDL rejected by the grammar. Carries every diagnostic the grammar produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<ParseDiagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL parse failed with {} error(s)", self.diagnostics.len())?;
        for diagnostic in &self.diagnostics {
            write!(f, "\n  - {}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
