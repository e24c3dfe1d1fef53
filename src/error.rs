//! Error types for statistics parsing.

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// The line shape a body line was parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `SUBP` submit notice, regardless of the type column.
    Submission,
    /// `P` lines.
    Process,
    /// `E` lines.
    Event,
    /// `X` lines.
    External,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Submission => write!(f, "submission"),
            RecordKind::Process => write!(f, "process"),
            RecordKind::Event => write!(f, "event"),
            RecordKind::External => write!(f, "external"),
        }
    }
}

/// Why a date and time pair was rejected.
#[derive(Error, Debug)]
pub enum DateError {
    #[error("expected MM/DD/YYYY HH:MM:SS")]
    Layout,

    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
}

/// A field on a body line could not be parsed. Aborts the whole report.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: parsing {kind} record {code} date '{value}': {source}")]
    InvalidDate {
        line: usize,
        kind: RecordKind,
        code: String,
        value: String,
        #[source]
        source: DateError,
    },

    #[error("line {line}: parsing {kind} record {code} completion code '{value}': {source}")]
    InvalidCompletionCode {
        line: usize,
        kind: RecordKind,
        code: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl ParseError {
    /// 1-based line number in the report text.
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidDate { line, .. } | ParseError::InvalidCompletionCode { line, .. } => {
                *line
            }
        }
    }

    /// The line shape that was being parsed when the failure occurred.
    pub fn kind(&self) -> RecordKind {
        match self {
            ParseError::InvalidDate { kind, .. } | ParseError::InvalidCompletionCode { kind, .. } => {
                *kind
            }
        }
    }
}
