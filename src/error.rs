// src/error.rs
use std::fmt;
use std::num::ParseIntError;

use crate::breakdown::MatchBreakdown;

/// Why one cell (or one row) could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("parse int {what} failed: {text:?}: {source}")]
    Int {
        what: String,
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("icon has unexpected markup: {0}")]
    IconMarkup(String),

    #[error("expected {expected} icons, found {found}")]
    IconCount { expected: usize, found: usize },

    #[error("expected {expected} values, found {found}")]
    Length { expected: usize, found: usize },

    #[error("no active match phase")]
    NoPhase,

    #[error("{0} phase still open at end of report")]
    PhaseOpen(&'static str),

    #[error("field {field} holds {found}, schema says {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing field {0}")]
    Missing(String),

    #[error("{0}")]
    Invalid(String),
}

/// A row-level failure, tagged with the row label it came from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{label}: {source}")]
pub struct FieldError {
    pub label: String,
    #[source]
    pub source: DecodeError,
}

impl FieldError {
    pub fn new(label: impl Into<String>, source: DecodeError) -> Self {
        Self { label: label.into(), source }
    }
}

/// Everything that went wrong in one document, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, e: FieldError) {
        self.0.push(e);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error recorded for `label`.
    pub fn for_label(&self, label: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.label == label)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported season: {0}")]
    UnsupportedSeason(u16),

    #[error("document has no three-column score rows")]
    Structural,

    /// Row failures; the partially built breakdown is kept for diagnosis.
    #[error("Parse error ({count}):\n{errors}", count = .errors.len())]
    Fields {
        errors: FieldErrors,
        partial: Box<MatchBreakdown>,
    },

    #[error("extra match info: {0}")]
    Overlay(#[from] serde_json::Error),

    #[error("extra match info: {field} is not a {season} bonus ranking point")]
    UnknownBonus { season: u16, field: String },

    #[error("extra match info: {flag} does not apply to {season}")]
    OverlayFlag { season: u16, flag: &'static str },

    #[error("extra match info: {0}")]
    OverlayWrite(#[source] DecodeError),
}

pub type Result<T> = std::result::Result<T, ParseError>;
