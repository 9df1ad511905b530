//! Structured errors
//!
//! Data irregularities (missing cells, unknown categories) never become
//! errors; they are bucketed or skipped. Errors here cover malformed input
//! and numerical failures of the test primitives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNKNOWN_CHARACTERISTIC: &str = "UNKNOWN_CHARACTERISTIC";
    pub const EMPTY_SAMPLE: &str = "EMPTY_SAMPLE";
    pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
    pub const LENGTH_MISMATCH: &str = "LENGTH_MISMATCH";
    pub const INVALID_TABLE: &str = "INVALID_TABLE";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Failure raised by a hypothesis-test primitive
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("{0}() requires a non-empty sample")]
    EmptySample(&'static str),

    #[error("{test}() requires at least {needed} {what}, got {got}")]
    InsufficientData {
        test: &'static str,
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("{test}() inputs must have equal length: {left} vs {right}")]
    LengthMismatch {
        test: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Invalid contingency table: {0}")]
    InvalidTable(String),

    #[error("Domain error: {0}")]
    Domain(String),
}

/// Where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiostatError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl BiostatError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set sheet context
    pub fn in_sheet(mut self, sheet: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.sheet = Some(sheet.into());
        self
    }

    /// Builder: set characteristic context
    pub fn for_characteristic(mut self, name: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.characteristic = Some(name.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Expected an object mapping sheet names to arrays of row objects")
    }

    pub fn unknown_characteristic(name: &str) -> Self {
        Self::new(
            codes::UNKNOWN_CHARACTERISTIC,
            format!("Unknown characteristic: {}", name),
        )
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for BiostatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            if let Some(sheet) = &ctx.sheet {
                write!(f, " (sheet: {})", sheet)?;
            }
            if let Some(name) = &ctx.characteristic {
                write!(f, " (characteristic: {})", name)?;
            }
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for BiostatError {}

impl From<StatsError> for BiostatError {
    fn from(err: StatsError) -> Self {
        let code = match &err {
            StatsError::EmptySample(_) => codes::EMPTY_SAMPLE,
            StatsError::InsufficientData { .. } => codes::INSUFFICIENT_DATA,
            StatsError::LengthMismatch { .. } => codes::LENGTH_MISMATCH,
            StatsError::InvalidTable(_) => codes::INVALID_TABLE,
            StatsError::Domain(_) => codes::DOMAIN_ERROR,
        };
        Self::new(code, err.to_string())
    }
}
