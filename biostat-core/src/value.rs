//! Spreadsheet cell values
//!
//! Parsed sheets hand us loosely typed cells. Every consumer goes through an
//! explicit coercion (`to_number`, `to_label`) instead of guessing at the
//! variant it holds.

use serde::{Deserialize, Serialize};

/// A single cell of a parsed sheet row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Date kept in its textual form. Never produced by JSON input, where
    /// dates are indistinguishable from text.
    #[serde(skip_deserializing)]
    Date(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    // ========== Coercion ==========

    /// Numeric coercion. Anything that is not a number yields NaN.
    ///
    /// Text is trimmed and parsed; blank text counts as missing. Parsed values
    /// that are not finite ("inf", "NaN") are rejected as well, so the result
    /// is always either finite or NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return f64::NAN;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => n,
                    _ => f64::NAN,
                }
            }
            CellValue::Null | CellValue::Date(_) => f64::NAN,
        }
    }

    /// Category label used on contingency axes. `None` for missing cells so
    /// the caller can pick its own sentinel.
    pub fn to_label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Date(d) => write!(f, "{}", d),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}
