//! Biostat Core - Fundamental types
//!
//! This crate provides the core types used throughout Biostat:
//! - `CellValue`: Spreadsheet cells with explicit coercions
//! - `Record` / `Workbook`: Parsed sheet rows, keyed by column header
//! - `Characteristic`: Variable definitions, including the age bands
//! - `BiostatError` / `StatsError`: Structured errors

mod value;
mod record;
mod characteristic;
mod error;

pub use value::CellValue;
pub use record::{Record, SheetMetadata, Workbook};
pub use characteristic::{
    age_band_index, age_band_label, Characteristic, CharacteristicKind, AGE_BAND_LABELS,
    AGE_CATEGORY, AGE_FIELD, AGE_THRESHOLDS,
};
pub use error::{codes, BiostatError, ErrorContext, StatsError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BiostatError, CellValue, Characteristic, CharacteristicKind, Record, StatsError,
        Workbook,
    };
    pub use crate::error::codes;
}

/// Build a `Record` from `column => value` pairs
#[macro_export]
macro_rules! record {
    {} => { $crate::Record::new() };
    { $($key:expr => $value:expr),* $(,)? } => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($key, $crate::CellValue::from($value));
        )*
        record
    }};
}
