//! Variable definitions and the synthetic age bands

use crate::{CellValue, Record};
use serde::{Deserialize, Serialize};

/// Name of the synthetic age-band characteristic
pub const AGE_CATEGORY: &str = "Catégories d'âge";

/// Column the age bands are derived from
pub const AGE_FIELD: &str = "Age";

/// Band labels, youngest first
pub const AGE_BAND_LABELS: [&str; 8] = [
    "< 18 ans",
    "18-29 ans",
    "30-39 ans",
    "40-49 ans",
    "50-59 ans",
    "60-69 ans",
    "70-79 ans",
    "80 ans et plus",
];

/// Exclusive upper bound of each band. The first band is open below and the
/// last one (100) stands for "80 and over".
pub const AGE_THRESHOLDS: [f64; 8] = [18.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 100.0];

/// Kind of a characteristic, driving which statistics apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacteristicKind {
    Date,
    Quantitative,
    Qualitative,
}

impl std::fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharacteristicKind::Date => write!(f, "date"),
            CharacteristicKind::Quantitative => write!(f, "quantitative"),
            CharacteristicKind::Qualitative => write!(f, "qualitative"),
        }
    }
}

/// A known variable. With a value domain it is "closed": its categories are
/// fixed up front instead of discovered from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub kind: CharacteristicKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value_domain: Option<Vec<CellValue>>,
}

impl Characteristic {
    pub fn new(name: impl Into<String>, kind: CharacteristicKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value_domain: None,
        }
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, CharacteristicKind::Date)
    }

    pub fn quantitative(name: impl Into<String>) -> Self {
        Self::new(name, CharacteristicKind::Quantitative)
    }

    pub fn qualitative(name: impl Into<String>) -> Self {
        Self::new(name, CharacteristicKind::Qualitative)
    }

    /// Builder: close the characteristic over a fixed, ordered domain
    pub fn with_domain<V: Into<CellValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.value_domain = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// The synthetic age-band characteristic
    pub fn age_category() -> Self {
        Self::qualitative(AGE_CATEGORY).with_domain(AGE_BAND_LABELS)
    }

    pub fn is_closed(&self) -> bool {
        self.value_domain.is_some()
    }

    pub fn is_age_category(&self) -> bool {
        self.name == AGE_CATEGORY
    }

    /// Domain values rendered as labels, in domain order (empty if open)
    pub fn domain_labels(&self) -> Vec<String> {
        self.value_domain
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|v| v.to_label().unwrap_or_default())
            .collect()
    }
}

/// Index of the age band an age falls in. NaN matches no band.
pub fn age_band_index(age: f64) -> Option<usize> {
    AGE_THRESHOLDS.iter().enumerate().position(|(i, &t)| {
        if i == 0 {
            age < t
        } else if i == AGE_THRESHOLDS.len() - 1 {
            age >= AGE_THRESHOLDS[i - 1]
        } else {
            age >= AGE_THRESHOLDS[i - 1] && age < t
        }
    })
}

/// Age band label of a record, from the numeric coercion of its age column
pub fn age_band_label(record: &Record) -> Option<&'static str> {
    age_band_index(record.number(AGE_FIELD)).map(|i| AGE_BAND_LABELS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_band_boundaries() {
        assert_eq!(age_band_index(0.0), Some(0));
        assert_eq!(age_band_index(17.9), Some(0));
        assert_eq!(age_band_index(18.0), Some(1));
        assert_eq!(age_band_index(29.0), Some(1));
        assert_eq!(age_band_index(30.0), Some(2));
        assert_eq!(age_band_index(79.5), Some(6));
        assert_eq!(age_band_index(80.0), Some(7));
        assert_eq!(age_band_index(104.0), Some(7));
        assert_eq!(age_band_index(f64::NAN), None);
    }

    #[test]
    fn test_age_band_label() {
        let record = Record::new().with(AGE_FIELD, "42");
        assert_eq!(age_band_label(&record), Some("40-49 ans"));
        assert_eq!(age_band_label(&Record::new()), None);
    }

    #[test]
    fn test_domain_labels() {
        let ald = Characteristic::qualitative("ALD").with_domain([true, false]);
        assert!(ald.is_closed());
        assert_eq!(ald.domain_labels(), vec!["true", "false"]);
        assert!(Characteristic::quantitative("Age").domain_labels().is_empty());
    }

    #[test]
    fn test_age_category() {
        let age = Characteristic::age_category();
        assert!(age.is_age_category());
        assert_eq!(age.kind, CharacteristicKind::Qualitative);
        assert_eq!(age.domain_labels().len(), 8);
    }
}
