//! Characteristic Registry

use biostat_core::{Characteristic, AGE_CATEGORY};
use std::collections::HashMap;

/// Catalog of known characteristics.
///
/// Lookups are exact and case-sensitive. The age-band characteristic is
/// always resolvable by name whether or not the table lists it.
#[derive(Debug, Clone)]
pub struct CharacteristicRegistry {
    characteristics: Vec<Characteristic>,
    index: HashMap<String, usize>,
    age_category: Characteristic,
}

impl CharacteristicRegistry {
    pub fn new() -> Self {
        Self {
            characteristics: Vec::new(),
            index: HashMap::new(),
            age_category: Characteristic::age_category(),
        }
    }

    /// The characteristics of the patient spreadsheets the tool was built for
    pub fn standard() -> Self {
        Self::new()
            .with_characteristic(Characteristic::date("Date"))
            .with_characteristic(Characteristic::quantitative("Age"))
            .with_characteristic(Characteristic::qualitative("Sexe").with_domain(["Homme", "Femme"]))
            .with_characteristic(Characteristic::qualitative("Departement"))
            .with_characteristic(Characteristic::qualitative("Ville"))
            .with_characteristic(Characteristic::qualitative("ALD").with_domain([true, false]))
            .with_characteristic(
                Characteristic::qualitative("Complementaire").with_domain(["C2S", "AME", ""]),
            )
            .with_characteristic(Characteristic::qualitative("MedecinTraitant").with_domain([true, false]))
            .with_characteristic(Characteristic::date("DateMT"))
            .with_characteristic(Characteristic::quantitative("Consultations1"))
            .with_characteristic(Characteristic::quantitative("Consultations2"))
    }

    /// Builder: register a characteristic, replacing any with the same name
    pub fn with_characteristic(mut self, characteristic: Characteristic) -> Self {
        match self.index.get(&characteristic.name) {
            Some(&i) => self.characteristics[i] = characteristic,
            None => {
                self.index
                    .insert(characteristic.name.clone(), self.characteristics.len());
                self.characteristics.push(characteristic);
            }
        }
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Characteristic> {
        if name == AGE_CATEGORY {
            return Some(&self.age_category);
        }
        self.index.get(name).map(|&i| &self.characteristics[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered characteristics in registration order (without the age bands)
    pub fn iter(&self) -> impl Iterator<Item = &Characteristic> {
        self.characteristics.iter()
    }

    /// Characteristics usable as a primary grouping: the closed ones, then
    /// the age bands.
    pub fn primary_candidates(&self) -> Vec<&Characteristic> {
        self.characteristics
            .iter()
            .filter(|c| c.is_closed())
            .chain(std::iter::once(&self.age_category))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.characteristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characteristics.is_empty()
    }

    /// Names close to an unknown one, best match first
    pub fn suggest(&self, name: &str) -> Vec<&str> {
        let query = name.to_lowercase();
        let mut matches: Vec<(&str, usize)> = self
            .characteristics
            .iter()
            .map(|c| c.name.as_str())
            .chain(std::iter::once(AGE_CATEGORY))
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, &candidate.to_lowercase());
                (score > 0).then_some((candidate, score))
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        if query == candidate {
            200
        } else if candidate.starts_with(query) || query.starts_with(candidate) {
            100
        } else if candidate.contains(query) || query.contains(candidate) {
            50
        } else {
            0
        }
    }
}

impl Default for CharacteristicRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
