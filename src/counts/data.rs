//! Count records and their JSON form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::CountError;

/// Animals of one species seen in one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCountData {
    pub species: String,
    pub count: u32,
    /// Animals already counted in an overlapping image
    pub repeats: u32,
}

impl GameCountData {
    pub fn new(species: impl Into<String>, count: u32, repeats: u32) -> Self {
        Self {
            species: species.into(),
            count,
            repeats,
        }
    }

    /// Animals not seen before.
    pub fn unique(&self) -> u32 {
        self.count.saturating_sub(self.repeats)
    }
}

impl fmt::Display for GameCountData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, ({} new)", self.count, self.species, self.unique())
    }
}

/// On-disk form of one entry. `New` is written for readers of the file and
/// recomputed on load.
#[derive(Debug, Serialize, Deserialize)]
struct CountRecord {
    #[serde(rename = "Count")]
    count: u32,
    #[serde(rename = "New", default)]
    new: u32,
    #[serde(rename = "Repeats", default)]
    repeats: u32,
    #[serde(rename = "Species")]
    species: String,
}

impl From<&GameCountData> for CountRecord {
    fn from(data: &GameCountData) -> Self {
        Self {
            count: data.count,
            new: data.unique(),
            repeats: data.repeats,
            species: data.species.clone(),
        }
    }
}

/// Counts for one image, one entry per species in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCounts {
    entries: Vec<GameCountData>,
}

impl ImageCounts {
    /// Add to the species' entry, creating it if needed.
    ///
    /// The entry is left as it was if the merged count would overflow.
    pub fn add(&mut self, data: GameCountData) -> Result<(), CountError> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.species == data.species) else {
            self.entries.push(data);
            return Ok(());
        };

        match (
            entry.count.checked_add(data.count),
            entry.repeats.checked_add(data.repeats),
        ) {
            (Some(count), Some(repeats)) => {
                entry.count = count;
                entry.repeats = repeats;
                Ok(())
            }
            _ => Err(CountError::CountOverflow {
                species: data.species,
                count: data.count,
            }),
        }
    }

    pub fn remove_species(&mut self, species: &str) -> Option<GameCountData> {
        let index = self.entries.iter().position(|e| e.species == species)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, species: &str) -> Option<&GameCountData> {
        self.entries.iter().find(|e| e.species == species)
    }

    pub fn entries(&self) -> &[GameCountData] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ImageCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for data in &self.entries {
            writeln!(f, "{}", data)?;
        }
        Ok(())
    }
}

/// Counts for every image, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountLedger {
    images: BTreeMap<String, ImageCounts>,
}

impl CountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file_name: &str, data: GameCountData) -> Result<(), CountError> {
        self.images.entry(file_name.to_string()).or_default().add(data)
    }

    pub fn get(&self, file_name: &str) -> Option<&ImageCounts> {
        self.images.get(file_name)
    }

    pub fn remove_species(
        &mut self,
        file_name: &str,
        species: &str,
    ) -> Result<GameCountData, CountError> {
        self.images
            .get_mut(file_name)
            .and_then(|counts| counts.remove_species(species))
            .ok_or_else(|| CountError::UnknownSpecies {
                image: file_name.to_string(),
                species: species.to_string(),
            })
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.images.values().all(ImageCounts::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageCounts)> {
        self.images.iter().map(|(name, counts)| (name.as_str(), counts))
    }

    /// New animals per species over all images, in first-seen order.
    pub fn totals(&self) -> Vec<(String, u32)> {
        let mut totals: Vec<(String, u32)> = Vec::new();
        for data in self.images.values().flat_map(ImageCounts::entries) {
            match totals.iter_mut().find(|(species, _)| *species == data.species) {
                Some((_, total)) => *total = total.saturating_add(data.unique()),
                None => totals.push((data.species.clone(), data.unique())),
            }
        }
        totals
    }

    /// One `"{total} {species}"` line per species.
    pub fn totals_summary(&self) -> String {
        self.totals()
            .iter()
            .map(|(species, total)| format!("{} {}\n", total, species))
            .collect()
    }

    /// Pretty JSON: file name to a list of entries, keys sorted.
    pub fn to_json(&self) -> Result<String, CountError> {
        let records: BTreeMap<&str, Vec<CountRecord>> = self
            .images
            .iter()
            .map(|(name, counts)| {
                (
                    name.as_str(),
                    counts.entries().iter().map(CountRecord::from).collect(),
                )
            })
            .collect();

        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Parse the JSON form. Repeated species within a file are merged.
    pub fn from_json(json: &str) -> Result<Self, CountError> {
        let records: BTreeMap<String, Vec<CountRecord>> = serde_json::from_str(json)?;

        let mut ledger = Self::new();
        for (name, list) in records {
            for record in list {
                ledger.add(
                    &name,
                    GameCountData::new(record.species, record.count, record.repeats),
                )?;
            }
        }
        Ok(ledger)
    }
}

impl fmt::Display for CountLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, counts) in &self.images {
            writeln!(f, "{}", name)?;
            for data in counts.entries() {
                writeln!(f, "\t{}", data)?;
            }
        }
        Ok(())
    }
}
