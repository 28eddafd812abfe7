use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

const BUNDLED: &str = include_str!("../assets/recommendations.json");

pub const MAX_SUGGESTIONS: usize = 6;

static DATASET: OnceCell<Dataset> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "movieId")]
    pub identifier: String,
    pub title: String,
    pub year: String,
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub movie: MovieSummary,
    #[serde(default)]
    pub recommendations: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entries: Vec<(String, DatasetEntry)>,
}

impl Dataset {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse recommendation dataset")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&DatasetEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatasetEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn suggest(&self, input: &str) -> Vec<String> {
        if input.trim().is_empty() {
            return Vec::new();
        }
        let lower = input.to_lowercase();
        self.iter()
            .filter(|(_, entry)| entry.movie.title.to_lowercase().contains(&lower))
            .take(MAX_SUGGESTIONS)
            .map(|(key, _)| key.to_string())
            .collect()
    }

    pub fn find_by_title(&self, title: &str) -> Option<&DatasetEntry> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.iter()
            .map(|(_, entry)| entry)
            .find(|entry| entry.movie.title.to_lowercase() == wanted)
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedEntries;

        impl<'de> Visitor<'de> for OrderedEntries {
            type Value = Dataset;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of dataset keys to entries")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Dataset, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut seen = HashSet::new();
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, entry)) = map.next_entry::<String, DatasetEntry>()? {
                    if !seen.insert(key.clone()) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate dataset key '{key}'"
                        )));
                    }
                    entries.push((key, entry));
                }
                Ok(Dataset { entries })
            }
        }

        deserializer.deserialize_map(OrderedEntries)
    }
}

pub fn install(dataset: Dataset) -> Result<&'static Dataset> {
    DATASET
        .set(dataset)
        .map_err(|_| anyhow!("Recommendation dataset already installed"))?;
    DATASET
        .get()
        .ok_or_else(|| anyhow!("Recommendation dataset missing after install"))
}

pub fn global() -> Result<&'static Dataset> {
    DATASET.get_or_try_init(Dataset::bundled)
}
