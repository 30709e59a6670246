//! Prefill table: default recipient fields keyed by lookup code

use crate::{LetterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in prefill table shipped with the crate
pub const PREFILL_TABLE_JSON: &str = include_str!("../data/prefill.json");

/// Default field values for one lookup code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefillEntry {
    /// Lookup key
    pub code: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub designation: String,

    #[serde(default)]
    pub company_name: String,

    #[serde(default)]
    pub city_state: String,

    #[serde(default)]
    pub purchase_order_id: String,

    #[serde(default)]
    pub message_line: String,

    /// Material classification used in the output filename (e.g. "MOD")
    pub material_suffix: String,
}

/// Read-only lookup of [`PrefillEntry`] by code
///
/// Built once and passed by reference to whoever needs it; there is no
/// mutation API, so shared reads need no synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefillTable {
    entries: BTreeMap<String, PrefillEntry>,
}

impl PrefillTable {
    /// An empty table; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the table shipped in `data/prefill.json`
    pub fn embedded() -> Result<Self> {
        Self::from_json(PREFILL_TABLE_JSON)
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<PrefillEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Build a table from entries, rejecting duplicate or blank codes
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = PrefillEntry>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.code.trim().is_empty() {
                return Err(LetterError::Prefill("entry with blank code".to_string()));
            }
            if map.contains_key(&entry.code) {
                return Err(LetterError::Prefill(format!(
                    "duplicate code '{}'",
                    entry.code
                )));
            }
            map.insert(entry.code.clone(), entry);
        }

        log::debug!("Loaded prefill table with {} entries", map.len());
        Ok(Self { entries: map })
    }

    /// Find the entry for a code
    pub fn lookup(&self, code: &str) -> Option<&PrefillEntry> {
        self.entries.get(code)
    }

    /// Known codes in ascending order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PrefillEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back to the JSON array form accepted by [`PrefillTable::from_json`]
    pub fn to_json(&self) -> Result<String> {
        let entries: Vec<&PrefillEntry> = self.entries.values().collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}
