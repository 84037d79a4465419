//! Health records accepted by the vault.
//!
//! A record is anything serializable that can also name its ledger summary:
//! the small, non-identifying subset of fields that is anchored on-chain next
//! to the ciphertext digest. Everything else only ever exists encrypted.

use cardiosecure_core::block::now_iso8601;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Keys of a free-form JSON record that may appear in the ledger summary.
pub const SUMMARY_ALLOW_LIST: &[&str] = &["bpm", "category", "kind", "unit", "value"];

/// A record the vault can seal.
pub trait VaultRecord: Serialize {
    /// The PII-free fields anchored in the ledger block.
    fn ledger_summary(&self) -> Map<String, Value>;
}

/// Heart-rate band used for the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeartRateCategory {
    /// Below 60 bpm.
    Bradycardia,
    /// 60 to 100 bpm inclusive.
    Normal,
    /// Above 100 bpm.
    Tachycardia,
}

impl HeartRateCategory {
    /// Classify a resting heart rate.
    pub fn classify(bpm: u16) -> Self {
        match bpm {
            0..=59 => HeartRateCategory::Bradycardia,
            60..=100 => HeartRateCategory::Normal,
            _ => HeartRateCategory::Tachycardia,
        }
    }

    /// The label stored in records and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartRateCategory::Bradycardia => "Bradycardia",
            HeartRateCategory::Normal => "Normal",
            HeartRateCategory::Tachycardia => "Tachycardia",
        }
    }
}

impl fmt::Display for HeartRateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heart-rate measurement for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateReading {
    pub patient_id: String,
    pub bpm: u16,
    pub category: HeartRateCategory,
    /// ISO-8601 UTC.
    pub measured_at: String,
}

impl HeartRateReading {
    /// A reading measured now. The category is derived from `bpm`.
    pub fn new(patient_id: impl Into<String>, bpm: u16) -> Self {
        Self::at(patient_id, bpm, now_iso8601())
    }

    /// A reading with an explicit measurement time.
    pub fn at(patient_id: impl Into<String>, bpm: u16, measured_at: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            bpm,
            category: HeartRateCategory::classify(bpm),
            measured_at: measured_at.into(),
        }
    }
}

impl VaultRecord for HeartRateReading {
    fn ledger_summary(&self) -> Map<String, Value> {
        let mut summary = Map::new();
        summary.insert("category".into(), Value::from(self.category.as_str()));
        summary.insert("value".into(), Value::from(self.bpm));
        summary.insert("unit".into(), Value::from("bpm"));
        summary
    }
}

impl VaultRecord for Map<String, Value> {
    fn ledger_summary(&self) -> Map<String, Value> {
        self.iter()
            .filter(|(k, _)| SUMMARY_ALLOW_LIST.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
