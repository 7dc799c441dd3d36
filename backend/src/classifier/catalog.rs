use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{ClassificationResult, Severity};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error reading catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Catalog has no entries")]
    Empty,
    #[error("Catalog entry {index} has an empty condition")]
    EmptyCondition { index: usize },
    #[error("Catalog entry '{condition}' has confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { condition: String, confidence: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub condition: String,
    pub confidence: f64,
    pub severity: Severity,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(
        condition: impl Into<String>,
        confidence: f64,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            condition: condition.into(),
            confidence,
            severity,
            description: description.into(),
        }
    }

    pub fn to_result(&self, timestamp: DateTime<Utc>) -> ClassificationResult {
        ClassificationResult {
            condition: self.condition.clone(),
            confidence: self.confidence,
            severity: self.severity,
            description: self.description.clone(),
            timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[allow(dead_code)]
    version: u32,
    entries: Vec<CatalogEntry>,
}

/// Immutable table of canned outcomes. Always non-empty once constructed.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[CatalogEntry]>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            if entry.condition.trim().is_empty() {
                return Err(CatalogError::EmptyCondition { index });
            }
            if !entry.confidence.is_finite() || !(0.0..=1.0).contains(&entry.confidence) {
                return Err(CatalogError::ConfidenceOutOfRange {
                    condition: entry.condition.clone(),
                    confidence: entry.confidence,
                });
            }
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    pub fn builtin() -> Self {
        let entries: Vec<CatalogEntry> = vec![
            CatalogEntry::new(
                "Melanoma",
                0.87,
                Severity::High,
                "Irregular pigmentation and asymmetric borders consistent with melanoma. \
                 Prompt evaluation by a dermatologist is strongly recommended.",
            ),
            CatalogEntry::new(
                "Benign Nevus",
                0.92,
                Severity::Low,
                "Symmetric, evenly pigmented lesion typical of a common mole. \
                 Routine self-monitoring for changes is advised.",
            ),
            CatalogEntry::new(
                "Seborrheic Keratosis",
                0.78,
                Severity::Low,
                "Waxy, stuck-on appearance characteristic of a benign skin growth. \
                 No treatment is usually required.",
            ),
            CatalogEntry::new(
                "Basal Cell Carcinoma",
                0.84,
                Severity::Medium,
                "Pearly papule with visible vessels suggestive of basal cell carcinoma. \
                 Schedule a dermatology appointment for assessment.",
            ),
        ];
        Self {
            entries: entries.into(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.entries)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }
}
