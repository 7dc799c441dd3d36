use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub const CLASSIFY_ENDPOINT: &str = "/api/classify";
pub const IMAGE_FIELD: &str = "image";
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const NO_IMAGE_MESSAGE: &str = "No image file provided";
pub const NOT_AN_IMAGE_MESSAGE: &str = "Only image files are allowed";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File too large";
pub const CLASSIFICATION_FAILED_MESSAGE: &str = "Failed to process image classification";

pub const ANALYSIS_ERROR_CONDITION: &str = "Analysis Error";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Body of a successful `POST /api/classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub condition: String,
    /// Probability in `[0, 1]`.
    pub confidence: f64,
    pub severity: Severity,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    /// Result the client renders when the request itself failed, so the
    /// result card always has something to show.
    pub fn analysis_error() -> Self {
        Self {
            condition: ANALYSIS_ERROR_CONDITION.to_string(),
            confidence: 0.0,
            severity: Severity::Medium,
            description: "Unable to analyze the image. Please try again or consult a healthcare professional."
                .to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
