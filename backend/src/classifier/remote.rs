use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use shared::{ClassificationResult, Severity, IMAGE_FIELD};
use std::time::Duration;

use super::{Classifier, ClassifierError};
use crate::upload::UploadedImage;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RemotePrediction {
    condition: String,
    confidence: f64,
    severity: Severity,
    #[serde(default)]
    description: String,
    timestamp: Option<DateTime<Utc>>,
}

/// Forwards the upload to an external inference service speaking the same
/// multipart-in, JSON-out contract as `/api/classify`.
#[derive(Clone)]
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, image: &UploadedImage) -> Result<ClassificationResult, ClassifierError> {
        let part = Part::bytes(image.data.clone())
            .file_name(image.display_name().to_owned())
            .mime_str(&image.content_type)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let prediction: RemotePrediction = response.json().await?;
        if !(0.0..=1.0).contains(&prediction.confidence) {
            return Err(ClassifierError::InvalidResponse(format!(
                "confidence {} outside [0, 1]",
                prediction.confidence
            )));
        }

        Ok(ClassificationResult {
            condition: prediction.condition,
            confidence: prediction.confidence,
            severity: prediction.severity,
            description: prediction.description,
            timestamp: prediction.timestamp.unwrap_or_else(Utc::now),
        })
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
