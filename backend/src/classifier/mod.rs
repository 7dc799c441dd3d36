pub mod catalog;
pub mod mock;
pub mod remote;

use async_trait::async_trait;
use shared::ClassificationResult;

use crate::upload::UploadedImage;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Inference backend unavailable: {0}")]
    Unavailable(String),
    #[error("Inference backend returned status {status}: {body}")]
    BadStatus { status: u16, body: String },
    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClassifierError::InvalidResponse(err.to_string())
        } else {
            ClassifierError::Unavailable(err.to_string())
        }
    }
}

/// Turns one uploaded image into a classification. The endpoint only ever
/// sees this trait, so a real inference backend can replace the mock.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &UploadedImage) -> Result<ClassificationResult, ClassifierError>;

    fn name(&self) -> &'static str;
}
