use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{ClassificationResult, ErrorResponse, CLASSIFY_ENDPOINT, IMAGE_FIELD};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to build request: {0}")]
    Request(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Uploads `file` as the `image` part and decodes the classification.
pub async fn classify_image(file: &GlooFile) -> Result<ClassificationResult, ApiError> {
    let form_data =
        web_sys::FormData::new().map_err(|e| ApiError::Request(format!("{:?}", e)))?;
    form_data
        .append_with_blob_and_filename(IMAGE_FIELD, file.as_ref(), &file.name())
        .map_err(|e| ApiError::Request(format!("{:?}", e)))?;

    let request = Request::post(CLASSIFY_ENDPOINT)
        .body(form_data)
        .map_err(|e| ApiError::Request(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => match err.details {
                Some(details) => format!("{} ({})", err.error, details),
                None => err.error,
            },
            Err(_) => body,
        };
        return Err(ApiError::Server { status, message });
    }

    response
        .json::<ClassificationResult>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
