use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use futures::future::LocalBoxFuture;
use futures::TryStreamExt;
use shared::{ErrorResponse, FILE_TOO_LARGE_MESSAGE, IMAGE_FIELD, MAX_UPLOAD_BYTES, NOT_AN_IMAGE_MESSAGE};

use super::UploadedImage;

/// Upload limits, registered with `App::app_data`. Falls back to the
/// default when absent.
#[derive(Debug, Clone, Copy)]
pub struct UploadConfig {
    pub max_file_size: usize,
}

impl UploadConfig {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new(MAX_UPLOAD_BYTES)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only image files are allowed (got '{0}')")]
    NotAnImage(String),
    #[error("File exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },
    #[error("Unexpected field '{0}'")]
    UnexpectedField(String),
    #[error("Malformed multipart body: {0}")]
    Malformed(String),
}

impl UploadError {
    fn malformed(err: MultipartError) -> Self {
        UploadError::Malformed(err.to_string())
    }

    fn client_message(&self) -> &'static str {
        match self {
            UploadError::NotAnImage(_) => NOT_AN_IMAGE_MESSAGE,
            UploadError::TooLarge { .. } => FILE_TOO_LARGE_MESSAGE,
            UploadError::UnexpectedField(_) => "Unexpected field",
            UploadError::Malformed(_) => "Malformed multipart body",
        }
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.client_message()))
    }
}

/// The `image` file of a multipart request, validated before any handler
/// sees it. `image` is `None` when the request carried no file at all.
#[derive(Debug)]
pub struct ImageUpload {
    pub image: Option<UploadedImage>,
}

impl FromRequest for ImageUpload {
    type Error = UploadError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let config = req.app_data::<UploadConfig>().copied().unwrap_or_default();

        if !is_multipart(req) {
            return Box::pin(async { Ok(ImageUpload { image: None }) });
        }

        let path = req.path().to_owned();
        let multipart = Multipart::new(req.headers(), payload.take());
        Box::pin(async move {
            read_image(multipart, config)
                .await
                .inspect_err(|e| log::warn!("Rejected upload on {}: {}", path, e))
        })
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_image(mut multipart: Multipart, config: UploadConfig) -> Result<ImageUpload, UploadError> {
    let mut image: Option<UploadedImage> = None;

    while let Some(mut field) = multipart.try_next().await.map_err(UploadError::malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        // text parts carry no file and are ignored
        let Some(file_name) = file_name else {
            drain(&mut field).await?;
            continue;
        };

        if name != IMAGE_FIELD || image.is_some() {
            return Err(UploadError::UnexpectedField(name));
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(UploadError::NotAnImage(content_type));
        }

        let data = read_limited(&mut field, config.max_file_size).await?;
        if !data.is_empty() {
            image = Some(UploadedImage::new(data, content_type, Some(file_name)));
        }
    }

    Ok(ImageUpload { image })
}

async fn read_limited(field: &mut Field, limit: usize) -> Result<Vec<u8>, UploadError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(UploadError::malformed)? {
        if data.len() + chunk.len() > limit {
            return Err(UploadError::TooLarge { limit });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn drain(field: &mut Field) -> Result<(), UploadError> {
    while field.try_next().await.map_err(UploadError::malformed)?.is_some() {}
    Ok(())
}
