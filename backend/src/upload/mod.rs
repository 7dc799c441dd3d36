pub mod extractor;

pub use extractor::{ImageUpload, UploadConfig};

/// An image received on one request. Lives only as long as that request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            file_name,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("upload")
    }
}
