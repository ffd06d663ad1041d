//! Checks an upload must pass before it is sent to the classifier.

use thiserror::Error;

use crate::models::ImageRef;

/// Largest accepted image (10 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UploadError {
    #[error("No file provided")]
    Missing,

    #[error("Uploaded file is empty")]
    Empty,

    #[error("'{file_name}' is not an image ({mime_type})")]
    NotAnImage { file_name: String, mime_type: String },

    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),
}

/// An image received from the browser, held in memory for the duration of
/// one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Use the declared content type when the browser sent one, otherwise
    /// guess from the file extension.
    pub fn with_detected_mime(file_name: &str, declared: Option<&str>, bytes: Vec<u8>) -> Self {
        let mime_type = match declared.map(str::trim) {
            Some(mime) if !mime.is_empty() => mime.to_ascii_lowercase(),
            _ => mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };
        Self::new(file_name, mime_type, bytes)
    }

    /// The upload as the browser will display it, available before the
    /// classifier answers.
    pub fn local_ref(&self) -> ImageRef {
        ImageRef::from_bytes(&self.mime_type, &self.bytes)
    }
}

pub fn validate_upload(upload: &ImageUpload, max_bytes: usize) -> Result<(), UploadError> {
    if upload.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if !upload.mime_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            file_name: upload.file_name.clone(),
            mime_type: upload.mime_type.clone(),
        });
    }
    if upload.bytes.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: upload.bytes.len(),
            max: max_bytes,
        });
    }
    Ok(())
}

/// Only absolute http(s) URLs can be fetched by the classifier.
pub fn validate_image_url(url: &str) -> Result<(), UploadError> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|e| UploadError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(UploadError::InvalidUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_small_image() {
        let upload = ImageUpload::new("xray.jpg", "image/jpeg", vec![0xFF, 0xD8]);
        assert_eq!(validate_upload(&upload, DEFAULT_MAX_UPLOAD_BYTES), Ok(()));
    }

    #[test]
    fn rejects_empty_file() {
        let upload = ImageUpload::new("xray.jpg", "image/jpeg", Vec::new());
        assert_eq!(validate_upload(&upload, 10), Err(UploadError::Empty));
    }

    #[test]
    fn rejects_non_image_mime() {
        let upload = ImageUpload::new("report.pdf", "application/pdf", vec![1]);
        assert!(matches!(
            validate_upload(&upload, 10),
            Err(UploadError::NotAnImage { .. })
        ));
    }

    #[test]
    fn rejects_oversized_file() {
        let upload = ImageUpload::new("xray.png", "image/png", vec![0; 11]);
        assert_eq!(
            validate_upload(&upload, 10),
            Err(UploadError::TooLarge { size: 11, max: 10 })
        );
    }

    #[test]
    fn detected_mime_prefers_declared_type() {
        let upload = ImageUpload::with_detected_mime("scan.bin", Some("Image/PNG"), vec![1]);
        assert_eq!(upload.mime_type, "image/png");
    }

    #[test]
    fn detected_mime_guesses_from_extension() {
        let upload = ImageUpload::with_detected_mime("scan.jpeg", None, vec![1]);
        assert_eq!(upload.mime_type, "image/jpeg");

        let unknown = ImageUpload::with_detected_mime("scan", Some("  "), vec![1]);
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[test]
    fn local_ref_inlines_bytes() {
        let upload = ImageUpload::new("a.png", "image/png", b"abc".to_vec());
        assert_eq!(upload.local_ref().as_str(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn url_validation_accepts_http_only() {
        assert!(validate_image_url("https://example.org/xray.jpg").is_ok());
        assert!(validate_image_url("ftp://example.org/xray.jpg").is_err());
        assert!(validate_image_url("not a url").is_err());
    }
}
