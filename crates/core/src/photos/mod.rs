//! Photo storage seam.
//!
//! Certification photos are uploaded before anything is written to the
//! database. Implementations return a durable, publicly readable URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Raw image bytes received from a client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPhoto {
    /// Storage-relative key, e.g. `kakao_1/0190....jpg`
    pub key: String,
    /// Public download URL
    pub url: String,
}

/// Image formats accepted for certifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Jpeg,
    Png,
    Webp,
    Heic,
}

impl PhotoKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(PhotoKind::Jpeg),
            "image/png" => Some(PhotoKind::Png),
            "image/webp" => Some(PhotoKind::Webp),
            "image/heic" | "image/heif" => Some(PhotoKind::Heic),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PhotoKind::Jpeg => "jpg",
            PhotoKind::Png => "png",
            PhotoKind::Webp => "webp",
            PhotoKind::Heic => "heic",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            PhotoKind::Jpeg => "image/jpeg",
            PhotoKind::Png => "image/png",
            PhotoKind::Webp => "image/webp",
            PhotoKind::Heic => "image/heic",
        }
    }
}

/// Checks an upload against the accepted formats and the size limit.
pub fn validate_upload(upload: &PhotoUpload, max_bytes: usize) -> Result<PhotoKind> {
    if upload.bytes.is_empty() {
        return Err(Error::invalid_input("Photo is empty"));
    }
    if upload.bytes.len() > max_bytes {
        return Err(Error::invalid_input(format!(
            "Photo exceeds the {} byte limit",
            max_bytes
        )));
    }
    PhotoKind::from_content_type(&upload.content_type).ok_or_else(|| {
        Error::invalid_input(format!(
            "Unsupported photo type '{}'",
            upload.content_type
        ))
    })
}

/// Trait for durable photo storage.
#[async_trait]
pub trait PhotoStoreTrait: Send + Sync {
    /// Stores the photo under `owner_id` and returns its public reference.
    async fn put(&self, owner_id: &str, upload: PhotoUpload) -> Result<StoredPhoto>;

    /// Removes a previously stored photo given its public URL.
    async fn delete(&self, url: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: usize, content_type: &str) -> PhotoUpload {
        PhotoUpload {
            bytes: vec![0xFF; bytes],
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_content_type_parsing() {
        assert_eq!(
            PhotoKind::from_content_type("image/JPEG; charset=binary"),
            Some(PhotoKind::Jpeg)
        );
        assert_eq!(PhotoKind::from_content_type("image/heif"), Some(PhotoKind::Heic));
        assert_eq!(PhotoKind::from_content_type("text/plain"), None);
        assert_eq!(PhotoKind::Png.extension(), "png");
    }

    #[test]
    fn test_validate_upload() {
        assert_eq!(
            validate_upload(&upload(10, "image/png"), 100).unwrap(),
            PhotoKind::Png
        );
        assert!(validate_upload(&upload(0, "image/png"), 100).is_err());
        assert!(validate_upload(&upload(101, "image/png"), 100).is_err());
        assert!(validate_upload(&upload(10, "application/pdf"), 100).is_err());
    }
}
