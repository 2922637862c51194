//! Image normalization
//!
//! The API ships images as bare base64 strings. Everything handed to the
//! UI is a renderable `data:` URI, or the placeholder for profile pictures.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// Placeholder shown when a user has no profile picture
pub const DEFAULT_PROFILE_IMAGE: &str = "assets/default-profile.png";

const IMAGE_MIME: &str = "image/jpeg";

/// Wrap a base64 payload from the API in a `data:` URI
pub fn data_uri(encoded: &str) -> String {
    format!("data:{};base64,{}", IMAGE_MIME, encoded)
}

/// Optional image: blank or missing payloads stay absent
pub fn optional_image(encoded: Option<&str>) -> Option<String> {
    encoded
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(data_uri)
}

/// Profile image with placeholder fallback
pub fn profile_image(encoded: Option<&str>) -> String {
    optional_image(encoded).unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string())
}

/// A file selected for upload as a multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing its content type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::validation(format!("not a file: {}", path.display())))?
            .to_string();
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(file_name, mime, bytes))
    }

    /// Local preview before the upload is sent
    pub fn preview_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}
