//! File attachments for `POST /upload/single`

use std::path::Path;
use reqwest::multipart::Part;
use crate::utils::errors::{AdminError, Result};

/// A file picked by the operator, held in memory until upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an attachment from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => part
                .mime_str(&content_type)
                .map_err(AdminError::Http),
            None => Ok(part),
        }
    }
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(Attachment::new("photo.JPG", vec![]).content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(Attachment::new("banner.webp", vec![]).content_type.as_deref(), Some("image/webp"));
        assert_eq!(Attachment::new("notes", vec![]).content_type, None);
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariff.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.file_name, "tariff.png");
        assert_eq!(attachment.bytes, b"\x89PNG".to_vec());
    }
}
