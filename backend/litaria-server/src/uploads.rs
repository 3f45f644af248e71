/// Image upload client (Cloudinary signed uploads)
///
/// Validates the file locally, then posts it to the Cloudinary upload API
/// with a SHA-1 request signature over the sorted parameter string.
use crate::config::UploadConfig;
use crate::error::{AppError, Result};
use chrono::Utc;
use serde::Deserialize;
use sha1::{Digest, Sha1};

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Result of a successful upload, passed straight through to the client.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct UploadedImage {
    #[serde(rename = "secure_url")]
    pub image_url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
}

pub struct ImageUploader {
    config: UploadConfig,
    http: reqwest::Client,
}

impl ImageUploader {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Reject files that are not images or exceed the size limit before any
    /// bytes leave the service.
    pub fn validate(&self, content_type: Option<&str>, size: usize) -> Result<()> {
        let content_type = content_type
            .ok_or_else(|| AppError::Validation("File is missing a content type".into()))?;

        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::Validation(format!(
                "Unsupported image type: {}",
                content_type
            )));
        }

        if size > self.config.max_file_bytes {
            return Err(AppError::Validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.config.max_file_bytes
            )));
        }

        Ok(())
    }

    /// Upload image bytes, returning the hosted URL and dimensions.
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadedImage> {
        let timestamp = Utc::now().timestamp();
        let signature = self.sign(timestamp);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", self.config.folder.clone())
            .text("signature", signature)
            .part("file", part);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Image host request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "image host rejected upload: {}", body);
            return Err(AppError::Internal("Image upload failed".into()));
        }

        let uploaded = response
            .json::<UploadedImage>()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid image host response: {}", e)))?;

        Ok(uploaded)
    }

    /// Cloudinary signature: SHA-1 hex over the alphabetically sorted
    /// parameters (excluding file and api_key) concatenated with the API
    /// secret.
    fn sign(&self, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}{}",
            self.config.folder, timestamp, self.config.api_secret
        );
        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploader() -> ImageUploader {
        ImageUploader::new(UploadConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
            folder: "litaria-posts".into(),
            max_file_bytes: 1024,
        })
    }

    #[test]
    fn validates_content_type_and_size() {
        let up = uploader();
        assert!(up.validate(Some("image/png"), 512).is_ok());
        assert!(up.validate(Some("image/jpeg"), 1024).is_ok());
        assert!(up.validate(Some("application/pdf"), 10).is_err());
        assert!(up.validate(None, 10).is_err());
        assert!(up.validate(Some("image/png"), 4096).is_err());
    }

    #[test]
    fn signature_is_deterministic_sha1_hex() {
        let up = uploader();
        let sig = up.sign(1_700_000_000);
        assert_eq!(sig.len(), 40);
        assert_eq!(sig, up.sign(1_700_000_000));
        assert_ne!(sig, up.sign(1_700_000_001));
    }
}
