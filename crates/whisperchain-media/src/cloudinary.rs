//! Cloudinary-style unsigned-upload image host client.
//!
//! Generated image URLs expire quickly at the generator, so each one is
//! re-uploaded to the image host under a random public id. The decision to
//! fall back to the raw URL when hosting fails belongs to the caller; this
//! client only reports the failure.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;
use whisperchain_core::error::DomainError;
use whisperchain_game::application::ports::ImageHost;

/// Configuration for [`CloudinaryImageHost`].
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Full unsigned-upload endpoint, e.g.
    /// `https://api.cloudinary.com/v1_1/<cloud>/image/upload`.
    pub upload_url: String,
    /// Unsigned upload preset name.
    pub upload_preset: String,
    /// Target folder for uploaded images.
    pub folder: String,
}

/// Wire response from the upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// [`ImageHost`] backed by an unsigned Cloudinary upload preset.
#[derive(Debug, Clone)]
pub struct CloudinaryImageHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryImageHost {
    /// Creates a host client.
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    async fn publish(&self, source_url: &str) -> Result<String, DomainError> {
        let public_id = Uuid::new_v4().to_string();
        let params = [
            ("file", source_url),
            ("upload_preset", &self.config.upload_preset),
            ("folder", &self.config.folder),
            ("public_id", &public_id),
        ];

        let response = self
            .client
            .post(&self.config.upload_url)
            .form(&params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DomainError::Infrastructure(format!("image upload failed: {e}")))?;
        let body: UploadResponse = response.json().await.map_err(|e| {
            DomainError::Infrastructure(format!("image upload response malformed: {e}"))
        })?;

        Ok(body.secure_url)
    }
}
