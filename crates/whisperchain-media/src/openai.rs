//! OpenAI image generation client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use whisperchain_core::error::DomainError;
use whisperchain_game::application::ports::ImageGenerator;

/// Configuration for [`OpenAiImageGenerator`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the images API, e.g. `https://api.openai.com/v1/images`.
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Optional organization header.
    pub organization: Option<String>,
    /// Model name, e.g. `dall-e-3`.
    pub model: String,
    /// When false, no requests are sent and the placeholder URL is returned.
    /// Keeps local development free of API spend.
    pub active: bool,
    /// URL returned while the API is inactive.
    pub placeholder_url: String,
}

/// Wire request for the image generations endpoint.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

/// Wire response from the image generations endpoint.
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

/// [`ImageGenerator`] backed by the OpenAI images API.
#[derive(Debug, Clone)]
pub struct OpenAiImageGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiImageGenerator {
    /// Creates a generator client.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        if !self.config.active {
            return Ok(self.config.placeholder_url.clone());
        }

        let mut request = self
            .client
            .post(format!("{}/generations", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&GenerationRequest {
                model: &self.config.model,
                prompt,
                n: 1,
                size: "1024x1024",
            });
        if let Some(organization) = &self.config.organization {
            request = request.header("OpenAI-Organization", organization);
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                DomainError::Infrastructure(format!("image generation request failed: {e}"))
            })?;
        let body: GenerationResponse = response.json().await.map_err(|e| {
            DomainError::Infrastructure(format!("image generation response malformed: {e}"))
        })?;

        body.data
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| {
                DomainError::Infrastructure("image generation returned no images".into())
            })
    }
}
