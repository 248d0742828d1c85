//! Test media clients — mock `ImageGenerator` and `ImageHost`
//! implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use whisperchain_core::error::DomainError;
use whisperchain_game::application::ports::{ImageGenerator, ImageHost};

/// An image generator that records every prompt it is asked to illustrate
/// and returns a fixed URL.
#[derive(Debug)]
pub struct RecordingImageGenerator {
    url: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingImageGenerator {
    /// Creates a generator that answers every request with `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the prompts generated so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn generated_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        Ok(self.url.clone())
    }
}

/// An image generator that always fails. Useful for testing error paths.
#[derive(Debug)]
pub struct FailingImageGenerator;

#[async_trait]
impl ImageGenerator for FailingImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::Infrastructure(
            "image generation unavailable".into(),
        ))
    }
}

/// An image host that publishes everything under a fixed URL.
#[derive(Debug)]
pub struct StubImageHost {
    url: String,
}

impl StubImageHost {
    /// Creates a host that answers every upload with `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ImageHost for StubImageHost {
    async fn publish(&self, _source_url: &str) -> Result<String, DomainError> {
        Ok(self.url.clone())
    }
}

/// An image host that always fails, for exercising the fallback-to-raw-URL
/// policy.
#[derive(Debug)]
pub struct FailingImageHost;

#[async_trait]
impl ImageHost for FailingImageHost {
    async fn publish(&self, _source_url: &str) -> Result<String, DomainError> {
        Err(DomainError::Infrastructure("upload failed".into()))
    }
}
