//! Environment-backed configuration, read once at startup.

use whisperchain_media::cloudinary::CloudinaryConfig;
use whisperchain_media::openai::OpenAiConfig;

use crate::error::AppError;

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Image generation settings.
    pub openai: OpenAiConfig,
    /// Image hosting settings.
    pub cloudinary: CloudinaryConfig,
}

impl AppConfig {
    /// Reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is missing or
    /// malformed.
    pub fn from_env() -> Result<Self, AppError> {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let database_url = require("DATABASE_URL")?;

        let active: bool = env_or("OPENAI_API_ACTIVE", "false")
            .parse()
            .map_err(|e| AppError::Config(format!("OPENAI_API_ACTIVE must be a bool: {e}")))?;
        let openai = OpenAiConfig {
            base_url: env_or("OPENAI_API_URL", "https://api.openai.com/v1/images"),
            // The key is only required when requests actually go out.
            api_key: if active {
                require("OPENAI_API_KEY")?
            } else {
                std::env::var("OPENAI_API_KEY").unwrap_or_default()
            },
            organization: std::env::var("OPENAI_ORGANIZATION").ok(),
            model: env_or("OPENAI_IMAGE_MODEL", "dall-e-3"),
            active,
            placeholder_url: env_or(
                "PLACEHOLDER_IMAGE_URL",
                "https://placehold.co/1024x1024.png",
            ),
        };

        let cloudinary = CloudinaryConfig {
            upload_url: require("CLOUDINARY_UPLOAD_URL")?,
            upload_preset: require("CLOUDINARY_UPLOAD_PRESET")?,
            folder: env_or("CLOUDINARY_FOLDER", "whisperchain"),
        };

        Ok(Self {
            host,
            port,
            database_url,
            openai,
            cloudinary,
        })
    }
}

fn require(name: &str) -> Result<String, AppError> {
    std::env::var(name)
        .map_err(|_| AppError::Config(format!("{name} environment variable must be set")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}
