//! Whisperchain — media infrastructure.
//!
//! Outbound clients for the game context's image ports: the OpenAI image
//! generation API and a Cloudinary-style unsigned-upload image host.

pub mod cloudinary;
pub mod openai;
