//! Shared test fakes and utilities for the Whisperchain backend.

mod clock;
mod media;
mod store;

pub use clock::FixedClock;
pub use media::{
    FailingImageGenerator, FailingImageHost, RecordingImageGenerator, StubImageHost,
};
pub use store::{FailingStore, InMemoryStore};
