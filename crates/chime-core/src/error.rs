//! Error types for chime.

use crate::types::SoundId;
use thiserror::Error;

/// Result type alias using chime's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for chime.
#[derive(Error, Debug)]
pub enum Error {
    // Allocation errors
    #[error("no voice available at or below the requested priority")]
    Exhausted,

    #[error("no voices could be acquired from the backend")]
    NoVoices,

    // Asset errors
    #[error("sound \"{0}\" is not loaded")]
    UnknownSound(String),

    #[error("sound \"{0}\" is already loaded")]
    DuplicateSound(String),

    // Playback errors
    #[error("sound {0} is not active")]
    SoundNotActive(SoundId),

    #[error("voice is not in the required state: {0}")]
    InvalidState(&'static str),

    // Backend errors
    #[error("backend error: {0}")]
    Backend(String),

    #[error("audio decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Returns true if the operation failed because the target sound or
    /// asset does not exist (as opposed to a hardware fault).
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownSound(_) | Self::SoundNotActive(_))
    }

    /// Returns true if this error originated in the audio backend.
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Decode(_))
    }
}
