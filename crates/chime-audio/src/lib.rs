//! # chime-audio
//!
//! Fixed-capacity polyphonic voice management for the chime sound engine.
//!
//! A [`SoundEngine`] multiplexes a small pool of hardware playback voices
//! across any number of logical play requests. When every voice is busy,
//! the lowest-priority occupant is stolen for a strictly higher-priority
//! request. In-flight sounds are addressed by a stable [`SoundId`] that
//! stays valid across whatever voice slot happens to back them.
//!
//! The hardware layer itself is behind the [`AudioBackend`] trait; this
//! crate only decides which voice plays what.

pub mod backend;
pub mod engine;
pub mod pool;

pub(crate) mod allocator;
pub(crate) mod identity;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{AudioBackend, BufferHandle, PlaybackState, VoiceHandle};
pub use chime_core::{Error, PlayParams, Priority, Result, SoundId};
pub use engine::{EngineConfig, SoundEngine};
