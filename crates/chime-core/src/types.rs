//! Value types shared across the engine.

use serde::{Deserialize, Serialize};

/// Identifier for one play instance of a sound.
///
/// Ids are minted per engine instance, start at 1 and only ever increase,
/// so an id never refers to more than one play instance for the lifetime
/// of its engine. The id stays valid while the sound occupies a voice and
/// becomes unresolvable once the voice is stopped or stolen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SoundId(u64);

impl SoundId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SoundId> for u64 {
    fn from(id: SoundId) -> Self {
        id.0
    }
}

/// Eviction weight of a playing sound. Higher wins.
///
/// A full pool only steals a voice whose priority is strictly below the
/// incoming request, so equal-priority sounds never displace each other
/// and [`Priority::MAX`] occupants are never displaced at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u32);

impl Priority {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(u32::MAX);
    /// Middle-of-the-road weight used when the caller does not care.
    pub const DEFAULT: Self = Self(1024);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Priority {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Parameters for starting a new sound.
///
/// `..PlayParams::default()` gives the common case: play once at the
/// default priority, centred, unity gain and pitch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayParams {
    /// Loop the sound until explicitly stopped.
    pub repeat: bool,
    /// Eviction weight when the pool is full.
    pub priority: Priority,
    /// Stereo position: -1.0 hard left, 0.0 centre, 1.0 hard right.
    /// Values outside that range are passed to the backend unvalidated.
    pub pan: f32,
    /// Linear gain. Negative values are clamped to 0.0.
    pub gain: f32,
    /// Playback rate multiplier. Negative values are clamped to 0.0.
    pub pitch: f32,
}

impl Default for PlayParams {
    fn default() -> Self {
        Self {
            repeat: false,
            priority: Priority::DEFAULT,
            pan: 0.0,
            gain: 1.0,
            pitch: 1.0,
        }
    }
}

impl PlayParams {
    /// Returns a copy with gain and pitch clamped to the non-negative
    /// range the backend accepts. Pan is deliberately left untouched.
    pub fn clamped(self) -> Self {
        Self {
            gain: self.gain.max(0.0),
            pitch: self.pitch.max(0.0),
            ..self
        }
    }
}
