//! The voice pool: one slot of logical metadata per hardware voice.

use chime_core::{Error, Priority, Result, SoundId};
use tracing::{debug, warn};

use crate::backend::{AudioBackend, PlaybackState, VoiceHandle};

/// Logical metadata for one hardware voice.
///
/// The occupant is what the *engine* believes is on the voice; the
/// hardware may have finished playback on its own since. Callers that
/// care about the real-time state query the backend through
/// [`VoicePool::state_of`] instead of trusting the occupant.
#[derive(Debug, Clone)]
pub struct VoiceSlot {
    handle: VoiceHandle,
    occupant: Option<SoundId>,
    bound_buffer: String,
    priority: Priority,
}

impl VoiceSlot {
    fn new(handle: VoiceHandle) -> Self {
        Self {
            handle,
            occupant: None,
            bound_buffer: String::new(),
            priority: Priority::MIN,
        }
    }

    pub const fn handle(&self) -> VoiceHandle {
        self.handle
    }

    pub const fn occupant(&self) -> Option<SoundId> {
        self.occupant
    }

    /// Name of the asset last bound to this voice, or "" if none ever was.
    /// Survives the occupant being cleared so replays of the same asset
    /// can skip rebinding.
    pub fn bound_buffer(&self) -> &str {
        &self.bound_buffer
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }
}

/// Fixed-size array of voice slots backed by hardware voices.
#[derive(Debug)]
pub struct VoicePool {
    slots: Vec<VoiceSlot>,
}

impl VoicePool {
    /// Acquire up to `requested` hardware voices, halving the request and
    /// retrying whenever the backend refuses, so driver limits degrade the
    /// pool instead of failing construction. Fails with [`Error::NoVoices`]
    /// only when not a single voice can be created.
    pub fn acquire<B: AudioBackend>(backend: &mut B, requested: u32) -> Result<Self> {
        let mut count = requested;
        while count > 0 {
            match backend.create_voices(count) {
                Ok(handles) => {
                    if count < requested {
                        warn!("voice pool degraded: {count} of {requested} requested voices");
                    }
                    return Ok(Self {
                        slots: handles.into_iter().map(VoiceSlot::new).collect(),
                    });
                }
                Err(err) => {
                    debug!("backend refused {count} voices ({err}), halving");
                    count >>= 1;
                }
            }
        }
        Err(Error::NoVoices)
    }

    /// Number of voices actually granted. May be less than requested.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> &VoiceSlot {
        &self.slots[index]
    }

    pub fn slots(&self) -> impl Iterator<Item = &VoiceSlot> {
        self.slots.iter()
    }

    /// Every hardware handle in slot order, for bulk backend calls.
    pub fn handles(&self) -> Vec<VoiceHandle> {
        self.slots.iter().map(VoiceSlot::handle).collect()
    }

    /// The backend's real-time state for the voice in `index`.
    pub fn state_of<B: AudioBackend>(
        &self,
        backend: &mut B,
        index: usize,
    ) -> Result<PlaybackState> {
        backend.playback_state(self.slots[index].handle)
    }

    /// Resolve a sound id to the slot currently backing it.
    ///
    /// Linear scan; fine at hardware pool sizes (tens of voices). Returns
    /// `None` once the sound has been stopped or stolen.
    pub fn slot_of(&self, id: SoundId) -> Option<usize> {
        self.slots.iter().position(|s| s.occupant == Some(id))
    }

    /// Record a new occupant for `index`.
    pub fn assign(&mut self, index: usize, id: SoundId, priority: Priority) {
        let slot = &mut self.slots[index];
        slot.occupant = Some(id);
        slot.priority = priority;
    }

    /// Record which asset is bound to the voice in `index`.
    pub fn set_bound_buffer(&mut self, index: usize, name: &str) {
        self.slots[index].bound_buffer = name.to_string();
    }

    /// Drop the occupant but keep the bound-buffer name, so a replay of
    /// the same asset still skips the rebind.
    pub fn clear_occupant(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.occupant = None;
        slot.priority = Priority::MIN;
    }

    /// Reset every slot to its just-constructed state.
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.occupant = None;
            slot.bound_buffer.clear();
            slot.priority = Priority::MIN;
        }
    }
}
