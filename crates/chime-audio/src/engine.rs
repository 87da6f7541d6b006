//! The sound engine facade: load, play, steal, control.

use std::collections::HashMap;
use std::path::Path;

use chime_core::{Error, PlayParams, Result, SoundId};
use tracing::{debug, info, trace, warn};

use crate::allocator::{select_slot, Claim};
use crate::backend::{AudioBackend, BufferHandle, PlaybackState, PAN_LISTENER_POSITION};
use crate::identity::IdSource;
use crate::pool::VoicePool;

/// Engine construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Voices to request from the backend. The grant may be smaller;
    /// check [`SoundEngine::voice_count`]. Small pools (16 or 32) are
    /// kinder to drivers than large ones.
    pub voices: u32,
    /// Initialize and shut down the backend context with this engine.
    /// With several engines on one backend, at most one should manage the
    /// context; create that one first and drop it last.
    pub manage_context: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voices: 32,
            manage_context: true,
        }
    }
}

/// Polyphonic sound engine over a fixed pool of backend voices.
///
/// Every operation runs synchronously on the calling thread. The engine
/// is single-owner by construction (`&mut self` throughout); wrap it in
/// your own lock if several threads need to drive it.
pub struct SoundEngine<B: AudioBackend> {
    backend: B,
    pool: VoicePool,
    buffers: HashMap<String, BufferHandle>,
    ids: IdSource,
    manage_context: bool,
}

impl<B: AudioBackend> SoundEngine<B> {
    /// Build an engine, initializing the backend context if configured and
    /// acquiring the voice pool.
    ///
    /// A partial voice grant constructs successfully with a smaller pool;
    /// only a grant of zero fails, with [`Error::NoVoices`].
    pub fn new(mut backend: B, config: EngineConfig) -> Result<Self> {
        if config.manage_context {
            backend.init()?;
            backend.set_listener_position(PAN_LISTENER_POSITION)?;
        }

        let pool = VoicePool::acquire(&mut backend, config.voices)?;
        info!(
            "sound engine ready: {} of {} requested voices",
            pool.len(),
            config.voices
        );

        Ok(Self {
            backend,
            pool,
            buffers: HashMap::new(),
            ids: IdSource::new(),
            manage_context: config.manage_context,
        })
    }

    /// Voices actually granted by the backend.
    pub fn voice_count(&self) -> usize {
        self.pool.len()
    }

    /// The backend, for implementation-specific configuration.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Decode the file at `path` and register it under `name`.
    ///
    /// Names are unique; a duplicate fails before touching the backend.
    pub fn load_sound(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        if self.buffers.contains_key(name) {
            return Err(Error::DuplicateSound(name.to_string()));
        }

        let path = path.as_ref();
        let buffer = self.backend.load_buffer(path)?;
        self.buffers.insert(name.to_string(), buffer);
        debug!("loaded \"{name}\" from {}", path.display());
        Ok(())
    }

    /// Stop and clear every voice, then release every registered buffer.
    ///
    /// Buffers are removed from the registry one by one as the backend
    /// releases them, so a failure leaves exactly the unreleased entries
    /// registered and a retry picks up where this stopped.
    pub fn unload_all_sounds(&mut self) -> Result<()> {
        self.clear_all_channels()?;

        while let Some(name) = self.buffers.keys().next().cloned() {
            let buffer = self.buffers[&name];
            self.backend.release_buffer(buffer)?;
            self.buffers.remove(&name);
        }
        debug!("all sounds unloaded");
        Ok(())
    }

    /// Stop every voice and reset it to hardware defaults: no buffer, no
    /// loop, centred, unit pitch and gain, no logical occupant.
    pub fn clear_all_channels(&mut self) -> Result<()> {
        self.stop_all_sounds()?;

        for handle in self.pool.handles() {
            self.backend.bind_buffer(handle, None)?;
            self.backend.set_looping(handle, false)?;
            self.backend.set_pan(handle, 0.0)?;
            self.backend.set_pitch(handle, 1.0)?;
            self.backend.set_gain(handle, 1.0)?;
        }
        self.pool.clear_all();
        Ok(())
    }

    /// Start a sound, stealing a lower-priority voice if the pool is full.
    ///
    /// Returns the id addressing this play instance in later calls. Fails
    /// with [`Error::Exhausted`] when no voice is free, finished, or
    /// strictly below `params.priority`, and [`Error::UnknownSound`] when
    /// `name` was never loaded.
    pub fn play_new_sound(&mut self, name: &str, params: PlayParams) -> Result<SoundId> {
        let Some(claim) = select_slot(&self.pool, &mut self.backend, params.priority)? else {
            debug!(
                "no voice for \"{name}\" at priority {}",
                params.priority.as_u32()
            );
            return Err(Error::Exhausted);
        };

        let index = claim.index();
        let handle = self.pool.slot(index).handle();

        if let Claim::Evict(_) = claim {
            trace!(
                "stealing voice {index} from sound {:?}",
                self.pool.slot(index).occupant()
            );
            self.backend.stop(handle)?;
        }

        // Same asset as last time on this voice: the buffer is already
        // bound, skip the backend round-trip.
        if self.pool.slot(index).bound_buffer() != name {
            let buffer = *self
                .buffers
                .get(name)
                .ok_or_else(|| Error::UnknownSound(name.to_string()))?;
            self.backend.bind_buffer(handle, Some(buffer))?;
            self.pool.set_bound_buffer(index, name);
        }

        let params = params.clamped();
        self.backend.set_looping(handle, params.repeat)?;
        self.backend.set_pan(handle, params.pan)?;
        self.backend.set_pitch(handle, params.pitch)?;
        self.backend.set_gain(handle, params.gain)?;

        let id = self.ids.mint();
        self.pool.assign(index, id, params.priority);
        self.backend.play(handle)?;

        trace!("sound {id} (\"{name}\") playing on voice {index}");
        Ok(id)
    }

    /// Whether `id` still occupies a voice.
    ///
    /// This consults the logical table only: a voice whose playback
    /// finished naturally still reads as active here until an allocation
    /// reuses the slot. Stopping or stealing the sound flips it to false
    /// immediately.
    pub fn sound_is_active(&self, id: SoundId) -> bool {
        self.pool.slot_of(id).is_some()
    }

    /// Stop a sound, making its id unresolvable and its voice reusable.
    pub fn stop_sound(&mut self, id: SoundId) -> Result<()> {
        let index = self.slot_for(id)?;
        self.backend.stop(self.pool.slot(index).handle())?;
        self.pool.clear_occupant(index);
        Ok(())
    }

    /// Pause a sound the backend currently reports as playing.
    pub fn pause_sound(&mut self, id: SoundId) -> Result<()> {
        let index = self.slot_for(id)?;
        let handle = self.pool.slot(index).handle();
        match self.backend.playback_state(handle)? {
            PlaybackState::Playing => self.backend.pause(handle),
            _ => Err(Error::InvalidState("pause requires a playing voice")),
        }
    }

    /// Resume a sound the backend currently reports as paused.
    pub fn resume_sound(&mut self, id: SoundId) -> Result<()> {
        let index = self.slot_for(id)?;
        let handle = self.pool.slot(index).handle();
        match self.backend.playback_state(handle)? {
            PlaybackState::Paused => self.backend.play(handle),
            _ => Err(Error::InvalidState("resume requires a paused voice")),
        }
    }

    /// Replay a sound from the beginning, whatever state it is in.
    pub fn restart_sound(&mut self, id: SoundId) -> Result<()> {
        let index = self.slot_for(id)?;
        let handle = self.pool.slot(index).handle();
        self.backend.rewind(handle)?;
        self.backend.play(handle)
    }

    /// Reposition a sound. Out-of-range values are the backend's problem.
    pub fn set_sound_pan(&mut self, id: SoundId, pan: f32) -> Result<()> {
        let index = self.slot_for(id)?;
        self.backend.set_pan(self.pool.slot(index).handle(), pan)
    }

    /// Change a sound's playback rate. Negative values clamp to 0.
    pub fn set_sound_pitch(&mut self, id: SoundId, pitch: f32) -> Result<()> {
        let index = self.slot_for(id)?;
        self.backend
            .set_pitch(self.pool.slot(index).handle(), pitch.max(0.0))
    }

    /// Change a sound's gain. Negative values clamp to 0.
    pub fn set_sound_gain(&mut self, id: SoundId, gain: f32) -> Result<()> {
        let index = self.slot_for(id)?;
        self.backend
            .set_gain(self.pool.slot(index).handle(), gain.max(0.0))
    }

    /// Stop every voice. Logical occupants stay recorded; the voices are
    /// fair game for the next allocation via their stopped state.
    pub fn stop_all_sounds(&mut self) -> Result<()> {
        for handle in self.pool.handles() {
            self.backend.stop(handle)?;
        }
        Ok(())
    }

    /// Pause every voice that is currently playing; others are untouched.
    pub fn pause_all_sounds(&mut self) -> Result<()> {
        for handle in self.pool.handles() {
            if self.backend.playback_state(handle)? == PlaybackState::Playing {
                self.backend.pause(handle)?;
            }
        }
        Ok(())
    }

    /// Resume every voice that is currently paused; others are untouched.
    pub fn resume_all_sounds(&mut self) -> Result<()> {
        for handle in self.pool.handles() {
            if self.backend.playback_state(handle)? == PlaybackState::Paused {
                self.backend.play(handle)?;
            }
        }
        Ok(())
    }

    fn slot_for(&self, id: SoundId) -> Result<usize> {
        self.pool.slot_of(id).ok_or(Error::SoundNotActive(id))
    }
}

impl<B: AudioBackend> Drop for SoundEngine<B> {
    fn drop(&mut self) {
        if let Err(err) = self.unload_all_sounds() {
            warn!("teardown: failed to unload sounds: {err}");
        }
        if let Err(err) = self.backend.release_voices(&self.pool.handles()) {
            warn!("teardown: failed to release voices: {err}");
        }
        if self.manage_context {
            if let Err(err) = self.backend.shutdown() {
                warn!("teardown: failed to shut down backend context: {err}");
            }
        }
    }
}
