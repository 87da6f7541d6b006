//! Scripted backend double for tests.
//!
//! Records every call the engine makes and lets tests force per-voice
//! states (simulating playback finishing on its own), cap the voice grant
//! (simulating driver limits) and inject failures.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chime_core::{Error, Result};

use crate::backend::{AudioBackend, BufferHandle, PlaybackState, VoiceHandle};

#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    /// Largest single grant `create_voices` will honor.
    voice_limit: Option<u32>,
    next_voice: u64,
    next_buffer: u64,

    pub states: HashMap<VoiceHandle, PlaybackState>,
    pub bound: HashMap<VoiceHandle, Option<BufferHandle>>,
    pub looping: HashMap<VoiceHandle, bool>,
    pub pans: HashMap<VoiceHandle, f32>,
    pub pitches: HashMap<VoiceHandle, f32>,
    pub gains: HashMap<VoiceHandle, f32>,

    pub bind_calls: usize,
    pub play_calls: usize,
    pub stop_calls: usize,
    pub rewind_calls: usize,

    pub loaded_paths: Vec<String>,
    pub released_buffers: Vec<BufferHandle>,
    pub released_voices: Vec<VoiceHandle>,

    pub failing_buffer_releases: HashSet<BufferHandle>,
    pub fail_next_load: bool,

    pub context_running: bool,
    pub listener: Option<[f32; 3]>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses any single grant larger than `limit`.
    pub fn with_voice_limit(limit: u32) -> Self {
        Self {
            voice_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Overwrite a voice's reported state, as hardware does when playback
    /// runs out of samples without anyone asking.
    pub fn force_state(&mut self, voice: VoiceHandle, state: PlaybackState) {
        self.states.insert(voice, state);
    }

    fn known(&self, voice: VoiceHandle) -> Result<()> {
        if self.states.contains_key(&voice) {
            Ok(())
        } else {
            Err(Error::Backend(format!("unknown voice {}", voice.raw())))
        }
    }
}

impl AudioBackend for MockBackend {
    fn init(&mut self) -> Result<()> {
        self.context_running = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.context_running = false;
        Ok(())
    }

    fn set_listener_position(&mut self, position: [f32; 3]) -> Result<()> {
        self.listener = Some(position);
        Ok(())
    }

    fn create_voices(&mut self, count: u32) -> Result<Vec<VoiceHandle>> {
        if self.voice_limit.is_some_and(|limit| count > limit) {
            return Err(Error::Backend(format!("cannot create {count} voices")));
        }
        let handles: Vec<VoiceHandle> = (0..count)
            .map(|_| {
                self.next_voice += 1;
                VoiceHandle::new(self.next_voice)
            })
            .collect();
        for &handle in &handles {
            self.states.insert(handle, PlaybackState::Initial);
            self.bound.insert(handle, None);
        }
        Ok(handles)
    }

    fn release_voices(&mut self, voices: &[VoiceHandle]) -> Result<()> {
        for &voice in voices {
            self.states.remove(&voice);
            self.released_voices.push(voice);
        }
        Ok(())
    }

    fn load_buffer(&mut self, path: &Path) -> Result<BufferHandle> {
        if self.fail_next_load {
            self.fail_next_load = false;
            return Err(Error::Decode(format!("cannot decode {}", path.display())));
        }
        self.next_buffer += 1;
        self.loaded_paths.push(path.display().to_string());
        Ok(BufferHandle::new(self.next_buffer))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) -> Result<()> {
        if self.failing_buffer_releases.contains(&buffer) {
            return Err(Error::Backend(format!(
                "cannot release buffer {}",
                buffer.raw()
            )));
        }
        self.released_buffers.push(buffer);
        Ok(())
    }

    fn bind_buffer(&mut self, voice: VoiceHandle, buffer: Option<BufferHandle>) -> Result<()> {
        self.known(voice)?;
        self.bind_calls += 1;
        self.bound.insert(voice, buffer);
        Ok(())
    }

    fn set_looping(&mut self, voice: VoiceHandle, looping: bool) -> Result<()> {
        self.known(voice)?;
        self.looping.insert(voice, looping);
        Ok(())
    }

    fn set_pan(&mut self, voice: VoiceHandle, pan: f32) -> Result<()> {
        self.known(voice)?;
        self.pans.insert(voice, pan);
        Ok(())
    }

    fn set_pitch(&mut self, voice: VoiceHandle, pitch: f32) -> Result<()> {
        self.known(voice)?;
        self.pitches.insert(voice, pitch);
        Ok(())
    }

    fn set_gain(&mut self, voice: VoiceHandle, gain: f32) -> Result<()> {
        self.known(voice)?;
        self.gains.insert(voice, gain);
        Ok(())
    }

    fn play(&mut self, voice: VoiceHandle) -> Result<()> {
        self.known(voice)?;
        self.play_calls += 1;
        self.states.insert(voice, PlaybackState::Playing);
        Ok(())
    }

    fn pause(&mut self, voice: VoiceHandle) -> Result<()> {
        self.known(voice)?;
        self.states.insert(voice, PlaybackState::Paused);
        Ok(())
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<()> {
        self.known(voice)?;
        self.stop_calls += 1;
        self.states.insert(voice, PlaybackState::Stopped);
        Ok(())
    }

    fn rewind(&mut self, voice: VoiceHandle) -> Result<()> {
        self.known(voice)?;
        self.rewind_calls += 1;
        self.states.insert(voice, PlaybackState::Initial);
        Ok(())
    }

    fn playback_state(&mut self, voice: VoiceHandle) -> Result<PlaybackState> {
        self.states
            .get(&voice)
            .copied()
            .ok_or_else(|| Error::Backend(format!("unknown voice {}", voice.raw())))
    }
}
