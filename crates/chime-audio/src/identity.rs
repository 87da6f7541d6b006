//! Sound id minting.

use chime_core::SoundId;

/// Per-engine monotonic id source.
///
/// Ids start at 1 and never repeat within an engine, so a stale id from a
/// stopped or stolen sound can never accidentally address a later one.
/// Each engine owns its own counter; separate instances hand out
/// overlapping ids and that is fine, ids are only meaningful to the engine
/// that minted them.
#[derive(Debug)]
pub(crate) struct IdSource {
    next: u64,
}

impl IdSource {
    pub(crate) const fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn mint(&mut self) -> SoundId {
        let id = SoundId::new(self.next);
        self.next += 1;
        id
    }
}
