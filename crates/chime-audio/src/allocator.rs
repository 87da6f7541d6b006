//! Slot selection: which voice plays the next sound.

use chime_core::{Priority, Result};

use crate::backend::{AudioBackend, PlaybackState};
use crate::pool::VoicePool;

/// The winning slot of a selection scan, with how it was won.
///
/// `Vacant` and `Finished` slots are free for the taking; an `Evict` win
/// means the caller must stop the current occupant before reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    /// No logical occupant.
    Vacant(usize),
    /// Occupied on paper, but the hardware reports playback finished.
    Finished(usize),
    /// Occupied and audible, but by the lowest-priority sound in the pool,
    /// which is strictly below the incoming request.
    Evict(usize),
}

impl Claim {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Vacant(index) | Self::Finished(index) | Self::Evict(index) => index,
        }
    }
}

/// One forward scan over the pool: take the first vacant or finished slot,
/// otherwise remember the weakest occupant and steal it if the incoming
/// priority is strictly higher.
///
/// Ties both ways go to the lowest index, so selection is deterministic.
/// Equal priorities never displace each other, which also makes
/// [`Priority::MAX`] occupants permanent until they stop. No state is
/// mutated here; the caller commits the claim.
pub(crate) fn select_slot<B: AudioBackend>(
    pool: &VoicePool,
    backend: &mut B,
    candidate: Priority,
) -> Result<Option<Claim>> {
    let mut weakest: Option<(usize, Priority)> = None;

    for (index, slot) in pool.slots().enumerate() {
        if slot.occupant().is_none() {
            return Ok(Some(Claim::Vacant(index)));
        }

        if pool.state_of(backend, index)? == PlaybackState::Stopped {
            return Ok(Some(Claim::Finished(index)));
        }

        if weakest.map_or(true, |(_, lowest)| slot.priority() < lowest) {
            weakest = Some((index, slot.priority()));
        }
    }

    Ok(weakest
        .filter(|&(_, lowest)| lowest < candidate)
        .map(|(index, _)| Claim::Evict(index)))
}
