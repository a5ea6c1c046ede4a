//! Current / queued sound bookkeeping
//!
//! At most one sound plays and at most one waits. A new sound displaces
//! the current one when its priority number is lower or equal. Whichever
//! sound loses may take the waiting slot if it is restartable and at least
//! as urgent as the sound already waiting there.

use tracing::debug;

use crate::resource::{PlaybackRequest, SoundId};

/// What a stop request hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Neither the current nor the queued sound matched
    NotFound,
    /// The queued sound was dropped; playback is unaffected
    DroppedQueued,
    /// The current sound was stopped; the channels must be reloaded
    StoppedCurrent,
}

/// Current and queued sound
#[derive(Debug, Default)]
pub struct SoundQueue {
    current: Option<PlaybackRequest>,
    next: Option<PlaybackRequest>,
}

impl SoundQueue {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Sound owning the channels
    pub fn current(&self) -> Option<&PlaybackRequest> {
        self.current.as_ref()
    }

    /// Sound waiting for the current one to finish
    pub fn queued(&self) -> Option<&PlaybackRequest> {
        self.next.as_ref()
    }

    /// Offer a new sound.
    ///
    /// Returns `true` when it became current and the channels must be
    /// reloaded from it.
    pub fn offer(&mut self, request: PlaybackRequest) -> bool {
        let (started, candidate) = match self.current.take() {
            None => {
                self.current = Some(request);
                (true, None)
            }
            Some(current) if request.priority() <= current.priority() => {
                debug!(
                    id = request.id(),
                    displaced = current.id(),
                    "sound displaces current"
                );
                self.current = Some(request);
                (true, Some(current))
            }
            Some(current) => {
                self.current = Some(current);
                (false, Some(request))
            }
        };

        let current_id = self.current.as_ref().map(PlaybackRequest::id);
        if started && self.next.as_ref().map(PlaybackRequest::id) == current_id {
            self.next = None;
        }

        if let Some(candidate) = candidate {
            self.consider_for_queue(candidate, current_id);
        }
        started
    }

    fn consider_for_queue(&mut self, candidate: PlaybackRequest, current_id: Option<SoundId>) {
        let beats_queued = self
            .next
            .as_ref()
            .map_or(true, |next| candidate.priority() <= next.priority());

        if candidate.restartable() && Some(candidate.id()) != current_id && beats_queued {
            debug!(id = candidate.id(), "sound queued");
            self.next = Some(candidate);
        } else {
            debug!(id = candidate.id(), "sound dropped");
        }
    }

    /// Stop a sound by id
    pub fn stop(&mut self, id: SoundId) -> StopOutcome {
        if self.next.as_ref().is_some_and(|n| n.id() == id) {
            self.next = None;
            debug!(id, "queued sound stopped");
            return StopOutcome::DroppedQueued;
        }
        if self.current.as_ref().is_some_and(|c| c.id() == id) {
            self.current = None;
            debug!(id, "current sound stopped");
            self.promote();
            return StopOutcome::StoppedCurrent;
        }
        StopOutcome::NotFound
    }

    /// The current sound ran out; promote the queued one.
    ///
    /// Returns `true` when a new sound became current.
    pub fn finish_current(&mut self) -> bool {
        if let Some(done) = self.current.take() {
            debug!(id = done.id(), "sound finished");
        }
        self.promote()
    }

    fn promote(&mut self) -> bool {
        match self.next.take() {
            Some(next) => {
                debug!(id = next.id(), "queued sound promoted");
                self.current = Some(next);
                true
            }
            None => false,
        }
    }

    /// Forget both sounds
    pub fn clear(&mut self) {
        self.current = None;
        self.next = None;
    }

    /// Sound is current or queued
    pub fn contains(&self, id: SoundId) -> bool {
        self.current.iter().chain(self.next.iter()).any(|r| r.id() == id)
    }
}
