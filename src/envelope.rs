//! Hull (volume envelope) engine
//!
//! A hull curve is a list of `(value, duration)` word pairs in
//! [`HULLS`](crate::constants::HULLS). The engine walks it one pair at a
//! time: "set" pairs (duration `-1`) assign the volume and fall through to
//! the next pair at once, "ramp" pairs load a per-tick volume delta and
//! park the cursor for `duration` ticks.

use crate::constants::HULLS;

/// Byte position of the release segment inside every curve
pub const RELEASE_POSITION: u16 = 16;

/// Bytes per `(value, duration)` pair
const PAIR_STRIDE: u16 = 4;

/// Cursor into the shared hull table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HullState {
    /// Start of the active curve in [`HULLS`] (words)
    pub curve: u16,
    /// Byte position inside the curve
    pub position: u16,
    /// Ticks until the next pair is read; 0 = parked
    pub counter: u16,
}

impl HullState {
    /// Rewind to the start of the curve; the first pair is read next tick
    #[inline]
    pub fn restart(&mut self) {
        self.position = 0;
        self.counter = 1;
    }

    /// Jump to the release segment (note-off); read next tick
    #[inline]
    pub fn release(&mut self) {
        self.position = RELEASE_POSITION;
        self.counter = 1;
    }

    /// Forget the curve entirely
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Count down one tick and walk the curve when the counter expires.
    ///
    /// Reading past the end of the table parks the envelope at whatever
    /// volume it has reached.
    pub fn tick(&mut self, volume: &mut u16, volume_delta: &mut u16) {
        if self.counter == 0 {
            return;
        }
        self.counter -= 1;
        if self.counter != 0 {
            return;
        }

        for _ in 0..=HULLS.len() / 2 {
            let index = self.curve as usize + (self.position / 2) as usize;
            let (Some(&value), Some(&duration)) = (HULLS.get(index), HULLS.get(index + 1)) else {
                break;
            };
            self.position = self.position.wrapping_add(PAIR_STRIDE);

            if duration == -1 {
                *volume = value as u16;
                if value == 0 {
                    *volume_delta = 0;
                }
            } else {
                *volume_delta = value as u16;
                self.counter = duration as u16;
                return;
            }
        }
        self.counter = 0;
    }
}
