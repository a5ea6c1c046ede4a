//! Fixed-point tick timing
//!
//! Converts the output sample rate into a 16.16 fixed-point tick length so
//! sequencer ticks land on the right sample no matter how the host slices
//! its audio buffers.

use crate::constants::{FIXP_SHIFT, TICK_RATE};

/// Sample-accurate tick accumulator
///
/// `next_tick` holds the number of samples (16.16) left until the next
/// tick. The fractional part is never discarded, so the tick rate does not
/// drift however long playback runs.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    /// Samples per tick (16.16)
    tick_len: u32,
    /// Samples until the next tick (16.16)
    next_tick: u32,
    /// Ticks fired since creation
    ticks: u64,
}

impl TickClock {
    /// Create a clock for the given output sample rate
    pub fn new(sample_rate: u32) -> Self {
        let tick_len = ((sample_rate as u64) << FIXP_SHIFT) / TICK_RATE as u64;
        TickClock {
            tick_len: tick_len.max(1) as u32,
            next_tick: 0,
            ticks: 0,
        }
    }

    /// Samples per tick in 16.16 fixed point
    pub fn tick_len(&self) -> u32 {
        self.tick_len
    }

    /// Whole samples that can be rendered before the next tick is due
    #[inline]
    pub fn samples_until_tick(&self) -> u32 {
        self.next_tick >> FIXP_SHIFT
    }

    /// Account for `samples` rendered samples.
    ///
    /// Returns `true` when a tick boundary has been reached; the caller must
    /// run exactly one sequencer tick in that case. `samples` must not exceed
    /// [`samples_until_tick`](Self::samples_until_tick).
    #[inline]
    pub fn advance(&mut self, samples: u32) -> bool {
        debug_assert!(samples <= self.samples_until_tick());
        self.next_tick -= samples << FIXP_SHIFT;
        if self.samples_until_tick() == 0 {
            self.next_tick += self.tick_len;
            self.ticks += 1;
            true
        } else {
            false
        }
    }

    /// Total ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Coarse timer that scripts and game logic poll for cue synchronisation
#[derive(Debug, Clone, Copy)]
pub struct MusicTimer {
    counter: u32,
    divider: u32,
    value: u32,
}

impl MusicTimer {
    /// Divider used until a script sets a tempo
    pub const DEFAULT_DIVIDER: u32 = 65535;
    /// Divider installed whenever a script writes the tempo register
    pub const TEMPO_DIVIDER: u32 = 125;

    /// Create a timer with the power-on divider
    pub fn new() -> Self {
        MusicTimer {
            counter: 0,
            divider: Self::DEFAULT_DIVIDER,
            value: 0,
        }
    }

    /// Advance by one elementary tick
    #[inline]
    pub fn tick(&mut self) {
        let previous = self.counter;
        self.counter += 1;
        if previous >= self.divider {
            self.counter = 0;
            self.value = self.value.wrapping_add(1);
        }
    }

    /// Change the number of elementary ticks per timer increment
    pub fn set_divider(&mut self, divider: u32) {
        self.divider = divider;
    }

    /// Restart the visible counter (a new sound became current)
    pub fn restart(&mut self) {
        self.value = 0;
    }

    /// Current timer value
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Default for MusicTimer {
    fn default() -> Self {
        Self::new()
    }
}
