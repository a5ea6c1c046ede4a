//! Output low-pass filter
//!
//! The raw square waves are smoothed by a single-pole IIR filter that stands
//! in for the mechanical inertia of the speaker cone (or the output stage of
//! the PCjr). The source is mono; every filtered value is written to both
//! stereo slots.

use crate::constants::DECAY_REFERENCE_RATE;

/// Single-pole low-pass filter in 16.16 fixed point
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    /// Retained output level
    level: i32,
    /// Per-sample decay (16.16, below 1.0)
    decay: u32,
}

impl LowPassFilter {
    /// Create a filter from a hardware decay preset.
    ///
    /// The preset describes the decay per sample at or above the reference
    /// rate. For every halving of `sample_rate` below it the decay is squared,
    /// keeping the time constant fixed in wall-clock terms.
    pub fn new(preset: u32, sample_rate: u32) -> Self {
        Self {
            level: 0,
            decay: Self::adapt_decay(preset, sample_rate),
        }
    }

    /// Decay adapted to an output sample rate
    pub fn adapt_decay(preset: u32, sample_rate: u32) -> u32 {
        let mut decay = preset as u64;
        let mut rate = sample_rate as u64;
        while rate < DECAY_REFERENCE_RATE as u64 {
            decay = decay * decay / 65536;
            if rate == 0 {
                break;
            }
            rate <<= 1;
        }
        decay as u32
    }

    /// Install a new decay, keeping the current level
    pub fn set_decay(&mut self, decay: u32) {
        self.decay = decay;
    }

    /// Current decay (16.16)
    pub fn decay(&self) -> u32 {
        self.decay
    }

    /// Retained level; zero once the output has fully settled
    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Filter the left slot of each interleaved frame in place and copy the
    /// result to both slots.
    pub fn process(&mut self, out: &mut [i16]) {
        let decay = self.decay as i64;
        let gain = 0x10000 - decay;
        for frame in out.chunks_exact_mut(2) {
            let mixed = self.level as i64 * decay + frame[0] as i64 * gain;
            self.level = (mixed >> 16) as i32;
            let sample = self.level as i16;
            frame[0] = sample;
            frame[1] = sample;
        }
    }

    /// Reset the retained level
    pub fn reset(&mut self) {
        self.level = 0;
    }
}
