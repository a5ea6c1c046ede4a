//! Sound generators
//!
//! This module contains the raw waveform sources:
//! - Noise generator (shared LFSR)
//! - Square-wave generator (one countdown and phase bit per channel)

use crate::constants::{
    FEEDBACK_PERIODIC_NOISE, FEEDBACK_WHITE_NOISE, FIXP_ONE, FIXP_SHIFT, NOISE_PRESET,
    NUM_CHANNELS,
};

/// Feedback polynomial selection for the noise channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseMode {
    /// Wide feedback mask, hiss-like output
    White,
    /// Narrow feedback mask, buzzy pitched output
    Periodic,
}

impl NoiseMode {
    /// Feedback mask XORed into the register when bit 0 is set
    #[inline]
    pub fn feedback(self) -> u32 {
        match self {
            NoiseMode::White => FEEDBACK_WHITE_NOISE,
            NoiseMode::Periodic => FEEDBACK_PERIODIC_NOISE,
        }
    }
}

/// Noise generator using a Galois LFSR
///
/// Clocked once per square-wave edge of the noise channel. Whenever the
/// low bit is set the feedback mask is applied and the channel's output
/// phase toggles.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    lfsr: u32,
}

impl NoiseGenerator {
    /// Create a new noise generator seeded with the hardware preset
    pub fn new() -> Self {
        Self { lfsr: NOISE_PRESET }
    }

    /// Clock the register once.
    ///
    /// Returns `true` when the output phase must toggle.
    #[inline]
    pub fn clock(&mut self, mode: NoiseMode) -> bool {
        let toggle = self.lfsr & 1 != 0;
        if toggle {
            self.lfsr ^= mode.feedback();
        }
        self.lfsr >>= 1;
        toggle
    }

    /// Current register contents
    #[inline]
    pub fn state(&self) -> u32 {
        self.lfsr
    }

    /// Reseed with the hardware preset
    pub fn reset(&mut self) {
        self.lfsr = NOISE_PRESET;
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge-accurate square-wave generator for all channels
///
/// Each channel owns a 16.16 countdown measured in output samples. The
/// generator integrates how long the phase bit is high inside every output
/// sample, so edges between sample boundaries still land with sub-sample
/// accuracy.
#[derive(Clone, Debug)]
pub struct SquareGenerator {
    /// Samples (16.16) until the next edge of each channel
    timer_count: [i32; NUM_CHANNELS],
    /// Phase bit of each channel (bit `i` = channel `i` high)
    timer_output: u8,
    /// Output samples per chip clock tick, times two (16.16)
    update_step: i32,
    /// Noise register shared by the noise channel
    noise: NoiseGenerator,
}

impl SquareGenerator {
    /// Create a generator for the given update step (16.16)
    pub fn new(update_step: i32) -> Self {
        Self {
            timer_count: [0; NUM_CHANNELS],
            timer_output: 0,
            update_step,
            noise: NoiseGenerator::new(),
        }
    }

    /// Change the chip clock ratio and restart every channel's phase.
    ///
    /// The noise register keeps its state.
    pub fn reconfigure(&mut self, update_step: i32) {
        self.update_step = update_step;
        self.timer_output = 0;
        self.timer_count = [0; NUM_CHANNELS];
    }

    /// Output samples per chip clock tick, times two (16.16)
    pub fn update_step(&self) -> i32 {
        self.update_step
    }

    /// Current phase bits
    pub fn phase_bits(&self) -> u8 {
        self.timer_output
    }

    /// Countdown of one channel (16.16)
    pub fn timer_count(&self, channel: usize) -> i32 {
        self.timer_count[channel]
    }

    /// Noise register (for inspection)
    pub fn noise(&self) -> &NoiseGenerator {
        &self.noise
    }

    /// Render `frames` samples of one channel into interleaved stereo `out`.
    ///
    /// Only the left slot of each frame is touched; the low-pass filter
    /// duplicates it afterwards. The contribution is added to what is
    /// already there and clamped to the signed 16-bit range.
    ///
    /// * `freq` - chip divider; the half period is `update_step * freq`
    /// * `amplitude` - peak-to-peak scale from the volume table
    /// * `noise` - clock the noise register on each edge instead of toggling
    pub fn render(
        &mut self,
        channel: usize,
        freq: u32,
        amplitude: u32,
        noise: Option<NoiseMode>,
        out: &mut [i16],
    ) {
        let bit = 1u8 << channel;
        let mut period = self.update_step.wrapping_mul(freq as i32);
        if period <= 0 {
            period = self.update_step.max(1);
        }

        for frame in out.chunks_exact_mut(2) {
            let mut duration: i64 = 0;

            if self.timer_output & bit != 0 {
                duration += self.timer_count[channel] as i64;
            }

            self.timer_count[channel] -= FIXP_ONE;
            while self.timer_count[channel] <= 0 {
                let toggle = match noise {
                    Some(mode) => self.noise.clock(mode),
                    None => true,
                };
                if toggle {
                    self.timer_output ^= bit;
                }
                if self.timer_output & bit != 0 {
                    duration += period as i64;
                }
                self.timer_count[channel] += period;
            }

            if self.timer_output & bit != 0 {
                duration -= self.timer_count[channel] as i64;
            }

            let delta = ((duration - (1 << (FIXP_SHIFT - 1))) * amplitude as i64) >> FIXP_SHIFT;
            let mixed = frame[0] as i64 + delta;
            frame[0] = mixed.clamp(i16::MIN as i64, i16::MAX as i64) as i16;
        }
    }

    /// Let an idle channel's countdown run down by `frames` samples
    pub fn drain(&mut self, channel: usize, frames: usize) {
        let elapsed = (frames as i64) << FIXP_SHIFT;
        let remaining = self.timer_count[channel] as i64 - elapsed;
        self.timer_count[channel] = remaining.max(0) as i32;
    }

    /// Lock channel `channel` onto the phase of channel `leader`.
    ///
    /// Two channels at the same divider would otherwise beat against each
    /// other because of independent fixed-point rounding.
    pub fn sync_phase(&mut self, channel: usize, leader: usize) {
        debug_assert!(leader < channel);
        self.timer_count[channel] = self.timer_count[leader];
        let out = self.timer_output;
        self.timer_output ^= (1 << channel) & (out ^ (out << (channel - leader)));
    }
}
