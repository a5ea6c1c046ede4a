//! Emulated output hardware
//!
//! Two hardware models share the sequencer: the single-voice PC speaker
//! driven by the 8253 timer, and the four-voice PCjr / Tandy tone generator
//! (three square channels and one noise channel).

use serde::{Deserialize, Serialize};

use crate::constants::{
    FIXP_SHIFT, PCJR_CLOCK_HZ, PCJR_DECAY, PCJR_NOTE_TABLE, SPEAKER_CLOCK_HZ, SPEAKER_DECAY,
    SPEAKER_NOTE_TABLE,
};

/// Hardware model being emulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareProfile {
    /// PC speaker: one oscillator, the first audible channel wins
    #[default]
    Speaker,
    /// PCjr / Tandy: three tone channels plus noise, mixed independently
    #[serde(rename = "pcjr")]
    PcJr,
}

impl HardwareProfile {
    /// Input clock of the tone hardware in Hz
    pub fn clock_hz(self) -> u32 {
        match self {
            HardwareProfile::Speaker => SPEAKER_CLOCK_HZ,
            HardwareProfile::PcJr => PCJR_CLOCK_HZ,
        }
    }

    /// Low-pass decay preset before sample-rate adaptation
    pub fn decay_preset(self) -> u32 {
        match self {
            HardwareProfile::Speaker => SPEAKER_DECAY,
            HardwareProfile::PcJr => PCJR_DECAY,
        }
    }

    /// Dividers for the twelve semitones of the lowest octave
    pub fn note_table(self) -> &'static [u16; 12] {
        match self {
            HardwareProfile::Speaker => &SPEAKER_NOTE_TABLE,
            HardwareProfile::PcJr => &PCJR_NOTE_TABLE,
        }
    }

    /// Offset of this hardware's channel entry table past the sound header
    /// (after the priority and restart bytes)
    pub fn entry_table_offset(self) -> usize {
        match self {
            HardwareProfile::Speaker => 2,
            HardwareProfile::PcJr => 10,
        }
    }

    /// Output samples per chip clock, doubled for the two half periods (16.16)
    pub fn update_step(self, sample_rate: u32) -> i32 {
        let step = ((sample_rate as u64) << FIXP_SHIFT) / (self.clock_hz() as u64 * 2);
        step as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_step() {
        assert_eq!(HardwareProfile::Speaker.update_step(44100), 1211);
        assert_eq!(HardwareProfile::PcJr.update_step(44100), 12918);
    }

    #[test]
    fn test_entry_tables_do_not_overlap() {
        let speaker = HardwareProfile::Speaker.entry_table_offset();
        let pcjr = HardwareProfile::PcJr.entry_table_offset();
        assert!(speaker + 8 <= pcjr);
    }
}
