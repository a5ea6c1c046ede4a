//! Per-channel sequencer state
//!
//! Every channel carries its own bytecode pointer, pitch and volume state,
//! envelope and freqmod cursors and a small register file. Bytecode
//! addresses the registers by byte offset (`slot * 2`), so the slot layout
//! below is part of the sound data format.

use crate::constants::NUM_CHANNELS;
use crate::envelope::HullState;
use crate::freqmod::FreqModState;

/// Register slots addressable by bytecode (byte offset / 2)
#[allow(missing_docs)]
pub mod slot {
    pub const TIME_LEFT: usize = 0;
    pub const NEXT_CMD: usize = 1;
    pub const BASE_FREQ: usize = 2;
    pub const FREQ_DELTA: usize = 3;
    pub const FREQ: usize = 4;
    pub const VOLUME: usize = 5;
    pub const VOLUME_DELTA: usize = 6;
    pub const TEMPO: usize = 7;
    pub const INTER_NOTE_PAUSE: usize = 8;
    pub const TRANSPOSE: usize = 9;
    pub const NOTE_LENGTH: usize = 10;
    pub const HULL_CURVE: usize = 11;
    pub const HULL_POSITION: usize = 12;
    pub const HULL_COUNTER: usize = 13;
    pub const FREQMOD_TABLE: usize = 14;
    pub const FREQMOD_CURSOR: usize = 15;
    pub const FREQMOD_INCREMENT: usize = 16;
    pub const FREQMOD_MULTIPLIER: usize = 17;
    pub const FREQMOD_MODULO: usize = 18;
    pub const SCRATCH: usize = 19;
    pub const MUSIC_TIMER: usize = 23;
    pub const SCRIPT_NR: usize = 24;
}

/// Number of addressable register slots
pub const REGISTER_COUNT: usize = 25;

/// General-purpose registers (loop counters)
pub const SCRATCH_REGISTERS: usize = 4;

/// Maximum nesting of subroutine calls
pub const CALL_STACK_DEPTH: usize = 4;

/// Index of the scratch channel that absorbs out-of-range channel writes
pub const OVERFLOW_CHANNEL: usize = NUM_CHANNELS;

/// Size of a channel record as seen by the clear-other-channel operand
pub const CHANNEL_RECORD_SIZE: u16 = 50;

/// State of one sequencer channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Ticks until the next bytecode step; 0 = idle
    pub time_left: u16,
    /// Absolute offset of the next instruction; 0 = none
    pub next_cmd: u16,
    /// Divider before modulation
    pub base_freq: u16,
    /// Per-tick pitch slide added to the base divider
    pub freq_delta: u16,
    /// Divider sent to the hardware
    pub freq: u16,
    /// Envelope level; 0 is silent
    pub volume: u16,
    /// Per-tick volume ramp loaded by the hull
    pub volume_delta: u16,
    /// Short-form note duration multiplier
    pub tempo: u16,
    /// Ticks cut from the end of each note before release
    pub inter_note_pause: u16,
    /// Signed semitone shift (two's complement)
    pub transpose: u16,
    /// Ticks until note-off
    pub note_length: u16,
    /// Volume envelope cursor
    pub hull: HullState,
    /// Pitch modulation cursor
    pub freqmod: FreqModState,
    /// Loop counters
    pub scratch: [u16; SCRATCH_REGISTERS],
    /// Per-sound beat counter maintained by the bytecode itself
    pub music_timer: u16,
    /// Id of the sound that owns this channel
    pub script_nr: u16,
    return_stack: [u16; CALL_STACK_DEPTH],
    return_depth: usize,
}

impl ChannelState {
    /// Full reset to the power-on state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Silence the voice and drop its script, keeping timing registers.
    ///
    /// Time left, tempo, note length, scratch registers and the music
    /// timer survive.
    pub fn clear_voice(&mut self) {
        self.next_cmd = 0;
        self.base_freq = 0;
        self.freq_delta = 0;
        self.freq = 0;
        self.volume = 0;
        self.volume_delta = 0;
        self.inter_note_pause = 0;
        self.transpose = 0;
        self.hull.clear();
        self.freqmod.clear();
    }

    /// Channel is counting down towards its next bytecode step
    #[inline]
    pub fn is_active(&self) -> bool {
        self.time_left != 0
    }

    /// Channel is active and its envelope is above silence
    #[inline]
    pub fn is_audible(&self) -> bool {
        self.time_left != 0 && self.volume != 0
    }

    /// Register addressed by bytecode slot; `None` past the register file
    pub fn register_mut(&mut self, slot: usize) -> Option<&mut u16> {
        let reg = match slot {
            slot::TIME_LEFT => &mut self.time_left,
            slot::NEXT_CMD => &mut self.next_cmd,
            slot::BASE_FREQ => &mut self.base_freq,
            slot::FREQ_DELTA => &mut self.freq_delta,
            slot::FREQ => &mut self.freq,
            slot::VOLUME => &mut self.volume,
            slot::VOLUME_DELTA => &mut self.volume_delta,
            slot::TEMPO => &mut self.tempo,
            slot::INTER_NOTE_PAUSE => &mut self.inter_note_pause,
            slot::TRANSPOSE => &mut self.transpose,
            slot::NOTE_LENGTH => &mut self.note_length,
            slot::HULL_CURVE => &mut self.hull.curve,
            slot::HULL_POSITION => &mut self.hull.position,
            slot::HULL_COUNTER => &mut self.hull.counter,
            slot::FREQMOD_TABLE => &mut self.freqmod.table,
            slot::FREQMOD_CURSOR => &mut self.freqmod.cursor,
            slot::FREQMOD_INCREMENT => &mut self.freqmod.increment,
            slot::FREQMOD_MULTIPLIER => &mut self.freqmod.multiplier,
            slot::FREQMOD_MODULO => &mut self.freqmod.modulo,
            s @ slot::SCRATCH..=22 => &mut self.scratch[s - slot::SCRATCH],
            slot::MUSIC_TIMER => &mut self.music_timer,
            slot::SCRIPT_NR => &mut self.script_nr,
            _ => return None,
        };
        Some(reg)
    }

    /// Read a register; slots past the register file read as zero
    pub fn register(&self, slot: usize) -> u16 {
        match slot {
            slot::TIME_LEFT => self.time_left,
            slot::NEXT_CMD => self.next_cmd,
            slot::BASE_FREQ => self.base_freq,
            slot::FREQ_DELTA => self.freq_delta,
            slot::FREQ => self.freq,
            slot::VOLUME => self.volume,
            slot::VOLUME_DELTA => self.volume_delta,
            slot::TEMPO => self.tempo,
            slot::INTER_NOTE_PAUSE => self.inter_note_pause,
            slot::TRANSPOSE => self.transpose,
            slot::NOTE_LENGTH => self.note_length,
            slot::HULL_CURVE => self.hull.curve,
            slot::HULL_POSITION => self.hull.position,
            slot::HULL_COUNTER => self.hull.counter,
            slot::FREQMOD_TABLE => self.freqmod.table,
            slot::FREQMOD_CURSOR => self.freqmod.cursor,
            slot::FREQMOD_INCREMENT => self.freqmod.increment,
            slot::FREQMOD_MULTIPLIER => self.freqmod.multiplier,
            slot::FREQMOD_MODULO => self.freqmod.modulo,
            s @ slot::SCRATCH..=22 => self.scratch[s - slot::SCRATCH],
            slot::MUSIC_TIMER => self.music_timer,
            slot::SCRIPT_NR => self.script_nr,
            _ => 0,
        }
    }

    /// Push a return address.
    ///
    /// A full stack overwrites its innermost entry, so runaway recursion
    /// degrades to a plain jump.
    pub fn push_return(&mut self, addr: u16) {
        if self.return_depth == CALL_STACK_DEPTH {
            self.return_stack[CALL_STACK_DEPTH - 1] = addr;
        } else {
            self.return_stack[self.return_depth] = addr;
            self.return_depth += 1;
        }
    }

    /// Pop a return address; `None` on an empty stack
    pub fn pop_return(&mut self) -> Option<u16> {
        if self.return_depth == 0 {
            return None;
        }
        self.return_depth -= 1;
        Some(self.return_stack[self.return_depth])
    }

    /// Current subroutine nesting
    pub fn call_depth(&self) -> usize {
        self.return_depth
    }

    /// Pre-script half of a tick: volume ramp, pitch slide, freqmod and the
    /// note-off countdown
    pub(crate) fn advance_modulation(&mut self) {
        self.volume = self.volume.wrapping_add(self.volume_delta);
        self.base_freq = self.base_freq.wrapping_add(self.freq_delta);
        self.freq = self.freqmod.step(self.base_freq);

        if self.note_length != 0 {
            self.note_length -= 1;
            if self.note_length == 0 {
                self.hull.release();
            }
        }
    }

    /// Count down time left; `true` when the script is due
    pub(crate) fn count_down(&mut self) -> bool {
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left == 0
    }

    /// Post-script half of a tick: envelope walk
    pub(crate) fn advance_hull(&mut self) {
        self.hull.tick(&mut self.volume, &mut self.volume_delta);
    }
}

/// The four hardware channels plus the overflow channel
#[derive(Debug, Clone, Default)]
pub struct ChannelBank {
    channels: [ChannelState; NUM_CHANNELS + 1],
}

impl ChannelBank {
    /// All channels idle
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a bytecode channel number onto the bank; anything past the real
    /// channels lands on the overflow channel
    #[inline]
    pub fn resolve(index: usize) -> usize {
        index.min(OVERFLOW_CHANNEL)
    }

    /// The channels that reach the hardware
    pub fn hardware(&self) -> &[ChannelState] {
        &self.channels[..NUM_CHANNELS]
    }

    /// No hardware channel is counting down
    pub fn all_idle(&self) -> bool {
        self.hardware().iter().all(|c| !c.is_active())
    }

    /// Reset every hardware channel
    pub fn reset_hardware(&mut self) {
        for channel in &mut self.channels[..NUM_CHANNELS] {
            channel.reset();
        }
    }
}

impl std::ops::Index<usize> for ChannelBank {
    type Output = ChannelState;

    fn index(&self, index: usize) -> &ChannelState {
        &self.channels[Self::resolve(index)]
    }
}

impl std::ops::IndexMut<usize> for ChannelBank {
    fn index_mut(&mut self, index: usize) -> &mut ChannelState {
        &mut self.channels[Self::resolve(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_slots_alias_named_fields() {
        let mut ch = ChannelState::default();
        *ch.register_mut(slot::TEMPO).unwrap() = 3;
        *ch.register_mut(slot::HULL_CURVE).unwrap() = 72;
        *ch.register_mut(slot::FREQMOD_MULTIPLIER).unwrap() = 256;
        *ch.register_mut(20).unwrap() = 9;
        *ch.register_mut(slot::SCRIPT_NR).unwrap() = 42;

        assert_eq!(ch.tempo, 3);
        assert_eq!(ch.hull.curve, 72);
        assert_eq!(ch.freqmod.multiplier, 256);
        assert_eq!(ch.scratch[1], 9);
        assert_eq!(ch.script_nr, 42);
        assert_eq!(ch.register(slot::TEMPO), 3);
    }

    #[test]
    fn test_out_of_range_register() {
        let mut ch = ChannelState::default();
        assert!(ch.register_mut(REGISTER_COUNT).is_none());
        assert!(ch.register_mut(127).is_none());
        assert_eq!(ch.register(200), 0);
    }

    #[test]
    fn test_clear_voice_keeps_timing() {
        let mut ch = ChannelState {
            time_left: 10,
            next_cmd: 0x40,
            freq: 500,
            volume: 60000,
            tempo: 4,
            note_length: 7,
            scratch: [1, 2, 3, 4],
            music_timer: 5,
            ..Default::default()
        };
        ch.hull.curve = 72;
        ch.freqmod.increment = 16;

        ch.clear_voice();
        assert_eq!(ch.next_cmd, 0);
        assert_eq!(ch.freq, 0);
        assert_eq!(ch.volume, 0);
        assert_eq!(ch.hull, HullState::default());
        assert_eq!(ch.freqmod, FreqModState::default());
        assert_eq!(ch.time_left, 10);
        assert_eq!(ch.tempo, 4);
        assert_eq!(ch.note_length, 7);
        assert_eq!(ch.scratch, [1, 2, 3, 4]);
        assert_eq!(ch.music_timer, 5);
    }

    #[test]
    fn test_call_stack_overflow_replaces_innermost() {
        let mut ch = ChannelState::default();
        for addr in 1..=6 {
            ch.push_return(addr);
        }
        assert_eq!(ch.call_depth(), CALL_STACK_DEPTH);
        assert_eq!(ch.pop_return(), Some(6));
        assert_eq!(ch.pop_return(), Some(3));
        assert_eq!(ch.pop_return(), Some(2));
        assert_eq!(ch.pop_return(), Some(1));
        assert_eq!(ch.pop_return(), None);
    }

    #[test]
    fn test_note_off_triggers_release() {
        let mut ch = ChannelState {
            note_length: 2,
            ..Default::default()
        };
        ch.advance_modulation();
        assert_eq!(ch.hull.counter, 0);
        ch.advance_modulation();
        assert_eq!(ch.hull.position, crate::envelope::RELEASE_POSITION);
        assert_eq!(ch.hull.counter, 1);
    }

    #[test]
    fn test_bank_overflow_channel() {
        let mut bank = ChannelBank::new();
        bank[9].volume = 100;
        assert_eq!(bank[OVERFLOW_CHANNEL].volume, 100);
        assert!(bank.hardware().iter().all(|c| c.volume == 0));

        assert!(bank.all_idle());
        bank[2].time_left = 1;
        assert!(!bank.all_idle());
        bank.reset_hardware();
        assert!(bank.all_idle());
    }
}
