//! Bytecode execution
//!
//! A channel runs its script whenever its time-left counter expires. One
//! execution runs until a note step or rest sets a new duration, until a
//! write to register 0 ends the step, or until the script faults.

use tracing::{trace, warn};

use super::opcode::{decode, decode_note, Instruction, NoteEvent, NoteLength, ScriptReader};
use crate::channel::{ChannelBank, CHANNEL_RECORD_SIZE};
use crate::constants::{
    FREQMOD_LENGTHS, FREQMOD_OFFSETS, HULL_OFFSETS, NOISE_HULL_BASE, NOTE_LENGTHS,
};
use crate::hardware::HardwareProfile;

/// Upper bound on control instructions per execution
pub const MAX_INSTRUCTIONS_PER_STEP: usize = 4096;

/// Register byte offset of the tempo register
const TEMPO_OPERAND: u8 = 14;

/// Register byte offset of the time-left register
const TIME_LEFT_OPERAND: u8 = 0;

/// Channel whose notes drive the noise generator on PCjr hardware
const NOISE_CHANNEL: usize = 3;

/// Side effects of an execution that reach beyond the channel bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The script wrote the tempo register
    pub tempo_written: bool,
    /// The script faulted and its channel was idled
    pub faulted: bool,
}

enum Flow {
    /// Step finished normally
    End,
    /// Script ran off its data, returned with an empty stack or ran away
    Fault(&'static str),
}

/// Run the script of channel `current` against `data`.
pub fn execute(
    bank: &mut ChannelBank,
    current: usize,
    data: &[u8],
    hardware: HardwareProfile,
) -> StepReport {
    let mut report = StepReport::default();
    let start = bank[current].next_cmd;
    if start == 0 {
        return report;
    }

    let mut reader = ScriptReader::new(data, start as usize);
    // Channel the instructions act on; redirected by ClearOther
    let mut target = current;
    let mut executed = 0usize;

    let flow = 'exec: loop {
        executed += 1;
        if executed > MAX_INSTRUCTIONS_PER_STEP {
            break Flow::Fault("instruction limit exceeded");
        }

        let pc = reader.position();
        let Some(instruction) = decode(&mut reader) else {
            break Flow::Fault("ran past end of data");
        };
        trace!(channel = current, acting_on = target, pc, ?instruction, "bytecode");

        match instruction {
            Instruction::SetHullCurve { index } => {
                if let Some(&curve) = HULL_OFFSETS.get(index as usize / 2) {
                    bank[target].hull.curve = curve;
                }
            }
            Instruction::SetFreqmodCurve { index } => {
                let i = index as usize / 4;
                if let (Some(&table), Some(&modulo)) = (FREQMOD_OFFSETS.get(i), FREQMOD_LENGTHS.get(i))
                {
                    bank[target].freqmod.select(table, modulo);
                }
            }
            Instruction::ClearOther { record } => {
                target = ChannelBank::resolve((record / CHANNEL_RECORD_SIZE) as usize);
                bank[target].clear_voice();
            }
            Instruction::ClearChannel => bank[target].clear_voice(),
            Instruction::Return => match bank[current].pop_return() {
                Some(addr) => reader.jump(addr as usize),
                None => break Flow::Fault("return with empty call stack"),
            },
            Instruction::Call { target: addr } => {
                let Ok(ret) = u16::try_from(reader.position()) else {
                    break Flow::Fault("return address out of range");
                };
                bank[current].push_return(ret);
                reader.jump(addr as usize);
            }
            Instruction::LoopIfNonzero { register, offset } => {
                let branch = match bank[target].register_mut(register as usize / 2) {
                    Some(counter) if *counter != 0 => {
                        *counter -= 1;
                        *counter != 0
                    }
                    _ => true,
                };
                if branch && reader.jump_relative(offset).is_none() {
                    break Flow::Fault("branch before start of data");
                }
            }
            Instruction::SetParameter { register, value } => {
                if let Some(reg) = bank[target].register_mut(register as usize / 2) {
                    *reg = value;
                }
                if register == TEMPO_OPERAND {
                    report.tempo_written = true;
                }
                if register == TIME_LEFT_OPERAND {
                    break Flow::End;
                }
            }
            Instruction::Note(first) => {
                let mut event = first;
                loop {
                    let tempo = bank[target].tempo.max(1);
                    let time_left = match event.length {
                        NoteLength::Units(index) => {
                            let units = NOTE_LENGTHS.get(index as usize).copied().unwrap_or(0);
                            tempo.wrapping_mul(units as u16)
                        }
                        NoteLength::Ticks(ticks) => ticks,
                    };
                    bank[target].time_left = time_left;

                    let Some(pitch) = event.pitch else {
                        break 'exec Flow::End;
                    };
                    assign_note(bank, &event, pitch, time_left, hardware);
                    if event.last {
                        break 'exec Flow::End;
                    }

                    let next = reader
                        .read_u8()
                        .and_then(|opcode| decode_note(opcode, &mut reader));
                    match next {
                        Some(n) => event = n,
                        None => break 'exec Flow::Fault("chord ran past end of data"),
                    }
                }
            }
        }
    };

    let channel = &mut bank[current];
    match flow {
        Flow::End if channel.time_left != 0 => {
            channel.next_cmd = u16::try_from(reader.position()).unwrap_or(0);
            if channel.next_cmd == 0 {
                warn!(channel = current, "script position out of range, channel idled");
                channel.time_left = 0;
            }
        }
        Flow::End => channel.next_cmd = 0,
        Flow::Fault(reason) => {
            warn!(channel = current, reason, "script fault, channel idled");
            channel.time_left = 0;
            channel.next_cmd = 0;
            report.faulted = true;
        }
    }
    report
}

/// Start a note on the event's destination channel
fn assign_note(
    bank: &mut ChannelBank,
    event: &NoteEvent,
    pitch: u8,
    time_left: u16,
    hardware: HardwareProfile,
) {
    let dest = &mut bank[event.channel];
    dest.time_left = time_left;
    dest.note_length = time_left.wrapping_sub(dest.inter_note_pause);

    let mut note = (pitch as i16).wrapping_add(dest.transpose as i16);
    while note < 0 {
        note += 12;
    }
    let octave = (note / 12) as u32;
    let semitone = (note % 12) as usize;

    dest.hull.restart();
    let freq = if hardware == HardwareProfile::PcJr && event.channel == NOISE_CHANNEL {
        dest.hull.curve = NOISE_HULL_BASE + 12 * semitone as u16;
        384u16.wrapping_sub(64u16.wrapping_mul(octave as u16))
    } else {
        let divider = hardware.note_table()[semitone] as u32;
        divider.checked_shr(octave).unwrap_or(0) as u16
    };
    dest.freq = freq;
    dest.base_freq = freq;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::slot;
    use crate::constants::SPEAKER_NOTE_TABLE;

    /// Script placed at offset 2 so that offset 0 stays "no script"
    fn run(script: &[u8], hardware: HardwareProfile) -> (ChannelBank, StepReport) {
        let mut data = vec![0u8, 0];
        data.extend_from_slice(script);
        let mut bank = ChannelBank::new();
        bank[0].next_cmd = 2;
        bank[0].time_left = 1;
        let report = execute(&mut bank, 0, &data, hardware);
        (bank, report)
    }

    #[test]
    fn test_single_note() {
        // hull 6, C of octave 1 for 96 units, last note
        let (bank, report) = run(&[0xf8, 12, 0x14, 0x80 | 12], HardwareProfile::Speaker);
        let ch = &bank[0];
        assert_eq!(ch.time_left, 96);
        assert_eq!(ch.note_length, 96);
        assert_eq!(ch.freq, SPEAKER_NOTE_TABLE[0] >> 1);
        assert_eq!(ch.base_freq, ch.freq);
        assert_eq!(ch.hull.curve, HULL_OFFSETS[6]);
        assert_eq!((ch.hull.position, ch.hull.counter), (0, 1));
        assert_eq!(ch.next_cmd, 6);
        assert_eq!(report, StepReport::default());
    }

    #[test]
    fn test_tempo_and_transpose() {
        let (bank, report) = run(
            &[0xff, 14, 3, 0, 0xff, 18, 0xfe, 0xff, 0x09, 0x80 | 1],
            HardwareProfile::Speaker,
        );
        assert!(report.tempo_written);
        let ch = &bank[0];
        // tempo 3 * 8 units
        assert_eq!(ch.time_left, 24);
        // pitch 1 transposed by -2 wraps up an octave to semitone 11
        assert_eq!(ch.freq, SPEAKER_NOTE_TABLE[11]);
    }

    #[test]
    fn test_chord_spreads_over_channels() {
        let (bank, _) = run(
            &[0xa0, 0x10, 24, 0xc0, 0x10, 28, 0x0d | 0x60, 0x80 | 31],
            HardwareProfile::PcJr,
        );
        assert_eq!(bank[1].time_left, 0x10);
        assert_eq!(bank[2].time_left, 0x10);
        // The final short note in the chord uses index 13 (18 units).
        assert_eq!(bank[3].time_left, 18);
        assert_eq!(bank[0].time_left, 18);
        // Channel 3 on PCjr is the noise channel
        assert_eq!(bank[3].hull.curve, NOISE_HULL_BASE + 12 * 7);
        assert_eq!(bank[3].freq, 384 - 64 * 2);
        assert!(bank[1].freq != 0 && bank[2].freq != 0);
    }

    #[test]
    fn test_loop_counts_down_register() {
        // r19 = 3; loop: note len 1 tick ... the loop itself only branches
        let script = [
            0xff, 38, 3, 0, // scratch0 = 3
            0xfe, 38, 0xfc, 0xff, // branch onto itself while nonzero
            0x90, 0x07, // rest for 7 ticks
        ];
        let (bank, report) = run(&script, HardwareProfile::Speaker);
        assert!(!report.faulted);
        assert_eq!(bank[0].register(slot::SCRATCH), 0);
        assert_eq!(bank[0].time_left, 7);
    }

    #[test]
    fn test_rest_sets_duration() {
        let (bank, _) = run(&[0x90, 0x20], HardwareProfile::Speaker);
        assert_eq!(bank[0].time_left, 0x20);
        assert_eq!(bank[0].freq, 0);
        assert_eq!(bank[0].next_cmd, 4);
    }

    #[test]
    fn test_call_and_return() {
        let data = [
            0, 0, // offset 0 means "no script"
            0xfc, 9, 0, // call 9
            0xff, 0, 0, 0, // time_left = 0: end
            0xff, 14, 5, 0, // tempo = 5
            0xfb, // return
        ];

        let mut bank = ChannelBank::new();
        bank[0].next_cmd = 2;
        bank[0].time_left = 1;
        let report = execute(&mut bank, 0, &data, HardwareProfile::Speaker);
        assert!(!report.faulted);
        assert_eq!(bank[0].tempo, 5);
        assert_eq!(bank[0].call_depth(), 0);
        assert_eq!(bank[0].next_cmd, 0);
    }

    #[test]
    fn test_clear_other_redirects() {
        // Clear channel 2 and give it a volume; channel 0 then rests
        let (bank, _) = run(&[0xfd, 100, 0, 0xff, 10, 0x34, 0x12, 0x90, 0x05], HardwareProfile::Speaker);
        assert_eq!(bank[2].volume, 0x1234);
        assert_eq!(bank[0].volume, 0);
        // The rest lands on the redirected channel too
        assert_eq!(bank[2].time_left, 5);
        assert_eq!(bank[0].time_left, 1);
    }

    #[test]
    fn test_clear_other_out_of_range_hits_overflow() {
        let (bank, _) = run(&[0xfd, 0xf4, 0x01, 0xff, 10, 1, 0, 0xff, 0, 0, 0], HardwareProfile::Speaker);
        assert!(bank.hardware().iter().all(|c| c.volume == 0));
        assert_eq!(bank[crate::channel::OVERFLOW_CHANNEL].volume, 1);
    }

    #[test]
    fn test_faults_idle_channel() {
        let scripts: [&[u8]; 4] = [
            &[0xf8],                   // truncated
            &[0xfb],                   // return without call
            &[0xfe, 60, 0xfc, 0xff],   // unbounded loop on an out-of-range register
            &[0x80, 0x10, 20, 0x05],   // chord runs off the data
        ];
        for script in scripts {
            let (bank, report) = run(script, HardwareProfile::Speaker);
            assert!(report.faulted, "{script:02x?}");
            assert_eq!(bank[0].time_left, 0);
            assert_eq!(bank[0].next_cmd, 0);
        }
    }

    #[test]
    fn test_out_of_range_curve_indices_are_ignored() {
        let (bank, report) = run(&[0xf8, 200, 0xf9, 200, 0x90, 1], HardwareProfile::Speaker);
        assert!(!report.faulted);
        assert_eq!(bank[0].hull.curve, 0);
        assert_eq!(bank[0].freqmod.modulo, 0);
    }
}
