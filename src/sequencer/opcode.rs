//! Bytecode decoding
//!
//! Opcodes `0xF8..=0xFF` are control instructions; everything below is a
//! note event. Multi-byte operands are little-endian. A truncated
//! instruction decodes to `None`.

/// Byte cursor over sound data that never reads out of bounds
#[derive(Debug, Clone)]
pub struct ScriptReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ScriptReader<'a> {
    /// Start reading at absolute offset `pos`
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Absolute offset of the next byte
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next byte, `None` at the end of the data
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Next little-endian word
    pub fn read_u16(&mut self) -> Option<u16> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Some(u16::from_le_bytes([lo, hi]))
    }

    /// Jump to an absolute offset
    pub fn jump(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Jump relative to the current position; `None` if the target would
    /// lie before the start of the data
    pub fn jump_relative(&mut self, offset: i16) -> Option<()> {
        self.pos = self.pos.checked_add_signed(offset as isize)?;
        Some(())
    }
}

/// How long a note step lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLength {
    /// Index into [`NOTE_LENGTHS`](crate::constants::NOTE_LENGTHS), scaled
    /// by the channel tempo
    Units(u8),
    /// Explicit tick count
    Ticks(u16),
}

/// One note (or rest) of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Destination channel (0-3)
    pub channel: usize,
    /// Duration of the step
    pub length: NoteLength,
    /// Pitch in semitones; `None` is a rest that ends the step
    pub pitch: Option<u8>,
    /// Last note of the chord
    pub last: bool,
}

/// Decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `F8 idx`: select hull curve `HULL_OFFSETS[idx / 2]`
    SetHullCurve {
        /// Curve operand (twice the curve number)
        index: u8,
    },
    /// `F9 idx`: select freqmod curve `[idx / 4]`
    SetFreqmodCurve {
        /// Curve operand (four times the curve number)
        index: u8,
    },
    /// `FA`: clear the channel the step is acting on
    ClearChannel,
    /// `FB`: return from subroutine
    Return,
    /// `FC addr`: call subroutine at an absolute offset
    Call {
        /// Absolute offset of the subroutine
        target: u16,
    },
    /// `FD rec`: clear channel `rec / 50` and act on it from here on
    ClearOther {
        /// Byte offset of the channel record
        record: u16,
    },
    /// `FE reg off`: decrement-and-branch on a register
    LoopIfNonzero {
        /// Counter register (byte offset)
        register: u8,
        /// Branch distance from the end of the instruction
        offset: i16,
    },
    /// `FF reg val`: write a register
    SetParameter {
        /// Destination register (byte offset)
        register: u8,
        /// Value written
        value: u16,
    },
    /// `00..=F7`: first note of a chord
    Note(NoteEvent),
}

const OP_SET_HULL: u8 = 0xf8;
const OP_SET_FREQMOD: u8 = 0xf9;
const OP_CLEAR_CHANNEL: u8 = 0xfa;
const OP_RETURN: u8 = 0xfb;
const OP_CALL: u8 = 0xfc;
const OP_CLEAR_OTHER: u8 = 0xfd;
const OP_LOOP: u8 = 0xfe;
const OP_SET_PARAMETER: u8 = 0xff;

/// Decode the instruction at the reader position
pub fn decode(reader: &mut ScriptReader<'_>) -> Option<Instruction> {
    let opcode = reader.read_u8()?;
    let instruction = match opcode {
        OP_SET_HULL => Instruction::SetHullCurve {
            index: reader.read_u8()?,
        },
        OP_SET_FREQMOD => Instruction::SetFreqmodCurve {
            index: reader.read_u8()?,
        },
        OP_CLEAR_CHANNEL => Instruction::ClearChannel,
        OP_RETURN => Instruction::Return,
        OP_CALL => Instruction::Call {
            target: reader.read_u16()?,
        },
        OP_CLEAR_OTHER => Instruction::ClearOther {
            record: reader.read_u16()?,
        },
        OP_LOOP => {
            let register = reader.read_u8()?;
            let offset = reader.read_u16()? as i16;
            Instruction::LoopIfNonzero { register, offset }
        }
        OP_SET_PARAMETER => {
            let register = reader.read_u8()?;
            let value = reader.read_u16()?;
            Instruction::SetParameter { register, value }
        }
        note => Instruction::Note(decode_note(note, reader)?),
    };
    Some(instruction)
}

/// Decode a note event whose opcode byte has already been read.
///
/// Any byte value is accepted here: inside a chord even control-range bytes
/// are note opcodes.
pub fn decode_note(opcode: u8, reader: &mut ScriptReader<'_>) -> Option<NoteEvent> {
    let channel = ((opcode >> 5) & 3) as usize;

    if opcode & 0x80 == 0 {
        let length = NoteLength::Units(opcode & 0x1f);
        let note = reader.read_u8()?;
        let pitch = note & 0x7f;
        return Some(NoteEvent {
            channel,
            length,
            pitch: (pitch != 0x7f).then_some(pitch),
            last: note & 0x80 != 0,
        });
    }

    let ticks = (((opcode & 7) as u16) << 8) | reader.read_u8()? as u16;
    let length = NoteLength::Ticks(ticks);
    if opcode & 0x10 != 0 {
        return Some(NoteEvent {
            channel,
            length,
            pitch: None,
            last: false,
        });
    }
    let pitch = reader.read_u8()? & 0x7f;
    Some(NoteEvent {
        channel,
        length,
        pitch: Some(pitch),
        last: false,
    })
}
