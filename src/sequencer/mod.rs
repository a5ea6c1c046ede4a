//! Bytecode sequencer
//!
//! Sound resources carry one script per channel. The interpreter decodes
//! and runs them against the channel bank whenever a channel's time-left
//! counter expires.

mod interpreter;
mod opcode;

pub use interpreter::{execute, StepReport, MAX_INSTRUCTIONS_PER_STEP};
pub use opcode::{decode, decode_note, Instruction, NoteEvent, NoteLength, ScriptReader};
