//! Shared helpers for building sound resources in tests

#![allow(dead_code)]

use pcsound::{HardwareProfile, HeaderLayout};

/// Assembles a sound resource: header, priority, restart flag, both entry
/// tables and the channel scripts, with entry points patched to absolute
/// offsets.
pub struct SoundBuilder {
    layout: HeaderLayout,
    priority: u8,
    restartable: bool,
    scripts: Vec<(HardwareProfile, usize, Vec<u8>)>,
}

impl SoundBuilder {
    pub fn new(priority: u8, restartable: bool) -> Self {
        Self {
            layout: HeaderLayout::Extended,
            priority,
            restartable,
            scripts: Vec::new(),
        }
    }

    pub fn layout(mut self, layout: HeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn speaker(mut self, channel: usize, script: &[u8]) -> Self {
        self.scripts
            .push((HardwareProfile::Speaker, channel, script.to_vec()));
        self
    }

    pub fn pcjr(mut self, channel: usize, script: &[u8]) -> Self {
        self.scripts.push((HardwareProfile::PcJr, channel, script.to_vec()));
        self
    }

    /// Same script for channel `channel` of both hardware types
    pub fn both(self, channel: usize, script: &[u8]) -> Self {
        self.speaker(channel, script).pcjr(channel, script)
    }

    pub fn build(self) -> Vec<u8> {
        let header = self.layout.header_len();
        let mut data = vec![0xa5; header];
        data.push(self.priority);
        data.push(self.restartable as u8);
        data.resize(header + 2 + 16, 0);

        for (hardware, channel, script) in &self.scripts {
            let entry = header + hardware.entry_table_offset() + channel * 2;
            let offset = data.len() as u16;
            data[entry..entry + 2].copy_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(script);
        }
        data
    }
}

/// `F8 idx`: select a hull curve
pub fn hull(index: u8) -> [u8; 2] {
    [0xf8, index]
}

/// `FF reg val`: register write
pub fn set(register: u8, value: u16) -> [u8; 4] {
    let [lo, hi] = value.to_le_bytes();
    [0xff, register, lo, hi]
}

/// Register write that ends the script
pub const END: [u8; 4] = [0xff, 0, 0, 0];

/// Short-form last note for `channel` lasting `units` at `pitch`
pub fn note(channel: u8, units: u8, pitch: u8) -> [u8; 2] {
    [(channel << 5) | (units & 0x1f), 0x80 | pitch]
}

/// Concatenate script fragments
pub fn script(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Left samples of an interleaved stereo buffer
pub fn left(samples: &[i16]) -> Vec<i16> {
    samples.iter().step_by(2).copied().collect()
}
