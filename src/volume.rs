//! Master volume lookup table
//!
//! The hardware attenuators step in roughly 2 dB increments. The table maps
//! an attenuation index (0 = loudest, 15 = off) to the peak-to-peak scale
//! handed to the square-wave generator.

/// Number of attenuation steps
pub const VOLUME_STEPS: usize = 16;

/// Linear ratio of one 2 dB step (`10^(2/20)`)
const STEP_RATIO: f64 = 1.258925412;

/// Attenuation-indexed amplitude table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeTable {
    entries: [u32; VOLUME_STEPS],
}

impl VolumeTable {
    /// Build the table for a master volume of 0-255
    pub fn new(master: u8) -> Self {
        let mut entries = [0u32; VOLUME_STEPS];
        let mut out = (master as u32 * 128 / 3) as f64;
        for entry in entries.iter_mut().take(VOLUME_STEPS - 1) {
            *entry = if out > 0xffff as f64 { 0xffff } else { out as u32 };
            out /= STEP_RATIO;
        }
        entries[VOLUME_STEPS - 1] = 0;
        Self { entries }
    }

    /// Amplitude for an attenuation index; out-of-range indices are silent
    #[inline]
    pub fn amplitude(&self, index: usize) -> u32 {
        self.entries.get(index).copied().unwrap_or(0)
    }

    /// All sixteen entries
    pub fn entries(&self) -> &[u32; VOLUME_STEPS] {
        &self.entries
    }
}

impl Default for VolumeTable {
    fn default() -> Self {
        Self::new(u8::MAX)
    }
}
