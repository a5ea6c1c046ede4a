//! Frequency-modulation (vibrato / pitch-effect) engine

use crate::constants::FREQMOD_TABLE;

/// Cursor into [`FREQMOD_TABLE`] plus the effect depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreqModState {
    /// Start of the active curve
    pub table: u16,
    /// Cursor inside the curve (12.4 fixed point)
    pub cursor: u16,
    /// Cursor advance per tick
    pub increment: u16,
    /// Depth; 256 applies the table values unscaled
    pub multiplier: u16,
    /// Cursor wraps once it passes this value
    pub modulo: u16,
}

impl FreqModState {
    /// Select a curve and its cursor range
    pub fn select(&mut self, table: u16, modulo: u16) {
        self.table = table;
        self.modulo = modulo;
    }

    /// Drop the curve; the divider passes through unmodulated
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Advance the cursor one tick and return the modulated divider for
    /// `base_freq`.
    ///
    /// Reads outside the table contribute no offset.
    pub fn step(&mut self, base_freq: u16) -> u16 {
        self.cursor = self.cursor.wrapping_add(self.increment);
        if self.cursor > self.modulo {
            self.cursor -= self.modulo;
        }

        let index = self.table as usize + (self.cursor >> 4) as usize;
        let offset = FREQMOD_TABLE.get(index).copied().unwrap_or(0) as i32;
        let modulated = offset * self.multiplier as i32 / 256 + base_freq as i32;
        modulated as u16
    }
}
