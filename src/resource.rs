//! Sound resources
//!
//! A sound resource is an opaque byte blob:
//!
//! ```text
//! [header: N bytes][priority u8][restartable u8]
//! [speaker entries: 4 x u16 LE][pcjr entries: 4 x u16 LE]
//! [bytecode ...]
//! ```
//!
//! Entries are absolute offsets into the blob. A zero entry leaves the
//! channel silent for the selected hardware. The header length depends on
//! the producing engine version.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hardware::HardwareProfile;
use crate::{PcSoundError, Result};

/// Host-assigned sound identifier
pub type SoundId = u32;

/// Length of the opaque header preceding the priority byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    /// 4-byte header
    Compact,
    /// 6-byte header
    #[default]
    Extended,
}

impl HeaderLayout {
    /// Header length in bytes
    pub fn header_len(self) -> usize {
        match self {
            HeaderLayout::Compact => 4,
            HeaderLayout::Extended => 6,
        }
    }
}

/// A validated sound resource ready to be scheduled
#[derive(Clone)]
pub struct PlaybackRequest {
    id: SoundId,
    data: Arc<[u8]>,
    priority: u8,
    restartable: bool,
    header_len: usize,
}

impl PlaybackRequest {
    /// Wrap a resource blob.
    ///
    /// Fails on an id of 0 (reserved for "nothing") or data too short to
    /// hold the header fields. Entry tables may run past the end of the
    /// data; missing entries read as zero.
    pub fn new(id: SoundId, data: Arc<[u8]>, layout: HeaderLayout) -> Result<Self> {
        if id == 0 {
            return Err(PcSoundError::ResourceError {
                id,
                reason: "sound id 0 is reserved".into(),
            });
        }
        let header_len = layout.header_len();
        if data.len() < header_len + 2 {
            return Err(PcSoundError::ResourceError {
                id,
                reason: format!(
                    "{} bytes is too short for a {header_len}-byte header",
                    data.len()
                ),
            });
        }

        Ok(Self {
            id,
            priority: data[header_len],
            restartable: data[header_len + 1] != 0,
            header_len,
            data,
        })
    }

    /// Host-assigned id
    pub fn id(&self) -> SoundId {
        self.id
    }

    /// Scheduling priority; lower is more urgent
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// May be queued to resume after being displaced
    pub fn restartable(&self) -> bool {
        self.restartable
    }

    /// The complete resource blob (bytecode offsets are relative to it)
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Script entry point of `channel` for `hardware`; 0 = no script
    pub fn channel_entry(&self, hardware: HardwareProfile, channel: usize) -> u16 {
        let at = self.header_len + hardware.entry_table_offset() + channel * 2;
        match self.data.get(at..at + 2) {
            Some(bytes) => u16::from_le_bytes([bytes[0], bytes[1]]),
            None => 0,
        }
    }
}

impl fmt::Debug for PlaybackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackRequest")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .field("priority", &self.priority)
            .field("restartable", &self.restartable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(layout: HeaderLayout) -> Arc<[u8]> {
        let mut data = vec![0xee; layout.header_len()];
        data.extend_from_slice(&[7, 1]);
        data.extend_from_slice(&[0x22, 0, 0, 0, 0x30, 0x01, 0, 0]);
        data.extend_from_slice(&[0, 0, 0x40, 0, 0, 0, 0, 0]);
        data.into()
    }

    #[test]
    fn test_header_fields() {
        for layout in [HeaderLayout::Compact, HeaderLayout::Extended] {
            let req = PlaybackRequest::new(3, blob(layout), layout).unwrap();
            assert_eq!(req.priority(), 7);
            assert!(req.restartable());
            assert_eq!(req.channel_entry(HardwareProfile::Speaker, 0), 0x22);
            assert_eq!(req.channel_entry(HardwareProfile::Speaker, 1), 0);
            assert_eq!(req.channel_entry(HardwareProfile::Speaker, 2), 0x130);
            assert_eq!(req.channel_entry(HardwareProfile::PcJr, 1), 0x40);
            assert_eq!(req.channel_entry(HardwareProfile::PcJr, 3), 0);
        }
    }

    #[test]
    fn test_truncated_entry_table_reads_zero() {
        let req = PlaybackRequest::new(1, Arc::from(&[0u8, 0, 0, 0, 5, 0, 0x10][..]), HeaderLayout::Compact)
            .unwrap();
        assert_eq!(req.channel_entry(HardwareProfile::Speaker, 0), 0);
        assert_eq!(req.channel_entry(HardwareProfile::PcJr, 3), 0);
    }

    #[test]
    fn test_rejects_unusable_resources() {
        let short: Arc<[u8]> = Arc::from(&[0u8; 5][..]);
        assert!(PlaybackRequest::new(1, short, HeaderLayout::Extended).is_err());
        assert!(PlaybackRequest::new(0, blob(HeaderLayout::Compact), HeaderLayout::Compact).is_err());
        let empty: Arc<[u8]> = Arc::from(Vec::new());
        assert!(matches!(
            PlaybackRequest::new(9, empty, HeaderLayout::Compact),
            Err(PcSoundError::ResourceError { id: 9, .. })
        ));
    }
}
