//! Player configuration

use serde::{Deserialize, Serialize};

use crate::hardware::HardwareProfile;
use crate::resource::HeaderLayout;
use crate::{PcSoundError, Result};

/// Lowest accepted output rate in Hz
pub const MIN_SAMPLE_RATE: u32 = 1_000;
/// Highest accepted output rate in Hz
pub const MAX_SAMPLE_RATE: u32 = 192_000;
/// Default output rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Where [`SoundPlayer::music_timer`](crate::SoundPlayer::music_timer)
/// reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicTimerSource {
    /// Player-wide counter advanced by the tick driver
    #[default]
    Global,
    /// Register 23 of channel 0, maintained by the bytecode itself
    ChannelRegister,
}

/// Construction parameters of a [`SoundPlayer`](crate::SoundPlayer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Hardware model to emulate
    pub hardware: HardwareProfile,
    /// Header length of the sound resources that will be played
    pub header_layout: HeaderLayout,
    /// Music timer flavour
    pub music_timer: MusicTimerSource,
    /// Master volume, 0-255
    pub master_volume: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            hardware: HardwareProfile::default(),
            header_layout: HeaderLayout::default(),
            music_timer: MusicTimerSource::default(),
            master_volume: u8::MAX,
        }
    }
}

impl PlayerConfig {
    /// Default configuration for a given rate and hardware
    pub fn new(sample_rate: u32, hardware: HardwareProfile) -> Self {
        Self {
            sample_rate,
            hardware,
            ..Self::default()
        }
    }

    /// Check the configuration for values the synthesizer cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(PcSoundError::ConfigError(format!(
                "sample rate {} Hz outside {MIN_SAMPLE_RATE}..={MAX_SAMPLE_RATE}",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PcSoundError::ConfigError(format!("invalid player config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
