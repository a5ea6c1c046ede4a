//! PC speaker and PCjr music synthesizer
//!
//! Plays the bytecode-driven sound resources of late-80s PC adventure
//! games by emulating the two tone devices they targeted: the single-voice
//! PC speaker and the four-voice PCjr / Tandy sound chip.
//!
//! # Features
//! - Bytecode sequencer with chords, subroutines, loops and register writes
//! - Table-driven volume envelopes ("hulls") and frequency modulation
//! - Edge-accurate square-wave synthesis with a shared noise LFSR
//! - Single-pole low-pass output stage, adapted to the output rate
//! - Sample-accurate 236 Hz tick scheduling independent of buffer sizes
//! - Priority-based current / queued sound management
//!
//! # Crate feature flags
//! - `streaming` (opt-in): real-time output through rodio ([`streaming`])
//! - `export-wav` (opt-in): offline rendering to WAV through hound ([`export`])
//! - `cli` (opt-in): the `pcsound` command line renderer
//!
//! # Quick start
//! ```no_run
//! use pcsound::{HardwareProfile, PlayerConfig, SoundPlayer};
//!
//! let player = SoundPlayer::new(PlayerConfig::new(44_100, HardwareProfile::PcJr)).unwrap();
//! let data = std::fs::read("sound.bin").unwrap();
//! player.start_sound(1, data);
//!
//! // From the audio callback:
//! let mut buffer = vec![0i16; 2 * 1024];
//! player.fill_buffer(&mut buffer);
//! ```

#![warn(missing_docs)]

pub mod channel;
pub mod clock;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod filter;
pub mod freqmod;
pub mod generators;
pub mod hardware;
pub mod queue;
pub mod resource;
pub mod sequencer;
pub mod volume;

mod engine;
mod player;

#[cfg(feature = "export-wav")]
pub mod export;
#[cfg(feature = "streaming")]
pub mod streaming;

/// Error types for player operations
///
/// Only construction, configuration and I/O report errors. The sample pull
/// and the bytecode interpreter tolerate anything the sound data throws at
/// them.
#[derive(thiserror::Error, Debug)]
pub enum PcSoundError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Sound resource cannot be played
    #[error("Invalid sound resource {id}: {reason}")]
    ResourceError {
        /// Id the resource was submitted under
        id: resource::SoundId,
        /// What is wrong with it
        reason: String,
    },

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for PcSoundError {
    /// Converts a String into `PcSoundError::Other`.
    ///
    /// Prefer the specific variants where the failure has a known category.
    fn from(msg: String) -> Self {
        PcSoundError::Other(msg)
    }
}

impl From<&str> for PcSoundError {
    /// Converts a string slice into `PcSoundError::Other`.
    fn from(msg: &str) -> Self {
        PcSoundError::Other(msg.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PcSoundError>;

// Public API exports
pub use config::{MusicTimerSource, PlayerConfig};
pub use engine::ChannelSnapshot;
pub use hardware::HardwareProfile;
pub use player::SoundPlayer;
pub use resource::{HeaderLayout, PlaybackRequest, SoundId};

#[cfg(feature = "streaming")]
pub use streaming::AudioDevice;
