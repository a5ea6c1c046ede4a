//! Real-time playback through the system audio device
//!
//! The rodio mixer pulls samples from a [`PlayerSource`], which fills an
//! internal block straight from the shared [`SoundPlayer`]. The control
//! thread keeps its own `Arc` to start and stop sounds while audio runs.

mod audio_device;

pub use audio_device::{AudioDevice, PlayerSource};

/// Stereo frames rendered per lock of the player
pub const BLOCK_FRAMES: usize = 512;
