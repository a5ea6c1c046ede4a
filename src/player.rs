//! Thread-safe player
//!
//! [`SoundPlayer`] is shared between the host's control thread (start,
//! stop, volume) and its audio callback (sample pulls). Every method holds
//! one engine-wide lock for its whole body, so a pull never observes a
//! half-updated channel.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::config::PlayerConfig;
use crate::engine::{ChannelSnapshot, Engine};
use crate::hardware::HardwareProfile;
use crate::resource::{PlaybackRequest, SoundId};
use crate::Result;

/// PC speaker / PCjr sound player
///
/// # Example
///
/// ```
/// use pcsound::{HardwareProfile, PlayerConfig, SoundPlayer};
///
/// let player = SoundPlayer::new(PlayerConfig::new(44_100, HardwareProfile::PcJr)).unwrap();
/// let mut buffer = vec![0i16; 2 * 512];
/// player.fill_buffer(&mut buffer); // silence until a sound is started
/// assert!(buffer.iter().all(|&s| s == 0));
/// ```
pub struct SoundPlayer {
    engine: Mutex<Engine>,
    config: PlayerConfig,
}

impl SoundPlayer {
    /// Create a player after validating `config`
    pub fn new(config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: Mutex::new(Engine::new(&config)),
            config,
        })
    }

    /// Configuration the player was created with
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Output sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Start a sound resource.
    ///
    /// Resources that cannot be parsed are logged and ignored; nothing is
    /// queued for them.
    pub fn start_sound(&self, id: SoundId, data: impl Into<Arc<[u8]>>) {
        let data = data.into();
        let mut engine = self.engine.lock();
        match PlaybackRequest::new(id, data, engine.header_layout()) {
            Ok(request) => engine.start_sound(request),
            Err(e) => warn!(id, error = %e, "sound rejected"),
        }
    }

    /// Stop a sound whether it is playing or queued
    pub fn stop_sound(&self, id: SoundId) {
        self.engine.lock().stop_sound(id);
    }

    /// Stop everything and forget the queued sound
    pub fn stop_all_sounds(&self) {
        self.engine.lock().stop_all_sounds();
    }

    /// `true` if the sound is playing or queued
    pub fn sound_status(&self, id: SoundId) -> bool {
        self.engine.lock().sound_status(id)
    }

    /// A sound currently owns the channels
    pub fn is_playing(&self) -> bool {
        self.engine.lock().queue().current().is_some()
    }

    /// Id of the sound that owns the channels
    pub fn current_sound(&self) -> Option<SoundId> {
        self.engine.lock().queue().current().map(PlaybackRequest::id)
    }

    /// Id of the sound waiting to play next
    pub fn queued_sound(&self) -> Option<SoundId> {
        self.engine.lock().queue().queued().map(PlaybackRequest::id)
    }

    /// Rebuild the volume table for a master volume of 0-255
    pub fn set_master_volume(&self, volume: u8) {
        self.engine.lock().set_master_volume(volume);
    }

    /// Switch the emulated hardware.
    ///
    /// Oscillator phases restart; channel state and the queue are kept.
    pub fn set_hardware(&self, hardware: HardwareProfile) {
        self.engine.lock().set_hardware(hardware);
    }

    /// Hardware currently emulated
    pub fn hardware(&self) -> HardwareProfile {
        self.engine.lock().hardware()
    }

    /// Fill an interleaved stereo buffer.
    ///
    /// This is the real-time entry point: it never allocates and its cost
    /// is proportional to `out.len()`. An empty buffer is a no-op.
    pub fn fill_buffer(&self, out: &mut [i16]) {
        if out.is_empty() {
            return;
        }
        self.engine.lock().mix(out);
    }

    /// Render `frames` stereo frames into a new buffer
    pub fn generate_samples(&self, frames: usize) -> Vec<i16> {
        let mut out = vec![0i16; frames * 2];
        self.fill_buffer(&mut out);
        out
    }

    /// Counter for synchronising game logic with the music
    pub fn music_timer(&self) -> u32 {
        self.engine.lock().music_timer()
    }

    /// Elementary ticks executed since the player was created
    pub fn ticks(&self) -> u64 {
        self.engine.lock().ticks()
    }

    /// State of one hardware channel (0-3)
    pub fn channel_snapshot(&self, channel: usize) -> Option<ChannelSnapshot> {
        self.engine.lock().snapshot(channel)
    }
}
