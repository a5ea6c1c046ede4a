//! Offline rendering
//!
//! Renders a sound from start to end into a file. The sequencer decides
//! where the sound ends; [`ExportConfig`] caps runaway (looping) sounds
//! and adds a short tail so the low-pass filter can settle.

mod wav;

pub use wav::{export_to_wav, write_wav_file};

use crate::SoundPlayer;

/// Offline render settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportConfig {
    /// Hard limit on rendered audio, in seconds
    pub max_seconds: f32,
    /// Audio kept after the sound finishes, in seconds
    pub tail_seconds: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_seconds: 300.0,
            tail_seconds: 0.25,
        }
    }
}

impl ExportConfig {
    /// Set the length limit
    pub fn max_seconds(mut self, seconds: f32) -> Self {
        self.max_seconds = seconds;
        self
    }

    /// Set the tail length
    pub fn tail_seconds(mut self, seconds: f32) -> Self {
        self.tail_seconds = seconds;
        self
    }
}

/// Outcome of a render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Stereo frames rendered
    pub frames: usize,
    /// The sound finished before the length limit
    pub finished: bool,
}

/// Frames pulled from the player per iteration
const RENDER_CHUNK_FRAMES: usize = 1024;

/// Pull samples from `player` until its sound (and any queued one) has
/// finished, then render the configured tail.
pub fn render_until_idle(player: &SoundPlayer, config: ExportConfig) -> (Vec<i16>, RenderSummary) {
    let rate = player.sample_rate() as f32;
    let max_frames = (config.max_seconds.max(0.0) * rate) as usize;
    let tail_frames = (config.tail_seconds.max(0.0) * rate) as usize;

    let mut samples = Vec::new();
    let mut chunk = vec![0i16; RENDER_CHUNK_FRAMES * 2];
    let mut frames = 0;

    while frames < max_frames && player.is_playing() {
        let n = RENDER_CHUNK_FRAMES.min(max_frames - frames);
        player.fill_buffer(&mut chunk[..n * 2]);
        samples.extend_from_slice(&chunk[..n * 2]);
        frames += n;
    }
    let finished = !player.is_playing();

    if finished {
        samples.extend(player.generate_samples(tail_frames));
        frames += tail_frames;
    }

    (samples, RenderSummary { frames, finished })
}
