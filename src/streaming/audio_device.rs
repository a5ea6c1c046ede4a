//! Audio device integration using rodio

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rodio::{OutputStream, Sink, Source};

use super::BLOCK_FRAMES;
use crate::{PcSoundError, Result, SoundPlayer};

/// rodio source pulling interleaved stereo samples from a player
pub struct PlayerSource {
    player: Arc<SoundPlayer>,
    finished: Arc<AtomicBool>,
    /// Rendered block (reduces lock traffic)
    block: Vec<i16>,
    pos: usize,
}

impl PlayerSource {
    /// Create a source; it ends once `finished` is set
    pub fn new(player: Arc<SoundPlayer>, finished: Arc<AtomicBool>) -> Self {
        let block = vec![0i16; BLOCK_FRAMES * 2];
        PlayerSource {
            player,
            finished,
            pos: block.len(),
            block,
        }
    }
}

impl Iterator for PlayerSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }
        if self.pos >= self.block.len() {
            self.player.fill_buffer(&mut self.block);
            self.pos = 0;
        }
        let sample = self.block[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

impl Source for PlayerSource {
    fn current_frame_len(&self) -> Option<usize> {
        // A fresh block is rendered once the current one is used up.
        match self.block.len() - self.pos {
            0 => Some(self.block.len()),
            remaining => Some(remaining),
        }
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        self.player.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Audio playback device using rodio
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Open the default output device and start pulling from `player`
    pub fn new(player: Arc<SoundPlayer>) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            PcSoundError::AudioDeviceError(format!("failed to open audio stream: {e}"))
        })?;
        let sink = Sink::try_new(&handle).map_err(|e| {
            PcSoundError::AudioDeviceError(format!("failed to create audio sink: {e}"))
        })?;

        let finished = Arc::new(AtomicBool::new(false));
        sink.append(PlayerSource::new(player, Arc::clone(&finished)));

        Ok(AudioDevice {
            _stream: stream,
            sink,
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// Stop pulling samples; the stream drains and ends
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.finish();
        self.sink.pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerConfig;

    #[test]
    fn test_source_reports_stereo_at_player_rate() {
        let player = Arc::new(SoundPlayer::new(PlayerConfig::default()).unwrap());
        let source = PlayerSource::new(player, Arc::new(AtomicBool::new(false)));
        assert_eq!(source.channels(), 2);
        assert_eq!(source.sample_rate(), 44_100);
    }

    #[test]
    fn test_source_stops_when_finished() {
        let player = Arc::new(SoundPlayer::new(PlayerConfig::default()).unwrap());
        let finished = Arc::new(AtomicBool::new(false));
        let mut source = PlayerSource::new(player, Arc::clone(&finished));
        assert_eq!(source.by_ref().take(3000).count(), 3000);
        finished.store(true, Ordering::Relaxed);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_device_creation_when_available() {
        let player = Arc::new(SoundPlayer::new(PlayerConfig::default()).unwrap());
        match AudioDevice::new(player) {
            Ok(device) => device.finish(),
            Err(err) => eprintln!("skipping: audio backend unavailable: {err}"),
        }
    }
}
