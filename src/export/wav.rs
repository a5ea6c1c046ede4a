//! WAV file export

use std::path::Path;

use tracing::info;

use super::{render_until_idle, ExportConfig, RenderSummary};
use crate::{PcSoundError, Result, SoundPlayer};

/// Render the player's current sound to a 16-bit stereo WAV file
///
/// # Examples
///
/// ```no_run
/// use pcsound::export::{export_to_wav, ExportConfig};
/// use pcsound::{PlayerConfig, SoundPlayer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let player = SoundPlayer::new(PlayerConfig::default())?;
/// player.start_sound(1, std::fs::read("sound.bin")?);
/// export_to_wav(&player, "sound.wav", ExportConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_wav<P: AsRef<Path>>(
    player: &SoundPlayer,
    output_path: P,
    config: ExportConfig,
) -> Result<RenderSummary> {
    let (samples, summary) = render_until_idle(player, config);
    if !summary.finished {
        info!(
            seconds = config.max_seconds,
            "sound still playing at the length limit, output truncated"
        );
    }
    write_wav_file(output_path.as_ref(), &samples, player.sample_rate())?;
    Ok(summary)
}

/// Write interleaved stereo samples to a WAV file
pub fn write_wav_file(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| PcSoundError::AudioFileError(format!("failed to create WAV file: {e}")))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| PcSoundError::AudioFileError(format!("failed to write sample: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| PcSoundError::AudioFileError(format!("failed to finalize WAV file: {e}")))?;

    info!(path = %path.display(), frames = samples.len() / 2, "WAV written");
    Ok(())
}
