//! pcsound: render PC speaker / PCjr sound resources

mod args;

use std::fs;

use anyhow::{bail, Context, Result};
use tracing::info;

use args::CliArgs;
use pcsound::export::{export_to_wav, ExportConfig};
use pcsound::{PlayerConfig, SoundPlayer};

/// Id the rendered resource is started under
const SOUND_ID: u32 = 1;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    if args.show_help {
        CliArgs::print_help();
        if args.invalid {
            bail!("invalid command line");
        }
        return Ok(());
    }
    let Some(input) = args.input.as_ref() else {
        CliArgs::print_help();
        bail!("no sound resource given");
    };

    let config = build_config(&args)?;
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let player = SoundPlayer::new(config).context("creating player")?;
    info!(
        file = %input.display(),
        bytes = data.len(),
        hardware = ?config.hardware,
        sample_rate = config.sample_rate,
        "loaded sound"
    );
    player.start_sound(SOUND_ID, data);
    if !player.is_playing() {
        bail!("{} is not a playable sound resource", input.display());
    }

    let mut export = ExportConfig::default();
    if let Some(seconds) = args.max_seconds {
        export = export.max_seconds(seconds);
    }

    if args.play {
        return play(player, export);
    }

    let Some(output) = args.output.as_ref() else {
        bail!("no output file given (use -o <out.wav> or --play)");
    };
    let summary = export_to_wav(&player, output, export)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Rendered {:.2}s to {}{}",
        summary.frames as f32 / config.sample_rate as f32,
        output.display(),
        if summary.finished { "" } else { " (truncated)" }
    );
    Ok(())
}

fn build_config(args: &CliArgs) -> Result<PlayerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PlayerConfig::from_json_str(&json)?
        }
        None => PlayerConfig::default(),
    };
    if let Some(hardware) = args.hardware {
        config.hardware = hardware;
    }
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(layout) = args.header_layout {
        config.header_layout = layout;
    }
    if let Some(volume) = args.master_volume {
        config.master_volume = volume;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "streaming")]
fn play(player: SoundPlayer, export: ExportConfig) -> Result<()> {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    let player = Arc::new(player);
    let device = pcsound::AudioDevice::new(Arc::clone(&player))?;
    let deadline = Instant::now() + Duration::from_secs_f32(export.max_seconds.clamp(0.0, 86_400.0));
    while player.is_playing() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    std::thread::sleep(Duration::from_secs_f32(export.tail_seconds.clamp(0.0, 10.0)));
    device.finish();
    Ok(())
}

#[cfg(not(feature = "streaming"))]
fn play(_player: SoundPlayer, _export: ExportConfig) -> Result<()> {
    bail!("--play requires the \"streaming\" feature; rebuild with `--features cli,streaming`")
}
