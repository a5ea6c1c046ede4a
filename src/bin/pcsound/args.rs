//! Command-line argument parsing for the pcsound renderer.

use std::env;
use std::path::PathBuf;

use pcsound::{HardwareProfile, HeaderLayout};

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Raw sound resource to render
    pub input: Option<PathBuf>,
    /// WAV file to write
    pub output: Option<PathBuf>,
    /// JSON player configuration
    pub config: Option<PathBuf>,
    /// Overrides applied on top of the configuration
    pub hardware: Option<HardwareProfile>,
    pub sample_rate: Option<u32>,
    pub header_layout: Option<HeaderLayout>,
    pub master_volume: Option<u8>,
    /// Length limit in seconds
    pub max_seconds: Option<f32>,
    /// Play through the audio device instead of writing a file
    pub play: bool,
    pub show_help: bool,
    /// Help was requested because the command line was invalid
    pub invalid: bool,
}

impl CliArgs {
    /// Parse arguments from the command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(mut iter: impl Iterator<Item = String>) -> Self {
        let mut args = Self::default();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => args.show_help = true,
                "--pcjr" => args.hardware = Some(HardwareProfile::PcJr),
                "--speaker" => args.hardware = Some(HardwareProfile::Speaker),
                "--play" => args.play = true,
                "-o" | "--output" => args.output = value(&mut iter, &arg, &mut args.invalid),
                "--config" => args.config = value(&mut iter, &arg, &mut args.invalid),
                "--rate" => args.sample_rate = value(&mut iter, &arg, &mut args.invalid),
                "--volume" => args.master_volume = value(&mut iter, &arg, &mut args.invalid),
                "--max-seconds" => args.max_seconds = value(&mut iter, &arg, &mut args.invalid),
                "--header" => {
                    let layout: Option<String> = value(&mut iter, &arg, &mut args.invalid);
                    args.header_layout = match layout.as_deref() {
                        Some("compact") => Some(HeaderLayout::Compact),
                        Some("extended") => Some(HeaderLayout::Extended),
                        Some(other) => {
                            eprintln!("Unknown header layout: {other}");
                            args.invalid = true;
                            None
                        }
                        None => None,
                    };
                }
                _ if arg.starts_with('-') => {
                    eprintln!("Unknown flag: {arg}");
                    args.invalid = true;
                }
                _ => args.input = Some(PathBuf::from(arg)),
            }
        }

        args.show_help |= args.invalid;
        args
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  pcsound [options] <sound.bin> -o <out.wav>\n\n\
             Options:\n\
             \x20 -o, --output <file>    WAV file to write\n\
             \x20 --play                 Play through the audio device (streaming builds)\n\
             \x20 --pcjr | --speaker     Hardware to emulate (default: speaker)\n\
             \x20 --rate <hz>            Output sample rate (default: 44100)\n\
             \x20 --header <layout>      compact (4-byte) or extended (6-byte) header\n\
             \x20 --volume <0-255>       Master volume\n\
             \x20 --max-seconds <s>      Stop rendering after this long (default: 300)\n\
             \x20 --config <file.json>   Player configuration; flags override it\n\
             \x20 -h, --help             Show this help\n\n\
             Set RUST_LOG=debug (or trace) for sequencer diagnostics."
        );
    }
}

fn value<T: std::str::FromStr>(
    iter: &mut impl Iterator<Item = String>,
    flag: &str,
    invalid: &mut bool,
) -> Option<T> {
    let parsed = iter.next().and_then(|v| v.parse().ok());
    if parsed.is_none() {
        eprintln!("{flag} requires a valid argument");
        *invalid = true;
    }
    parsed
}
