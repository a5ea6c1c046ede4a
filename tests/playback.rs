//! End-to-end playback tests
//!
//! Sounds are assembled byte by byte, started on a [`SoundPlayer`] and
//! rendered through the public sample-pull API.

mod common;

use common::{hull, left, note, script, set, SoundBuilder, END};
use pcsound::filter::LowPassFilter;
use pcsound::{HardwareProfile, HeaderLayout, MusicTimerSource, PlayerConfig, SoundPlayer};

const RATE: u32 = 44_100;

/// Frames between two ticks at 44.1 kHz, rounded down
const FRAMES_PER_TICK: usize = 186;

fn new_player(hardware: HardwareProfile) -> SoundPlayer {
    SoundPlayer::new(PlayerConfig::new(RATE, hardware)).expect("valid config")
}

/// Largest negative level the low-pass filter can get stuck at.
///
/// The shift rounds towards minus infinity, so a negative level `L` stops
/// decaying once `|L| * (65536 - decay) < 65536`. Positive levels reach 0.
fn settle_floor(hardware: HardwareProfile) -> i16 {
    let decay = LowPassFilter::adapt_decay(hardware.decay_preset(), RATE);
    (65535 / (65536 - decay)) as i16
}

/// Output has settled on a constant within the filter's rounding floor
fn assert_settled(tail: &[i16], hardware: HardwareProfile) {
    let level = tail[0];
    assert!(tail.iter().all(|&s| s == level), "{hardware:?} still moving");
    assert!(
        (-settle_floor(hardware)..=0).contains(&level),
        "{hardware:?} settled at {level}"
    );
}

/// Long-form rest of 2047 ticks
const LONG_REST: [u8; 2] = [0x97, 0xff];

/// One 96-tick note on channel 0 with the 60000 attack hull
fn note_script() -> Vec<u8> {
    script(&[&hull(12), &note(0, 20, 0), &END])
}

fn single_note() -> Vec<u8> {
    SoundBuilder::new(10, false).both(0, &note_script()).build()
}

/// Twenty 16-tick notes via a loop counter
fn looping_note(channel: u8, pitch: u8) -> Vec<u8> {
    script(&[
        &hull(12),
        &set(38, 20),
        &note(channel, 12, pitch),
        &[0xfe, 38, 0xfa, 0xff],
        &END,
    ])
}

/// Tone chord plus noise, about 1.4 seconds long
fn busy_pcjr_sound() -> Vec<u8> {
    SoundBuilder::new(10, false)
        .pcjr(0, &looping_note(0, 12))
        .pcjr(1, &looping_note(1, 19))
        .pcjr(2, &looping_note(2, 12))
        .pcjr(3, &script(&[&note(3, 20, 4), &END]))
        .build()
}

#[test]
fn test_pcjr_single_note_waveform() {
    let player = new_player(HardwareProfile::PcJr);
    player.start_sound(1, single_note());
    assert!(player.is_playing());

    let out = player.generate_samples(FRAMES_PER_TICK);
    let l = left(&out);
    assert!(l.iter().all(|&s| s > 0), "first half period is positive");
    assert!(out.chunks_exact(2).all(|f| f[0] == f[1]), "mono source");

    // Attenuation index 1 of a full master volume: 8642 peak to peak
    let last = *l.last().unwrap();
    assert!((4200..=4321).contains(&last), "settled level {last}");

    // The tick at the end of the pull already applied one ramp step
    let snapshot = player.channel_snapshot(0).unwrap();
    assert_eq!(snapshot.volume, 59000);
    assert!(snapshot.audible);
}

#[test]
fn test_speaker_amplitude_bound() {
    let player = new_player(HardwareProfile::Speaker);
    player.start_sound(1, single_note());

    let out = player.generate_samples(RATE as usize);
    assert!(out.iter().all(|&s| (-5440..=5440).contains(&s)));
    let l = left(&out);
    let peak = l.iter().copied().max().unwrap();
    assert!(peak > 5200, "speaker plays at full scale regardless of hull, peak {peak}");
    assert!(l.iter().any(|&s| s < -5200), "square wave swings negative");
}

#[test]
fn test_sound_finishes_and_goes_silent() {
    for hardware in [HardwareProfile::Speaker, HardwareProfile::PcJr] {
        let player = new_player(hardware);
        player.start_sound(7, single_note());
        assert!(player.sound_status(7));

        // 96 ticks of note plus the end marker
        player.generate_samples(FRAMES_PER_TICK * 100);
        assert!(!player.is_playing(), "{hardware:?}");
        assert!(!player.sound_status(7));

        // Where it settles depends on the phase the note ended on
        player.generate_samples(RATE as usize);
        assert_settled(&player.generate_samples(1024), hardware);
    }
}

#[test]
fn test_output_independent_of_buffer_sizes() {
    let whole = new_player(HardwareProfile::PcJr);
    let sliced = new_player(HardwareProfile::PcJr);
    whole.start_sound(1, busy_pcjr_sound());
    sliced.start_sound(1, busy_pcjr_sound());

    let frames = 2 * RATE as usize;
    let expected = whole.generate_samples(frames);

    let sizes = [1, 7, 186, 187, 500, 3, 1024, 2];
    let mut actual = Vec::with_capacity(frames * 2);
    let mut i = 0;
    while actual.len() < frames * 2 {
        let n = sizes[i % sizes.len()].min(frames - actual.len() / 2);
        actual.extend(sliced.generate_samples(n));
        i += 1;
    }

    assert_eq!(whole.ticks(), sliced.ticks());
    assert!(expected.iter().any(|&s| s != 0));
    assert_eq!(expected, actual);
}

#[test]
fn test_tick_rate_does_not_drift() {
    let player = new_player(HardwareProfile::Speaker);
    let mut buffer = vec![0i16; 2 * 1000];
    for _ in 0..441 {
        player.fill_buffer(&mut buffer);
    }
    // Ten seconds at 236 Hz
    let ticks = player.ticks() as i64;
    assert!((ticks - 2360).abs() <= 1, "ticks {ticks}");
}

#[test]
fn test_zero_and_odd_length_pulls() {
    let player = new_player(HardwareProfile::PcJr);
    player.start_sound(1, single_note());

    player.fill_buffer(&mut []);
    assert_eq!(player.ticks(), 0);

    let mut odd = vec![-1i16; 5];
    player.fill_buffer(&mut odd);
    assert_eq!(odd[4], 0);
    assert!(odd[..4].iter().all(|&s| s > 0));
}

#[test]
fn test_priority_and_queue_promotion() {
    let player = new_player(HardwareProfile::PcJr);
    let background = SoundBuilder::new(20, true)
        .pcjr(0, &looping_note(0, 12))
        .build();
    let effect = SoundBuilder::new(5, false).pcjr(0, &note_script()).build();

    player.start_sound(1, background);
    player.generate_samples(FRAMES_PER_TICK * 4);
    player.start_sound(2, effect);
    assert_eq!(player.current_sound(), Some(2));
    assert_eq!(player.queued_sound(), Some(1));

    // Too unimportant to interrupt and not restartable: dropped
    let filler = SoundBuilder::new(30, false).pcjr(0, &END).build();
    player.start_sound(3, filler);
    assert!(!player.sound_status(3));
    assert_eq!(player.queued_sound(), Some(1));

    // The effect runs out and the background sound resumes from the top
    player.generate_samples(FRAMES_PER_TICK * 100);
    assert_eq!(player.current_sound(), Some(1));
    assert_eq!(player.queued_sound(), None);
}

#[test]
fn test_stop_current_promotes_queued_sound() {
    let player = new_player(HardwareProfile::PcJr);
    player.start_sound(1, SoundBuilder::new(20, true).pcjr(0, &looping_note(0, 12)).build());
    player.start_sound(2, SoundBuilder::new(5, false).pcjr(1, &looping_note(1, 7)).build());
    player.generate_samples(FRAMES_PER_TICK * 2);

    player.stop_sound(2);
    assert_eq!(player.current_sound(), Some(1));
    // Channels were reloaded from sound 1's entry table
    assert_eq!(player.channel_snapshot(0).unwrap().time_left, 1);
    assert_eq!(player.channel_snapshot(1).unwrap().time_left, 0);

    player.stop_sound(42);
    assert_eq!(player.current_sound(), Some(1));

    player.stop_all_sounds();
    assert!(!player.is_playing());
    assert_eq!(player.queued_sound(), None);
}

#[test]
fn test_compact_header_layout() {
    let config = PlayerConfig {
        header_layout: HeaderLayout::Compact,
        ..PlayerConfig::new(RATE, HardwareProfile::Speaker)
    };
    let player = SoundPlayer::new(config).unwrap();
    let body = script(&[&hull(12), &note(0, 20, 0), &END]);
    let data = SoundBuilder::new(1, false)
        .layout(HeaderLayout::Compact)
        .speaker(0, &body)
        .build();

    player.start_sound(1, data);
    let out = player.generate_samples(FRAMES_PER_TICK);
    assert!(out.iter().step_by(2).all(|&s| s > 0));
}

#[test]
fn test_malformed_bytecode_never_panics() {
    // Small LCG so the garbage is reproducible
    let mut seed = 0x1234_5678u32;
    let mut garbage = || {
        (0..64)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
                (seed >> 16) as u8
            })
            .collect::<Vec<u8>>()
    };

    for hardware in [HardwareProfile::Speaker, HardwareProfile::PcJr] {
        for round in 0..8 {
            let mut data = SoundBuilder::new(1, false)
                .both(0, &garbage())
                .both(1, &garbage())
                .both(2, &garbage())
                .both(3, &garbage())
                .build();
            if round % 2 == 1 {
                // Entry points past the end of the data
                data.truncate(40);
                data[8] = 0xff;
                data[16] = 0xf0;
            }
            let player = new_player(hardware);
            player.start_sound(1, data);
            player.generate_samples(RATE as usize / 2);
        }
    }
}

#[test]
fn test_runaway_loop_is_cut_off() {
    // Branch-to-self with a zero counter never terminates on its own
    let data = SoundBuilder::new(1, false)
        .both(0, &[0xfe, 38, 0xfc, 0xff])
        .build();
    for hardware in [HardwareProfile::Speaker, HardwareProfile::PcJr] {
        let player = new_player(hardware);
        player.start_sound(1, data.clone());
        player.generate_samples(FRAMES_PER_TICK * 4);
        assert!(!player.is_playing(), "{hardware:?}");
    }
}

#[test]
fn test_filter_settle_floor() {
    assert_eq!(settle_floor(HardwareProfile::Speaker), 42);
    assert_eq!(settle_floor(HardwareProfile::PcJr), 25);
}

#[test]
fn test_music_timer_follows_tempo_writes() {
    // Tempo write, then a long rest to keep the sound alive
    let body = script(&[&set(14, 2), &LONG_REST, &END]);
    let data = SoundBuilder::new(1, false).both(0, &body).build();

    let timed = new_player(HardwareProfile::PcJr);
    timed.start_sound(1, data);
    timed.generate_samples(2 * RATE as usize);
    // 473 ticks with one increment every 126
    assert_eq!(timed.music_timer(), 3);

    let idle = new_player(HardwareProfile::PcJr);
    idle.start_sound(1, SoundBuilder::new(1, false).both(0, &LONG_REST).build());
    idle.generate_samples(2 * RATE as usize);
    assert_eq!(idle.music_timer(), 0);
}

#[test]
fn test_music_timer_from_channel_register() {
    let config = PlayerConfig {
        music_timer: MusicTimerSource::ChannelRegister,
        ..PlayerConfig::new(RATE, HardwareProfile::Speaker)
    };
    let player = SoundPlayer::new(config).unwrap();
    let body = script(&[&set(46, 7), &LONG_REST, &END]);
    player.start_sound(1, SoundBuilder::new(1, false).both(0, &body).build());
    player.generate_samples(FRAMES_PER_TICK * 2);
    assert_eq!(player.music_timer(), 7);
}

#[test]
fn test_master_volume_scales_output() {
    let loud = new_player(HardwareProfile::Speaker);
    let quiet = new_player(HardwareProfile::Speaker);
    quiet.set_master_volume(64);
    loud.start_sound(1, single_note());
    quiet.start_sound(1, single_note());

    let peak = |p: &SoundPlayer| {
        p.generate_samples(4 * FRAMES_PER_TICK)
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap()
    };
    let (loud_peak, quiet_peak) = (peak(&loud), peak(&quiet));
    assert!(quiet_peak > 0);
    assert!(quiet_peak * 3 < loud_peak, "{quiet_peak} vs {loud_peak}");

    quiet.set_master_volume(0);
    quiet.generate_samples(RATE as usize);
    assert_settled(&quiet.generate_samples(256), HardwareProfile::Speaker);
}
