//! Unlocked synthesizer core
//!
//! [`Engine`] owns every piece of mutable state: the channel bank, the
//! sound queue, the tick clock and the output stage. It performs no
//! locking of its own; [`SoundPlayer`](crate::SoundPlayer) serialises all
//! access to it.

use tracing::debug;

use crate::channel::ChannelBank;
use crate::clock::{MusicTimer, TickClock};
use crate::config::{MusicTimerSource, PlayerConfig};
use crate::constants::NUM_CHANNELS;
use crate::filter::LowPassFilter;
use crate::generators::{NoiseMode, SquareGenerator};
use crate::hardware::HardwareProfile;
use crate::queue::{SoundQueue, StopOutcome};
use crate::resource::{HeaderLayout, PlaybackRequest, SoundId};
use crate::sequencer;
use crate::volume::VolumeTable;

/// Channel of the PCjr that produces noise
const NOISE_CHANNEL: usize = 3;

/// Read-only view of one channel for visualisation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSnapshot {
    /// Divider currently sent to the hardware
    pub freq: u16,
    /// Envelope level (0 = silent)
    pub volume: u16,
    /// Ticks until the channel's next bytecode step
    pub time_left: u16,
    /// Channel contributes to the output
    pub audible: bool,
}

pub(crate) struct Engine {
    sample_rate: u32,
    hardware: HardwareProfile,
    layout: HeaderLayout,
    timer_source: MusicTimerSource,
    channels: ChannelBank,
    queue: SoundQueue,
    clock: TickClock,
    music_timer: MusicTimer,
    square: SquareGenerator,
    filter: LowPassFilter,
    volume: VolumeTable,
}

impl Engine {
    /// Build an engine from an already validated configuration
    pub fn new(config: &PlayerConfig) -> Self {
        let rate = config.sample_rate;
        let hardware = config.hardware;
        Self {
            sample_rate: rate,
            hardware,
            layout: config.header_layout,
            timer_source: config.music_timer,
            channels: ChannelBank::new(),
            queue: SoundQueue::new(),
            clock: TickClock::new(rate),
            music_timer: MusicTimer::new(),
            square: SquareGenerator::new(hardware.update_step(rate)),
            filter: LowPassFilter::new(hardware.decay_preset(), rate),
            volume: VolumeTable::new(config.master_volume),
        }
    }

    pub fn hardware(&self) -> HardwareProfile {
        self.hardware
    }

    pub fn set_hardware(&mut self, hardware: HardwareProfile) {
        self.hardware = hardware;
        self.square.reconfigure(hardware.update_step(self.sample_rate));
        self.filter
            .set_decay(LowPassFilter::adapt_decay(hardware.decay_preset(), self.sample_rate));
    }

    pub fn set_master_volume(&mut self, volume: u8) {
        self.volume = VolumeTable::new(volume);
    }

    pub fn start_sound(&mut self, request: PlaybackRequest) {
        debug!(
            id = request.id(),
            priority = request.priority(),
            restartable = request.restartable(),
            "start sound"
        );
        if self.queue.offer(request) {
            self.chain_current();
        }
    }

    pub fn stop_sound(&mut self, id: SoundId) {
        if self.queue.stop(id) == StopOutcome::StoppedCurrent {
            self.chain_current();
        }
    }

    pub fn stop_all_sounds(&mut self) {
        debug!("stop all sounds");
        self.queue.clear();
        self.channels.reset_hardware();
    }

    pub fn sound_status(&self, id: SoundId) -> bool {
        self.queue.contains(id)
    }

    pub fn queue(&self) -> &SoundQueue {
        &self.queue
    }

    pub fn header_layout(&self) -> HeaderLayout {
        self.layout
    }

    pub fn music_timer(&self) -> u32 {
        match self.timer_source {
            MusicTimerSource::Global => self.music_timer.value(),
            MusicTimerSource::ChannelRegister => self.channels[0].music_timer as u32,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn snapshot(&self, channel: usize) -> Option<ChannelSnapshot> {
        let ch = self.channels.hardware().get(channel)?;
        Some(ChannelSnapshot {
            freq: ch.freq,
            volume: ch.volume,
            time_left: ch.time_left,
            audible: ch.is_audible(),
        })
    }

    /// Load the current sound's entry points into the channels
    fn chain_current(&mut self) {
        self.channels.reset_hardware();
        let Some(request) = self.queue.current() else {
            return;
        };
        self.music_timer.restart();

        for i in 0..NUM_CHANNELS {
            let entry = request.channel_entry(self.hardware, i);
            let ch = &mut self.channels[i];
            ch.script_nr = request.id() as u16;
            ch.next_cmd = entry;
            if entry != 0 {
                ch.time_left = 1;
            }
        }
        debug!(id = request.id(), hardware = ?self.hardware, "sound chained");
    }

    /// Fill interleaved stereo `out`, running sequencer ticks at the exact
    /// sample positions they fall on.
    ///
    /// A trailing odd sample is zeroed.
    pub fn mix(&mut self, out: &mut [i16]) {
        let frames = out.len() / 2;
        if out.len() % 2 == 1 {
            if let Some(last) = out.last_mut() {
                *last = 0;
            }
        }

        let mut pos = 0;
        while pos < frames {
            let step = (frames - pos).min(self.clock.samples_until_tick() as usize);
            if step > 0 {
                self.render(&mut out[pos * 2..(pos + step) * 2]);
                pos += step;
            }
            if self.clock.advance(step as u32) {
                self.next_tick();
            }
        }
    }

    /// One elementary sequencer tick
    fn next_tick(&mut self) {
        for i in 0..NUM_CHANNELS {
            if !self.channels[i].is_active() {
                continue;
            }
            self.channels[i].advance_modulation();
            if self.channels[i].count_down() {
                self.run_script(i);
            }
            self.channels[i].advance_hull();
        }

        self.music_timer.tick();

        if self.queue.current().is_some() && self.channels.all_idle() {
            self.queue.finish_current();
            self.chain_current();
        }
    }

    fn run_script(&mut self, channel: usize) {
        let Some(request) = self.queue.current() else {
            self.channels[channel].next_cmd = 0;
            return;
        };
        let report = sequencer::execute(&mut self.channels, channel, request.data(), self.hardware);
        if report.tempo_written {
            self.music_timer.set_divider(MusicTimer::TEMPO_DIVIDER);
        }
    }

    fn render(&mut self, out: &mut [i16]) {
        out.fill(0);
        match self.hardware {
            HardwareProfile::Speaker => self.render_speaker(out),
            HardwareProfile::PcJr => self.render_pcjr(out),
        }
    }

    /// Single oscillator: the first audible channel wins
    fn render_speaker(&mut self, out: &mut [i16]) {
        let winner = self
            .channels
            .hardware()
            .iter()
            .position(|c| c.is_audible());

        match winner {
            Some(i) => {
                // The speaker has a single oscillator, always timer 0.
                let freq = self.channels[i].freq as u32;
                self.square.render(0, freq, self.volume.amplitude(0), None, out);
            }
            None if self.filter.level() == 0 => return,
            None => {}
        }
        self.filter.process(out);
    }

    /// Three tone channels and a noise channel mixed together
    fn render_pcjr(&mut self, out: &mut [i16]) {
        let frames = out.len() / 2;

        for i in 1..3 {
            let ch = &self.channels[i];
            if !ch.is_audible() {
                continue;
            }
            let freq = ch.freq >> 6;
            for j in 0..i {
                let other = &self.channels[j];
                if other.is_audible() && other.freq >> 6 == freq {
                    self.square.sync_phase(i, j);
                }
            }
        }

        let mut has_data = false;
        for i in 0..NUM_CHANNELS {
            let ch = &self.channels[i];
            let audible = ch.is_audible();
            let freq = (ch.freq >> 6) as u32;
            let amplitude = self.volume.amplitude(((65535 - ch.volume as u32) >> 12) as usize);

            if !audible {
                self.square.drain(i, frames);
                continue;
            }
            has_data = true;

            if i == NOISE_CHANNEL {
                let mode = if freq & 4 != 0 {
                    NoiseMode::White
                } else {
                    NoiseMode::Periodic
                };
                let rate = match freq & 3 {
                    3 => 2 * (self.channels[2].freq >> 6) as u32,
                    n => 1 << (5 + n),
                };
                self.square.render(i, rate, amplitude, Some(mode), out);
            } else {
                self.square.render(i, freq, amplitude, None, out);
            }
        }

        if has_data || self.filter.level() != 0 {
            self.filter.process(out);
        }
    }
}
