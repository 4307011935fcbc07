// Tone bank and player - Pre-rendered game tones for the audio callback
//
// Every sound the game makes is a short one-shot, so tones are rendered once
// at stream start and the real-time callback only copies samples out of the
// bank. Signal tones are decaying sines at the pad's frequency; the failure
// tone is a longer, lower sawtooth that is clearly not part of normal play.

use crate::game::signal::Signal;
use crate::synth::oscillator::{Oscillator, SimpleOscillator, WaveformType};

/// Peak amplitude of every game tone.
const TONE_AMPLITUDE: f32 = 0.3;
/// Amplitude the decay envelope ends on.
const TONE_FLOOR: f32 = 0.01;
/// Signal tone length in seconds.
const SIGNAL_TONE_SECS: f32 = 0.3;
/// Failure tone length in seconds.
const GAME_OVER_TONE_SECS: f32 = 0.5;
/// Failure tone frequency in Hz.
const GAME_OVER_FREQUENCY: f32 = 100.0;

/// Pre-rendered tone buffers, one per signal plus the failure tone.
pub struct ToneBank {
    signal_tones: [Vec<f32>; 4],
    game_over_tone: Vec<f32>,
}

impl ToneBank {
    pub fn new(sample_rate: f32) -> Self {
        let signal_tones = Signal::ALL.map(|signal| {
            Self::render(
                WaveformType::Sine,
                signal.frequency(),
                SIGNAL_TONE_SECS,
                sample_rate,
            )
        });
        let game_over_tone = Self::render(
            WaveformType::Saw,
            GAME_OVER_FREQUENCY,
            GAME_OVER_TONE_SECS,
            sample_rate,
        );

        Self {
            signal_tones,
            game_over_tone,
        }
    }

    /// Render one tone: oscillator output under an exponential decay
    /// envelope running from `TONE_AMPLITUDE` down to `TONE_FLOOR`.
    fn render(waveform: WaveformType, frequency: f32, seconds: f32, sample_rate: f32) -> Vec<f32> {
        let num_samples = (seconds * sample_rate) as usize;
        let mut oscillator = SimpleOscillator::new(waveform, sample_rate);
        oscillator.set_frequency(frequency);

        let ratio = TONE_FLOOR / TONE_AMPLITUDE;
        let mut samples = Vec::with_capacity(num_samples);
        for i in 0..num_samples {
            let t = i as f32 / num_samples as f32;
            let envelope = TONE_AMPLITUDE * ratio.powf(t);
            samples.push(oscillator.next_sample() * envelope);
        }

        samples
    }

    pub fn signal_tone(&self, signal: Signal) -> &[f32] {
        &self.signal_tones[signal.index()]
    }

    pub fn game_over_tone(&self) -> &[f32] {
        &self.game_over_tone
    }
}

/// One in-flight playback: which buffer, and how far into it we are.
#[derive(Debug, Clone, Copy)]
struct TonePlayback {
    tone: ToneSelector,
    position: usize,
    age: u64,
}

#[derive(Debug, Clone, Copy)]
enum ToneSelector {
    Signal(Signal),
    GameOver,
}

/// Maximum simultaneous tone playbacks. An input flash can overlap the tail
/// of a playback tone, but never more than a couple at once.
const MAX_PLAYBACKS: usize = 4;

/// Mixes active tone playbacks inside the audio callback.
pub struct TonePlayer {
    bank: ToneBank,
    slots: [Option<TonePlayback>; MAX_PLAYBACKS],
    age_counter: u64,
}

impl TonePlayer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            bank: ToneBank::new(sample_rate),
            slots: [None; MAX_PLAYBACKS],
            age_counter: 0,
        }
    }

    pub fn trigger_signal(&mut self, signal: Signal) {
        self.trigger(ToneSelector::Signal(signal));
    }

    pub fn trigger_game_over(&mut self) {
        self.trigger(ToneSelector::GameOver);
    }

    /// Stop every sounding tone immediately.
    pub fn silence(&mut self) {
        self.slots = [None; MAX_PLAYBACKS];
    }

    fn trigger(&mut self, tone: ToneSelector) {
        self.age_counter = self.age_counter.wrapping_add(1);
        let playback = TonePlayback {
            tone,
            position: 0,
            age: self.age_counter,
        };

        if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(playback);
            return;
        }

        // All slots busy: replace the oldest playback.
        if let Some(slot) = self.slots.iter_mut().min_by_key(|s| s.map(|p| p.age)) {
            *slot = Some(playback);
        }
    }

    /// Mix one sample from every active playback; finished playbacks free
    /// their slot.
    pub fn process_sample(&mut self) -> f32 {
        let mut mix = 0.0;
        for slot in self.slots.iter_mut() {
            if let Some(playback) = slot {
                let buffer = match playback.tone {
                    ToneSelector::Signal(signal) => self.bank.signal_tone(signal),
                    ToneSelector::GameOver => self.bank.game_over_tone(),
                };
                if playback.position < buffer.len() {
                    mix += buffer[playback.position];
                    playback.position += 1;
                } else {
                    *slot = None;
                }
            }
        }
        mix
    }

    /// True while any tone is still sounding.
    pub fn is_active(&self) -> bool {
        self.slots.iter().any(|s| s.is_some())
    }
}
