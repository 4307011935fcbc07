// Oscillators - Waveform generators

use std::f32::consts::PI;

pub trait Oscillator {
    fn next_sample(&mut self) -> f32;
    fn set_frequency(&mut self, freq: f32);
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaveformType {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// Phase-accumulator oscillator, phase normalized to [0, 1).
pub struct SimpleOscillator {
    waveform: WaveformType,
    phase: f32,
    phase_increment: f32,
    sample_rate: f32,
}

impl SimpleOscillator {
    pub fn new(waveform: WaveformType, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            phase_increment: 0.0,
            sample_rate,
        }
    }
}

impl Oscillator for SimpleOscillator {
    fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            WaveformType::Sine => (self.phase * 2.0 * PI).sin(),
            WaveformType::Square => {
                if self.phase < 0.5 { 1.0 } else { -1.0 }
            }
            WaveformType::Saw => (self.phase * 2.0) - 1.0,
            WaveformType::Triangle => {
                if self.phase < 0.5 {
                    (self.phase * 4.0) - 1.0
                } else {
                    3.0 - (self.phase * 4.0)
                }
            }
        };

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    fn set_frequency(&mut self, freq: f32) {
        self.phase_increment = freq / self.sample_rate;
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;
    const EPSILON: f32 = 0.001;

    #[test]
    fn test_frequency_sets_phase_increment() {
        let mut osc = SimpleOscillator::new(WaveformType::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        let expected = 440.0 / SAMPLE_RATE;
        assert!((osc.phase_increment - expected).abs() < EPSILON);
    }

    #[test]
    fn test_reset_rewinds_phase() {
        let mut osc = SimpleOscillator::new(WaveformType::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        for _ in 0..100 {
            osc.next_sample();
        }
        assert!(osc.phase > 0.0);

        osc.reset();
        assert_eq!(osc.phase, 0.0);
    }

    #[test]
    fn test_sine_starts_at_zero_and_stays_bounded() {
        let mut osc = SimpleOscillator::new(WaveformType::Sine, SAMPLE_RATE);
        osc.set_frequency(329.63);

        let first = osc.next_sample();
        assert!(first.abs() < EPSILON, "first sample: {}", first);

        for _ in 0..2000 {
            let sample = osc.next_sample();
            assert!((-1.0..=1.0).contains(&sample), "sample {} out of range", sample);
        }
    }

    #[test]
    fn test_square_is_two_valued() {
        let mut osc = SimpleOscillator::new(WaveformType::Square, SAMPLE_RATE);
        osc.set_frequency(100.0);

        for _ in 0..1000 {
            let sample = osc.next_sample();
            assert!(
                (sample - 1.0).abs() < EPSILON || (sample + 1.0).abs() < EPSILON,
                "square sample not ±1.0: {}",
                sample
            );
        }
    }

    #[test]
    fn test_saw_and_triangle_stay_bounded() {
        for waveform in [WaveformType::Saw, WaveformType::Triangle] {
            let mut osc = SimpleOscillator::new(waveform, SAMPLE_RATE);
            osc.set_frequency(100.0);

            for _ in 0..1000 {
                let sample = osc.next_sample();
                assert!(
                    (-1.0..=1.0).contains(&sample),
                    "{:?} sample out of range: {}",
                    waveform,
                    sample
                );
            }
        }
    }

    #[test]
    fn test_phase_wraps() {
        let mut osc = SimpleOscillator::new(WaveformType::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        for _ in 0..10000 {
            osc.next_sample();
            assert!((0.0..1.0).contains(&osc.phase), "phase out of range: {}", osc.phase);
        }
    }
}
