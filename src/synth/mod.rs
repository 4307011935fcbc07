// Synth module - Oscillators and game tone generation

pub mod oscillator;
pub mod tone;

pub use oscillator::{Oscillator, SimpleOscillator, WaveformType};
pub use tone::{ToneBank, TonePlayer};
