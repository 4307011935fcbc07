// Command types - Communication game/UI → Audio

use crate::game::signal::Signal;

/// Fire-and-forget requests consumed by the audio callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play the tone mapped to one pad.
    Tone(Signal),
    /// Play the low sawtooth failure tone.
    GameOverTone,
    /// Cut all currently sounding tones.
    Silence,
}
