// Playback speed - How long each pad stays lit during playback

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-selectable playback speed.
///
/// Maps to the hold duration of each pad while the sequence is shown.
/// Changing the speed is only honored between games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    Slow,
    Normal,
    Fast,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 3] =
        [PlaybackSpeed::Slow, PlaybackSpeed::Normal, PlaybackSpeed::Fast];

    /// How long a pad stays lit for each playback step.
    pub fn hold_duration(&self) -> Duration {
        match self {
            PlaybackSpeed::Slow => Duration::from_millis(1000),
            PlaybackSpeed::Normal => Duration::from_millis(600),
            PlaybackSpeed::Fast => Duration::from_millis(400),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaybackSpeed::Slow => "Slow",
            PlaybackSpeed::Normal => "Normal",
            PlaybackSpeed::Fast => "Fast",
        }
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        PlaybackSpeed::Normal
    }
}
