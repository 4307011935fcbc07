// Simon Says - Library exports for tests and the binary

pub mod audio;
pub mod config;
pub mod game;
pub mod messaging;
pub mod synth;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::engine::{AudioEngine, AudioEngineError};
pub use audio::parameters::AtomicF32;
pub use audio::status::{AtomicDeviceStatus, DeviceStatus};
pub use config::{ConfigError, GameConfig};
pub use game::sequencer::{GamePhase, GameSequencer};
pub use game::signal::Signal;
pub use game::speed::PlaybackSpeed;
pub use messaging::channels::{create_command_channel, create_notification_channel};
pub use messaging::command::Command;
pub use messaging::notification::{Notification, NotificationCategory, NotificationLevel};
pub use synth::oscillator::{Oscillator, SimpleOscillator, WaveformType};
pub use synth::tone::{ToneBank, TonePlayer};
