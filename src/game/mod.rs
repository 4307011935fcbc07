// Game module - The memory-game state machine

pub mod scheduler;
pub mod sequencer;
pub mod signal;
pub mod speed;

pub use sequencer::{GamePhase, GameSequencer};
pub use signal::Signal;
pub use speed::PlaybackSpeed;
