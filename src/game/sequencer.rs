// Game sequencer - Owns all game state and the playback/input state machine
//
// The sequencer is clock-injected: nothing in here sleeps or spawns timers.
// The UI calls `tick(Instant::now())` every frame; delayed work is queued on
// the epoch-tagged step scheduler and applied when due. Follow-up steps are
// scheduled relative to the due time of the step that spawned them, so a
// full playback chain stays on grid no matter how coarsely `tick` is polled.
//
// Audio is fire-and-forget: tone requests are pushed into the command ring
// buffer and mixed by the audio callback. The visual side is pull-based: the
// UI reads `active_signal()` each frame to decide which pad to light.

use crate::game::scheduler::{StepAction, StepScheduler};
use crate::game::signal::Signal;
use crate::game::speed::PlaybackSpeed;
use crate::messaging::channels::CommandProducer;
use crate::messaging::command::Command;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Pause between pressing Start and the first appended signal.
const START_DELAY: Duration = Duration::from_millis(500);
/// Pause between a round advancing and its playback beginning.
const PRE_PLAYBACK_DELAY: Duration = Duration::from_millis(800);
/// Dark gap between two playback flashes.
const SIGNAL_GAP: Duration = Duration::from_millis(200);
/// How long a pad stays lit after the player presses it.
const INPUT_FLASH: Duration = Duration::from_millis(300);
/// Celebration pause after a completed round.
const ROUND_SUCCESS_DELAY: Duration = Duration::from_millis(1000);

/// Stage of the game state machine.
///
/// The phase decides which operations are accepted; everything invoked in
/// the wrong phase is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No game running.
    Idle,
    /// The target sequence is being played back; input is rejected.
    ShowingSequence,
    /// Waiting for the player to reproduce the sequence.
    AwaitingInput,
    /// The player just reproduced the full sequence; next round pending.
    RoundComplete,
    /// The player mismatched; halted until the next `start_game`.
    GameOver,
}

impl GamePhase {
    /// True while a game is in progress (Start disabled, speed locked).
    pub fn is_running(&self) -> bool {
        !matches!(self, GamePhase::Idle | GamePhase::GameOver)
    }

    /// True while pad presses are accepted.
    pub fn accepts_input(&self) -> bool {
        matches!(self, GamePhase::AwaitingInput)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        GamePhase::Idle
    }
}

/// The single owner of all game state.
pub struct GameSequencer {
    phase: GamePhase,
    sequence: Vec<Signal>,
    input: Vec<Signal>,
    round: u32,
    speed: PlaybackSpeed,
    active: Option<Signal>,
    scheduler: StepScheduler,
    rng: StdRng,
    audio_tx: CommandProducer,
}

impl GameSequencer {
    pub fn new(audio_tx: CommandProducer, speed: PlaybackSpeed) -> Self {
        Self::with_rng(audio_tx, speed, StdRng::from_os_rng())
    }

    /// Construct with an explicit RNG (seeded in tests for determinism).
    pub fn with_rng(audio_tx: CommandProducer, speed: PlaybackSpeed, rng: StdRng) -> Self {
        Self {
            phase: GamePhase::Idle,
            sequence: Vec::new(),
            input: Vec::new(),
            round: 0,
            speed,
            active: None,
            scheduler: StepScheduler::new(),
            rng,
            audio_tx,
        }
    }

    /// Begin a fresh game. Safe to call from any phase; anything still
    /// scheduled from a previous game is invalidated.
    pub fn start_game(&mut self, now: Instant) {
        self.scheduler.invalidate();
        self.sequence.clear();
        self.input.clear();
        self.round = 0;
        self.active = None;
        self.phase = GamePhase::ShowingSequence;
        self.scheduler
            .schedule_at(now + START_DELAY, StepAction::AdvanceRound);
    }

    /// Emergency stop: back to Idle, everything cleared, tones cut.
    pub fn reset_game(&mut self) {
        self.scheduler.invalidate();
        self.sequence.clear();
        self.input.clear();
        self.round = 0;
        self.active = None;
        self.phase = GamePhase::Idle;
        self.send(Command::Silence);
    }

    /// Player pressed a pad. Only honored in `AwaitingInput`.
    pub fn submit_input(&mut self, signal: Signal, now: Instant) {
        if !self.phase.accepts_input() {
            return;
        }
        // The input buffer never grows past the target sequence.
        if self.input.len() >= self.sequence.len() {
            return;
        }

        self.input.push(signal);
        self.active = Some(signal);
        self.send(Command::Tone(signal));
        self.scheduler
            .cancel_matching(|a| a == StepAction::ClearInputFlash);
        self.scheduler
            .schedule_at(now + INPUT_FLASH, StepAction::ClearInputFlash);

        let index = self.input.len() - 1;
        if self.input[index] != self.sequence[index] {
            self.game_over();
            return;
        }

        if self.input.len() == self.sequence.len() {
            self.phase = GamePhase::RoundComplete;
            self.scheduler
                .schedule_at(now + ROUND_SUCCESS_DELAY, StepAction::AdvanceRound);
        }
    }

    /// Change playback speed. Only honored between games.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        if self.phase.is_running() {
            return;
        }
        self.speed = speed;
    }

    /// Apply every step that has come due. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        while let Some((due, action)) = self.scheduler.pop_due(now) {
            self.apply_step(due, action);
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The target sequence the player has to reproduce.
    pub fn sequence(&self) -> &[Signal] {
        &self.sequence
    }

    /// The player's attempt for the current round.
    pub fn input(&self) -> &[Signal] {
        &self.input
    }

    /// Completed rounds; the final score once the game is over.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Pad currently lit, if any.
    pub fn active_signal(&self) -> Option<Signal> {
        self.active
    }

    fn apply_step(&mut self, fired_at: Instant, action: StepAction) {
        match action {
            StepAction::AdvanceRound => {
                // The append at game start does not count as a completed round.
                if self.phase == GamePhase::RoundComplete {
                    self.round += 1;
                }
                self.input.clear();
                let next = self.random_signal();
                self.sequence.push(next);
                self.phase = GamePhase::ShowingSequence;
                self.scheduler
                    .schedule_at(fired_at + PRE_PLAYBACK_DELAY, StepAction::Illuminate(0));
            }
            StepAction::Illuminate(index) => {
                if let Some(&signal) = self.sequence.get(index) {
                    self.active = Some(signal);
                    self.send(Command::Tone(signal));
                    self.scheduler.schedule_at(
                        fired_at + self.speed.hold_duration(),
                        StepAction::Extinguish(index),
                    );
                }
            }
            StepAction::Extinguish(index) => {
                self.active = None;
                let next = index + 1;
                let follow_up = if next < self.sequence.len() {
                    StepAction::Illuminate(next)
                } else {
                    StepAction::FinishPlayback
                };
                self.scheduler.schedule_at(fired_at + SIGNAL_GAP, follow_up);
            }
            StepAction::FinishPlayback => {
                self.phase = GamePhase::AwaitingInput;
            }
            StepAction::ClearInputFlash => {
                self.active = None;
            }
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.send(Command::GameOverTone);
    }

    fn random_signal(&mut self) -> Signal {
        Signal::ALL[self.rng.random_range(0..Signal::ALL.len())]
    }

    fn send(&mut self, command: Command) {
        // Dropping a command on a full buffer only loses a tone, never state.
        let _ = ringbuf::traits::Producer::try_push(&mut self.audio_tx, command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::{CommandConsumer, create_command_channel};
    use ringbuf::traits::Consumer;

    fn sequencer() -> (GameSequencer, CommandConsumer) {
        let (tx, rx) = create_command_channel(64);
        let seq = GameSequencer::with_rng(tx, PlaybackSpeed::Normal, StdRng::seed_from_u64(7));
        (seq, rx)
    }

    /// Run the clock far enough forward that the pending playback finishes.
    fn finish_playback(seq: &mut GameSequencer, now: Instant) -> Instant {
        let later = now + Duration::from_secs(60);
        seq.tick(later);
        assert_eq!(seq.phase(), GamePhase::AwaitingInput);
        later
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let (seq, _rx) = sequencer();
        assert_eq!(seq.phase(), GamePhase::Idle);
        assert!(seq.sequence().is_empty());
        assert!(seq.input().is_empty());
        assert_eq!(seq.round(), 0);
        assert_eq!(seq.active_signal(), None);
    }

    #[test]
    fn test_start_game_appends_one_signal_and_plays_it() {
        let (mut seq, mut rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        assert_eq!(seq.phase(), GamePhase::ShowingSequence);
        assert!(seq.sequence().is_empty());

        // After the start delay the first signal is appended.
        seq.tick(t0 + Duration::from_millis(500));
        assert_eq!(seq.sequence().len(), 1);
        assert_eq!(seq.phase(), GamePhase::ShowingSequence);

        // After the pre-playback delay the pad lights up and its tone fires.
        seq.tick(t0 + Duration::from_millis(1300));
        assert_eq!(seq.active_signal(), Some(seq.sequence()[0]));
        assert_eq!(rx.try_pop(), Some(Command::Tone(seq.sequence()[0])));

        // Hold + gap later, playback is over and the player may act.
        seq.tick(t0 + Duration::from_millis(2100));
        assert_eq!(seq.phase(), GamePhase::AwaitingInput);
        assert_eq!(seq.active_signal(), None);
    }

    #[test]
    fn test_input_rejected_while_showing_sequence() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        seq.tick(t0 + Duration::from_millis(1400)); // mid-flash of the first signal
        assert_eq!(seq.phase(), GamePhase::ShowingSequence);

        seq.submit_input(Signal::Green, t0 + Duration::from_millis(1400));
        assert!(seq.input().is_empty());
    }

    #[test]
    fn test_correct_full_input_advances_round() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        let now = finish_playback(&mut seq, t0);

        let expected = seq.sequence()[0];
        seq.submit_input(expected, now);
        assert_eq!(seq.phase(), GamePhase::RoundComplete);

        // The success pause appends exactly one signal and clears the buffer.
        seq.tick(now + Duration::from_millis(1000));
        assert_eq!(seq.sequence().len(), 2);
        assert!(seq.input().is_empty());
        assert_eq!(seq.round(), 1);
        assert_eq!(seq.phase(), GamePhase::ShowingSequence);
    }

    #[test]
    fn test_partial_correct_input_keeps_waiting() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        let mut now = finish_playback(&mut seq, t0);

        // Complete round one so the sequence has two entries.
        let first = seq.sequence()[0];
        seq.submit_input(first, now);
        now = finish_playback(&mut seq, now + Duration::from_millis(1000));

        let target: Vec<Signal> = seq.sequence().to_vec();
        seq.submit_input(target[0], now);
        assert_eq!(seq.phase(), GamePhase::AwaitingInput);
        assert_eq!(seq.input().len(), 1);
    }

    #[test]
    fn test_mismatch_is_immediate_game_over() {
        let (mut seq, mut rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        let now = finish_playback(&mut seq, t0);

        let wrong = Signal::ALL
            .into_iter()
            .find(|&s| s != seq.sequence()[0])
            .unwrap();
        seq.submit_input(wrong, now);

        assert_eq!(seq.phase(), GamePhase::GameOver);
        // Pad tone for the press, then the failure tone.
        let mut commands = Vec::new();
        while let Some(cmd) = rx.try_pop() {
            commands.push(cmd);
        }
        assert_eq!(commands.last(), Some(&Command::GameOverTone));

        // Halted: further input is ignored.
        seq.submit_input(wrong, now + Duration::from_millis(10));
        assert_eq!(seq.input().len(), 1);
    }

    #[test]
    fn test_reset_mid_playback_kills_stale_steps() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        seq.tick(t0 + Duration::from_millis(1400)); // a pad is lit right now
        assert!(seq.active_signal().is_some());

        seq.reset_game();
        assert_eq!(seq.phase(), GamePhase::Idle);
        assert!(seq.sequence().is_empty());
        assert_eq!(seq.active_signal(), None);

        // The interrupted playback's steps fire into the void.
        seq.tick(t0 + Duration::from_secs(60));
        assert_eq!(seq.phase(), GamePhase::Idle);
        assert!(seq.sequence().is_empty());
        assert_eq!(seq.active_signal(), None);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        seq.tick(t0 + Duration::from_millis(600));

        seq.reset_game();
        let phase_once = seq.phase();
        let len_once = seq.sequence().len();
        seq.reset_game();

        assert_eq!(seq.phase(), phase_once);
        assert_eq!(seq.sequence().len(), len_once);
        assert_eq!(seq.round(), 0);
    }

    #[test]
    fn test_restart_during_game_invalidates_previous_playback() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        seq.tick(t0 + Duration::from_millis(500));
        assert_eq!(seq.sequence().len(), 1);

        // Restart before the first playback ends.
        let t1 = t0 + Duration::from_millis(900);
        seq.start_game(t1);
        assert!(seq.sequence().is_empty());

        // Only the new game's chain runs: one signal, then playback.
        seq.tick(t1 + Duration::from_secs(60));
        assert_eq!(seq.sequence().len(), 1);
        assert_eq!(seq.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_speed_locked_while_running() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.set_speed(PlaybackSpeed::Fast);
        assert_eq!(seq.speed(), PlaybackSpeed::Fast);

        seq.start_game(t0);
        seq.set_speed(PlaybackSpeed::Slow);
        assert_eq!(seq.speed(), PlaybackSpeed::Fast);

        // Unlocked again after game over.
        let now = finish_playback(&mut seq, t0);
        let wrong = Signal::ALL
            .into_iter()
            .find(|&s| s != seq.sequence()[0])
            .unwrap();
        seq.submit_input(wrong, now);
        assert_eq!(seq.phase(), GamePhase::GameOver);

        seq.set_speed(PlaybackSpeed::Slow);
        assert_eq!(seq.speed(), PlaybackSpeed::Slow);
    }

    #[test]
    fn test_input_flash_clears_after_delay() {
        let (mut seq, _rx) = sequencer();
        let t0 = Instant::now();

        seq.start_game(t0);
        let now = finish_playback(&mut seq, t0);

        let expected = seq.sequence()[0];
        seq.submit_input(expected, now);
        assert_eq!(seq.active_signal(), Some(expected));

        seq.tick(now + Duration::from_millis(300));
        assert_eq!(seq.active_signal(), None);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let (tx_a, _rx_a) = create_command_channel(64);
        let (tx_b, _rx_b) = create_command_channel(64);
        let mut a =
            GameSequencer::with_rng(tx_a, PlaybackSpeed::Normal, StdRng::seed_from_u64(42));
        let mut b =
            GameSequencer::with_rng(tx_b, PlaybackSpeed::Normal, StdRng::seed_from_u64(42));

        let t0 = Instant::now();
        a.start_game(t0);
        b.start_game(t0);
        a.tick(t0 + Duration::from_secs(60));
        b.tick(t0 + Duration::from_secs(60));

        assert_eq!(a.sequence(), b.sequence());
    }
}
