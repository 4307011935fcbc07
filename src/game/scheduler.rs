// Step scheduler - Epoch-tagged delayed steps for the game state machine
//
// Every delayed action in the game (playback flashes, the round-success
// pause, clearing the input flash) goes through this scheduler. Steps are
// tagged with the epoch that was current when they were scheduled; starting
// or resetting a game bumps the epoch, so steps left over from an
// interrupted playback are discarded when they come due instead of mutating
// a game they no longer belong to.

use std::time::Instant;

/// A delayed mutation of the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepAction {
    /// Append one random signal, then start showing the sequence.
    AdvanceRound,
    /// Light pad `i` of the target sequence and play its tone.
    Illuminate(usize),
    /// Turn pad `i` off again.
    Extinguish(usize),
    /// Playback is done, hand control to the player.
    FinishPlayback,
    /// Turn off the short flash that follows a player input.
    ClearInputFlash,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledStep {
    due: Instant,
    epoch: u64,
    action: StepAction,
}

/// Single-owner queue of pending steps.
///
/// Not a timer: the owner polls `pop_due` with the current time and applies
/// whatever has come due, earliest first.
#[derive(Debug)]
pub(crate) struct StepScheduler {
    epoch: u64,
    pending: Vec<ScheduledStep>,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            pending: Vec::new(),
        }
    }

    /// Queue `action` to fire at `due` under the current epoch.
    pub fn schedule_at(&mut self, due: Instant, action: StepAction) {
        self.pending.push(ScheduledStep {
            due,
            epoch: self.epoch,
            action,
        });
    }

    /// Invalidate everything scheduled so far.
    ///
    /// Pending steps are kept in the queue but carry the old epoch; they are
    /// dropped when they come due.
    pub fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Remove pending steps matching `pred`, regardless of due time.
    pub fn cancel_matching(&mut self, pred: impl Fn(StepAction) -> bool) {
        self.pending.retain(|step| !pred(step.action));
    }

    /// Take the earliest step due at or before `now`.
    ///
    /// Returns the step's own due time along with the action so follow-up
    /// steps can be scheduled relative to when the step should have fired,
    /// keeping chains drift-free under coarse polling.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, StepAction)> {
        // Drop stale-epoch steps first so they never shadow a live one.
        let epoch = self.epoch;
        self.pending.retain(|step| step.epoch == epoch);

        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, step)| step.due <= now)
            .min_by_key(|(_, step)| step.due)
            .map(|(i, _)| i)?;

        let step = self.pending.swap_remove(index);
        Some((step.due, step.action))
    }

    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
