use crate::{HoldOutcome, HoldPhase, JudgeEvent, JudgeWindows, LaneSlot};

/// Long-note state machine.
///
/// A long note starts Pending. A key-down inside `[start - miss, end + perfect]`
/// grabs it (Holding). It resolves once: released early, checked at its end
/// time, or missed because it was never grabbed by `start + miss`. Resolving
/// removes the note from the lane, so every transition is a no-op afterwards.
#[derive(Debug, Clone, Copy)]
pub struct HoldJudge {
    windows: JudgeWindows,
}

impl HoldJudge {
    pub fn new(windows: JudgeWindows) -> Self {
        Self { windows }
    }

    /// Pending -> Holding on a key-down at `time`.
    ///
    /// Only the lane's head long note is eligible, and only while the lane is
    /// not already holding one. A grab after the start time counts the same as
    /// one before it.
    pub fn try_start_hold(&self, slot: &mut LaneSlot, time: f64) -> bool {
        if let Some(id) = slot.holding {
            log::trace!("{}: key-down at {time:.3}s while holding {id}", slot.lane());
            return false;
        }
        let lane = slot.lane();
        let Some(head) = slot.long.head_mut() else {
            return false;
        };
        if head.phase() != HoldPhase::Pending {
            return false;
        }
        if !self.windows.can_grab(head.start_time, head.end_time, time) {
            log::trace!("{lane}: key-down at {time:.3}s outside grab window of {}", head.id);
            return false;
        }
        if !head.advance(HoldPhase::Holding) {
            return false;
        }
        slot.holding = Some(head.id);
        log::debug!("{lane} {}: grabbed at {time:.3}s", head.id);
        true
    }

    /// Holding -> Resolved on a key-up at `time`. A release before the end time
    /// fails the note; one at or after it means the key was down at the end.
    pub fn end_hold(
        &self,
        slot: &mut LaneSlot,
        time: f64,
        events: &mut Vec<JudgeEvent>,
    ) -> Option<HoldOutcome> {
        if slot.holding.is_none() {
            log::trace!("{}: key-up at {time:.3}s with nothing held", slot.lane());
            return None;
        }
        let end_time = slot.long.head()?.end_time;
        let outcome = if time < end_time {
            HoldOutcome::FailEarly
        } else {
            HoldOutcome::Success
        };
        self.resolve_holding(slot, outcome, time, events)
    }

    /// Holding -> Resolved once `now` reaches the end time. `key_down` is the
    /// key state sampled at this tick: still down is a success, otherwise the
    /// release went unobserved and the note fails at the boundary.
    pub fn finish_hold(
        &self,
        slot: &mut LaneSlot,
        now: f64,
        key_down: bool,
        events: &mut Vec<JudgeEvent>,
    ) -> Option<HoldOutcome> {
        if slot.holding.is_none() {
            return None;
        }
        let head = slot.long.head()?;
        if now < head.end_time {
            return None;
        }
        let outcome = if key_down {
            HoldOutcome::Success
        } else {
            HoldOutcome::FailAtBoundary
        };
        self.resolve_holding(slot, outcome, now, events)
    }

    /// Pending -> Resolved for every long note not grabbed by `start + miss`.
    /// Returns the number of misses.
    pub fn miss_sweep(&self, slot: &mut LaneSlot, now: f64, events: &mut Vec<JudgeEvent>) -> usize {
        let windows = self.windows;
        let mut missed = 0;
        slot.long.retain_mut(|note| {
            if note.phase() != HoldPhase::Pending || !windows.has_expired(note.start_time, now) {
                return true;
            }
            if !note.advance(HoldPhase::Resolved) {
                return true;
            }
            log::debug!("{} {}: never grabbed", note.lane, note.id);
            events.push(JudgeEvent::Hold {
                id: note.id,
                lane: note.lane,
                outcome: HoldOutcome::MissNeverGrabbed,
                time: now,
            });
            missed += 1;
            false
        });
        missed
    }

    fn resolve_holding(
        &self,
        slot: &mut LaneSlot,
        outcome: HoldOutcome,
        time: f64,
        events: &mut Vec<JudgeEvent>,
    ) -> Option<HoldOutcome> {
        let held = slot.holding.take()?;
        let mut note = slot.long.pop_head()?;
        debug_assert_eq!(note.id, held, "{}: holding a note that is not the head", note.lane);
        if !note.advance(HoldPhase::Resolved) {
            return None;
        }
        log::debug!("{} {}: {outcome:?} at {time:.3}s", note.lane, note.id);
        events.push(JudgeEvent::Hold {
            id: note.id,
            lane: note.lane,
            outcome,
            time,
        });
        Some(outcome)
    }
}
