use crate::{JudgeEvent, JudgeWindows, LaneSlot, NoteOutcome};

/// Judges instantaneous notes.
///
/// Only the head of a lane's instant queue can be judged. A judged or expired
/// note leaves the queue in the same step, so it is reported exactly once.
#[derive(Debug, Clone, Copy)]
pub struct NoteJudge {
    windows: JudgeWindows,
}

impl NoteJudge {
    pub fn new(windows: JudgeWindows) -> Self {
        Self { windows }
    }

    /// Judge a key-down at `time` against the lane's head note.
    ///
    /// Returns `None` when the queue is empty or the key-down is outside every
    /// window; the note then stays queued for the expiry sweep.
    pub fn on_key_down(
        &self,
        slot: &mut LaneSlot,
        time: f64,
        events: &mut Vec<JudgeEvent>,
    ) -> Option<NoteOutcome> {
        let Some(head) = slot.instant.head() else {
            log::trace!("{}: key-down at {time:.3}s with no pending note", slot.lane());
            return None;
        };
        let offset = time - head.target_time;
        let Some(outcome) = NoteOutcome::from_tier(self.windows.classify(offset)) else {
            log::trace!(
                "{}: key-down at {time:.3}s outside window of {}",
                slot.lane(),
                head.id
            );
            return None;
        };

        let mut note = slot.instant.pop_head()?;
        if !note.mark_judged() {
            return None;
        }
        log::debug!("{} {}: {outcome:?} ({:+.3}s)", note.lane, note.id, offset);
        events.push(JudgeEvent::Note {
            id: note.id,
            lane: note.lane,
            outcome,
            offset: Some(offset),
        });
        Some(outcome)
    }

    /// Report every head note whose window closed before `now` as a miss.
    /// Returns the number of misses.
    pub fn on_expiry(&self, slot: &mut LaneSlot, now: f64, events: &mut Vec<JudgeEvent>) -> usize {
        let mut missed = 0;
        while slot
            .instant
            .head()
            .is_some_and(|n| self.windows.has_expired(n.target_time, now))
        {
            let Some(mut note) = slot.instant.pop_head() else {
                break;
            };
            if !note.mark_judged() {
                continue;
            }
            log::debug!("{} {}: Miss", note.lane, note.id);
            events.push(JudgeEvent::Note {
                id: note.id,
                lane: note.lane,
                outcome: NoteOutcome::Miss,
                offset: None,
            });
            missed += 1;
        }
        missed
    }
}
