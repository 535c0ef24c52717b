use std::fmt;

use serde::Serialize;

use crate::{HoldOutcome, JudgeEvent, NoteOutcome};

/// Running count of outcomes plus combo.
///
/// Perfect, Good and successful holds extend the combo; everything else
/// breaks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeTally {
    pub perfect: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
    pub hold_success: u32,
    pub hold_fail_early: u32,
    pub hold_fail_at_boundary: u32,
    pub hold_miss: u32,
    pub combo: u32,
    pub max_combo: u32,
}

impl JudgeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &JudgeEvent) {
        let extends_combo = match *event {
            JudgeEvent::Note { outcome, .. } => {
                match outcome {
                    NoteOutcome::Perfect => self.perfect += 1,
                    NoteOutcome::Good => self.good += 1,
                    NoteOutcome::Bad => self.bad += 1,
                    NoteOutcome::Miss => self.miss += 1,
                }
                matches!(outcome, NoteOutcome::Perfect | NoteOutcome::Good)
            }
            JudgeEvent::Hold { outcome, .. } => {
                match outcome {
                    HoldOutcome::Success => self.hold_success += 1,
                    HoldOutcome::FailEarly => self.hold_fail_early += 1,
                    HoldOutcome::FailAtBoundary => self.hold_fail_at_boundary += 1,
                    HoldOutcome::MissNeverGrabbed => self.hold_miss += 1,
                }
                outcome.is_success()
            }
        };
        if extends_combo {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }
    }

    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a JudgeEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn note_total(&self) -> u32 {
        self.perfect + self.good + self.bad + self.miss
    }

    pub fn hold_total(&self) -> u32 {
        self.hold_success + self.hold_fail_early + self.hold_fail_at_boundary + self.hold_miss
    }

    /// Number of outcomes recorded.
    pub fn total(&self) -> u32 {
        self.note_total() + self.hold_total()
    }
}

impl fmt::Display for JudgeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PERFECT  {:>6}", self.perfect)?;
        writeln!(f, "GOOD     {:>6}", self.good)?;
        writeln!(f, "BAD      {:>6}", self.bad)?;
        writeln!(f, "MISS     {:>6}", self.miss)?;
        writeln!(
            f,
            "HOLD     {:>6} ok / {} early / {} boundary / {} missed",
            self.hold_success, self.hold_fail_early, self.hold_fail_at_boundary, self.hold_miss
        )?;
        write!(f, "MAX COMBO {:>5}", self.max_combo)
    }
}
