use std::fmt;

use lane_model::LaneId;
use serde::Serialize;

use crate::Tier;

/// Registration sequence number of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note #{}", self.0)
    }
}

/// Terminal outcome of an instantaneous note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoteOutcome {
    Perfect,
    Good,
    Bad,
    Miss,
}

impl NoteOutcome {
    /// Outcome for a key-down classified as `tier`. `TooLate` is not a judgment.
    pub fn from_tier(tier: Tier) -> Option<Self> {
        match tier {
            Tier::Perfect => Some(Self::Perfect),
            Tier::Good => Some(Self::Good),
            Tier::Bad => Some(Self::Bad),
            Tier::TooLate => None,
        }
    }
}

/// Terminal outcome of a long note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HoldOutcome {
    /// Held through the end of the note.
    Success,
    /// Released before the end-of-note check.
    FailEarly,
    /// Found released at the end-of-note check without a release event.
    FailAtBoundary,
    /// Never grabbed before the window closed.
    MissNeverGrabbed,
}

impl HoldOutcome {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// One terminal outcome, emitted exactly once per registered note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JudgeEvent {
    Note {
        id: NoteId,
        lane: LaneId,
        outcome: NoteOutcome,
        /// Key-down time minus target time (negative = early). `None` for a miss.
        offset: Option<f64>,
    },
    Hold {
        id: NoteId,
        lane: LaneId,
        outcome: HoldOutcome,
        /// Time at which the outcome was decided.
        time: f64,
    },
}

impl JudgeEvent {
    pub fn id(&self) -> NoteId {
        match self {
            Self::Note { id, .. } | Self::Hold { id, .. } => *id,
        }
    }

    pub fn lane(&self) -> LaneId {
        match self {
            Self::Note { lane, .. } | Self::Hold { lane, .. } => *lane,
        }
    }

    pub fn note_outcome(&self) -> Option<NoteOutcome> {
        match self {
            Self::Note { outcome, .. } => Some(*outcome),
            Self::Hold { .. } => None,
        }
    }

    pub fn hold_outcome(&self) -> Option<HoldOutcome> {
        match self {
            Self::Hold { outcome, .. } => Some(*outcome),
            Self::Note { .. } => None,
        }
    }
}
