use serde::{Deserialize, Serialize};

use crate::LaneId;

/// One note as it appears in a chart.
///
/// A zero `duration` is an instantaneous note; a positive one is a long note
/// that must be held from `time` until `time + duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteSpec {
    /// Song position (seconds) at which the note reaches the judge line.
    pub time: f64,
    pub lane: LaneId,
    #[serde(default)]
    pub duration: f64,
}

impl NoteSpec {
    pub fn instant(lane: LaneId, time: f64) -> Self {
        Self {
            time,
            lane,
            duration: 0.0,
        }
    }

    pub fn long(lane: LaneId, time: f64, duration: f64) -> Self {
        Self {
            time,
            lane,
            duration,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.time
    }

    pub fn end_time(&self) -> f64 {
        self.time + self.duration.max(0.0)
    }

    pub fn is_long(&self) -> bool {
        self.duration > 0.0
    }
}
