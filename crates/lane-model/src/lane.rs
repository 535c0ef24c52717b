use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Number of playable lanes, one per key.
pub const LANE_COUNT: usize = 6;

/// Index of a playable lane.
///
/// Only `0..LANE_COUNT` can be constructed, so any `LaneId` that reaches the
/// judge is already in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LaneId(u8);

impl LaneId {
    /// Every lane in index order.
    pub const ALL: [LaneId; LANE_COUNT] = [
        LaneId(0),
        LaneId(1),
        LaneId(2),
        LaneId(3),
        LaneId(4),
        LaneId(5),
    ];

    /// Returns `None` for indices outside `0..LANE_COUNT`.
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for LaneId {
    type Error = anyhow::Error;

    fn try_from(index: u8) -> Result<Self> {
        match Self::new(index) {
            Some(lane) => Ok(lane),
            None => bail!("lane {index} out of range (0..{LANE_COUNT})"),
        }
    }
}

impl TryFrom<usize> for LaneId {
    type Error = anyhow::Error;

    fn try_from(index: usize) -> Result<Self> {
        match u8::try_from(index).ok().and_then(Self::new) {
            Some(lane) => Ok(lane),
            None => bail!("lane {index} out of range (0..{LANE_COUNT})"),
        }
    }
}

impl From<LaneId> for u8 {
    fn from(lane: LaneId) -> u8 {
        lane.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.0)
    }
}
