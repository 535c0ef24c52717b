use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERFECT_WINDOW: f64 = 0.05;
pub const DEFAULT_GOOD_WINDOW: f64 = 0.10;
pub const DEFAULT_MISS_WINDOW: f64 = 0.20;

/// Timing tier of a key-down relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Perfect,
    Good,
    Bad,
    /// Outside every window; the key-down is not a judgment.
    TooLate,
}

/// Classify a timing delta. The sign of `delta` is ignored and every bound is
/// inclusive, so a delta exactly on a window edge gets the better tier.
pub fn classify(delta: f64, perfect: f64, good: f64, miss: f64) -> Tier {
    let delta = delta.abs();
    if delta <= perfect {
        Tier::Perfect
    } else if delta <= good {
        Tier::Good
    } else if delta <= miss {
        Tier::Bad
    } else {
        Tier::TooLate
    }
}

/// Nested judgment windows in seconds: `perfect <= good <= miss`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowValues", into = "WindowValues")]
pub struct JudgeWindows {
    perfect: f64,
    good: f64,
    miss: f64,
}

#[derive(Serialize, Deserialize)]
struct WindowValues {
    perfect: f64,
    good: f64,
    miss: f64,
}

impl JudgeWindows {
    pub fn new(perfect: f64, good: f64, miss: f64) -> Result<Self> {
        for (name, value) in [("perfect", perfect), ("good", good), ("miss", miss)] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} window must be a non-negative number of seconds, got {value}");
            }
        }
        if !(perfect <= good && good <= miss) {
            bail!("judge windows must be nested: perfect {perfect} <= good {good} <= miss {miss}");
        }
        Ok(Self {
            perfect,
            good,
            miss,
        })
    }

    pub fn perfect(&self) -> f64 {
        self.perfect
    }

    pub fn good(&self) -> f64 {
        self.good
    }

    pub fn miss(&self) -> f64 {
        self.miss
    }

    pub fn classify(&self, delta: f64) -> Tier {
        classify(delta, self.perfect, self.good, self.miss)
    }

    /// Whether `time` lies in the grab window `[start - miss, end + perfect]`
    /// of a long note.
    pub fn can_grab(&self, start: f64, end: f64, time: f64) -> bool {
        time >= start - self.miss && time <= end + self.perfect
    }

    /// Whether a note targeted at `target` can no longer be judged at `now`.
    pub fn has_expired(&self, target: f64, now: f64) -> bool {
        now > target + self.miss
    }
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            perfect: DEFAULT_PERFECT_WINDOW,
            good: DEFAULT_GOOD_WINDOW,
            miss: DEFAULT_MISS_WINDOW,
        }
    }
}

impl TryFrom<WindowValues> for JudgeWindows {
    type Error = anyhow::Error;

    fn try_from(v: WindowValues) -> Result<Self> {
        Self::new(v.perfect, v.good, v.miss)
    }
}

impl From<JudgeWindows> for WindowValues {
    fn from(w: JudgeWindows) -> Self {
        Self {
            perfect: w.perfect,
            good: w.good,
            miss: w.miss,
        }
    }
}
