use anyhow::{Result, bail};
use lane_model::{LANE_COUNT, LaneId};

/// Default key layout, lanes 0..5 left to right.
pub const DEFAULT_KEYS: [&str; LANE_COUNT] = ["S", "D", "F", "J", "K", "L"];

/// Maps key names to lanes. Key names are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: [String; LANE_COUNT],
}

impl KeyBindings {
    /// Build from exactly one distinct, non-empty key name per lane.
    pub fn new<S: AsRef<str>>(keys: &[S]) -> Result<Self> {
        if keys.len() != LANE_COUNT {
            bail!("expected {LANE_COUNT} key bindings, got {}", keys.len());
        }
        let mut names: [String; LANE_COUNT] = Default::default();
        for (i, key) in keys.iter().enumerate() {
            let name = key.as_ref().trim().to_ascii_uppercase();
            if name.is_empty() {
                bail!("key binding for lane {i} is empty");
            }
            if let Some(dup) = names[..i].iter().position(|n| *n == name) {
                bail!("key {name} bound to both lane {dup} and lane {i}");
            }
            names[i] = name;
        }
        Ok(Self { keys: names })
    }

    pub fn lane_for(&self, key: &str) -> Option<LaneId> {
        let key = key.trim();
        self.keys
            .iter()
            .position(|k| k.eq_ignore_ascii_case(key))
            .and_then(|i| LaneId::try_from(i).ok())
    }

    pub fn key_for(&self, lane: LaneId) -> &str {
        &self.keys[lane.index()]
    }

    pub fn keys(&self) -> &[String; LANE_COUNT] {
        &self.keys
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            keys: DEFAULT_KEYS.map(String::from),
        }
    }
}
