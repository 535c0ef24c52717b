// Recorded key transitions, the replay format read by the simulator.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{KeyBindings, KeyEvent, KeyTransition};

/// A single key transition in a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInputLog {
    /// Song position of the transition in seconds.
    pub time: f64,
    /// Key name, resolved to a lane through [`KeyBindings`].
    pub key: String,
    /// Whether the key was pressed (true) or released (false).
    pub pressed: bool,
}

impl KeyInputLog {
    pub fn new(time: f64, key: impl Into<String>, pressed: bool) -> Self {
        Self {
            time,
            key: key.into(),
            pressed,
        }
    }

    /// Resolve to a lane event. Keys without a binding are skipped.
    pub fn to_event(&self, bindings: &KeyBindings) -> Option<KeyEvent> {
        let Some(lane) = bindings.lane_for(&self.key) else {
            log::warn!("Skipping input for unbound key {:?} at {:.3}s", self.key, self.time);
            return None;
        };
        let transition = if self.pressed {
            KeyTransition::Down
        } else {
            KeyTransition::Up
        };
        Some(KeyEvent {
            lane,
            transition,
            time: self.time,
        })
    }
}

/// Read a replay: a JSON array of [`KeyInputLog`].
pub fn read_log(path: &Path) -> Result<Vec<KeyInputLog>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input log {}", path.display()))?;
    let log: Vec<KeyInputLog> = serde_json::from_str(&data)
        .with_context(|| format!("Invalid input log {}", path.display()))?;
    log::info!("Loaded {} key transitions from {}", log.len(), path.display());
    Ok(log)
}

pub fn write_log(path: &Path, log: &[KeyInputLog]) -> Result<()> {
    let json = serde_json::to_string_pretty(log)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write input log {}", path.display()))?;
    Ok(())
}
