use std::path::Path;

use anyhow::{Context, Result};
use lane_input::{DEFAULT_KEYS, KeyBindings};
use lane_rule::{DEFAULT_GOOD_WINDOW, DEFAULT_MISS_WINDOW, DEFAULT_PERFECT_WINDOW, JudgeWindows};
use serde::{Deserialize, Serialize};

pub const WINDOW_MIN: f64 = 0.001;
pub const WINDOW_MAX: f64 = 1.0;
pub const SPAWN_OFFSET_MAX: f64 = 10.0;
pub const FRAME_RATE_MIN: u32 = 30;
pub const FRAME_RATE_MAX: u32 = 1000;

pub const DEFAULT_SPAWN_OFFSET: f64 = 2.0;
pub const DEFAULT_FRAME_RATE: u32 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct PlayConfig {
    /// Seconds either side of a target that still count as Perfect.
    pub perfect_window: f64,
    pub good_window: f64,
    /// Outer judgment window; also the grab lead of long notes.
    pub miss_window: f64,
    /// How far ahead of its time a note is handed to the judge.
    pub spawn_offset: f64,
    /// Key name per lane, left to right.
    pub keys: Vec<String>,
    /// Simulation ticks per second.
    pub frame_rate: u32,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            perfect_window: DEFAULT_PERFECT_WINDOW,
            good_window: DEFAULT_GOOD_WINDOW,
            miss_window: DEFAULT_MISS_WINDOW,
            spawn_offset: DEFAULT_SPAWN_OFFSET,
            keys: default_keys(),
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

fn default_keys() -> Vec<String> {
    DEFAULT_KEYS.iter().map(|k| k.to_string()).collect()
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

impl PlayConfig {
    pub fn validate(&mut self) {
        self.perfect_window =
            finite_or(self.perfect_window, DEFAULT_PERFECT_WINDOW).clamp(WINDOW_MIN, WINDOW_MAX);
        self.good_window =
            finite_or(self.good_window, DEFAULT_GOOD_WINDOW).clamp(self.perfect_window, WINDOW_MAX);
        self.miss_window =
            finite_or(self.miss_window, DEFAULT_MISS_WINDOW).clamp(self.good_window, WINDOW_MAX);
        self.spawn_offset = finite_or(self.spawn_offset, DEFAULT_SPAWN_OFFSET)
            .clamp(self.miss_window, SPAWN_OFFSET_MAX);
        self.frame_rate = self.frame_rate.clamp(FRAME_RATE_MIN, FRAME_RATE_MAX);
        if let Err(e) = KeyBindings::new(&self.keys) {
            log::warn!("Invalid key layout ({e}), using default");
            self.keys = default_keys();
        }
    }

    pub fn judge_windows(&self) -> Result<JudgeWindows> {
        JudgeWindows::new(self.perfect_window, self.good_window, self.miss_window)
    }

    pub fn key_bindings(&self) -> Result<KeyBindings> {
        KeyBindings::new(&self.keys)
    }

    /// Seconds between simulation ticks.
    pub fn frame_step(&self) -> f64 {
        1.0 / f64::from(self.frame_rate.max(1))
    }

    /// Read config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: PlayConfig = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    /// Read config from a JSON file, falling back to defaults if it does not exist.
    pub fn read_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::read(path)
    }

    /// Write config to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}
