use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::NoteSpec;

/// A chart file: the full list of notes for one song.
///
/// Notes are kept sorted by `time` (stable, so notes sharing a time keep their
/// file order), which is the order the spawn feed must hand them out in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub notes: Vec<NoteSpec>,
}

impl Chart {
    pub fn new(notes: Vec<NoteSpec>) -> Self {
        let mut chart = Self { notes };
        chart.sort();
        chart
    }

    /// Parse a chart from its JSON form (`{"notes": [{"time", "lane", "duration"}, ...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let mut chart: Chart = serde_json::from_str(json).context("Failed to parse chart JSON")?;
        chart.sort();
        Ok(chart)
    }

    /// Read a chart from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart {}", path.display()))?;
        let chart = Self::from_json(&data)
            .with_context(|| format!("Invalid chart {}", path.display()))?;
        log::info!("Loaded {} notes from {}", chart.len(), path.display());
        Ok(chart)
    }

    /// Write the chart to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Latest end time of any note, or 0 for an empty chart.
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(NoteSpec::end_time)
            .fold(0.0, f64::max)
    }

    fn sort(&mut self) {
        self.notes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

/// Hands chart notes to the judge ahead of time.
///
/// A note becomes due once `now >= time - spawn_offset`. Notes come out in
/// chart order, which keeps every lane's registration order non-decreasing.
#[derive(Debug, Clone)]
pub struct ChartFeed {
    notes: Vec<NoteSpec>,
    cursor: usize,
    spawn_offset: f64,
    end_time: f64,
}

impl ChartFeed {
    pub fn new(chart: Chart, spawn_offset: f64) -> Self {
        let end_time = chart.end_time();
        Self {
            notes: chart.notes,
            cursor: 0,
            spawn_offset,
            end_time,
        }
    }

    /// Notes that became due since the previous call.
    pub fn due(&mut self, now: f64) -> &[NoteSpec] {
        let start = self.cursor;
        while let Some(note) = self.notes.get(self.cursor) {
            if now < note.time - self.spawn_offset {
                break;
            }
            self.cursor += 1;
        }
        &self.notes[start..self.cursor]
    }

    pub fn spawn_offset(&self) -> f64 {
        self.spawn_offset
    }

    pub fn remaining(&self) -> usize {
        self.notes.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.notes.len()
    }

    /// Time of the first note, if any.
    pub fn first_note_time(&self) -> Option<f64> {
        self.notes.first().map(|n| n.time)
    }

    /// Latest end time of any note in the chart.
    pub fn last_event_time(&self) -> f64 {
        self.end_time
    }
}
