//! Game settings
//!
//! Board geometry, camera and input pacing, plus the balance table. Loaded from
//! JSON; any missing field falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::Tuning;

/// Why a settings file could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Grid tile size in pixels
    pub tile_size: f32,
    /// Columns across the view
    pub cols: u32,
    /// Rows visible on screen
    pub rows: u32,

    // === Start area ===
    /// Rows at the bottom that are always safe ground
    pub spawn_rows: i32,
    /// Of those, how many have no trees at all
    pub open_spawn_rows: i32,
    /// Row the player starts on
    pub start_row: i32,

    // === Camera / simulation window ===
    /// Camera keeps the player at least this many rows above the bottom edge
    pub camera_margin_rows: i32,
    /// Rows below the view that still simulate
    pub sim_rows_behind: i32,
    /// Rows above the view that already simulate
    pub sim_rows_ahead: i32,
    /// Extra rows drawn past each view edge
    pub draw_rows_margin: i32,
    /// Rows generated ahead of the simulation window
    pub max_generate_ahead: i32,

    // === Input ===
    /// Minimum seconds between two hops
    pub move_cooldown: f32,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: 40.0,
            cols: 12,
            rows: 16,

            spawn_rows: 6,
            open_spawn_rows: 3,
            start_row: 2,

            camera_margin_rows: 6,
            sim_rows_behind: 4,
            sim_rows_ahead: 8,
            draw_rows_margin: 2,
            max_generate_ahead: 40,

            move_cooldown: 0.08,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// View width in pixels
    #[inline]
    pub fn view_width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// View height in pixels
    #[inline]
    pub fn view_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Column the player starts in
    pub fn start_column(&self) -> i32 {
        (self.cols / 2) as i32
    }

    /// Whether a column index lies on the board
    #[inline]
    pub fn column_in_range(&self, column: i32) -> bool {
        column >= 0 && (column as i64) < self.cols as i64
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(SettingsError::Invalid("tile size must be positive".into()));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(SettingsError::Invalid(
                "board needs at least one column and one row".into(),
            ));
        }
        if self.spawn_rows < 1 || self.start_row < 0 || self.start_row >= self.spawn_rows {
            return Err(SettingsError::Invalid(
                "start row must lie inside the safe spawn rows".into(),
            ));
        }
        if self.open_spawn_rows > self.spawn_rows {
            return Err(SettingsError::Invalid(
                "open spawn rows cannot exceed spawn rows".into(),
            ));
        }
        if self.sim_rows_behind < 0
            || self.sim_rows_ahead < 0
            || self.draw_rows_margin < 0
            || self.max_generate_ahead < 0
            || self.camera_margin_rows < 0
        {
            return Err(SettingsError::Invalid(
                "row margins must be non-negative".into(),
            ));
        }
        if self.move_cooldown.is_nan() || self.move_cooldown < 0.0 {
            return Err(SettingsError::Invalid(
                "move cooldown must be non-negative".into(),
            ));
        }
        self.tuning.validate(self.cols)
    }
}
