//! Difficulty ramp
//!
//! Maps the player's progress score to a speed multiplier per hazard class.
//! Pure lookups only: nothing here holds state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lane::LaneKind;
use crate::tuning::Tuning;

/// Linear speed ramp, capped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    /// Multiplier at score 0
    pub start: f32,
    /// Cap
    pub max: f32,
    /// Multiplier gained per point of score
    pub per_score: f32,
}

impl SpeedProfile {
    pub const fn new(start: f32, max: f32, per_score: f32) -> Self {
        Self {
            start,
            max,
            per_score,
        }
    }

    /// Multiplier for the given score, clamped to `[start, max]`
    #[inline]
    pub fn multiplier(&self, score: u32) -> f32 {
        (self.start + self.per_score * score as f32).clamp(self.start, self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.max.is_finite() && self.start <= self.max
    }
}

/// Speed multiplier for a lane kind at the given score.
///
/// Safe ground has no hazards and always reports 1.0.
pub fn multiplier(tuning: &Tuning, kind: LaneKind, score: u32) -> f32 {
    match kind {
        LaneKind::Safe => 1.0,
        LaneKind::Traffic => tuning.traffic.difficulty.multiplier(score),
        LaneKind::Raft => tuning.raft.difficulty.multiplier(score),
        LaneKind::Rail => tuning.rail.difficulty.multiplier(score),
    }
}

/// HUD debug line showing the current multipliers
pub struct SpeedReadout<'a> {
    pub tuning: &'a Tuning,
    pub score: u32,
}

impl fmt::Display for SpeedReadout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spd x car:{:.2} log:{:.2} train:{:.2}",
            multiplier(self.tuning, LaneKind::Traffic, self.score),
            multiplier(self.tuning, LaneKind::Raft, self.score),
            multiplier(self.tuning, LaneKind::Rail, self.score),
        )
    }
}
