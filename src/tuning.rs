//! Data-driven game balance
//!
//! Every number that shapes how a run feels lives here: lane mix, spawn cadence,
//! hazard speeds and widths, difficulty ramps. `Default` carries the stock values.

use rand::Rng;
use rand::distr::uniform::SampleUniform;
use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;
use crate::sim::SpeedProfile;

/// Inclusive range a lane parameter is drawn from at lane creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: SampleUniform + PartialOrd + Copy> Span<T> {
    /// Uniform draw in `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    /// False for an inverted range or one with a NaN bound
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl Span<f32> {
    /// Ordered with both bounds finite
    pub fn is_finite_range(&self) -> bool {
        self.is_valid() && self.min.is_finite() && self.max.is_finite()
    }
}

/// Spawn parameters for one hazardous lane kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamTuning {
    /// Seconds between spawns at multiplier 1.0
    pub spawn_interval: Span<f32>,
    /// Lane base speed in px/s
    pub speed: Span<f32>,
    /// Hazard width in grid columns
    pub width: Span<u32>,
    /// Quiet period before the first spawn (only rail uses a non-zero one)
    pub first_spawn_cooldown: Span<f32>,
    pub difficulty: SpeedProfile,
}

/// Relative weights of the lane kinds for procedural rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindWeights {
    pub safe: f32,
    pub traffic: f32,
    pub raft: f32,
    pub rail: f32,
}

impl KindWeights {
    pub fn total(&self) -> f32 {
        self.safe + self.traffic + self.raft + self.rail
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub kind_weights: KindWeights,
    /// Hazardous rows allowed back to back before a safe row is forced
    pub max_hazard_streak: u32,
    /// Rows below this index never roll water
    pub first_raft_row: i32,
    /// Trees per safe row
    pub tree_count: Span<u32>,
    pub traffic: StreamTuning,
    pub raft: StreamTuning,
    pub rail: StreamTuning,
    /// Lower bound on the multiplier used to scale spawn intervals
    pub spawn_multiplier_floor: f32,
    /// Absolute band for the scaled spawn interval, in seconds
    pub spawn_interval_clamp: Span<f32>,
    /// Extra random spawn offset beyond the view edge, in tiles
    pub spawn_jitter_tiles: f32,
    /// Distance past either view edge before a hazard is culled, in tiles
    pub cull_margin_tiles: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            kind_weights: KindWeights {
                safe: 0.42,
                traffic: 0.38,
                raft: 0.15,
                rail: 0.05,
            },
            max_hazard_streak: 3,
            first_raft_row: 6,
            tree_count: Span::new(2, 5),
            traffic: StreamTuning {
                spawn_interval: Span::new(0.7, 1.2),
                speed: Span::new(140.0, 240.0),
                width: Span::new(1, 2),
                first_spawn_cooldown: Span::new(0.0, 0.0),
                difficulty: SpeedProfile::new(0.45, 1.10, 0.007),
            },
            raft: StreamTuning {
                spawn_interval: Span::new(0.8, 1.3),
                speed: Span::new(90.0, 170.0),
                width: Span::new(2, 3),
                first_spawn_cooldown: Span::new(0.0, 0.0),
                difficulty: SpeedProfile::new(0.40, 1.05, 0.008),
            },
            rail: StreamTuning {
                spawn_interval: Span::new(3.0, 5.0),
                speed: Span::new(220.0, 320.0),
                width: Span::new(4, 6),
                first_spawn_cooldown: Span::new(0.0, 1.5),
                difficulty: SpeedProfile::new(0.40, 1.05, 0.006),
            },
            spawn_multiplier_floor: 0.20,
            spawn_interval_clamp: Span::new(0.35, 4.0),
            spawn_jitter_tiles: 2.0,
            cull_margin_tiles: 8.0,
        }
    }
}

impl Tuning {
    /// Check the table for values the generator cannot work with.
    ///
    /// Reports the first problem found as [`SettingsError::Invalid`].
    pub fn validate(&self, cols: u32) -> Result<(), SettingsError> {
        let w = &self.kind_weights;
        if [w.safe, w.traffic, w.raft, w.rail]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
            || w.total() <= 0.0
        {
            return Err(invalid("lane kind weights must be non-negative with a positive total"));
        }
        if !self.tree_count.is_valid() || self.tree_count.max >= cols {
            return Err(invalid(format!(
                "tree count {}..={} must leave at least one of {} columns open",
                self.tree_count.min, self.tree_count.max, cols
            )));
        }
        for (name, stream) in [
            ("traffic", &self.traffic),
            ("raft", &self.raft),
            ("rail", &self.rail),
        ] {
            if !stream.spawn_interval.is_finite_range() || stream.spawn_interval.min <= 0.0 {
                return Err(invalid(format!("{name}: spawn interval must be a positive range")));
            }
            if !stream.speed.is_finite_range() || stream.speed.min < 0.0 {
                return Err(invalid(format!("{name}: speed must be a non-negative range")));
            }
            if !stream.width.is_valid() || stream.width.min == 0 {
                return Err(invalid(format!("{name}: hazard width must be at least one column")));
            }
            if !stream.first_spawn_cooldown.is_finite_range() || stream.first_spawn_cooldown.min < 0.0 {
                return Err(invalid(format!("{name}: first spawn cooldown must be non-negative")));
            }
            if !stream.difficulty.is_valid() {
                return Err(invalid(format!("{name}: difficulty profile needs start <= max")));
            }
        }
        if self.spawn_multiplier_floor.is_nan() || self.spawn_multiplier_floor <= 0.0 {
            return Err(invalid("spawn multiplier floor must be positive"));
        }
        if !self.spawn_interval_clamp.is_finite_range() || self.spawn_interval_clamp.min <= 0.0 {
            return Err(invalid("spawn interval clamp must be a positive range"));
        }
        if self.spawn_jitter_tiles < 0.0 || self.cull_margin_tiles < 0.0 {
            return Err(invalid("spawn jitter and cull margin must be non-negative"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SettingsError {
    SettingsError::Invalid(message.into())
}
