//! The world: every lane generated so far, keyed by row
//!
//! Rows are generated contiguously from 0 upward and kept for the whole run.
//! Only lanes inside the window around the camera simulate each tick; lanes
//! outside it keep their hazards frozen in place.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hazard::Hazard;
use super::lane::{Contact, Lane, LaneKind};
use super::player::Player;
use crate::settings::Settings;

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hit by a car or train
    Struck(LaneKind),
    /// In the water with no log underneath
    Drowned,
}

/// Lane store and generator
#[derive(Debug, Clone)]
pub struct World {
    settings: Settings,
    rng: Pcg32,
    lanes: BTreeMap<i32, Lane>,
    /// Highest row generated so far
    frontier: i32,
    /// Hazardous rows generated since the last safe one
    hazard_streak: u32,
    /// Rows the last `update` advanced
    simulated: RangeInclusive<i32>,
}

impl World {
    /// Create a world seeded from entropy
    pub fn new(settings: Settings) -> Self {
        Self::with_seed(settings, rand::random())
    }

    /// Create a world whose layout is fully determined by `seed`
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        let mut world = Self {
            rng: Pcg32::seed_from_u64(seed),
            lanes: BTreeMap::new(),
            frontier: -1,
            hazard_streak: 0,
            simulated: 1..=0,
            settings,
        };

        // Starting area: safe ground, the first few rows without trees
        for row in 0..world.settings.spawn_rows {
            let lane = if row < world.settings.open_spawn_rows {
                Lane::open_ground(row)
            } else {
                Lane::new(row, LaneKind::Safe, &world.settings, &mut world.rng)
            };
            world.lanes.insert(row, lane);
            world.frontier = row;
        }

        log::debug!("World seeded with {seed}, spawn rows 0..={}", world.frontier);
        world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Highest row generated so far
    pub fn frontier(&self) -> i32 {
        self.frontier
    }

    /// Number of generated lanes
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// An already generated lane
    pub fn lane(&self, row: i32) -> Option<&Lane> {
        self.lanes.get(&row)
    }

    /// Lane at `row`, generating up to it first. None for negative rows.
    pub fn lane_or_generate(&mut self, row: i32) -> Option<&Lane> {
        if row < 0 {
            return None;
        }
        self.ensure_generated(row);
        self.lanes.get(&row)
    }

    /// Pick the kind of the next procedural row
    fn roll_kind(&mut self) -> LaneKind {
        let tuning = &self.settings.tuning;
        if self.hazard_streak >= tuning.max_hazard_streak {
            return LaneKind::Safe;
        }

        let w = tuning.kind_weights;
        let roll = self.rng.random::<f32>() * w.total();
        if roll < w.safe {
            LaneKind::Safe
        } else if roll < w.safe + w.traffic {
            LaneKind::Traffic
        } else if roll < w.safe + w.traffic + w.raft {
            LaneKind::Raft
        } else {
            LaneKind::Rail
        }
    }

    /// Generate every missing row up to and including `max_row`.
    ///
    /// Rows are always generated in order from the frontier, so every row at or
    /// below the frontier already exists.
    pub fn ensure_generated(&mut self, max_row: i32) {
        while self.frontier < max_row {
            let row = self.frontier + 1;
            let mut kind = self.roll_kind();

            // no water before the player has warmed up on roads
            if kind == LaneKind::Raft && row < self.settings.tuning.first_raft_row {
                kind = LaneKind::Traffic;
            }

            let lane = Lane::new(row, kind, &self.settings, &mut self.rng);
            self.lanes.insert(row, lane);
            self.frontier = row;

            if kind.is_hazardous() {
                self.hazard_streak += 1;
            } else {
                self.hazard_streak = 0;
            }
            log::trace!("Generated row {row}: {}", kind.as_str());
        }
    }

    /// Whether the player may hop onto `(column, row)`.
    ///
    /// Hazardous lanes are always steppable; dying there is settled by
    /// [`World::resolve`].
    pub fn can_step(&mut self, column: i32, row: i32) -> bool {
        if !self.settings.column_in_range(column) {
            return false;
        }
        match self.lane_or_generate(row) {
            Some(lane) => !lane.blocks(column),
            None => false,
        }
    }

    fn camera_row(&self, camera_y: f32) -> i32 {
        (camera_y / self.settings.tile_size).floor() as i32
    }

    /// Rows that simulate for a camera offset (may start below 0)
    pub fn sim_window(&self, camera_y: f32) -> RangeInclusive<i32> {
        let base = self.camera_row(camera_y);
        let min = base - self.settings.sim_rows_behind;
        let max = (base + self.settings.rows as i32 + self.settings.sim_rows_ahead).max(0);
        min..=max
    }

    /// Rows a renderer should draw for a camera offset
    pub fn draw_window(&self, camera_y: f32) -> RangeInclusive<i32> {
        let base = self.camera_row(camera_y);
        let margin = self.settings.draw_rows_margin;
        (base - margin).max(0)..=(base + self.settings.rows as i32 + margin).max(0)
    }

    /// Generated lanes inside the draw window, bottom to top
    pub fn visible_lanes(&self, camera_y: f32) -> impl Iterator<Item = &Lane> {
        self.lanes.range(self.draw_window(camera_y)).map(|(_, lane)| lane)
    }

    /// Advance the lanes around the camera by `dt` seconds
    pub fn update(&mut self, dt: f32, camera_y: f32, score: u32) {
        let window = self.sim_window(camera_y);
        let (min, max) = (*window.start(), *window.end());
        self.ensure_generated(max + self.settings.max_generate_ahead);

        for (_, lane) in self.lanes.range_mut(min.max(0)..=max) {
            lane.update(dt, score, &self.settings, &mut self.rng);
        }
        self.simulated = min.max(0)..=max;
    }

    /// Advance the player's own lane when the last [`World::update`] skipped it.
    ///
    /// Covers a player who has backed more than `sim_rows_behind` rows below the
    /// camera.
    pub fn update_player_lane(&mut self, dt: f32, row: i32, score: u32) {
        if row < 0 || self.simulated.contains(&row) {
            return;
        }
        self.ensure_generated(row);
        if let Some(lane) = self.lanes.get_mut(&row) {
            lane.update(dt, score, &self.settings, &mut self.rng);
        }
    }

    /// Settle the player's contact with the lane they stand on.
    ///
    /// Kills the player on a car or train, or in water without a log; carries
    /// them along on a log. Returns the cause when this call killed the player.
    pub fn resolve(&mut self, player: &mut Player, dt: f32) -> Option<DeathCause> {
        let tile = self.settings.tile_size;
        let cols = self.settings.cols as i32;

        let Some(lane) = self.lane_or_generate(player.row) else {
            player.raft_drift = 0.0;
            return None;
        };
        let kind = lane.kind();

        match kind.contact() {
            Contact::Inert => {
                player.raft_drift = 0.0;
                None
            }
            Contact::Lethal => {
                player.raft_drift = 0.0;
                let cell = player.cell_bounds(tile);
                if lane.hazards().iter().any(|h| h.bounds(tile).overlaps(&cell)) {
                    player.alive = false;
                    Some(DeathCause::Struck(kind))
                } else {
                    None
                }
            }
            Contact::Ride => ride(lane.hazards(), player, dt, tile, cols),
        }
    }
}

impl World {
    #[cfg(test)]
    pub(crate) fn lane_mut(&mut self, row: i32) -> Option<&mut Lane> {
        self.lanes.get_mut(&row)
    }
}

/// First hazard under the player's drifted cell
fn hazard_under<'a>(hazards: &'a [Hazard], player: &Player, tile: f32) -> Option<&'a Hazard> {
    let cell = player.drifted_bounds(tile);
    hazards.iter().find(|h| h.bounds(tile).overlaps(&cell))
}

fn ride(hazards: &[Hazard], player: &mut Player, dt: f32, tile: f32, cols: i32) -> Option<DeathCause> {
    let Some(log) = hazard_under(hazards, player, tile) else {
        player.alive = false;
        return Some(DeathCause::Drowned);
    };

    player.raft_drift += log.velocity() * dt;
    settle_drift(player, tile, cols);

    if hazard_under(hazards, player, tile).is_none() {
        player.alive = false;
        return Some(DeathCause::Drowned);
    }
    None
}

/// Fold whole tiles of drift into the player's column.
///
/// The player is pinned at the board edges: drift that would push them off the
/// board is dropped instead.
pub fn settle_drift(player: &mut Player, tile: f32, cols: i32) {
    while player.raft_drift >= tile {
        if player.column >= cols - 1 {
            player.raft_drift = 0.0;
            break;
        }
        player.raft_drift -= tile;
        player.column += 1;
    }

    while player.raft_drift <= -tile {
        if player.column <= 0 {
            player.raft_drift = 0.0;
            break;
        }
        player.raft_drift += tile;
        player.column -= 1;
    }

    // no sub-tile drift into the wall either
    if player.column <= 0 && player.raft_drift < 0.0 {
        player.raft_drift = 0.0;
    }
    if player.column >= cols - 1 && player.raft_drift > 0.0 {
        player.raft_drift = 0.0;
    }
}
