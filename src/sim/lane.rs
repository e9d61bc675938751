//! Lanes: one horizontal strip of the world each
//!
//! A lane's kind picks its behaviour once, at construction: safe ground holds a
//! fixed set of trees, every other kind runs a hazard stream (spawn, move, cull).

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty;
use super::hazard::{Hazard, Heading};
use crate::settings::Settings;
use crate::tuning::{Span, StreamTuning, Tuning};

/// Lane types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    /// Grass, possibly with trees
    Safe,
    /// Road with cars and buses
    Traffic,
    /// Water with floating logs
    Raft,
    /// Rail crossing with trains
    Rail,
}

/// What touching a lane's hazards does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Nothing moves here
    Inert,
    /// Overlapping a hazard kills
    Lethal,
    /// Overlapping a hazard is the only way to stay alive
    Ride,
}

impl LaneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaneKind::Safe => "safe",
            LaneKind::Traffic => "traffic",
            LaneKind::Raft => "raft",
            LaneKind::Rail => "rail",
        }
    }

    #[inline]
    pub fn is_hazardous(&self) -> bool {
        *self != LaneKind::Safe
    }

    pub fn contact(&self) -> Contact {
        match self {
            LaneKind::Safe => Contact::Inert,
            LaneKind::Traffic | LaneKind::Rail => Contact::Lethal,
            LaneKind::Raft => Contact::Ride,
        }
    }

    /// Spawn parameters for hazardous kinds
    pub fn stream_tuning<'a>(&self, tuning: &'a Tuning) -> Option<&'a StreamTuning> {
        match self {
            LaneKind::Safe => None,
            LaneKind::Traffic => Some(&tuning.traffic),
            LaneKind::Raft => Some(&tuning.raft),
            LaneKind::Rail => Some(&tuning.rail),
        }
    }
}

/// Spawn interval after difficulty scaling.
///
/// Faster hazards spawn proportionally more often so the on-screen density stays
/// roughly constant, bounded by the absolute clamp.
pub fn effective_spawn_interval(base_interval: f32, multiplier: f32, tuning: &Tuning) -> f32 {
    let scaled = base_interval / multiplier.max(tuning.spawn_multiplier_floor);
    scaled.clamp(tuning.spawn_interval_clamp.min, tuning.spawn_interval_clamp.max)
}

/// Hazard spawner and the hazards it owns
#[derive(Debug, Clone)]
struct HazardStream {
    hazards: Vec<Hazard>,
    /// Seconds accumulated toward the next spawn
    spawn_timer: f32,
    /// Base seconds between spawns
    spawn_interval: f32,
    /// px/s at multiplier 1.0
    base_speed: f32,
    width: Span<u32>,
    /// Remaining quiet time before the timer starts counting
    cooldown: f32,
}

impl HazardStream {
    fn new<R: Rng + ?Sized>(stream: &StreamTuning, rng: &mut R) -> Self {
        Self {
            hazards: Vec::new(),
            spawn_timer: 0.0,
            spawn_interval: stream.spawn_interval.sample(rng),
            base_speed: stream.speed.sample(rng),
            width: stream.width,
            cooldown: stream.first_spawn_cooldown.sample(rng),
        }
    }

    fn update<R: Rng + ?Sized>(
        &mut self,
        row: i32,
        heading: Heading,
        multiplier: f32,
        dt: f32,
        settings: &Settings,
        rng: &mut R,
    ) {
        let tuning = &settings.tuning;
        let interval = effective_spawn_interval(self.spawn_interval, multiplier, tuning);

        let mut counted = dt;
        if self.cooldown > 0.0 {
            let used = counted.min(self.cooldown);
            self.cooldown -= used;
            counted -= used;
        }
        self.spawn_timer += counted;

        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            self.spawn(row, heading, multiplier, settings, rng);
        }

        for hazard in &mut self.hazards {
            hazard.speed = hazard.base_speed * multiplier;
            hazard.advance(dt);
        }

        let tile = settings.tile_size;
        let margin = tile * tuning.cull_margin_tiles;
        let view_width = settings.view_width();
        self.hazards.retain(|h| {
            let b = h.bounds(tile);
            b.right() >= -margin && b.left() <= view_width + margin
        });
    }

    fn spawn<R: Rng + ?Sized>(
        &mut self,
        row: i32,
        heading: Heading,
        multiplier: f32,
        settings: &Settings,
        rng: &mut R,
    ) {
        let tile = settings.tile_size;
        let width = self.width.sample(rng);
        let jitter = rng.random::<f32>() * tile * settings.tuning.spawn_jitter_tiles;

        let x = match heading {
            Heading::Right => -(width as f32 * tile) - jitter,
            Heading::Left => settings.view_width() + jitter,
        };

        self.hazards.push(Hazard {
            x,
            row,
            width,
            speed: self.base_speed * multiplier,
            base_speed: self.base_speed,
            heading,
        });
    }
}

/// Kind-specific lane behaviour
#[derive(Debug, Clone)]
enum LaneBehavior {
    /// Static ground with trees on the listed columns
    Ground { blocked: BTreeSet<i32> },
    /// Moving hazards
    Stream(HazardStream),
}

/// One row of the world
#[derive(Debug, Clone)]
pub struct Lane {
    row: i32,
    kind: LaneKind,
    heading: Heading,
    behavior: LaneBehavior,
}

impl Lane {
    /// Create a lane, drawing its parameters for `kind`
    pub fn new<R: Rng + ?Sized>(row: i32, kind: LaneKind, settings: &Settings, rng: &mut R) -> Self {
        let heading = if rng.random_bool(0.5) {
            Heading::Right
        } else {
            Heading::Left
        };

        let behavior = match kind.stream_tuning(&settings.tuning) {
            Some(stream) => LaneBehavior::Stream(HazardStream::new(stream, rng)),
            None => {
                let cols = settings.cols;
                // never fill the whole row
                let trees = settings.tuning.tree_count.sample(rng).min(cols.saturating_sub(1));
                let blocked = rand::seq::index::sample(rng, cols as usize, trees as usize)
                    .into_iter()
                    .map(|c| c as i32)
                    .collect();
                LaneBehavior::Ground { blocked }
            }
        };

        Self {
            row,
            kind,
            heading,
            behavior,
        }
    }

    /// Safe lane with no trees
    pub fn open_ground(row: i32) -> Self {
        Self {
            row,
            kind: LaneKind::Safe,
            heading: Heading::Right,
            behavior: LaneBehavior::Ground {
                blocked: BTreeSet::new(),
            },
        }
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[inline]
    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    #[inline]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Live hazards (empty for safe ground)
    pub fn hazards(&self) -> &[Hazard] {
        match &self.behavior {
            LaneBehavior::Stream(stream) => &stream.hazards,
            LaneBehavior::Ground { .. } => &[],
        }
    }

    /// Tree columns (None for hazardous lanes)
    pub fn blocked_columns(&self) -> Option<&BTreeSet<i32>> {
        match &self.behavior {
            LaneBehavior::Ground { blocked } => Some(blocked),
            LaneBehavior::Stream(_) => None,
        }
    }

    /// Whether a tree stands on `column`
    pub fn blocks(&self, column: i32) -> bool {
        self.blocked_columns()
            .is_some_and(|blocked| blocked.contains(&column))
    }

    /// Base hazard speed in px/s
    pub fn base_speed(&self) -> Option<f32> {
        match &self.behavior {
            LaneBehavior::Stream(stream) => Some(stream.base_speed),
            LaneBehavior::Ground { .. } => None,
        }
    }

    /// Unscaled seconds between spawns
    pub fn spawn_interval(&self) -> Option<f32> {
        match &self.behavior {
            LaneBehavior::Stream(stream) => Some(stream.spawn_interval),
            LaneBehavior::Ground { .. } => None,
        }
    }

    /// Advance spawning and hazard motion by `dt` seconds.
    ///
    /// Safe ground does nothing.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, score: u32, settings: &Settings, rng: &mut R) {
        let multiplier = difficulty::multiplier(&settings.tuning, self.kind, score);
        if let LaneBehavior::Stream(stream) = &mut self.behavior {
            stream.update(self.row, self.heading, multiplier, dt, settings, rng);
        }
    }

    #[cfg(test)]
    pub(crate) fn hazards_mut(&mut self) -> &mut Vec<Hazard> {
        match &mut self.behavior {
            LaneBehavior::Stream(stream) => &mut stream.hazards,
            LaneBehavior::Ground { .. } => panic!("safe ground has no hazards"),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_blocked(row: i32, blocked: &[i32]) -> Self {
        let mut lane = Self::open_ground(row);
        lane.behavior = LaneBehavior::Ground {
            blocked: blocked.iter().copied().collect(),
        };
        lane
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_safe_lane_trees() {
        let settings = Settings::default();
        let mut rng = rng();
        for row in 0..200 {
            let lane = Lane::new(row, LaneKind::Safe, &settings, &mut rng);
            let blocked = lane.blocked_columns().unwrap();
            assert!((2..=5).contains(&blocked.len()));
            assert!(blocked.iter().all(|c| settings.column_in_range(*c)));
            // at least one column stays open
            assert!((0..settings.cols as i32).any(|c| !lane.blocks(c)));
            assert!(lane.hazards().is_empty());
        }
    }

    #[test]
    fn test_stream_parameters_in_range() {
        let settings = Settings::default();
        let mut rng = rng();
        for kind in [LaneKind::Traffic, LaneKind::Raft, LaneKind::Rail] {
            let stream = kind.stream_tuning(&settings.tuning).unwrap();
            for _ in 0..50 {
                let lane = Lane::new(10, kind, &settings, &mut rng);
                let speed = lane.base_speed().unwrap();
                let interval = lane.spawn_interval().unwrap();
                assert!(speed >= stream.speed.min && speed <= stream.speed.max);
                assert!(interval >= stream.spawn_interval.min && interval <= stream.spawn_interval.max);
                assert!(lane.blocked_columns().is_none());
                assert!(!lane.blocks(0));
            }
        }
    }

    #[test]
    fn test_both_headings_occur() {
        let settings = Settings::default();
        let mut rng = rng();
        let lanes: Vec<_> = (0..64)
            .map(|r| Lane::new(r, LaneKind::Traffic, &settings, &mut rng))
            .collect();
        assert!(lanes.iter().any(|l| l.heading() == Heading::Left));
        assert!(lanes.iter().any(|l| l.heading() == Heading::Right));
    }

    #[test]
    fn test_effective_interval_clamped() {
        let tuning = Tuning::default();
        // multiplier floor stops the interval from exploding
        assert_eq!(effective_spawn_interval(1.0, 0.01, &tuning), 4.0);
        assert!((effective_spawn_interval(1.0, 0.5, &tuning) - 2.0).abs() < 1e-6);
        assert_eq!(effective_spawn_interval(0.4, 2.0, &tuning), 0.35);
    }

    #[test]
    fn test_traffic_spawns_and_widths() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut lane = Lane::new(8, LaneKind::Traffic, &settings, &mut rng);
        for _ in 0..600 {
            lane.update(1.0 / 60.0, 0, &settings, &mut rng);
        }
        assert!(!lane.hazards().is_empty());
        for h in lane.hazards() {
            assert!((1..=2).contains(&h.width));
            assert_eq!(h.row, 8);
            assert_eq!(h.heading, lane.heading());
        }
    }

    #[test]
    fn test_fresh_spawn_is_outside_view() {
        let settings = Settings::default();
        let tile = settings.tile_size;
        let jitter = tile * settings.tuning.spawn_jitter_tiles;
        let view_width = settings.view_width();
        let mut rng = rng();

        for heading in [Heading::Right, Heading::Left] {
            let mut stream = HazardStream::new(&settings.tuning.traffic, &mut rng);
            for _ in 0..100 {
                stream.spawn(9, heading, 0.45, &settings, &mut rng);
            }
            for h in &stream.hazards {
                let b = h.bounds(tile);
                assert_eq!(h.heading, heading);
                match heading {
                    Heading::Right => {
                        assert!(b.right() <= 0.0, "{b:?}");
                        assert!(b.right() >= -jitter, "{b:?}");
                    }
                    Heading::Left => {
                        assert!(b.left() >= view_width, "{b:?}");
                        assert!(b.left() <= view_width + jitter, "{b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_first_spawn_enters_from_heading_side() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut seen = [false; 2];
        for row in 6..64 {
            let mut lane = Lane::new(row, LaneKind::Traffic, &settings, &mut rng);
            let interval = lane.spawn_interval().unwrap();
            let effective = effective_spawn_interval(interval, 0.45, &settings.tuning);
            // one spawn, then one movement step of the same length
            lane.update(effective, 0, &settings, &mut rng);
            assert_eq!(lane.hazards().len(), 1);
            let h = &lane.hazards()[0];
            let b = h.bounds(settings.tile_size);
            let moved = h.speed * effective;
            match lane.heading() {
                Heading::Right => {
                    seen[0] = true;
                    assert!(b.right() <= moved + 1e-3);
                }
                Heading::Left => {
                    seen[1] = true;
                    assert!(b.left() >= settings.view_width() - moved - 1e-3);
                }
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_speed_tracks_current_score() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut lane = Lane::new(12, LaneKind::Traffic, &settings, &mut rng);
        while lane.hazards().is_empty() {
            lane.update(0.1, 0, &settings, &mut rng);
        }
        let base = lane.base_speed().unwrap();
        assert!((lane.hazards()[0].speed - base * 0.45).abs() < 1e-3);

        lane.update(0.001, 500, &settings, &mut rng);
        for h in lane.hazards() {
            assert!((h.speed - base * 1.10).abs() < 1e-3);
        }
    }

    fn lone_hazard(lane: &mut Lane, x: f32) {
        let base = lane.base_speed().unwrap();
        let heading = lane.heading();
        let row = lane.row();
        lane.hazards_mut().clear();
        lane.hazards_mut().push(Hazard {
            x,
            row,
            width: 2,
            speed: base,
            base_speed: base,
            heading,
        });
    }

    #[test]
    fn test_hazards_culled_only_when_well_off_screen() {
        let settings = Settings::default();
        let tile = settings.tile_size;
        let margin = tile * settings.tuning.cull_margin_tiles;
        let width = settings.view_width();
        let mut rng = rng();
        let mut lane = Lane::new(12, LaneKind::Traffic, &settings, &mut rng);

        // zero dt: nothing spawns or moves, only the cull rule applies
        let cases = [
            (width - 1.0, true),
            (-2.0 * tile + 1.0, true),
            (width + margin - 1.0, true),
            (width + margin + 1.0, false),
            (-margin - 2.0 * tile + 1.0, true),
            (-margin - 2.0 * tile - 1.0, false),
        ];
        for (x, kept) in cases {
            lone_hazard(&mut lane, x);
            lane.update(0.0, 0, &settings, &mut rng);
            assert_eq!(!lane.hazards().is_empty(), kept, "hazard at x={x}");
        }
    }

    #[test]
    fn test_visible_hazard_never_culled() {
        let settings = Settings::default();
        let tile = settings.tile_size;
        let mut rng = rng();
        let mut lane = Lane::new(12, LaneKind::Raft, &settings, &mut rng);
        let mut x = -2.0 * tile;
        while x < settings.view_width() {
            lone_hazard(&mut lane, x);
            lane.update(0.0, 0, &settings, &mut rng);
            assert_eq!(lane.hazards().len(), 1);
            x += 7.0;
        }
    }

    #[test]
    fn test_rail_waits_for_cooldown() {
        let mut settings = Settings::default();
        settings.tuning.rail.first_spawn_cooldown = Span::new(1.0, 1.0);
        settings.tuning.rail.spawn_interval = Span::new(3.0, 3.0);
        let mut rng = rng();
        let mut lane = Lane::new(20, LaneKind::Rail, &settings, &mut rng);

        // effective interval at score 0: 3.0 / 0.4 = 7.5 -> clamped to 4.0
        lane.update(0.5, 0, &settings, &mut rng);
        lane.update(0.5, 0, &settings, &mut rng);
        // cooldown consumed, timer still at zero
        lane.update(3.9, 0, &settings, &mut rng);
        assert!(lane.hazards().is_empty());
        lane.update(0.2, 0, &settings, &mut rng);
        assert_eq!(lane.hazards().len(), 1);
        let train = &lane.hazards()[0];
        assert!((4..=6).contains(&train.width));
    }

    #[test]
    fn test_safe_lane_update_is_noop() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut lane = Lane::with_blocked(3, &[1, 4]);
        lane.update(10.0, 100, &settings, &mut rng);
        assert!(lane.hazards().is_empty());
        assert!(lane.blocks(1) && lane.blocks(4) && !lane.blocks(2));
    }
}
