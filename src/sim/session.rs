//! A run of the game, advanced one frame at a time
//!
//! Owns the world and the player, turns input into hops, keeps the camera
//! following forward progress and settles collisions after every world update.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::SpeedReadout;
use super::player::Player;
use super::world::{DeathCause, World};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// One grid hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    /// `(column, row)` delta; up is toward higher rows
    pub fn delta(self) -> (i32, i32) {
        match self {
            Step::Up => (0, 1),
            Step::Down => (0, -1),
            Step::Left => (-1, 0),
            Step::Right => (1, 0),
        }
    }
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub step: Option<Step>,
    /// Pause toggle
    pub pause: bool,
    /// Start a new run (only honoured after game over)
    pub restart: bool,
}

/// Things that happened during the last frame, for sound and effects layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Hopped { column: i32, row: i32 },
    /// Hop refused by a tree or the board edge
    Bumped,
    NewBest(u32),
    Died(DeathCause),
    Restarted,
}

/// A game session spanning any number of runs
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    /// Seeds each run's world
    rng: Pcg32,
    world: World,
    player: Player,
    /// Vertical camera offset in pixels, never decreasing within a run
    camera_y: f32,
    best_score: u32,
    phase: GamePhase,
    /// Seconds since the last accepted hop
    since_hop: f32,
    death: Option<DeathCause>,
    /// Events of the most recent tick only
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a session seeded from entropy
    pub fn new(settings: Settings) -> Self {
        Self::with_seed(settings, rand::random())
    }

    /// Start a session whose runs are reproducible from `seed`
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::with_seed(settings.clone(), rng.random());
        let player = Player::new(settings.start_column(), settings.start_row);
        Self {
            settings,
            rng,
            world,
            player,
            camera_y: 0.0,
            best_score: 0,
            phase: GamePhase::Playing,
            since_hop: f32::INFINITY,
            death: None,
            events: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera_y(&self) -> f32 {
        self.camera_y
    }

    /// Best score across every run of this session
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// How the last run ended, while in game over
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Events produced by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the events of the most recent tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Debug HUD line with the current hazard speed multipliers
    pub fn speed_readout(&self) -> String {
        SpeedReadout {
            tuning: &self.settings.tuning,
            score: self.player.score,
        }
        .to_string()
    }

    /// Advance the session by one frame of `dt` seconds
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        self.events.clear();

        if input.restart && self.phase == GamePhase::GameOver {
            self.restart();
            return;
        }

        if input.pause {
            match self.phase {
                GamePhase::Playing => {
                    self.phase = GamePhase::Paused;
                    return;
                }
                GamePhase::Paused => self.phase = GamePhase::Playing,
                GamePhase::GameOver => {}
            }
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        self.since_hop += dt;
        if let Some(step) = input.step {
            self.try_hop(step);
        }

        // Camera follows upward progress only
        let margin = self.settings.camera_margin_rows;
        let target = ((self.player.row - margin) as f32 * self.settings.tile_size).max(0.0);
        self.camera_y = self.camera_y.max(target);

        self.world.update(dt, self.camera_y, self.player.score);
        self.world.update_player_lane(dt, self.player.row, self.player.score);

        if let Some(cause) = self.world.resolve(&mut self.player, dt) {
            log::info!(
                "Run over at row {} (score {}): {:?}",
                self.player.row,
                self.player.score,
                cause
            );
            self.phase = GamePhase::GameOver;
            self.death = Some(cause);
            self.events.push(GameEvent::Died(cause));
        }
    }

    fn try_hop(&mut self, step: Step) {
        if self.since_hop < self.settings.move_cooldown {
            return;
        }

        let (dx, dy) = step.delta();
        let column = self.player.column + dx;
        let row = self.player.row + dy;
        if !self.world.can_step(column, row) {
            self.events.push(GameEvent::Bumped);
            return;
        }

        self.player.hop_to(column, row);
        self.since_hop = 0.0;
        self.events.push(GameEvent::Hopped { column, row });

        if self.player.score > self.best_score {
            self.best_score = self.player.score;
            self.events.push(GameEvent::NewBest(self.best_score));
        }
    }

    fn restart(&mut self) {
        self.world = World::with_seed(self.settings.clone(), self.rng.random());
        self.player = Player::new(self.settings.start_column(), self.settings.start_row);
        self.camera_y = 0.0;
        self.phase = GamePhase::Playing;
        self.since_hop = f32::INFINITY;
        self.death = None;
        self.events.push(GameEvent::Restarted);
        log::info!("New run started (best so far: {})", self.best_score);
    }
}
