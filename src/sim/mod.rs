//! Lane simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Lanes are generated lazily ahead of the camera
//! - Randomness comes from a seeded RNG owned by the world
//! - Renderers only read lanes, hazards and the player

pub mod difficulty;
pub mod hazard;
pub mod lane;
pub mod player;
pub mod session;
pub mod world;

pub use difficulty::{SpeedProfile, SpeedReadout, multiplier};
pub use hazard::{Bounds, Hazard, Heading};
pub use lane::{Contact, Lane, LaneKind, effective_spawn_interval};
pub use player::Player;
pub use session::{GameEvent, GamePhase, Session, Step, TickInput};
pub use world::{DeathCause, World, settle_drift};
