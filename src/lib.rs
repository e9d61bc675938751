//! Lane Hopper - an endless lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Lane generation and simulation (hazards, difficulty, collisions, rafts)
//! - `settings`: Board geometry and pacing, loaded from JSON
//! - `tuning`: Data-driven game balance

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use sim::{Session, World};
pub use tuning::Tuning;

/// Fixed frame timestep used by the headless driver (60 Hz)
pub const FRAME_DT: f32 = 1.0 / 60.0;
