//! Moving hazards and the boxes used to test contact with them

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world pixels (y grows with row index)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Grid cell `(column, row)` on a board of `tile`-sized squares
    pub fn cell(column: i32, row: i32, tile: f32) -> Self {
        Self::new(column as f32 * tile, row as f32 * tile, tile, tile)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Shift horizontally
    pub fn offset_x(self, dx: f32) -> Self {
        let d = Vec2::new(dx, 0.0);
        Self {
            min: self.min + d,
            max: self.max + d,
        }
    }

    /// True when the interiors overlap; shared edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Horizontal travel direction, fixed per lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    /// +1.0 for right, -1.0 for left
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// A car, log or train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Left edge in world pixels
    pub x: f32,
    pub row: i32,
    /// Width in grid columns
    pub width: u32,
    /// Current speed in px/s (base speed scaled by difficulty)
    pub speed: f32,
    /// Lane base speed the current speed is derived from
    pub base_speed: f32,
    pub heading: Heading,
}

impl Hazard {
    pub fn bounds(&self, tile: f32) -> Bounds {
        Bounds::new(
            self.x,
            self.row as f32 * tile,
            self.width as f32 * tile,
            tile,
        )
    }

    /// Signed velocity in px/s
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.speed * self.heading.sign()
    }

    pub fn advance(&mut self, dt: f32) {
        self.x += self.velocity() * dt;
    }
}
