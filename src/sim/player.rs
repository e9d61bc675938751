//! The player avatar (a chick hopping between grid cells)

use serde::{Deserialize, Serialize};

use super::hazard::Bounds;

/// Player state read and written by the world during collision resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub column: i32,
    pub row: i32,
    pub alive: bool,
    /// Furthest row ever reached
    pub score: u32,
    /// Sub-tile horizontal offset while riding a raft, in pixels.
    /// Zero whenever the player is not on a raft lane.
    pub raft_drift: f32,
}

impl Player {
    pub fn new(column: i32, row: i32) -> Self {
        Self {
            column,
            row,
            alive: true,
            score: 0,
            raft_drift: 0.0,
        }
    }

    /// The grid cell the player occupies
    pub fn cell_bounds(&self, tile: f32) -> Bounds {
        Bounds::cell(self.column, self.row, tile)
    }

    /// The occupied cell shifted by the raft drift
    pub fn drifted_bounds(&self, tile: f32) -> Bounds {
        self.cell_bounds(tile).offset_x(self.raft_drift)
    }

    /// Move to a new cell and record forward progress
    pub fn hop_to(&mut self, column: i32, row: i32) {
        self.column = column;
        self.row = row;
        if row > 0 {
            self.score = self.score.max(row as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_tracks_furthest_row() {
        let mut p = Player::new(6, 2);
        p.hop_to(6, 3);
        p.hop_to(6, 4);
        p.hop_to(6, 3);
        assert_eq!(p.score, 4);
        assert_eq!(p.row, 3);
    }

    #[test]
    fn test_drifted_bounds() {
        let mut p = Player::new(2, 1);
        p.raft_drift = 15.0;
        let b = p.drifted_bounds(40.0);
        assert_eq!(b.left(), 95.0);
        assert_eq!(b.right(), 135.0);
    }
}
