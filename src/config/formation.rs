//! Launch formation layout
//!
//! Describes the grid the drones sit in before lift-off. The stock show
//! parks fifteen drones on a sports field in three rows of five, one meter
//! off the ground, centered under the rally point's x axis.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rectangular launch grid, row-major.
///
/// Slot `(row, col)` sits at `(first_x + col * step_x, first_y + row * step_y,
/// altitude)`. Steps may be negative; the stock grid counts down from the
/// field's far corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Number of rows in the grid
    pub rows: usize,
    /// Number of columns in the grid
    pub cols: usize,
    /// X coordinate of column 0 (meters)
    pub first_x: f32,
    /// X distance between adjacent columns (meters)
    pub step_x: f32,
    /// Y coordinate of row 0 (meters)
    pub first_y: f32,
    /// Y distance between adjacent rows (meters)
    pub step_y: f32,
    /// Launch height above the ground (meters)
    pub altitude: f32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 5,
            first_x: 50.0,
            step_x: -25.0, // 5 columns spanning x = 50 down to -50
            first_y: 30.0,
            step_y: -30.0, // 3 rows spanning y = 30 down to -30
            altitude: 1.0,
        }
    }
}

impl FormationConfig {
    /// Total number of launch slots in the grid.
    pub fn unit_count(&self) -> usize {
        self.rows * self.cols
    }

    /// World-space launch position for each slot, row-major.
    ///
    /// The returned index order is the drone identity order: slot `i` is
    /// row `i / cols`, column `i % cols`.
    pub fn launch_positions(&self) -> Vec<Vec3> {
        let mut positions = Vec::with_capacity(self.unit_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                positions.push(Vec3::new(
                    self.first_x + col as f32 * self.step_x,
                    self.first_y + row as f32 * self.step_y,
                    self.altitude,
                ));
            }
        }
        positions
    }
}
