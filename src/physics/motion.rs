//! Climb-phase motion for a single drone
//!
//! Provides the translational state of one drone and the thrust integration
//! that flies it toward the rally point. No external physics dependencies -
//! implements our own point-mass math.
//!
//! # Example
//!
//! ```ignore
//! use drone_show_core::config::ShowConfig;
//! use drone_show_core::physics::motion::Kinematics;
//!
//! let config = ShowConfig::default();
//! let mut kin = Kinematics::at_rest(glam::Vec3::new(50.0, 30.0, 1.0));
//! kin.approach_step(&config, config.rise_speed_cap, 0.01);
//! ```

use glam::Vec3;

use crate::config::ShowConfig;

/// Distance slack added to every rally-band check (meters).
///
/// A drone counts as "at" a band boundary slightly before crossing it, so a
/// discrete integration step cannot leave it hovering just outside forever.
pub const RALLY_SLACK: f32 = 0.05;

/// Band below a speed cap inside which thrust stops adding speed (m/s).
pub const SPEED_CAP_EPSILON: f32 = 0.1;

/// Displacements shorter than this are treated as zero and skipped.
pub const DEGENERATE_EPS: f32 = 1e-6;

/// Translational state of one drone.
///
/// Holds everything the climb integrator reads and writes. Orbit motion
/// rewrites `position` directly and leaves `velocity` untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Current position in world space (meters)
    pub position: Vec3,
    /// Current velocity vector (meters/second)
    pub velocity: Vec3,
    /// Acceleration applied on the most recent climb step (m/s²)
    pub acceleration: Vec3,
}

impl Kinematics {
    /// State for a drone parked at `position` with no motion.
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    /// Current speed (meters/second).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Straight-line distance from the drone to `point` (meters).
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    /// Integrate one climb step toward the rally point.
    ///
    /// The net thrust (`thrust - counter_pull`) is aimed along the
    /// displacement to the rally point and split onto the axes, then each
    /// axis advances by `v*dt + a*dt²/2`. Once total speed is within
    /// [`SPEED_CAP_EPSILON`] of `speed_cap`, an axis only keeps its
    /// acceleration term while that term is braking it (velocity and
    /// acceleration of opposite sign); accelerating axes coast at constant
    /// velocity so the cap is never blown through.
    ///
    /// # Arguments
    /// * `config` - Show physics (rally point, thrust budget, mass)
    /// * `speed_cap` - Cap for the current flight phase (rise or cruise)
    /// * `dt` - Time step in seconds
    ///
    /// # Returns
    /// False when the drone already sits on the rally point and no step
    /// could be taken, true otherwise.
    pub fn approach_step(&mut self, config: &ShowConfig, speed_cap: f32, dt: f32) -> bool {
        let displacement = config.rally_point - self.position;
        let distance = displacement.length();
        if distance <= DEGENERATE_EPS {
            return false;
        }

        // Net force aimed at the rally point, distributed per axis
        let force = displacement * (config.net_thrust() / distance);
        self.acceleration = force / config.mass;

        let near_cap = (speed_cap - self.speed()) < SPEED_CAP_EPSILON;
        for axis in 0..3 {
            let v = self.velocity[axis];
            let a = self.acceleration[axis];
            if !near_cap || v * a < 0.0 {
                self.position[axis] += v * dt + 0.5 * a * dt * dt;
                self.velocity[axis] += a * dt;
            } else {
                // At the cap this axis coasts; only braking terms still apply
                self.position[axis] += v * dt;
            }
        }
        true
    }
}

/// Check whether `position` is within `acceptable` meters of `rally`,
/// with the shared [`RALLY_SLACK`] allowance.
///
/// Used both for the orbit-entry threshold (`acceptable = safe_radius`) and
/// for the wider collision band around the rally point.
pub fn within_rally_band(position: Vec3, rally: Vec3, acceptable: f32) -> bool {
    position.distance(rally) <= acceptable + RALLY_SLACK
}
