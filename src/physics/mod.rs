//! Flight physics for the drone show
//!
//! Custom point-mass flight math built without an external physics library.
//! Every drone follows the same life cycle: a thrust-driven climb toward
//! the rally point, a circular orbit on the rally sphere, and after a
//! collision an energy-derived escape back into the climb.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Forces in newtons, mass in kg
//! - Orbit rates in degrees per tick
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`motion`] - Climb-phase thrust integration and the rally band check
//! - [`orbit`] - Orbit planes and circular stepping on the rally sphere
//! - [`energy`] - Spin/speed conversion and post-collision escape velocity

pub mod energy;
pub mod motion;
pub mod orbit;
pub mod types;

// Re-export commonly used items at the physics module level
pub use energy::{recovery_velocity, speed_from_spin, spin_from_speed, trim_to_cap};
pub use motion::{Kinematics, within_rally_band};
pub use orbit::{OrbitPlane, orbit_step, signed_angle_deg};
pub use types::{Vec2, Vec3};
