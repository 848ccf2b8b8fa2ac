//! Energy-based conversion between straight flight and orbit spin
//!
//! A drone entering orbit trades its translational kinetic energy for
//! rotation around the rally point, modeled as a solid sphere of the safe
//! radius. The same relation runs in reverse after a collision, when an
//! exchanged spin has to become a straight-line escape velocity again.

use glam::{Vec2, Vec3};
use log::warn;

use crate::config::ShowConfig;
use crate::physics::motion::DEGENERATE_EPS;
use crate::physics::orbit::OrbitPlane;

/// Speed substituted when a conversion lands in a degenerate band (m/s).
pub const NOMINAL_ORBIT_SPEED: f32 = 5.0;

/// Half-width of the arrival-speed band that triggers the substitution (m/s).
///
/// Drones arrive at the sphere close to the rise cap, so their raw spin
/// would be sluggish; anything within this band of the cap orbits at the
/// nominal speed instead.
pub const SLOW_ARRIVAL_BAND: f32 = 0.5;

/// Amount shaved off every axis per trim iteration (m/s).
pub const TRIM_STEP: f32 = 0.1;

/// Upper bound on trim iterations before the velocity is force-scaled.
pub const TRIM_MAX_ITERATIONS: usize = 256;

/// Moment of inertia of the orbit model: a solid sphere of the safe radius.
pub fn moment_of_inertia(config: &ShowConfig) -> f32 {
    (2.0 / 5.0) * config.mass * config.safe_radius * config.safe_radius
}

/// Orbit spin rate equivalent to flying at `speed`, in degrees per tick.
///
/// Always returns a non-negative rate; the caller picks the rotation
/// direction. Arrival speeds within [`SLOW_ARRIVAL_BAND`] of the rise cap
/// are replaced by [`NOMINAL_ORBIT_SPEED`] before converting.
pub fn spin_from_speed(speed: f32, config: &ShowConfig) -> f32 {
    let speed = if (speed - config.rise_speed_cap).abs() < SLOW_ARRIVAL_BAND {
        NOMINAL_ORBIT_SPEED
    } else {
        speed
    };
    speed * (config.mass / moment_of_inertia(config)).sqrt()
}

/// Straight-line speed equivalent to orbiting at `spin` degrees per tick.
///
/// Inverse of [`spin_from_speed`], on the spin magnitude. Speeds that come
/// out below the rise cap are replaced by [`NOMINAL_ORBIT_SPEED`] so a
/// drone never leaves a collision slower than it arrived at the sphere.
pub fn speed_from_spin(spin: f32, config: &ShowConfig) -> f32 {
    let speed = spin.abs() * (moment_of_inertia(config) / config.mass).sqrt();
    if speed < config.rise_speed_cap {
        NOMINAL_ORBIT_SPEED
    } else {
        speed
    }
}

/// Escape velocity for a drone leaving orbit after a collision.
///
/// The received `spin` is converted back to a speed, aimed along the
/// in-plane perpendicular of the drone's displacement from the rally point
/// (the side depends on the spin's sign), then corrected axis by axis so no
/// component points back toward the rally point, and finally trimmed under
/// the cruise cap.
///
/// # Arguments
/// * `position` - Drone position at the moment of the collision
/// * `plane` - Orbit plane the spin was received in
/// * `spin` - Signed orbit rate received from the collision partner
/// * `config` - Show physics
///
/// # Returns
/// The new translational velocity, or zero when the drone sits exactly on
/// the rally point's plane axis and no direction can be derived.
pub fn recovery_velocity(
    position: Vec3,
    plane: OrbitPlane,
    spin: f32,
    config: &ShowConfig,
) -> Vec3 {
    let speed = speed_from_spin(spin, config);
    let displacement = position - config.rally_point;
    let disp2 = plane.in_plane(displacement);

    let perpendicular = if spin > 0.0 {
        Vec2::new(disp2.y, -disp2.x)
    } else {
        Vec2::new(-disp2.y, disp2.x)
    };
    let length = perpendicular.length();
    if length <= DEGENERATE_EPS {
        return Vec3::ZERO;
    }

    let mut velocity = plane.with_in_plane(Vec3::ZERO, perpendicular * (speed / length));

    // No component may carry the drone back toward the rally point
    for axis in 0..3 {
        if velocity[axis] * displacement[axis] < 0.0 {
            velocity[axis] = -velocity[axis];
        }
    }

    trim_to_cap(&mut velocity, config.cruise_speed_cap);
    velocity
}

/// Shave a velocity down until its magnitude fits under `cap`.
///
/// Each iteration steps every axis [`TRIM_STEP`] toward zero. If the loop
/// has not converged after [`TRIM_MAX_ITERATIONS`] the vector is scaled
/// straight onto the cap instead.
///
/// # Returns
/// The number of trim iterations performed.
pub fn trim_to_cap(velocity: &mut Vec3, cap: f32) -> usize {
    let mut iterations = 0;
    while velocity.length() > cap {
        if iterations >= TRIM_MAX_ITERATIONS {
            warn!(
                "velocity trim did not converge after {TRIM_MAX_ITERATIONS} iterations, \
                 scaling {velocity} onto cap {cap}"
            );
            *velocity = velocity.normalize_or_zero() * cap;
            break;
        }
        for axis in 0..3 {
            if velocity[axis] > 0.0 {
                velocity[axis] -= TRIM_STEP;
            } else {
                velocity[axis] += TRIM_STEP;
            }
        }
        iterations += 1;
    }
    iterations
}
