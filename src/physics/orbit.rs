//! Circular orbit motion around the rally point
//!
//! Once a drone reaches the rally sphere it stops integrating thrust and is
//! instead placed directly on a circle each tick: recover the current polar
//! angle from its position, advance the angle by its angular velocity, and
//! write the new point back. The circle lives in one of three axis-pair
//! planes; the out-of-plane coordinate is left alone and the in-plane
//! radius shrinks to keep the drone on the rally sphere.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ShowConfig;
use crate::physics::motion::DEGENERATE_EPS;

/// The three axis-pair planes a drone can orbit in.
///
/// Each plane names its in-plane axes in the order the circle math uses
/// them (cosine axis first, sine axis second).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitPlane {
    /// Circle over (x, y); z is out-of-plane
    Xy,
    /// Circle over (z, y); x is out-of-plane
    Yz,
    /// Circle over (z, x); y is out-of-plane
    Zx,
}

impl OrbitPlane {
    /// Plane assignment for drone `index`, cycling through all three.
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => OrbitPlane::Xy,
            1 => OrbitPlane::Yz,
            _ => OrbitPlane::Zx,
        }
    }

    /// In-plane components of `v`, cosine axis first.
    pub fn in_plane(self, v: Vec3) -> Vec2 {
        match self {
            OrbitPlane::Xy => Vec2::new(v.x, v.y),
            OrbitPlane::Yz => Vec2::new(v.z, v.y),
            OrbitPlane::Zx => Vec2::new(v.z, v.x),
        }
    }

    /// The single out-of-plane component of `v`.
    pub fn out_of_plane(self, v: Vec3) -> f32 {
        match self {
            OrbitPlane::Xy => v.z,
            OrbitPlane::Yz => v.x,
            OrbitPlane::Zx => v.y,
        }
    }

    /// Copy of `base` with its in-plane components replaced by `ab`.
    pub fn with_in_plane(self, base: Vec3, ab: Vec2) -> Vec3 {
        let mut out = base;
        match self {
            OrbitPlane::Xy => {
                out.x = ab.x;
                out.y = ab.y;
            }
            OrbitPlane::Yz => {
                out.z = ab.x;
                out.y = ab.y;
            }
            OrbitPlane::Zx => {
                out.z = ab.x;
                out.x = ab.y;
            }
        }
        out
    }

    /// Zero-angle reference direction for a circle of `radius` around `rally`.
    ///
    /// Orbit angles are measured against this vector, so it fixes where
    /// angle zero sits on the circle.
    pub fn reference_vector(self, radius: f32, rally: Vec3) -> Vec2 {
        let c = self.in_plane(rally);
        match self {
            OrbitPlane::Xy => Vec2::new(radius - c.x, c.y),
            OrbitPlane::Yz | OrbitPlane::Zx => Vec2::new(c.x - radius, c.y),
        }
    }
}

/// Signed angle of `v` measured from `reference`, in degrees.
///
/// Positive above the cosine axis, negative below (sign follows the second
/// component of `v`). Returns `None` when either vector is too short to
/// define an angle.
pub fn signed_angle_deg(v: Vec2, reference: Vec2) -> Option<f32> {
    let denom = v.length() * reference.length();
    if denom <= DEGENERATE_EPS {
        return None;
    }
    // Clamp before acos so accumulated float error cannot produce NaN
    let cos = (v.dot(reference) / denom).clamp(-1.0, 1.0);
    let degrees = cos.acos().to_degrees();
    Some(if v.y < 0.0 { -degrees } else { degrees })
}

/// Advance one orbit step: rotate the drone `angular_velocity * frame_speed`
/// degrees around the rally point in its plane.
///
/// The in-plane radius is recomputed from the out-of-plane offset every
/// step, so a drone orbiting off the plane's equator flies a smaller
/// circle and stays on the rally sphere.
///
/// # Arguments
/// * `position` - Drone position, rewritten in place
/// * `plane` - Which axis pair the circle lives in
/// * `angular_velocity` - Signed orbit rate (degrees per tick)
/// * `config` - Show physics (rally point, safe radius, frame speed)
///
/// # Returns
/// False when the geometry is degenerate (drone on the plane axis, or
/// out-of-plane offset at or beyond the sphere) and the position was left
/// unchanged.
pub fn orbit_step(
    position: &mut Vec3,
    plane: OrbitPlane,
    angular_velocity: f32,
    config: &ShowConfig,
) -> bool {
    let rally = config.rally_point;
    let out_dist = plane.out_of_plane(rally) - plane.out_of_plane(*position);
    let radius_sq = config.safe_radius * config.safe_radius - out_dist * out_dist;
    let radius = radius_sq.max(0.0).sqrt();
    if radius <= DEGENERATE_EPS {
        return false;
    }

    let center = plane.in_plane(rally);
    let displacement = plane.in_plane(*position) - center;
    let reference = plane.reference_vector(radius, rally);
    let Some(angle) = signed_angle_deg(displacement, reference) else {
        return false;
    };

    let next = (angle + angular_velocity * config.frame_speed).to_radians();
    let on_circle = center + radius * Vec2::new(next.cos(), next.sin());
    *position = plane.with_in_plane(*position, on_circle);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_from_index_cycles() {
        assert_eq!(OrbitPlane::from_index(0), OrbitPlane::Xy);
        assert_eq!(OrbitPlane::from_index(1), OrbitPlane::Yz);
        assert_eq!(OrbitPlane::from_index(2), OrbitPlane::Zx);
        assert_eq!(OrbitPlane::from_index(3), OrbitPlane::Xy);
        assert_eq!(OrbitPlane::from_index(14), OrbitPlane::Zx);
    }

    #[test]
    fn test_in_plane_mappings() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(OrbitPlane::Xy.in_plane(v), Vec2::new(1.0, 2.0));
        assert_eq!(OrbitPlane::Yz.in_plane(v), Vec2::new(3.0, 2.0));
        assert_eq!(OrbitPlane::Zx.in_plane(v), Vec2::new(3.0, 1.0));
        assert_eq!(OrbitPlane::Xy.out_of_plane(v), 3.0);
        assert_eq!(OrbitPlane::Yz.out_of_plane(v), 1.0);
        assert_eq!(OrbitPlane::Zx.out_of_plane(v), 2.0);
    }

    #[test]
    fn test_with_in_plane_round_trips() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        for plane in [OrbitPlane::Xy, OrbitPlane::Yz, OrbitPlane::Zx] {
            let rebuilt = plane.with_in_plane(v, plane.in_plane(v));
            assert_eq!(rebuilt, v);
            // Out-of-plane component survives a rewrite
            let moved = plane.with_in_plane(v, Vec2::new(9.0, 9.0));
            assert_eq!(plane.out_of_plane(moved), plane.out_of_plane(v));
        }
    }

    #[test]
    fn test_signed_angle_quadrants() {
        let reference = Vec2::new(10.0, 0.0);
        assert_relative_eq!(
            signed_angle_deg(Vec2::new(5.0, 0.0), reference).unwrap(),
            0.0
        );
        assert_relative_eq!(
            signed_angle_deg(Vec2::new(0.0, 5.0), reference).unwrap(),
            90.0
        );
        assert_relative_eq!(
            signed_angle_deg(Vec2::new(0.0, -5.0), reference).unwrap(),
            -90.0
        );
        assert_relative_eq!(
            signed_angle_deg(Vec2::new(-5.0, 0.0), reference).unwrap(),
            180.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_signed_angle_degenerate() {
        assert!(signed_angle_deg(Vec2::ZERO, Vec2::new(1.0, 0.0)).is_none());
        assert!(signed_angle_deg(Vec2::new(1.0, 0.0), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_orbit_step_advances_angle() {
        let config = ShowConfig::default();
        let mut position = Vec3::new(10.0, 0.0, 50.0);
        assert!(orbit_step(&mut position, OrbitPlane::Xy, 1.0, &config));

        let expected = 1.0_f32.to_radians();
        assert_relative_eq!(position.x, 10.0 * expected.cos(), epsilon = 1e-4);
        assert_relative_eq!(position.y, 10.0 * expected.sin(), epsilon = 1e-4);
        assert_eq!(position.z, 50.0);
    }

    #[test]
    fn test_orbit_step_negative_rate_goes_the_other_way() {
        let config = ShowConfig::default();
        let mut position = Vec3::new(10.0, 0.0, 50.0);
        assert!(orbit_step(&mut position, OrbitPlane::Xy, -1.0, &config));
        assert!(position.y < 0.0);
    }

    #[test]
    fn test_orbit_step_holds_rally_distance() {
        let config = ShowConfig::default();
        // Slightly off the sphere at entry; the first step snaps onto it
        let mut position = Vec3::new(10.05, 0.0, 50.0);
        for _ in 0..720 {
            assert!(orbit_step(&mut position, OrbitPlane::Xy, 0.8, &config));
            assert_relative_eq!(
                position.distance(config.rally_point),
                config.safe_radius,
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn test_orbit_step_shrinks_radius_off_equator() {
        let config = ShowConfig::default();
        // 6m above the plane through the rally point: in-plane radius is 8
        let mut position = Vec3::new(9.0, 0.0, 56.0);
        assert!(orbit_step(&mut position, OrbitPlane::Xy, 1.0, &config));
        assert_eq!(position.z, 56.0);
        let in_plane = Vec2::new(position.x, position.y);
        assert_relative_eq!(in_plane.length(), 8.0, epsilon = 1e-4);
        assert_relative_eq!(
            position.distance(config.rally_point),
            config.safe_radius,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_orbit_step_degenerate_beyond_sphere() {
        let config = ShowConfig::default();
        // Out-of-plane offset bigger than the sphere: no circle exists
        let mut position = Vec3::new(0.1, 0.2, 65.0);
        let before = position;
        assert!(!orbit_step(&mut position, OrbitPlane::Xy, 1.0, &config));
        assert_eq!(position, before);
    }

    #[test]
    fn test_orbit_step_other_planes_keep_out_of_plane_axis() {
        let config = ShowConfig::default();
        let mut position = Vec3::new(0.0, 0.0, 60.0);
        assert!(orbit_step(&mut position, OrbitPlane::Yz, 1.0, &config));
        // Yz orbits over (z, y); x must not move
        assert_eq!(position.x, 0.0);
        assert_relative_eq!(
            position.distance(config.rally_point),
            config.safe_radius,
            epsilon = 1e-3
        );

        let mut position = Vec3::new(0.0, 0.0, 60.0);
        assert!(orbit_step(&mut position, OrbitPlane::Zx, 1.0, &config));
        assert_eq!(position.y, 0.0);
    }
}
