//! Central collision sweep and orbit exchange
//!
//! Drones never look at each other; all pair-wise handling happens here,
//! on whichever thread drives the central loop. Each pass walks every
//! drone pair once, and a hit makes the pair trade orbits: spins and
//! planes swap, both drones get an energy-derived escape velocity, fall
//! back into the approach phase and are pushed apart so the next pass
//! does not see the same overlap.

use std::mem;
use std::sync::Arc;

use glam::Vec3;
use log::info;

use crate::config::ShowConfig;
use crate::physics::energy::recovery_velocity;
use crate::physics::motion::within_rally_band;
use crate::swarm::unit::{FlightMode, Unit, UnitId};

/// Margin beyond the safe radius inside which a pair still counts as
/// orbit traffic (meters). Drones further out are launch or recovery
/// transits and never collide.
pub const ORBIT_BAND_MARGIN: f32 = 1.0;

/// Record of one handled collision, in the order the sweep found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Lower-id drone of the pair
    pub first: UnitId,
    /// Higher-id drone of the pair
    pub second: UnitId,
    /// Center distance when the hit was detected (meters)
    pub distance: f32,
}

/// The central collision pass over all drones.
///
/// Keeps the per-drone cooldown counters between passes; a drone that just
/// collided is immune until its counter runs out, so one physical crossing
/// cannot cascade into a burst of exchanges.
pub struct CollisionCoordinator {
    cooldowns: Vec<u32>,
}

impl CollisionCoordinator {
    /// Coordinator for a swarm of at most `capacity` drones.
    pub fn new(capacity: usize) -> Self {
        Self {
            cooldowns: vec![0; capacity],
        }
    }

    /// Sweep every drone pair once and handle all hits found.
    ///
    /// A pair collides when the drones' centers are closer than the
    /// collision radius, both sit inside the orbit band around the rally
    /// point, neither is on cooldown or already handled this pass, and
    /// both are actually orbiting. After the sweep every cooldown ticks
    /// down by one.
    pub fn run(&mut self, units: &[Arc<Unit>], config: &ShowConfig) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let mut hit_this_pass = vec![false; self.cooldowns.len()];
        let band = config.safe_radius + ORBIT_BAND_MARGIN;

        for (i, a) in units.iter().enumerate() {
            if hit_this_pass[a.id()] || self.cooldowns[a.id()] > 0 {
                continue;
            }
            let a_position = a.position();
            for b in &units[i + 1..] {
                if hit_this_pass[b.id()] || self.cooldowns[b.id()] > 0 {
                    continue;
                }
                let b_position = b.position();
                let distance = a_position.distance(b_position);
                if distance >= config.collision_radius {
                    continue;
                }
                if !within_rally_band(a_position, config.rally_point, band)
                    || !within_rally_band(b_position, config.rally_point, band)
                {
                    continue;
                }
                if !exchange_orbits(a, b, config) {
                    continue;
                }

                hit_this_pass[a.id()] = true;
                hit_this_pass[b.id()] = true;
                self.cooldowns[a.id()] = config.collision_cooldown_passes;
                self.cooldowns[b.id()] = config.collision_cooldown_passes;
                info!(
                    "drones {} and {} collided {distance:.2}m apart, orbits exchanged",
                    a.id(),
                    b.id()
                );
                events.push(CollisionEvent {
                    first: a.id().min(b.id()),
                    second: a.id().max(b.id()),
                    distance,
                });
                // This drone is done for the pass
                break;
            }
        }

        for cooldown in &mut self.cooldowns {
            *cooldown = cooldown.saturating_sub(1);
        }
        events
    }
}

/// Trade orbits between a colliding pair, as one critical section.
///
/// Both guards are taken through [`Unit::with_pair`], so the exchange is
/// atomic with respect to the drones' own ticks: spins and planes swap,
/// each drone's velocity is re-derived from the spin it received, both
/// fall back to approach and the pair is pushed apart.
///
/// Returns false, changing nothing, unless both drones are orbiting; a
/// drone still climbing out of an earlier collision has no orbit to trade.
pub(crate) fn exchange_orbits(a: &Unit, b: &Unit, config: &ShowConfig) -> bool {
    Unit::with_pair(a, b, |first, second| {
        let (
            FlightMode::Orbit {
                angular_velocity: first_spin,
            },
            FlightMode::Orbit {
                angular_velocity: second_spin,
            },
        ) = (first.mode, second.mode)
        else {
            return false;
        };

        mem::swap(&mut first.plane, &mut second.plane);
        first.kin.velocity =
            recovery_velocity(first.kin.position, first.plane, second_spin, config);
        second.kin.velocity =
            recovery_velocity(second.kin.position, second.plane, first_spin, config);
        first.mode = FlightMode::Approach;
        second.mode = FlightMode::Approach;

        separate_axes(
            &mut first.kin.position,
            &mut second.kin.position,
            config.separation_nudge,
        );
        true
    })
}

/// Push two overlapping drones `nudge` meters apart on every axis.
///
/// Each axis is touched exactly once per drone, directions chosen by the
/// drones' current ordering on that axis (ties push the first drone up).
pub(crate) fn separate_axes(a: &mut Vec3, b: &mut Vec3, nudge: f32) {
    for axis in 0..3 {
        if a[axis] < b[axis] {
            a[axis] -= nudge;
            b[axis] += nudge;
        } else {
            a[axis] += nudge;
            b[axis] -= nudge;
        }
    }
}
