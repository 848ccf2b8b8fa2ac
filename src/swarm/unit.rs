//! A single drone and its guarded flight state
//!
//! Each drone owns exactly one mutex around all of its mutable state. The
//! drone's scheduler thread ticks it, the central coordinator reads and
//! exchanges it, and host threads poll it through the same guard, so every
//! access path sees a consistent view. Pair-wise access for collision
//! handling goes through [`Unit::with_pair`], which takes both guards in a
//! canonical order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ShowConfig;
use crate::physics::energy::spin_from_speed;
use crate::physics::motion::{Kinematics, within_rally_band};
use crate::physics::orbit::{OrbitPlane, orbit_step};

/// Identity of a drone; also its slot index in the swarm registry.
pub type UnitId = usize;

/// Flight phase of one drone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightMode {
    /// Climbing toward the rally point, at launch or while recovering
    /// from a collision
    Approach,
    /// Circling the rally point at a signed rate (degrees per tick)
    Orbit { angular_velocity: f32 },
    /// Parked by an external halt order; no further motion
    Halted,
}

/// Everything mutable about a drone, held behind its guard as one block.
#[derive(Debug, Clone, Copy)]
pub struct UnitState {
    /// Position, velocity and last applied acceleration
    pub kin: Kinematics,
    /// Current flight phase
    pub mode: FlightMode,
    /// Plane this drone orbits in. Assigned at launch and exchanged on
    /// collision; stays meaningful through recovery so the drone knows
    /// which circle to rejoin.
    pub plane: OrbitPlane,
}

/// One drone in the show.
///
/// Shared between its scheduler thread, the central coordinator and any
/// host threads via `Arc`; all mutable state sits behind a single mutex.
#[derive(Debug)]
pub struct Unit {
    id: UnitId,
    config: Arc<ShowConfig>,
    state: Mutex<UnitState>,
    reached_rally: AtomicBool,
}

impl Unit {
    /// Build a drone parked at `position` in the given phase and plane.
    ///
    /// A drone created directly in orbit counts as having reached the
    /// rally already.
    pub fn new(
        id: UnitId,
        config: Arc<ShowConfig>,
        position: Vec3,
        mode: FlightMode,
        plane: OrbitPlane,
    ) -> Self {
        let reached = matches!(mode, FlightMode::Orbit { .. });
        Self {
            id,
            config,
            state: Mutex::new(UnitState {
                kin: Kinematics::at_rest(position),
                mode,
                plane,
            }),
            reached_rally: AtomicBool::new(reached),
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The show parameters this drone flies under.
    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Current position (meters). Takes the guard briefly.
    pub fn position(&self) -> Vec3 {
        self.lock_state().kin.position
    }

    /// Current velocity (m/s). Takes the guard briefly.
    pub fn velocity(&self) -> Vec3 {
        self.lock_state().kin.velocity
    }

    /// Acceleration applied on the most recent climb step (m/s²).
    pub fn acceleration(&self) -> Vec3 {
        self.lock_state().kin.acceleration
    }

    /// Current flight phase.
    pub fn mode(&self) -> FlightMode {
        self.lock_state().mode
    }

    /// Plane this drone orbits (or will rejoin) around the rally point.
    pub fn plane(&self) -> OrbitPlane {
        self.lock_state().plane
    }

    /// A consistent copy of the full state, read under one guard hold.
    pub fn state(&self) -> UnitState {
        *self.lock_state()
    }

    /// Whether this drone has ever arrived at the rally sphere.
    ///
    /// Set once on first arrival and never cleared, even through
    /// collisions and recovery climbs.
    pub fn has_reached_rally(&self) -> bool {
        self.reached_rally.load(Ordering::Relaxed)
    }

    /// Park the drone where it is. It stops moving but keeps answering
    /// state queries.
    pub fn halt(&self) {
        let mut state = self.lock_state();
        state.mode = FlightMode::Halted;
        debug!("drone {} halted at {}", self.id, state.kin.position);
    }

    /// Advance this drone by one update step of `dt` seconds.
    ///
    /// Called every tick by the drone's scheduler thread; hosts that do
    /// their own scheduling can call it directly instead. The whole step,
    /// including a possible phase transition, happens under one guard
    /// hold.
    pub fn tick(&self, dt: f32) {
        let config = &self.config;
        let mut guard = self.lock_state();
        let state = &mut *guard;

        match state.mode {
            FlightMode::Halted => {}
            FlightMode::Orbit { angular_velocity } => {
                orbit_step(&mut state.kin.position, state.plane, angular_velocity, config);
            }
            FlightMode::Approach => {
                let cap = if self.reached_rally.load(Ordering::Relaxed) {
                    config.cruise_speed_cap
                } else {
                    config.rise_speed_cap
                };
                state.kin.approach_step(config, cap, dt);

                if within_rally_band(state.kin.position, config.rally_point, config.safe_radius) {
                    self.reached_rally.store(true, Ordering::Relaxed);
                    let mut spin = spin_from_speed(state.kin.speed(), config);
                    // Arrivals on the rally point's far side circle the other way
                    if state.kin.position.x <= config.rally_point.x {
                        spin = -spin;
                    }
                    state.mode = FlightMode::Orbit {
                        angular_velocity: spin,
                    };
                    debug!(
                        "drone {} joined orbit in {:?} at {:.3} deg/tick",
                        self.id, state.plane, spin
                    );
                }
            }
        }
    }

    /// Run `f` with both drones' states locked at once.
    ///
    /// Guards are always acquired in ascending id order, and `f` receives
    /// the states in that same order regardless of argument order. Every
    /// two-drone operation must go through here; taking two guards by any
    /// other path risks a lock cycle.
    pub(crate) fn with_pair<R>(
        a: &Unit,
        b: &Unit,
        f: impl FnOnce(&mut UnitState, &mut UnitState) -> R,
    ) -> R {
        debug_assert_ne!(a.id, b.id, "a drone cannot pair with itself");
        let (lower, upper) = if a.id < b.id { (a, b) } else { (b, a) };
        let mut first = lower.lock_state();
        let mut second = upper.lock_state();
        f(&mut first, &mut second)
    }

    fn lock_state(&self) -> MutexGuard<'_, UnitState> {
        // Plain old data behind the lock; a poisoned guard is still valid state
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static_assertions::assert_impl_all!(Unit: Send, Sync);
