//! Swarm Module
//!
//! The concurrent heart of the show. A [`Swarm`] owns a fixed-size registry
//! of drones, one scheduler thread per drone, a single stop flag shared by
//! all of them, and the central collision and completion machinery that the
//! host's own loop drives between frames.
//!
//! # Threading model
//!
//! - Each drone mutates only its own state, on its own thread, under its
//!   own guard.
//! - The central loop (wherever the host runs it) is the only place that
//!   touches two drones at once, always through the canonical pair lock.
//! - Hosts read state through cheap cloneable [`UnitHandle`]s or whole
//!   [`ShowSnapshot`]s at any time, from any thread.
//!
//! # Submodules
//!
//! - [`unit`] - One drone: guarded state, tick, phase transitions
//! - [`collision`] - Central pair sweep, orbit exchange, cooldowns
//! - [`completion`] - All-reached detection and the end-of-show hold
//! - [`snapshot`] - Plain serializable state views for hosts

pub mod collision;
pub mod completion;
pub(crate) mod scheduler;
pub mod snapshot;
pub mod unit;

pub use collision::{CollisionCoordinator, CollisionEvent, ORBIT_BAND_MARGIN};
pub use completion::CompletionMonitor;
pub use snapshot::{ShowSnapshot, UnitSnapshot};
pub use unit::{FlightMode, Unit, UnitId, UnitState};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;

use glam::Vec3;
use log::{debug, info};
use static_assertions::assert_impl_all;
use thiserror::Error;

use crate::config::{FormationConfig, ShowConfig};
use crate::physics::orbit::OrbitPlane;

/// Errors from swarm construction and teardown.
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("unit index {index} is outside the swarm capacity {capacity}")]
    IndexOutOfRange { index: UnitId, capacity: usize },
    #[error("unit index {0} is already occupied")]
    IndexInUse(UnitId),
    #[error("swarm is stopping, no new drones may launch")]
    Stopping,
    #[error("failed to spawn the scheduler thread for drone {id}")]
    ThreadSpawn {
        id: UnitId,
        #[source]
        source: std::io::Error,
    },
    #[error("drone {0} scheduler thread panicked")]
    UnitPanicked(UnitId),
}

/// Cheap cloneable reference to one drone in a swarm.
///
/// Handles stay valid for the life of the drone and work from any thread.
/// Every accessor takes the drone's guard just long enough to copy a field.
#[derive(Debug, Clone)]
pub struct UnitHandle {
    unit: Arc<Unit>,
}

impl UnitHandle {
    pub fn id(&self) -> UnitId {
        self.unit.id()
    }

    /// Current position (meters).
    pub fn position(&self) -> Vec3 {
        self.unit.position()
    }

    /// Current velocity (m/s).
    pub fn velocity(&self) -> Vec3 {
        self.unit.velocity()
    }

    /// Current flight phase.
    pub fn mode(&self) -> FlightMode {
        self.unit.mode()
    }

    /// Plane this drone orbits (or will rejoin) around the rally point.
    pub fn plane(&self) -> OrbitPlane {
        self.unit.plane()
    }

    /// Whether this drone has ever arrived at the rally sphere.
    pub fn has_reached_rally(&self) -> bool {
        self.unit.has_reached_rally()
    }

    /// A consistent copy of the full state, read under one guard hold.
    pub fn state(&self) -> UnitState {
        self.unit.state()
    }

    /// Park the drone where it is.
    pub fn halt(&self) {
        self.unit.halt();
    }

    /// Advance the drone one update step manually.
    ///
    /// For hosts that drive their own scheduling instead of the built-in
    /// threads; the scheduler calls the same update.
    pub fn step(&self, dt: f32) {
        self.unit.tick(dt);
    }
}

struct Slot {
    unit: Arc<Unit>,
    thread: Option<JoinHandle<()>>,
}

/// A full drone show: the drone registry, their scheduler threads, and the
/// central collision and completion machinery.
///
/// Capacity is fixed at construction; drones launch into numbered slots.
/// The host drives [`Swarm::run_collision_pass`] and
/// [`Swarm::check_completion`] from its own loop, then tears everything
/// down with [`Swarm::request_stop`] and [`Swarm::join_all`].
pub struct Swarm {
    config: Arc<ShowConfig>,
    slots: Vec<Option<Slot>>,
    stop: Arc<AtomicBool>,
    coordinator: CollisionCoordinator,
    completion: CompletionMonitor,
}

impl Swarm {
    /// An empty swarm with `capacity` launch slots flying under `config`.
    pub fn new(config: ShowConfig, capacity: usize) -> Self {
        let completion = CompletionMonitor::new(config.completion_hold());
        Self {
            config: Arc::new(config),
            slots: (0..capacity).map(|_| None).collect(),
            stop: Arc::new(AtomicBool::new(false)),
            coordinator: CollisionCoordinator::new(capacity),
            completion,
        }
    }

    /// The show parameters every drone flies under.
    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Number of launch slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of drones launched so far.
    pub fn unit_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Handle to the drone in slot `id`, if one has launched.
    pub fn handle(&self, id: UnitId) -> Option<UnitHandle> {
        let slot = self.slots.get(id)?.as_ref()?;
        Some(UnitHandle {
            unit: Arc::clone(&slot.unit),
        })
    }

    /// Launch one drone into slot `id` and start its scheduler thread.
    ///
    /// The drone begins in `mode` at `position`; its thread sits out the
    /// configured warm-up before the first tick.
    pub fn spawn_unit(
        &mut self,
        id: UnitId,
        position: Vec3,
        mode: FlightMode,
        plane: OrbitPlane,
    ) -> Result<UnitHandle, SwarmError> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(SwarmError::Stopping);
        }
        let capacity = self.slots.len();
        let Some(slot) = self.slots.get_mut(id) else {
            return Err(SwarmError::IndexOutOfRange {
                index: id,
                capacity,
            });
        };
        if slot.is_some() {
            return Err(SwarmError::IndexInUse(id));
        }

        let unit = Arc::new(Unit::new(
            id,
            Arc::clone(&self.config),
            position,
            mode,
            plane,
        ));
        let thread = scheduler::spawn_scheduler(Arc::clone(&unit), Arc::clone(&self.stop))
            .map_err(|source| SwarmError::ThreadSpawn { id, source })?;
        *slot = Some(Slot {
            unit: Arc::clone(&unit),
            thread: Some(thread),
        });
        debug!("drone {id} launched at {position}");
        Ok(UnitHandle { unit })
    }

    /// Launch a whole formation into slots `0..n`, approach phase, planes
    /// assigned round-robin by slot.
    pub fn spawn_formation(
        &mut self,
        formation: &FormationConfig,
    ) -> Result<Vec<UnitHandle>, SwarmError> {
        let positions = formation.launch_positions();
        let mut handles = Vec::with_capacity(positions.len());
        for (id, position) in positions.into_iter().enumerate() {
            handles.push(self.spawn_unit(
                id,
                position,
                FlightMode::Approach,
                OrbitPlane::from_index(id),
            )?);
        }
        info!(
            "formation of {} drones launched toward {}",
            handles.len(),
            self.config.rally_point
        );
        Ok(handles)
    }

    /// Run one central collision pass over every launched drone.
    pub fn run_collision_pass(&mut self) -> Vec<CollisionEvent> {
        let units: Vec<Arc<Unit>> = self
            .slots
            .iter()
            .flatten()
            .map(|slot| Arc::clone(&slot.unit))
            .collect();
        self.coordinator.run(&units, &self.config)
    }

    /// True once every launched drone has reached the rally sphere at
    /// least once. An empty swarm is never all-reached.
    pub fn all_reached(&self) -> bool {
        self.unit_count() > 0
            && self
                .slots
                .iter()
                .flatten()
                .all(|slot| slot.unit.has_reached_rally())
    }

    /// Feed the completion monitor; returns true once the show is over.
    ///
    /// Call after each collision pass.
    pub fn check_completion(&mut self) -> bool {
        let all = self.all_reached();
        self.completion.observe(all)
    }

    /// When the full formation was first seen on the sphere, if yet.
    pub fn formation_since(&self) -> Option<Instant> {
        self.completion.formation_since()
    }

    /// Capture the whole swarm's state for a host.
    pub fn snapshot(&self) -> ShowSnapshot {
        let units = self
            .slots
            .iter()
            .flatten()
            .map(|slot| {
                let state = slot.unit.state();
                UnitSnapshot {
                    id: slot.unit.id(),
                    position: state.kin.position,
                    velocity: state.kin.velocity,
                    mode: state.mode,
                    plane: state.plane,
                    reached_rally: slot.unit.has_reached_rally(),
                }
            })
            .collect();
        ShowSnapshot {
            units,
            all_reached: self.all_reached(),
        }
    }

    /// Raise the swarm-wide stop flag. Every scheduler thread observes it
    /// within about one tick interval. Idempotent.
    pub fn request_stop(&self) {
        if !self.stop.swap(true, Ordering::Relaxed) {
            info!("stop requested, drones landing");
        }
    }

    /// Stop the show and wait for every scheduler thread to exit.
    ///
    /// Raises the stop flag itself, so a lone `join_all` can never block
    /// on threads that were never told to stop. Returns the first thread
    /// panic found, after all threads have been joined.
    pub fn join_all(&mut self) -> Result<(), SwarmError> {
        self.request_stop();
        let mut first_panic = None;
        for slot in self.slots.iter_mut().flatten() {
            if let Some(thread) = slot.thread.take()
                && thread.join().is_err()
                && first_panic.is_none()
            {
                first_panic = Some(SwarmError::UnitPanicked(slot.unit.id()));
            }
        }
        match first_panic {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Drop for Swarm {
    fn drop(&mut self) {
        let _ = self.join_all();
    }
}

assert_impl_all!(Swarm: Send);
assert_impl_all!(UnitHandle: Send, Sync);
assert_impl_all!(CollisionEvent: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    /// Threads park in warm-up, so tests fully control state.
    fn parked_config() -> ShowConfig {
        ShowConfig {
            warmup_seconds: 3600.0,
            ..ShowConfig::default()
        }
    }

    #[test]
    fn test_spawn_rejects_out_of_range_slot() {
        let mut swarm = Swarm::new(parked_config(), 2);
        let err = swarm
            .spawn_unit(5, Vec3::ZERO, FlightMode::Approach, OrbitPlane::Xy)
            .unwrap_err();
        assert!(matches!(
            err,
            SwarmError::IndexOutOfRange {
                index: 5,
                capacity: 2
            }
        ));
    }

    #[test]
    fn test_spawn_rejects_occupied_slot() {
        let mut swarm = Swarm::new(parked_config(), 2);
        swarm
            .spawn_unit(0, Vec3::ZERO, FlightMode::Approach, OrbitPlane::Xy)
            .unwrap();
        let err = swarm
            .spawn_unit(0, Vec3::ONE, FlightMode::Approach, OrbitPlane::Yz)
            .unwrap_err();
        assert!(matches!(err, SwarmError::IndexInUse(0)));
        assert_eq!(swarm.unit_count(), 1);
    }

    #[test]
    fn test_spawn_rejects_after_stop() {
        let mut swarm = Swarm::new(parked_config(), 2);
        swarm.request_stop();
        let err = swarm
            .spawn_unit(0, Vec3::ZERO, FlightMode::Approach, OrbitPlane::Xy)
            .unwrap_err();
        assert!(matches!(err, SwarmError::Stopping));
    }

    #[test]
    fn test_empty_swarm_is_never_all_reached() {
        let mut swarm = Swarm::new(ShowConfig::instant(), 4);
        assert!(!swarm.all_reached());
        // Even with a zero hold, no drones means no completion
        assert!(!swarm.check_completion());
    }

    #[test]
    fn test_handle_lookup() {
        let mut swarm = Swarm::new(parked_config(), 3);
        swarm
            .spawn_unit(1, Vec3::new(4.0, 0.0, 1.0), FlightMode::Approach, OrbitPlane::Yz)
            .unwrap();
        assert!(swarm.handle(0).is_none());
        assert!(swarm.handle(9).is_none());
        let handle = swarm.handle(1).unwrap();
        assert_eq!(handle.id(), 1);
        assert_eq!(handle.position(), Vec3::new(4.0, 0.0, 1.0));
    }

    #[test]
    fn test_join_all_without_explicit_stop_returns() {
        let mut swarm = Swarm::new(parked_config(), 2);
        swarm
            .spawn_unit(0, Vec3::ZERO, FlightMode::Approach, OrbitPlane::Xy)
            .unwrap();
        swarm
            .spawn_unit(1, Vec3::ONE, FlightMode::Approach, OrbitPlane::Yz)
            .unwrap();
        // join_all raises the flag itself; this must not hang
        swarm.join_all().unwrap();
        assert_eq!(swarm.unit_count(), 2);
    }
}
