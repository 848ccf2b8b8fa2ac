//! Drone Show Core
//!
//! A concurrent drone light show simulation. A field of autonomous drones
//! lifts off, converges on a rally point, falls into interleaved circular
//! orbits on a safety sphere around it, and trades orbits whenever two
//! drones clip each other, until the full formation has held the sphere
//! long enough to call the show complete.
//!
//! Every drone runs on its own scheduler thread against its own guarded
//! state; the host keeps one loop of its own for the central collision
//! sweep and the completion clock.
//!
//! # Modules
//!
//! - [`config`] - Show parameters and the launch formation grid
//! - [`physics`] - Climb integration, orbit stepping, energy conversion
//! - [`swarm`] - Drones, scheduler threads, collision and completion
//!
//! # Example
//!
//! ```ignore
//! use drone_show_core::{FormationConfig, ShowConfig, Swarm};
//!
//! let config = ShowConfig::default();
//! let formation = FormationConfig::default();
//! let mut swarm = Swarm::new(config, formation.unit_count());
//! swarm.spawn_formation(&formation)?;
//!
//! // Host loop: sweep for collisions until the show completes
//! loop {
//!     std::thread::sleep(swarm.config().pass_interval());
//!     swarm.run_collision_pass();
//!     if swarm.check_completion() {
//!         break;
//!     }
//! }
//!
//! swarm.request_stop();
//! swarm.join_all()?;
//! ```

pub mod config;
pub mod physics;
pub mod swarm;

// Re-export the host-facing surface at crate level for convenience
pub use config::{FormationConfig, ShowConfig};
pub use physics::{Kinematics, OrbitPlane};
pub use swarm::{
    CollisionEvent, FlightMode, ShowSnapshot, Swarm, SwarmError, UnitHandle, UnitId, UnitSnapshot,
};
