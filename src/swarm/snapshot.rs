//! Read-only state snapshots for hosts
//!
//! A renderer, recorder or test harness polls the swarm once per frame and
//! gets back plain serializable data, so host-side code never touches the
//! drones' guards for longer than a field copy.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::orbit::OrbitPlane;
use crate::swarm::unit::{FlightMode, UnitId};

/// One drone's state as seen at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mode: FlightMode,
    pub plane: OrbitPlane,
    pub reached_rally: bool,
}

/// Full swarm state at one instant.
///
/// Each drone's entry is internally consistent, read under its own guard.
/// Entries for different drones may be a tick apart, since the show keeps
/// flying while the snapshot is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSnapshot {
    pub units: Vec<UnitSnapshot>,
    /// Whether every drone had reached the rally sphere at capture time
    pub all_reached: bool,
}

impl ShowSnapshot {
    /// Serialize to a JSON string for logging or piping to another tool.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
