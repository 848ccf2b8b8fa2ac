//! Show-wide physical and timing parameters
//!
//! One `ShowConfig` describes everything about how a show flies: the rally
//! point the drones converge on, the thrust budget they climb with, the
//! speed caps for each flight phase, and the cadence of the per-drone and
//! central loops. The same config is shared (behind an `Arc`) by every
//! drone scheduler thread and by the central coordinator.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for a single drone show.
///
/// All distances are meters, speeds meters/second, forces newtons and
/// durations seconds. Loaded from JSON by the headless host or built in
/// code; missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Point in world space the drones converge on and orbit around
    pub rally_point: Vec3,
    /// Thrust each drone's motors can produce (newtons)
    pub thrust: f32,
    /// Constant pull the thrust must overcome (newtons).
    /// The net climb force is `thrust - counter_pull`, aimed at the rally point.
    pub counter_pull: f32,
    /// Drone mass (kilograms)
    pub mass: f32,
    /// Radius of the orbit sphere around the rally point (meters)
    pub safe_radius: f32,
    /// Speed cap during the initial climb, before first rally arrival (m/s)
    pub rise_speed_cap: f32,
    /// Speed cap after first rally arrival, including collision recovery (m/s)
    pub cruise_speed_cap: f32,
    /// Scale on the orbit angle advanced per tick (1.0 = nominal rate)
    pub frame_speed: f32,
    /// Bounding sphere radius used for drone-to-drone collision checks (meters)
    pub collision_radius: f32,
    /// Coordinator passes a drone stays collision-immune after a hit
    pub collision_cooldown_passes: u32,
    /// Per-axis offset applied to push a colliding pair apart (meters)
    pub separation_nudge: f32,
    /// Stillness period before the drones start flying (seconds)
    pub warmup_seconds: f32,
    /// Per-drone update interval; also the integration step dt (seconds)
    pub tick_seconds: f32,
    /// Central loop interval between collision sweeps (seconds)
    pub pass_seconds: f32,
    /// How long the full formation must hold orbit before the show ends (seconds)
    pub completion_hold_seconds: f32,
    /// Pin each drone scheduler thread to its own core (skips core 0)
    pub pin_unit_threads: bool,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            rally_point: Vec3::new(0.0, 0.0, 50.0),
            thrust: 20.0,        // 2:1 thrust to pull ratio
            counter_pull: 10.0,
            mass: 1.0,
            safe_radius: 10.0,
            rise_speed_cap: 2.0, // Slow climb so the field lifts off together
            cruise_speed_cap: 10.0,
            frame_speed: 1.0,
            collision_radius: 1.0,
            collision_cooldown_passes: 20,
            separation_nudge: 0.2,
            warmup_seconds: 5.0,
            tick_seconds: 0.01,
            pass_seconds: 0.015,
            completion_hold_seconds: 60.0,
            pin_unit_threads: false,
        }
    }
}

impl ShowConfig {
    /// Config for deterministic tests: no warm-up, no completion hold.
    ///
    /// Physics parameters are unchanged, so motion behaves exactly like the
    /// real show; only the waiting periods are removed.
    pub fn instant() -> Self {
        Self {
            warmup_seconds: 0.0,
            completion_hold_seconds: 0.0,
            ..Self::default()
        }
    }

    /// Warm-up period as a `Duration`. Negative values read as zero.
    pub fn warmup(&self) -> Duration {
        Duration::from_secs_f32(self.warmup_seconds.max(0.0))
    }

    /// Per-drone tick interval as a `Duration`. Negative values read as zero.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(self.tick_seconds.max(0.0))
    }

    /// Central loop interval as a `Duration`. Negative values read as zero.
    pub fn pass_interval(&self) -> Duration {
        Duration::from_secs_f32(self.pass_seconds.max(0.0))
    }

    /// Completion hold as a `Duration`. Negative values read as zero.
    pub fn completion_hold(&self) -> Duration {
        Duration::from_secs_f32(self.completion_hold_seconds.max(0.0))
    }

    /// Net upward force budget once the constant pull is countered (newtons).
    pub fn net_thrust(&self) -> f32 {
        self.thrust - self.counter_pull
    }
}
