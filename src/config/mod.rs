//! Config Module
//!
//! Centralized configuration for show physics, timing and the launch grid.

pub mod formation;
pub mod show_config;

pub use formation::FormationConfig;
pub use show_config::ShowConfig;
