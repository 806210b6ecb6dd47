//! Tessera Core
//!
//! The entity/component storage engine underneath the simulation loop:
//! - Namespaced entity identity
//! - Bucketed entity slots and packed per-type component arrays
//! - The ordered per-frame update pass
//! - Pose math and the fixed-rate frame clock

pub mod config;
pub mod ecs;
pub mod math;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
