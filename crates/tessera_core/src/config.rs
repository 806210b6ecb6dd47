//! Registry configuration

use serde::{Deserialize, Serialize};

/// Tunables for a [`Registry`](crate::ecs::Registry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Elements reserved by the first allocation of each component storage.
    pub initial_component_capacity: usize,
    /// Time every component type during the update pass.
    pub profile_updates: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_component_capacity: 1,
            profile_updates: true,
        }
    }
}
