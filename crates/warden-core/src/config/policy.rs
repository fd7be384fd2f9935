//! Policy engine configuration.

use serde::{Deserialize, Serialize};

/// Policy enforcement engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Capacity of the background reload queue.
    #[serde(default = "default_reload_queue_size")]
    pub reload_queue_size: usize,
    /// Load the full rule set before the server starts accepting requests.
    #[serde(default = "default_true")]
    pub load_on_startup: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reload_queue_size: default_reload_queue_size(),
            load_on_startup: true,
        }
    }
}

fn default_reload_queue_size() -> usize {
    16
}

fn default_true() -> bool {
    true
}
