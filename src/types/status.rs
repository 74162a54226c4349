//! Engine status reporting

use serde::{Deserialize, Serialize};

/// Snapshot of the engine's externally visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub running: bool,
    pub initialized: bool,
    pub opportunity_count: usize,
}
