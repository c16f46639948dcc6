//! Scenario file schema.

use ds_sim::PlantConfig;
use serde::{Deserialize, Serialize};

/// A named plant configuration, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub plant: PlantConfig,
}
