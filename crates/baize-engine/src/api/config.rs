use serde::{Deserialize, Serialize};

use crate::api::error::PhysicsError;
use crate::core::constants::PhysicsConstants;
use crate::physics::cushion::CushionModel;

/// Simulation configuration. Hosts usually load it from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed physics tick in seconds.
    pub fixed_dt: f64,
    /// Maximum ticks per host frame. `None` runs every due tick.
    pub step_cap: Option<u32>,
    /// Cushion response model.
    pub cushion_model: CushionModel,
    /// Physical constants.
    pub constants: PhysicsConstants,
    /// Table layout options.
    pub table: TableConfig,
    /// Maximum balls the render buffer is sized for.
    pub max_balls: usize,
    /// Maximum outcome records kept per frame for the host.
    pub max_outcomes: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 0.002,
            step_cap: None,
            cushion_model: CushionModel::default(),
            constants: PhysicsConstants::default(),
            table: TableConfig::default(),
            max_balls: 22,
            max_outcomes: 64,
        }
    }
}

impl SimConfig {
    /// Parse from JSON; any field may be omitted.
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        serde_json::from_str(json).map_err(PhysicsError::Config)
    }
}

/// Table shape options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Pocketed table. Carom tables have continuous rails and no knuckles.
    pub has_pockets: bool,
    /// Half-length of the reachable cloth in ball radii.
    pub half_length_radii: f64,
    /// Half-width of the reachable cloth in ball radii.
    pub half_width_radii: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            has_pockets: true,
            half_length_radii: 43.0,
            half_width_radii: 21.0,
        }
    }
}
