use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::types::BallId;

/// Saved state of one ball. Missing velocities restore as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub id: BallId,
    pub pos: DVec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vel: Option<DVec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rvel: Option<DVec3>,
}

/// Saved table: ball positions keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub balls: Vec<BallSnapshot>,
}

impl TableSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
