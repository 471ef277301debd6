use serde::{Deserialize, Serialize};

/// Stable identity of a ball on a table. Equal to its index in the table's
/// ball list, so it survives serialisation round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl BallId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ball#{}", self.0)
    }
}

/// Index of a pocket in the table's pocket geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PocketId(pub u32);

impl PocketId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Motion regime of a ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    #[default]
    Stationary,
    Rolling,
    Sliding,
    Falling,
    InPocket,
}

impl BallState {
    /// Wire code used by the flat render buffer.
    pub fn code(self) -> u32 {
        match self {
            BallState::Stationary => 0,
            BallState::Rolling => 1,
            BallState::Sliding => 2,
            BallState::Falling => 3,
            BallState::InPocket => 4,
        }
    }
}
