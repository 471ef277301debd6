use thiserror::Error;

use crate::api::types::BallId;

/// Everything that can go wrong while stepping or configuring a table.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A single tick kept producing new contacts. The table state is left as
    /// it was after the last resolved contact.
    #[error("depth exceeded resolving collisions ({depth} passes at dt={dt})")]
    ResolutionDepthExceeded { depth: u32, dt: f64 },

    #[error("cushion solver found no solution after {steps} substeps")]
    CushionSolverDiverged { steps: u32 },

    #[error("invalid simulation config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid table snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("{0} is not on this table")]
    UnknownBall(BallId),

    #[error("a table needs at least one ball")]
    EmptyTable,

    #[error("position list has {got} values, table needs {expected}")]
    ShortSnapshotLength { expected: usize, got: usize },

    /// Returned by every frame after a failed tick until the simulation is reset.
    #[error("simulation halted: {0}")]
    Halted(String),
}
