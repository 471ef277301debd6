pub mod api;
pub mod core;
pub mod physics;
pub mod model;
pub mod bridge;

// Re-export key types at crate root for convenience
pub use api::config::{SimConfig, TableConfig};
pub use api::error::PhysicsError;
pub use api::simulation::Simulation;
pub use api::types::{BallId, BallState, PocketId};
pub use core::constants::PhysicsConstants;
pub use core::time::FixedTimestep;
pub use physics::cushion::CushionModel;
pub use physics::kinematics::BodyKinematics;
pub use model::ball::Ball;
pub use model::cue::CueStrike;
pub use model::geometry::{PocketGeometry, TableGeometry};
pub use model::outcome::{Outcome, OutcomeKind};
pub use model::rack::{Layout, Rack};
pub use model::snapshot::{BallSnapshot, TableSnapshot};
pub use model::table::Table;
pub use bridge::instance::{BallInstance, OutcomeRecord, FrameBuffer};
pub use bridge::protocol::ProtocolLayout;
