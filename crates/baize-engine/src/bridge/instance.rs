use bytemuck::{Pod, Zeroable};

use crate::bridge::protocol::{
    ProtocolLayout, BALL_FLOATS, HEADER_BALL_COUNT, HEADER_FLOATS, HEADER_FRAME_COUNTER,
    HEADER_HALTED, HEADER_MAX_BALLS, HEADER_MAX_OUTCOMES, HEADER_OUTCOME_COUNT,
    HEADER_PROTOCOL_VERSION, HEADER_SETTLED, OUTCOME_FLOATS, PROTOCOL_VERSION,
};
use crate::model::ball::Ball;
use crate::model::outcome::Outcome;
use crate::model::table::Table;

/// Per-ball render data. The host integrates orientation from the angular
/// velocity and keys meshes by id.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub id: f32,
    pub x: f32,
    pub y: f32,
    /// Below zero while falling or resting in a pocket.
    pub z: f32,
    pub wx: f32,
    pub wy: f32,
    pub wz: f32,
    /// `BallState::code`.
    pub state: f32,
}

impl BallInstance {
    pub const FLOATS: usize = BALL_FLOATS;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_ball(ball: &Ball) -> Self {
        Self {
            id: ball.id.0 as f32,
            x: ball.pos.x as f32,
            y: ball.pos.y as f32,
            z: ball.pos.z as f32,
            wx: ball.rvel.x as f32,
            wy: ball.rvel.y as f32,
            wz: ball.rvel.z as f32,
            state: ball.state.code() as f32,
        }
    }
}

/// One outcome: kind, ball_a, ball_b, incident speed.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OutcomeRecord {
    pub kind: f32,
    pub ball_a: f32,
    pub ball_b: f32,
    pub speed: f32,
}

impl OutcomeRecord {
    pub const FLOATS: usize = OUTCOME_FLOATS;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_outcome(outcome: &Outcome) -> Self {
        Self {
            kind: outcome.kind.code() as f32,
            ball_a: outcome.ball_a.0 as f32,
            ball_b: outcome.ball_b.0 as f32,
            speed: outcome.incident_speed as f32,
        }
    }
}

/// One captured frame, ready for the host to copy out of linear memory.
pub struct FrameBuffer {
    header: [f32; HEADER_FLOATS],
    balls: Vec<BallInstance>,
    outcomes: Vec<OutcomeRecord>,
    max_balls: usize,
    max_outcomes: usize,
    frame_counter: u32,
}

impl FrameBuffer {
    pub fn new(layout: &ProtocolLayout) -> Self {
        Self {
            header: [0.0; HEADER_FLOATS],
            balls: Vec::with_capacity(layout.max_balls),
            outcomes: Vec::with_capacity(layout.max_outcomes),
            max_balls: layout.max_balls,
            max_outcomes: layout.max_outcomes,
            frame_counter: 0,
        }
    }

    /// Replace the frame with the table's balls and the outcomes raised
    /// since the previous capture.
    pub fn capture(&mut self, table: &Table, outcomes: &[Outcome], halted: bool) {
        self.balls.clear();
        self.balls.extend(
            table
                .balls()
                .iter()
                .take(self.max_balls)
                .map(BallInstance::from_ball),
        );
        if table.balls().len() > self.max_balls {
            log::warn!(
                "frame holds {} balls, table has {}",
                self.max_balls,
                table.balls().len()
            );
        }

        self.outcomes.clear();
        self.outcomes.extend(
            outcomes
                .iter()
                .take(self.max_outcomes)
                .map(OutcomeRecord::from_outcome),
        );
        if outcomes.len() > self.max_outcomes {
            log::warn!(
                "dropped {} outcomes past frame capacity {}",
                outcomes.len() - self.max_outcomes,
                self.max_outcomes
            );
        }

        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.header = [0.0; HEADER_FLOATS];
        self.header[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        self.header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        self.header[HEADER_MAX_BALLS] = self.max_balls as f32;
        self.header[HEADER_BALL_COUNT] = self.balls.len() as f32;
        self.header[HEADER_MAX_OUTCOMES] = self.max_outcomes as f32;
        self.header[HEADER_OUTCOME_COUNT] = self.outcomes.len() as f32;
        self.header[HEADER_SETTLED] = if table.all_stationary() { 1.0 } else { 0.0 };
        self.header[HEADER_HALTED] = if halted { 1.0 } else { 0.0 };
    }

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn balls(&self) -> &[BallInstance] {
        &self.balls
    }

    pub fn outcomes(&self) -> &[OutcomeRecord] {
        &self.outcomes
    }

    pub fn ball_count(&self) -> u32 {
        self.balls.len() as u32
    }

    pub fn outcome_count(&self) -> u32 {
        self.outcomes.len() as u32
    }

    /// Raw pointer to the header floats.
    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    /// Raw pointer to ball data, `ball_count() * BallInstance::FLOATS` floats.
    pub fn balls_ptr(&self) -> *const f32 {
        self.balls.as_ptr() as *const f32
    }

    /// Raw pointer to outcome data, `outcome_count() * OutcomeRecord::FLOATS` floats.
    pub fn outcomes_ptr(&self) -> *const f32 {
        self.outcomes.as_ptr() as *const f32
    }

    /// The whole frame flattened in protocol order.
    pub fn to_floats(&self) -> Vec<f32> {
        let ball_end = HEADER_FLOATS + self.max_balls * BallInstance::FLOATS;
        let total = ball_end + self.max_outcomes * OutcomeRecord::FLOATS;
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&self.header);
        out.extend_from_slice(bytemuck::cast_slice(&self.balls));
        out.resize(ball_end, 0.0);
        out.extend_from_slice(bytemuck::cast_slice(&self.outcomes));
        out.resize(total, 0.0);
        out
    }
}
