/// Flat frame layout shared with the host renderer.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Balls: max_balls × 8 floats]
/// [Outcomes: max_outcomes × 4 floats]
/// ```
///
/// Capacities are written into the header so the host can compute offsets
/// without a compiled-in copy of the config.

use crate::api::config::SimConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_BALLS: usize = 2;
pub const HEADER_BALL_COUNT: usize = 3;
pub const HEADER_MAX_OUTCOMES: usize = 4;
pub const HEADER_OUTCOME_COUNT: usize = 5;
pub const HEADER_SETTLED: usize = 6;
pub const HEADER_HALTED: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball: id, x, y, z, wx, wy, wz, state.
pub const BALL_FLOATS: usize = 8;

/// Floats per outcome: kind, ball_a, ball_b, speed.
pub const OUTCOME_FLOATS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_balls: usize,
    pub max_outcomes: usize,

    /// Size of the ball section in floats.
    pub ball_data_floats: usize,
    /// Size of the outcome section in floats.
    pub outcome_data_floats: usize,

    /// Offset (in floats) where ball data begins.
    pub ball_data_offset: usize,
    /// Offset (in floats) where outcome data begins.
    pub outcome_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_balls: usize, max_outcomes: usize) -> Self {
        let ball_data_floats = max_balls * BALL_FLOATS;
        let outcome_data_floats = max_outcomes * OUTCOME_FLOATS;

        let ball_data_offset = HEADER_FLOATS;
        let outcome_data_offset = ball_data_offset + ball_data_floats;

        let buffer_total_floats = outcome_data_offset + outcome_data_floats;

        Self {
            max_balls,
            max_outcomes,
            ball_data_floats,
            outcome_data_floats,
            ball_data_offset,
            outcome_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.max_balls, config.max_outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_sizes() {
        let layout = ProtocolLayout::from_config(&SimConfig::default());
        assert_eq!(layout.max_balls, 22);
        assert_eq!(layout.max_outcomes, 64);
        assert_eq!(layout.ball_data_floats, 22 * 8);
        assert_eq!(layout.outcome_data_floats, 64 * 4);
        assert_eq!(layout.buffer_total_floats, 8 + 22 * 8 + 64 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn sections_are_contiguous() {
        let layout = ProtocolLayout::new(16, 10);
        assert_eq!(layout.ball_data_offset, HEADER_FLOATS);
        assert_eq!(
            layout.outcome_data_offset,
            layout.ball_data_offset + layout.ball_data_floats
        );
        assert_eq!(
            layout.buffer_total_floats,
            layout.outcome_data_offset + layout.outcome_data_floats
        );
    }

    #[test]
    fn header_fields_fit() {
        for field in [
            HEADER_FRAME_COUNTER,
            HEADER_PROTOCOL_VERSION,
            HEADER_MAX_BALLS,
            HEADER_BALL_COUNT,
            HEADER_MAX_OUTCOMES,
            HEADER_OUTCOME_COUNT,
            HEADER_SETTLED,
            HEADER_HALTED,
        ] {
            assert!(field < HEADER_FLOATS, "header field {} out of range", field);
        }
    }
}
