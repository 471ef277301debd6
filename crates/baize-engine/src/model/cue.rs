use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::core::math::round3;

/// Largest tip offset from the ball centre, in ball radii.
pub const OFFSET_LIMIT: f64 = 0.4;

/// Strongest strike, in ball radii per second.
pub const MAX_POWER_RADII: f64 = 160.0;

/// One cue strike on the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CueStrike {
    /// Aim direction in radians from +x.
    pub angle: f64,
    /// Cue ball launch speed (m/s).
    pub power: f64,
    /// Tip offset left/right of centre, positive is right.
    pub side: f64,
    /// Tip offset below/above centre, positive is top.
    pub vertical: f64,
}

impl CueStrike {
    pub fn new(angle: f64, power: f64) -> Self {
        Self {
            angle,
            power,
            ..Default::default()
        }
    }

    pub fn with_spin(mut self, side: f64, vertical: f64) -> Self {
        self.side = side;
        self.vertical = vertical;
        self
    }

    /// Maximum launch speed for a ball of radius `r`.
    pub fn max_power(r: f64) -> f64 {
        MAX_POWER_RADII * r
    }

    /// Clamp offsets to the tip limit and power into `[0, max]` for a ball of
    /// radius `r`.
    pub fn clamped(self, r: f64) -> Self {
        Self {
            angle: self.angle,
            power: self.power.clamp(0.0, Self::max_power(r)),
            side: self.side.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
            vertical: self.vertical.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
        }
    }

    /// Inputs rounded to three places so replays reproduce exactly.
    pub fn rounded(self) -> Self {
        Self {
            angle: round3(self.angle),
            power: round3(self.power),
            side: round3(self.side),
            vertical: round3(self.vertical),
        }
    }

    /// Tip offset as a vector on the ball face.
    pub fn english(&self) -> DVec3 {
        DVec3::new(self.side, self.vertical, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_offsets_and_power() {
        let r = 0.03275;
        let strike = CueStrike::new(1.0, 100.0).with_spin(0.9, -0.7).clamped(r);
        assert_eq!(strike.side, OFFSET_LIMIT);
        assert_eq!(strike.vertical, -OFFSET_LIMIT);
        assert_eq!(strike.power, CueStrike::max_power(r));
        assert!((CueStrike::max_power(r) - 160.0 * r).abs() < 1e-12);
        assert_eq!(strike.angle, 1.0);
        assert_eq!(CueStrike::new(0.0, -1.0).clamped(r).power, 0.0);
    }

    #[test]
    fn rounding_is_stable() {
        let strike = CueStrike::new(0.123456, 2.0004).with_spin(0.1, 0.33333).rounded();
        assert_eq!(strike, strike.rounded());
        assert_eq!(strike.angle, 0.123);
        assert_eq!(strike.vertical, 0.333);
    }

    #[test]
    fn parses_from_json() {
        let strike: CueStrike = serde_json::from_str(r#"{ "angle": 3.1, "power": 1.5 }"#).unwrap();
        assert_eq!(strike.english(), DVec3::ZERO);
        assert_eq!(strike.power, 1.5);
    }
}
