use glam::DVec3;
use std::ops::{Add, Mul};

/// A pair of linear and angular vectors. Depending on context this is a
/// state (v, ω), an acceleration, or a change to apply.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyKinematics {
    pub v: DVec3,
    pub w: DVec3,
}

impl BodyKinematics {
    pub const ZERO: Self = Self {
        v: DVec3::ZERO,
        w: DVec3::ZERO,
    };

    pub fn new(v: DVec3, w: DVec3) -> Self {
        Self { v, w }
    }

    /// Component-wise interpolation: `self` at 0, `other` at 1.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            v: self.v.lerp(other.v, t),
            w: self.w.lerp(other.w, t),
        }
    }

    /// Apply `rotate` to both vectors.
    pub fn map(self, rotate: impl Fn(DVec3) -> DVec3) -> Self {
        Self {
            v: rotate(self.v),
            w: rotate(self.w),
        }
    }
}

impl Add for BodyKinematics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            v: self.v + rhs.v,
            w: self.w + rhs.w,
        }
    }
}

impl Mul<f64> for BodyKinematics {
    type Output = Self;

    fn mul(self, t: f64) -> Self {
        Self {
            v: self.v * t,
            w: self.w * t,
        }
    }
}
