//! Small vector helpers shared by every physics model.
//!
//! The table plane is z = 0 with z pointing up, so most helpers work on the
//! horizontal components and leave z alone.

use glam::{DQuat, DVec3};

/// Unit vector pointing up out of the cloth.
pub const UP: DVec3 = DVec3::Z;

/// `UP × v`. Rotates the horizontal part of `v` a quarter turn anticlockwise.
#[inline]
pub fn up_cross(v: DVec3) -> DVec3 {
    UP.cross(v)
}

/// Normalized copy of `v`, or zero when `v` has no length.
#[inline]
pub fn norm(v: DVec3) -> DVec3 {
    v.normalize_or_zero()
}

/// True when applying `dv` would reverse (or exactly zero) `v`.
#[inline]
pub fn passes_through_zero(v: DVec3, dv: DVec3) -> bool {
    (v + dv).dot(v) <= 0.0
}

/// Horizontal unit vector at `theta` radians from the +x axis.
#[inline]
pub fn unit_at_angle(theta: f64) -> DVec3 {
    DVec3::new(theta.cos(), theta.sin(), 0.0)
}

/// Rotate `v` about the vertical axis by `theta` radians.
#[inline]
pub fn rotate_z(v: DVec3, theta: f64) -> DVec3 {
    DQuat::from_rotation_z(theta) * v
}

/// Sign of `x` with `sign(0) == 0`. `f64::signum` maps zero to one, which
/// would invent spin decay on a ball that has none.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Wrap an angle into [-π, π].
pub fn reduce_angle(theta: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let wrapped = (theta + std::f64::consts::PI).rem_euclid(tau) - std::f64::consts::PI;
    if wrapped == -std::f64::consts::PI && theta > 0.0 {
        std::f64::consts::PI
    } else {
        wrapped
    }
}

/// Round to three decimal places.
#[inline]
pub fn round3(x: f64) -> f64 {
    ((x + f64::EPSILON) * 1000.0).round() / 1000.0
}
