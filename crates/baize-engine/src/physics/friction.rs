//! Ball–cloth friction: sliding and rolling accelerations, the roll snap, and
//! the spin imparted by an off-centre cue strike.

use glam::{DQuat, DVec3};

use crate::core::constants::PhysicsConstants;
use crate::core::math::{norm, sign, up_cross};
use crate::physics::kinematics::BodyKinematics;

/// Surface speed below which a ball counts as rolling.
pub const ROLLING_THRESHOLD: f64 = 0.05;

/// Velocity of the contact point with the cloth, including any vertical part
/// of `v`.
pub fn surface_velocity_full(v: DVec3, w: DVec3, c: &PhysicsConstants) -> DVec3 {
    v + up_cross(w) * c.r
}

/// Horizontal velocity of the contact point with the cloth.
pub fn surface_velocity(v: DVec3, w: DVec3, c: &PhysicsConstants) -> DVec3 {
    let s = surface_velocity_full(v, w, c);
    DVec3::new(s.x, s.y, 0.0)
}

/// Vertical-axis spin decay, shared by both regimes.
fn spin_decay(wz: f64, c: &PhysicsConstants) -> f64 {
    -(5.0 / 2.0) * (c.mz() / (c.m * c.r * c.r)) * sign(wz)
}

/// Accelerations of a ball whose contact point slips on the cloth.
pub fn sliding(v: DVec3, w: DVec3, c: &PhysicsConstants) -> BodyKinematics {
    let va = surface_velocity(v, w, c);
    let dv = norm(va) * (-c.mu_s * c.g);
    let mut dw = norm(up_cross(va)) * ((5.0 / 2.0) * c.mu_s * c.g / c.r);
    dw.z = spin_decay(w.z, c);
    BodyKinematics::new(dv, dw)
}

/// Accelerations of a ball rolling without slip. `w` must have a horizontal
/// component; a ball with none gets zero deltas.
pub fn rolling_full(w: DVec3, c: &PhysicsConstants) -> BodyKinematics {
    let mag = DVec3::new(w.x, w.y, 0.0).length();
    if mag == 0.0 {
        return BodyKinematics::ZERO;
    }
    let k = ((5.0 / 7.0) * c.mxy()) / (c.m * c.r) / mag;
    let kw = ((5.0 / 7.0) * c.mxy()) / (c.m * c.r * c.r) / mag;
    BodyKinematics::new(
        DVec3::new(-k * w.y, k * w.x, 0.0),
        DVec3::new(-kw * w.x, -kw * w.y, spin_decay(w.z, c)),
    )
}

/// Snap `w` so the contact point has no horizontal slip. Linear velocity and
/// the vertical spin are left as they are.
pub fn force_roll(v: DVec3, w: &mut DVec3, c: &PhysicsConstants) {
    let wz = w.z;
    *w = up_cross(v) / c.r;
    w.z = wz;
}

/// Contact point slip is under the rolling threshold. A ball with no linear or
/// no angular velocity is never rolling.
pub fn is_rolling(v: DVec3, w: DVec3, c: &PhysicsConstants) -> bool {
    v.length_squared() != 0.0
        && w.length_squared() != 0.0
        && surface_velocity_full(v, w, c).length() < ROLLING_THRESHOLD
}

/// Angular velocity produced by striking off-centre.
///
/// `offset` is the tip position on the ball face in units of ball radius:
/// `x` is side (positive = right), `y` is height (positive = top).
pub fn cue_to_spin(offset: DVec3, v: DVec3, c: &PhysicsConstants) -> DVec3 {
    let dir = norm(v);
    if dir == DVec3::ZERO {
        return DVec3::ZERO;
    }
    let spin_axis = (-offset.x).atan2(offset.y);
    let spin_rate = (5.0 / 2.0) * v.length() * (offset.length() * c.r) / (c.r * c.r);
    let rvel = DQuat::from_axis_angle(dir, spin_axis) * up_cross(dir);
    rvel * spin_rate
}
