//! Cushion rebound models.
//!
//! Every model works in a canonical frame where the cushion normal is +x and
//! the ball approaches with positive `v.x`. [`rotate_apply_unrotate`] maps a
//! cushion of any orientation into that frame and the result back out.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::error::PhysicsError;
use crate::core::constants::PhysicsConstants;
use crate::core::math::{rotate_z, sign};
use crate::model::ball::Ball;
use crate::model::geometry::{PocketGeometry, TableGeometry};
use crate::physics::kinematics::BodyKinematics;
use crate::physics::mathaven::{ImpactState, Mathaven};

/// Selectable cushion response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CushionModel {
    /// Han closed form, grip or slip branch.
    HanGrip,
    /// Han with grip/slip interpolation on the check side.
    HanBlend,
    /// Iterative compression/restitution solver.
    #[default]
    Mathaven,
}

impl CushionModel {
    pub const ALL: [CushionModel; 3] = [
        CushionModel::HanGrip,
        CushionModel::HanBlend,
        CushionModel::Mathaven,
    ];

    /// Rebound deltas for a ball with incident `(v, w)` in the canonical frame.
    pub fn bounce(
        self,
        v: DVec3,
        w: DVec3,
        c: &PhysicsConstants,
    ) -> Result<BodyKinematics, PhysicsError> {
        match self {
            CushionModel::HanGrip => Ok(bounce_han(v, w, c)),
            CushionModel::HanBlend => Ok(bounce_han_blend(v, w, c)),
            CushionModel::Mathaven => mathaven_adapter(v, w, c),
        }
    }
}

/// Rotate `(v, w)` about the vertical by `theta`, run `model`, and rotate the
/// returned deltas back by `-theta`.
pub fn rotate_apply_unrotate(
    theta: f64,
    v: DVec3,
    w: DVec3,
    c: &PhysicsConstants,
    model: impl FnOnce(DVec3, DVec3, &PhysicsConstants) -> Result<BodyKinematics, PhysicsError>,
) -> Result<BodyKinematics, PhysicsError> {
    let delta = model(rotate_z(v, theta), rotate_z(w, theta), c)?;
    Ok(delta.map(|x| rotate_z(x, -theta)))
}

// ---------------------------------------------------------------------------
// Han
// ---------------------------------------------------------------------------

/// Height of the cushion nose above the ball centre, as a fraction of R.
const CONTACT_HEIGHT: f64 = 0.2;

fn contact_angle() -> (f64, f64) {
    let theta_a = CONTACT_HEIGHT.asin();
    theta_a.sin_cos()
}

fn impulse_a(c: &PhysicsConstants) -> f64 {
    7.0 / 2.0 / c.m
}

fn impulse_b(c: &PhysicsConstants) -> f64 {
    1.0 / c.m
}

/// Slip velocity of the cushion contact point.
pub fn s0(v: DVec3, w: DVec3, c: &PhysicsConstants) -> DVec3 {
    let (sin_a, cos_a) = contact_angle();
    DVec3::new(
        v.x * sin_a - v.z * cos_a + c.r * w.y,
        -v.y - c.r * w.z * cos_a + c.r * w.x * sin_a,
        0.0,
    )
}

/// Normal approach speed at the cushion contact.
pub fn c0(v: DVec3) -> f64 {
    let (_, cos_a) = contact_angle();
    v.x * cos_a
}

/// Normal impulse needed to arrest the contact slip `s`.
pub fn pzs(s: DVec3, c: &PhysicsConstants) -> f64 {
    s.length() / impulse_a(c)
}

/// Normal impulse delivered over the whole impact.
pub fn pze(c0: f64, c: &PhysicsConstants) -> f64 {
    (1.0 + c.e) * c0 / impulse_b(c)
}

/// Grip when the impact carries enough impulse to stop the contact slipping.
pub fn is_grip_cushion(v: DVec3, w: DVec3, c: &PhysicsConstants) -> bool {
    pzs(s0(v, w, c), c) <= pze(c0(v), c)
}

/// Slip-branch cushion friction as a function of incidence angle.
pub fn mu_cushion(v: DVec3) -> f64 {
    let theta = v.y.abs().atan2(v.x);
    0.471 - 0.241 * theta
}

/// Slip-branch restitution as a function of normal speed.
pub fn restitution_cushion(v: DVec3) -> f64 {
    0.39 + 0.257 * v.x - 0.044 * v.x * v.x
}

/// Impulse components `(PX, PY, PZ)` when the contact point is brought to rest.
fn grip_impulse(v: DVec3, w: DVec3, c: &PhysicsConstants) -> DVec3 {
    let (sin_a, cos_a) = contact_angle();
    let s = s0(v, w, c);
    let normal = (1.0 + c.e) * c0(v) / impulse_b(c);
    let a = impulse_a(c);
    DVec3::new(
        -s.x / a * sin_a - normal * cos_a,
        s.y / a,
        s.x / a * cos_a - normal * sin_a,
    )
}

/// Impulse components when the contact point keeps sliding.
fn slip_impulse(v: DVec3, w: DVec3, c: &PhysicsConstants) -> DVec3 {
    let (sin_a, cos_a) = contact_angle();
    let s = s0(v, w, c);
    let (sin_phi, cos_phi) = s.y.atan2(s.x).sin_cos();
    let mu = mu_cushion(v);
    let normal = (1.0 + restitution_cushion(v)) * c0(v) / impulse_b(c);
    DVec3::new(
        -mu * normal * cos_phi * cos_a - normal * cos_a,
        mu * normal * sin_phi,
        mu * normal * cos_phi * cos_a - normal * sin_a,
    )
}

/// Turn impulse components into velocity deltas.
fn impulse_to_delta(p: DVec3, c: &PhysicsConstants) -> BodyKinematics {
    let (sin_a, cos_a) = contact_angle();
    let k = c.r / c.inertia();
    BodyKinematics::new(
        DVec3::new(p.x / c.m, p.y / c.m, 0.0),
        DVec3::new(
            -k * p.y * sin_a,
            k * (p.x * sin_a - p.z * cos_a),
            k * p.y * cos_a,
        ),
    )
}

/// Han rebound: grip formula when the predicate holds, slip formula otherwise.
pub fn bounce_han(v: DVec3, w: DVec3, c: &PhysicsConstants) -> BodyKinematics {
    let p = if is_grip_cushion(v, w, c) {
        grip_impulse(v, w, c)
    } else {
        slip_impulse(v, w, c)
    };
    impulse_to_delta(p, c)
}

/// Han rebound that fades from slip to grip on the check side, weighted by how
/// square-on the ball arrives.
pub fn bounce_han_blend(v: DVec3, w: DVec3, c: &PhysicsConstants) -> BodyKinematics {
    let check_side = sign(v.y) == sign(w.z);
    if !check_side {
        return bounce_han(v, w, c);
    }
    let factor = v.y.atan2(v.x).cos();
    let grip = impulse_to_delta(grip_impulse(v, w, c), c);
    let slip = impulse_to_delta(slip_impulse(v, w, c), c);
    slip.lerp(grip, factor)
}

// ---------------------------------------------------------------------------
// Mathaven
// ---------------------------------------------------------------------------

/// Run the Mathaven solver on a canonical-frame ball. The solver expects the
/// approach along +y, so this is itself a quarter-turn rotate/unrotate.
pub fn mathaven_adapter(
    v: DVec3,
    w: DVec3,
    c: &PhysicsConstants,
) -> Result<BodyKinematics, PhysicsError> {
    rotate_apply_unrotate(FRAC_PI_2, v, w, c, |v, w, c| {
        let solver = Mathaven::new(c.m, c.r, c.e, c.mathaven_mu_s, c.mathaven_mu_w);
        let out = solver.solve(ImpactState {
            vx: v.x,
            vy: v.y,
            wx: w.x,
            wy: w.y,
            wz: w.z,
        })?;
        Ok(BodyKinematics::new(
            DVec3::new(out.vx - v.x, out.vy - v.y, 0.0),
            DVec3::new(out.wx - w.x, out.wy - w.y, out.wz - w.z),
        ))
    })
}

// ---------------------------------------------------------------------------
// Rail dispatch
// ---------------------------------------------------------------------------

/// Straight rails of one table, split at the pocket knuckles when it has
/// pockets.
#[derive(Debug, Clone, Copy)]
pub struct Rails<'a> {
    pub table: &'a TableGeometry,
    pub pockets: Option<&'a PocketGeometry>,
}

impl Rails<'_> {
    fn will_bounce_long(&self, p: DVec3) -> bool {
        let on_segment = |left: f64, right: f64| {
            p.x > left && p.x < right && p.y.abs() > self.table.table_y
        };
        match self.pockets {
            Some(g) => g.long_segments().iter().any(|&(l, r)| on_segment(l, r)),
            None => on_segment(-self.table.x, self.table.x),
        }
    }

    fn will_bounce_short(&self, p: DVec3) -> bool {
        let (bottom, top) = match self.pockets {
            Some(g) => g.short_segment(),
            None => (-self.table.y, self.table.y),
        };
        p.y > bottom && p.y < top && p.x.abs() > self.table.table_x
    }

    /// Bounce `ball` off whichever rail its next position crosses. Returns the
    /// change in speed, or `None` when no rail segment applies or the ball is
    /// already leaving it.
    pub fn bounce_any(
        &self,
        ball: &mut Ball,
        t: f64,
        model: CushionModel,
        c: &PhysicsConstants,
    ) -> Result<Option<f64>, PhysicsError> {
        let future = ball.future_position(t);

        if self.will_bounce_long(future) {
            let dir = if future.y > self.table.table_y { -FRAC_PI_2 } else { FRAC_PI_2 };
            if let Some(speed) = bounce_in(dir, ball, model, c)? {
                return Ok(Some(speed));
            }
        }
        if self.will_bounce_short(future) {
            let dir = if future.x > self.table.table_x { 0.0 } else { PI };
            return bounce_in(dir, ball, model, c);
        }
        Ok(None)
    }
}

fn bounce_in(
    rotation: f64,
    ball: &mut Ball,
    model: CushionModel,
    c: &PhysicsConstants,
) -> Result<Option<f64>, PhysicsError> {
    if rotate_z(ball.vel, rotation).x <= 0.0 {
        return Ok(None);
    }
    let delta = rotate_apply_unrotate(rotation, ball.vel, ball.rvel, c, |v, w, c| {
        model.bounce(v, w, c)
    })?;
    ball.vel += delta.v;
    ball.rvel += delta.w;
    let speed = delta.v.length();
    Ok((speed > 0.0).then_some(speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consts() -> PhysicsConstants {
        PhysicsConstants::default()
    }

    #[test]
    fn slow_direct_hit_grips() {
        let c = consts();
        let v = DVec3::new(0.1, 0.0, 0.0);
        let w = DVec3::new(0.0, 0.0, 0.1);
        assert!(is_grip_cushion(v, w, &c));
    }

    #[test]
    fn fast_glancing_hit_slips() {
        let c = consts();
        let v = DVec3::new(0.1, 20.0, 0.0);
        let w = DVec3::new(0.0, 0.0, 0.1);
        assert!(!is_grip_cushion(v, w, &c));
    }

    #[test]
    fn right_side_throws_ball_right_and_bleeds_spin() {
        let c = consts();
        let delta = bounce_han(DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -5.0), &c);
        assert!(delta.v.y > 0.0, "side should push the ball along +y: {:?}", delta.v);
        assert!(
            delta.w.z > 0.0 && delta.w.z < 5.0,
            "spin should reduce but not reverse: {:?}",
            delta.w
        );
    }

    #[test]
    fn every_model_reverses_a_square_hit() {
        let c = consts();
        let v = DVec3::new(1.0, 0.0, 0.0);
        for model in CushionModel::ALL {
            let delta = model.bounce(v, DVec3::ZERO, &c).unwrap();
            let after = v + delta.v;
            assert!(after.x < 0.0, "{:?} should send the ball back: {:?}", model, after);
            assert!(after.x > -1.0, "{:?} should lose energy: {:?}", model, after);
            assert!(after.y.abs() < 1e-6, "{:?} added lateral speed: {:?}", model, after);
        }
    }

    #[test]
    fn blend_matches_han_off_check_side() {
        let c = consts();
        let v = DVec3::new(1.0, 0.5, 0.0);
        let w = DVec3::new(0.0, 0.0, -3.0);
        assert_eq!(bounce_han_blend(v, w, &c), bounce_han(v, w, &c));
    }

    #[test]
    fn blend_is_pure_grip_when_square_on() {
        let c = consts();
        let v = DVec3::new(1.0, 0.0, 0.0);
        let blended = bounce_han_blend(v, DVec3::ZERO, &c);
        let grip = impulse_to_delta(grip_impulse(v, DVec3::ZERO, &c), &c);
        assert!((blended.v - grip.v).length() < 1e-12);
        assert!((blended.w - grip.w).length() < 1e-12);
    }

    fn rails_test_table() -> (TableGeometry, PocketGeometry) {
        let c = consts();
        let table = TableGeometry::new(&crate::api::config::TableConfig::default(), c.r);
        let pockets = PocketGeometry::new(&table, c.r);
        (table, pockets)
    }

    #[test]
    fn ball_crossing_long_rail_bounces() {
        let c = consts();
        let (table, pockets) = rails_test_table();
        let rails = Rails { table: &table, pockets: Some(&pockets) };
        let mut ball = Ball::new(crate::BallId(0), DVec3::new(-0.6, table.table_y - 0.001, 0.0));
        ball.vel = DVec3::new(0.0, 1.0, 0.0);
        ball.state = crate::BallState::Rolling;

        let speed = rails.bounce_any(&mut ball, 0.01, CushionModel::HanBlend, &c).unwrap();
        assert!(speed.is_some_and(|s| s > 1.0), "speed={:?}", speed);
        assert!(ball.vel.y < 0.0, "ball should head back down: {:?}", ball.vel);
    }

    #[test]
    fn pocket_mouth_is_not_a_rail() {
        let c = consts();
        let (table, pockets) = rails_test_table();
        let rails = Rails { table: &table, pockets: Some(&pockets) };
        let mut ball = Ball::new(crate::BallId(0), DVec3::new(0.0, table.table_y - 0.001, 0.0));
        ball.vel = DVec3::new(0.0, 1.0, 0.0);
        ball.state = crate::BallState::Rolling;

        let speed = rails.bounce_any(&mut ball, 0.01, CushionModel::HanBlend, &c).unwrap();
        assert_eq!(speed, None);
        assert_eq!(ball.vel, DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn carom_rail_runs_full_length() {
        let c = consts();
        let (table, _) = rails_test_table();
        let rails = Rails { table: &table, pockets: None };
        let mut ball = Ball::new(crate::BallId(0), DVec3::new(table.table_x - 0.001, 0.0, 0.0));
        ball.vel = DVec3::new(1.0, 0.0, 0.0);
        ball.state = crate::BallState::Rolling;

        let speed = rails.bounce_any(&mut ball, 0.01, CushionModel::Mathaven, &c).unwrap();
        assert!(speed.is_some());
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn ball_leaving_rail_is_ignored() {
        let c = consts();
        let (table, _) = rails_test_table();
        let rails = Rails { table: &table, pockets: None };
        let mut ball = Ball::new(crate::BallId(0), DVec3::new(table.table_x + 0.002, 0.0, 0.0));
        ball.vel = DVec3::new(-0.1, 0.0, 0.0);
        ball.state = crate::BallState::Rolling;

        let speed = rails.bounce_any(&mut ball, 0.01, CushionModel::HanGrip, &c).unwrap();
        assert_eq!(speed, None);
    }

    #[test]
    fn rotation_adapter_handles_any_wall() {
        let c = consts();
        // Ball heading -y into the bottom rail. Rotating by +π/2 maps -y to +x.
        let v = DVec3::new(0.0, -1.0, 0.0);
        let delta = rotate_apply_unrotate(FRAC_PI_2, v, DVec3::ZERO, &c, |v, w, c| {
            Ok(bounce_han(v, w, c))
        })
        .unwrap();
        let after = v + delta.v;
        assert!(after.y > 0.0, "ball should leave the bottom rail upward: {:?}", after);
        assert!(after.x.abs() < 1e-9, "got {:?}", after);
    }
}
