use glam::DVec3;

use crate::api::types::{BallId, BallState, PocketId};
use crate::core::constants::PhysicsConstants;
use crate::core::math::{passes_through_zero, unit_at_angle};
use crate::physics::friction::{cue_to_spin, force_roll, is_rolling, rolling_full, sliding};
use crate::physics::kinematics::BodyKinematics;
use crate::physics::pocket::Pocket;

/// Spin about the vertical below which a halting ball may snap to rest.
const HALT_SPIN_EPSILON: f64 = 0.01;

/// A ball on the table. Pure physics state; renderers key their own data by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: BallId,
    pub pos: DVec3,
    pub vel: DVec3,
    /// Angular velocity.
    pub rvel: DVec3,
    pub state: BallState,
    /// Pocket the ball is falling into or resting in.
    pub pocket: Option<PocketId>,
}

impl Ball {
    pub fn new(id: BallId, pos: DVec3) -> Self {
        Self {
            id,
            pos,
            vel: DVec3::ZERO,
            rvel: DVec3::ZERO,
            state: BallState::Stationary,
            pocket: None,
        }
    }

    /// Where the ball would be after `t` seconds at its current velocity.
    pub fn future_position(&self, t: f64) -> DVec3 {
        self.pos + self.vel * t
    }

    pub fn on_table(&self) -> bool {
        !matches!(self.state, BallState::Falling | BallState::InPocket)
    }

    pub fn in_motion(&self) -> bool {
        matches!(
            self.state,
            BallState::Rolling | BallState::Sliding | BallState::Falling
        )
    }

    pub fn is_falling(&self) -> bool {
        self.state == BallState::Falling
    }

    pub fn is_rolling(&self, c: &PhysicsConstants) -> bool {
        is_rolling(self.vel, self.rvel, c)
    }

    pub fn set_stationary(&mut self) {
        self.vel = DVec3::ZERO;
        self.rvel = DVec3::ZERO;
        self.state = BallState::Stationary;
    }

    /// Strike the ball. `english` is the tip offset on the ball face in units
    /// of ball radius.
    pub fn hit(&mut self, aim_angle: f64, power: f64, english: DVec3, c: &PhysicsConstants) {
        self.state = BallState::Sliding;
        self.vel = unit_at_angle(aim_angle) * power;
        self.rvel = cue_to_spin(english, self.vel, c);
    }

    /// Advance by `t` seconds: position first, then velocity (or the pocket
    /// drop when falling).
    pub fn update(&mut self, t: f64, c: &PhysicsConstants, pockets: &mut [Pocket]) {
        self.update_position(t);
        if self.is_falling() {
            if let Some(pocket) = self.pocket.and_then(|id| pockets.get_mut(id.index())) {
                pocket.update_fall(self, t, c);
            }
        } else {
            self.update_velocity(t, c);
        }
    }

    fn update_position(&mut self, t: f64) {
        self.pos += self.vel * t;
    }

    fn update_velocity(&mut self, t: f64, c: &PhysicsConstants) {
        if !self.in_motion() {
            return;
        }
        if self.is_rolling(c) {
            self.state = BallState::Rolling;
            force_roll(self.vel, &mut self.rvel, c);
            self.add_delta(rolling_full(self.rvel, c) * t);
        } else {
            self.state = BallState::Sliding;
            self.add_delta(sliding(self.vel, self.rvel, c) * t);
        }
    }

    fn add_delta(&mut self, delta: BodyKinematics) {
        if self.passes_zero(&delta) {
            return;
        }
        let wz = self.rvel.z;
        self.vel += delta.v;
        self.rvel += delta.w;
        // Vertical spin decays to zero and stops there.
        if wz * self.rvel.z < 0.0 {
            self.rvel.z = 0.0;
        }
    }

    /// Snap to rest instead of overshooting through zero. A rolling ball stops
    /// when either vector would reverse, a sliding one only when both would.
    fn passes_zero(&mut self, delta: &BodyKinematics) -> bool {
        let vz = passes_through_zero(self.vel, delta.v);
        let wz = passes_through_zero(self.rvel, delta.w);
        let halts = if self.state == BallState::Rolling {
            vz || wz
        } else {
            vz && wz
        };
        if halts && self.rvel.z.abs() < HALT_SPIN_EPSILON {
            self.set_stationary();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::friction::surface_velocity;

    const T: f64 = 0.1;

    fn consts() -> PhysicsConstants {
        PhysicsConstants::default()
    }

    fn moving(vel: DVec3, rvel: DVec3, state: BallState) -> Ball {
        let mut ball = Ball::new(BallId(0), DVec3::ZERO);
        ball.vel = vel;
        ball.rvel = rvel;
        ball.state = state;
        ball
    }

    #[test]
    fn friction_slows_ball() {
        let c = consts();
        let mut ball = moving(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, BallState::Sliding);
        ball.update(T, &c, &mut []);
        assert!(ball.vel.x < 1.0, "ball should slow: {:?}", ball.vel);
        assert!(ball.pos.x > 0.0, "ball should move: {:?}", ball.pos);
    }

    #[test]
    fn slow_sliding_ball_halts() {
        let c = consts();
        let mut ball = moving(DVec3::new(0.01, 0.0, 0.0), DVec3::ZERO, BallState::Sliding);
        ball.update(0.01, &c, &mut []);
        assert!(ball.vel.x.abs() < 0.01, "friction must reduce speed: {:?}", ball.vel);
        assert_eq!(ball.state, BallState::Stationary);
    }

    #[test]
    fn rolling_ball_is_detected_and_snapped() {
        let c = consts();
        let v = DVec3::new(1.0, 0.0, 0.0);
        let mut w = DVec3::ZERO;
        force_roll(v, &mut w, &c);
        let mut ball = moving(v, w * 1.01, BallState::Sliding);
        assert!(ball.is_rolling(&c), "small slip should still count as rolling");
        ball.update(T, &c, &mut []);
        assert_eq!(ball.state, BallState::Rolling);
        assert!(surface_velocity(ball.vel, ball.rvel, &c).length() < 1e-9);
    }

    #[test]
    fn topspin_accelerates_slow_ball() {
        let c = consts();
        let mut ball = moving(
            DVec3::new(0.1, 0.0, 0.0),
            DVec3::new(0.0, 1.0 / c.r, 0.0),
            BallState::Sliding,
        );
        ball.update(0.01, &c, &mut []);
        assert!(ball.vel.x > 0.1, "topspin should drag the ball forward: {:?}", ball.vel);
    }

    #[test]
    fn stun_does_not_roll_back() {
        let c = consts();
        let mut ball = moving(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, BallState::Sliding);
        for _ in 0..2000 {
            ball.update(0.001, &c, &mut []);
            assert!(ball.vel.x >= 0.0, "ball reversed: {:?}", ball.vel);
        }
    }

    #[test]
    fn slide_then_roll_then_stop() {
        let c = consts();
        let mut ball = moving(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, BallState::Sliding);
        let mut last_speed = ball.vel.length();
        let mut seen_rolling = false;
        for _ in 0..40_000 {
            ball.update(0.001, &c, &mut []);
            let speed = ball.vel.length();
            assert!(speed <= last_speed + 1e-12, "speed grew from {} to {}", last_speed, speed);
            last_speed = speed;
            seen_rolling |= ball.state == BallState::Rolling;
            if ball.state == BallState::Stationary {
                break;
            }
        }
        assert!(seen_rolling, "ball should pass through rolling");
        assert_eq!(ball.state, BallState::Stationary);
        assert_eq!(ball.vel, DVec3::ZERO);
        assert_eq!(ball.rvel, DVec3::ZERO);
    }

    #[test]
    fn side_spin_keeps_ball_alive() {
        let c = consts();
        let mut ball = moving(
            DVec3::new(0.001, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 5.0),
            BallState::Sliding,
        );
        ball.update(0.01, &c, &mut []);
        assert_ne!(ball.state, BallState::Stationary, "spinning ball must not snap to rest");
    }

    #[test]
    fn dying_spin_settles_at_coarse_ticks() {
        let c = consts();
        for dt in [0.005, 0.01] {
            let mut ball = moving(DVec3::ZERO, DVec3::new(0.0, 0.0, 0.012), BallState::Sliding);
            for _ in 0..10 {
                ball.update(dt, &c, &mut []);
                assert!(ball.rvel.z >= 0.0, "dt={}: spin flipped to {}", dt, ball.rvel.z);
            }
            assert_eq!(ball.state, BallState::Stationary, "dt={}: {:?}", dt, ball);
            assert_eq!(ball.rvel, DVec3::ZERO);
        }
    }

    #[test]
    fn side_spin_shot_stops_at_coarse_ticks() {
        let c = consts();
        for dt in [0.005, 0.01] {
            let mut ball = moving(
                DVec3::new(0.3, 0.0, 0.0),
                DVec3::new(0.0, 0.0, 3.0),
                BallState::Sliding,
            );
            let steps = (20.0 / dt) as usize;
            for _ in 0..steps {
                ball.update(dt, &c, &mut []);
                if ball.state == BallState::Stationary {
                    break;
                }
            }
            assert_eq!(ball.state, BallState::Stationary, "dt={}: still moving {:?}", dt, ball);
            assert!(ball.pos.x > 0.0);
        }
    }

    #[test]
    fn hit_sets_sliding_and_velocity() {
        let c = consts();
        let mut ball = Ball::new(BallId(0), DVec3::ZERO);
        ball.hit(std::f64::consts::FRAC_PI_2, 2.0, DVec3::ZERO, &c);
        assert_eq!(ball.state, BallState::Sliding);
        assert!((ball.vel - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12);
        assert_eq!(ball.rvel, DVec3::ZERO);
    }

    #[test]
    fn stationary_ball_stays_put() {
        let c = consts();
        let mut ball = Ball::new(BallId(3), DVec3::new(0.2, 0.1, 0.0));
        ball.update(T, &c, &mut []);
        assert_eq!(ball.pos, DVec3::new(0.2, 0.1, 0.0));
        assert_eq!(ball.state, BallState::Stationary);
    }
}
