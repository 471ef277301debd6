use glam::DVec3;

use crate::core::constants::PhysicsConstants;
use crate::model::ball::Ball;

/// Rounded cushion end at a pocket mouth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knuckle {
    pub pos: DVec3,
    pub radius: f64,
}

impl Knuckle {
    pub fn new(pos: DVec3, radius: f64) -> Self {
        Self { pos, radius }
    }

    /// The ball would touch the knuckle within `t` and is heading toward it.
    pub fn will_bounce(&self, ball: &Ball, t: f64, c: &PhysicsConstants) -> bool {
        ball.future_position(t).distance(self.pos) < c.r + self.radius
            && (ball.pos - self.pos).dot(ball.vel) < 0.0
    }

    /// Reflect the ball off the knuckle surface, scaled by cushion restitution,
    /// and halve its spin. Returns the normal speed at impact.
    pub fn bounce(&self, ball: &mut Ball, c: &PhysicsConstants) -> f64 {
        let kb = (ball.pos - self.pos).normalize_or_zero();
        let vel_dot_centres = kb.dot(ball.vel);
        ball.vel += kb * (-2.0 * c.e * vel_dot_centres);
        ball.rvel *= 0.5;
        vel_dot_centres.abs()
    }

    /// First knuckle the ball would touch within `t`.
    pub fn find_bouncing<'a>(
        knuckles: &'a [Knuckle],
        ball: &Ball,
        t: f64,
        c: &PhysicsConstants,
    ) -> Option<&'a Knuckle> {
        knuckles.iter().find(|k| k.will_bounce(ball, t, c))
    }
}
