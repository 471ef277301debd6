use std::collections::HashMap;

use glam::DVec3;

use crate::api::types::{BallId, BallState, PocketId};
use crate::core::constants::PhysicsConstants;
use crate::core::math::up_cross;
use crate::model::ball::Ball;

/// A pocket opening on the table plane. Balls that drop in settle at
/// staggered depths in arrival order so they never stack in one spot.
#[derive(Debug, Clone, PartialEq)]
pub struct Pocket {
    pub id: PocketId,
    pub pos: DVec3,
    pub radius: f64,
    /// Arrival order of each ball that has fallen in.
    resting_offsets: HashMap<BallId, usize>,
}

impl Pocket {
    pub fn new(id: PocketId, pos: DVec3, radius: f64) -> Self {
        Self {
            id,
            pos,
            radius,
            resting_offsets: HashMap::new(),
        }
    }

    pub fn will_fall(&self, ball: &Ball, t: f64) -> bool {
        ball.future_position(t).distance(self.pos) < self.radius
    }

    /// Start the ball falling into this pocket. Returns its speed on entry.
    pub fn fall(&self, ball: &mut Ball, t: f64, c: &PhysicsConstants) -> f64 {
        ball.vel.z = -c.g * t;
        ball.state = BallState::Falling;
        ball.pocket = Some(self.id);
        log::debug!("{} dropping into pocket {}", ball.id, self.id.0);
        ball.vel.length()
    }

    /// Per-tick motion of a ball inside the pocket: gravity, a pull toward the
    /// centre while near the lip, and settling at this ball's resting depth.
    pub fn update_fall(&mut self, ball: &mut Ball, t: f64, c: &PhysicsConstants) {
        let r = c.r;
        ball.vel.z -= r * 10.0 * t * c.g;

        let mut offset_xy = self.pos - ball.pos;
        offset_xy.z = 0.0;
        if offset_xy.length() > self.radius - r {
            let to_centre = offset_xy.normalize_or_zero();
            if ball.pos.z > -r / 2.0 {
                ball.vel += to_centre * (r * 7.0 * t * c.g);
                ball.rvel += up_cross(to_centre) * (7.0 * t * c.g);
            }
            if ball.vel.dot(to_centre) < 0.0 {
                let speed = ball.vel.length();
                ball.vel.x = to_centre.x * speed / 2.0;
                ball.vel.y = to_centre.y * speed / 2.0;
            }
        }

        let resting_depth = self.resting_depth(ball.id, r);
        if ball.pos.z < resting_depth && ball.rvel.length() != 0.0 {
            ball.pos.z = resting_depth;
            ball.vel.z = -r / 10.0;
            ball.rvel = DVec3::ZERO;
        }
        if ball.pos.z < resting_depth - r {
            ball.pos.z = resting_depth - r;
            ball.set_stationary();
            ball.state = BallState::InPocket;
            log::debug!("{} settled in pocket {}", ball.id, self.id.0);
        }
    }

    /// Depth below the cloth at which `ball` comes to rest.
    fn resting_depth(&mut self, ball: BallId, r: f64) -> f64 {
        let next = self.resting_offsets.len();
        let offset = *self.resting_offsets.entry(ball).or_insert(next);
        -r * 3.0 - r * offset as f64 / 4.0
    }

    /// Balls that have dropped into this pocket, in arrival order.
    pub fn contents(&self) -> Vec<BallId> {
        let mut balls: Vec<_> = self.resting_offsets.iter().map(|(id, i)| (*i, *id)).collect();
        balls.sort();
        balls.into_iter().map(|(_, id)| id).collect()
    }

    /// Forget which balls have fallen in.
    pub fn clear(&mut self) {
        self.resting_offsets.clear();
    }

    /// First pocket the ball would drop into within `t`.
    pub fn find_pocket<'a>(pockets: &'a [Pocket], ball: &Ball, t: f64) -> Option<&'a Pocket> {
        pockets.iter().find(|p| p.will_fall(ball, t))
    }
}
