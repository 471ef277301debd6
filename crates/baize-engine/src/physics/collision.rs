//! Ball–ball contact: prediction, contact-time back-solve and the throw
//! impulse model.

use glam::DVec3;

use crate::api::types::BallState;
use crate::core::constants::PhysicsConstants;
use crate::model::ball::Ball;

/// True when `a` and `b` would overlap at the end of a `t` second step.
/// Only approaching pairs with at least one moving ball and both on the cloth
/// qualify.
pub fn will_collide(a: &Ball, b: &Ball, t: f64, c: &PhysicsConstants) -> bool {
    (a.in_motion() || b.in_motion())
        && a.on_table()
        && b.on_table()
        && a.future_position(t).distance_squared(b.future_position(t)) < 4.0 * c.r * c.r
        && (b.pos - a.pos).dot(a.vel - b.vel) > 0.0
}

/// Estimated ball centres at the moment of first touch, found by running both
/// balls back (or forward) along their current velocities.
pub fn positions_at_contact(a: &Ball, b: &Ball, c: &PhysicsConstants) -> (DVec3, DVec3) {
    let sep = a.pos.distance(b.pos);
    let rv = (a.vel - b.vel).length();
    let t = if rv > f64::EPSILON {
        (sep - 2.0 * c.r) / rv
    } else {
        0.0
    };
    (a.pos + a.vel * t, b.pos + b.vel * t)
}

/// Resolve a contact between `a` and `b`, updating both balls. Returns the
/// normal approach speed, used as the incident speed of the event.
pub fn collide(a: &mut Ball, b: &mut Ball, c: &PhysicsConstants) -> f64 {
    let (contact_a, contact_b) = positions_at_contact(a, b, c);
    let ab = (contact_b - contact_a).normalize_or_zero();
    let ab_tangent = DVec3::new(-ab.y, ab.x, 0.0);

    let v_point = a.vel - b.vel + ((-c.r * ab).cross(a.rvel) - (c.r * ab).cross(b.rvel));
    let v_normal = ab.dot(v_point);
    let v_rel = v_point - ab * v_normal;
    let v_rel_mag = v_rel.length();
    let v_tangential = ab_tangent.dot(v_rel);

    let normal_impulse = -(1.0 + c.ball_restitution) * v_normal / (2.0 / c.m);
    let tangential_impulse = if v_rel_mag > f64::EPSILON {
        let mu = c.throw_mu(v_rel_mag);
        (mu * normal_impulse.abs() / v_rel_mag).min(1.0 / 7.0) * -v_tangential
    } else {
        0.0
    };

    let impulse_normal = ab * normal_impulse;
    let impulse_tangential = ab_tangent * tangential_impulse;
    let impulse = impulse_normal + impulse_tangential;

    a.vel += impulse / c.m;
    b.vel -= impulse / c.m;

    let inertia = c.inertia();
    a.rvel += (-c.r * ab).cross(impulse_tangential) / inertia;
    b.rvel += (c.r * ab).cross(impulse_tangential) / inertia;

    a.state = BallState::Sliding;
    b.state = BallState::Sliding;

    v_normal
}
