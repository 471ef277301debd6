use serde::{Deserialize, Serialize};

/// Physical constants for one table. Built once and handed by reference to
/// every model; nothing mutates it after construction.
///
/// Defaults are the reference pool set in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Gravity (m/s²).
    pub g: f64,
    /// Rolling resistance coefficient.
    pub mu: f64,
    /// Ball–cloth sliding friction.
    pub mu_s: f64,
    /// Ball–cushion friction. Not read by the current cushion models.
    pub mu_c: f64,
    /// Scale of the torque that bleeds off vertical-axis spin.
    pub rho: f64,
    /// Ball mass (kg).
    pub m: f64,
    /// Ball radius (m).
    pub r: f64,
    /// Cushion restitution.
    pub e: f64,
    /// Ball–ball restitution.
    pub ball_restitution: f64,
    /// Table friction used inside the Mathaven cushion solver.
    pub mathaven_mu_s: f64,
    /// Cushion friction used inside the Mathaven cushion solver.
    pub mathaven_mu_w: f64,
    /// Ball–ball friction curve `a + b·exp(-c·v)`, as `[a, b, c]`.
    pub throw_friction: [f64; 3],
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            g: 9.8,
            mu: 0.00985,
            mu_s: 0.16,
            mu_c: 0.8,
            rho: 0.034,
            m: 0.23,
            r: 0.03275,
            e: 0.86,
            ball_restitution: 0.98,
            mathaven_mu_s: 0.212,
            mathaven_mu_w: 0.14,
            throw_friction: [0.01, 0.108, 1.088],
        }
    }
}

impl PhysicsConstants {
    /// Torque about the vertical axis from cloth friction.
    pub fn mz(&self) -> f64 {
        (self.mu * self.m * self.g * 2.0 / 3.0) * self.rho
    }

    /// Rolling resistance torque in the table plane.
    pub fn mxy(&self) -> f64 {
        7.0 / (5.0 * std::f64::consts::SQRT_2) * self.r * self.mu * self.m * self.g
    }

    /// Moment of inertia of a solid sphere.
    pub fn inertia(&self) -> f64 {
        2.0 / 5.0 * self.m * self.r * self.r
    }

    /// Ball–ball friction for a given relative slip speed.
    pub fn throw_mu(&self, v_rel: f64) -> f64 {
        let [a, b, c] = self.throw_friction;
        a + b * (-c * v_rel).exp()
    }

    /// Same constants with a different ball radius.
    pub fn with_radius(mut self, r: f64) -> Self {
        self.r = r;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_values_follow_inputs() {
        let c = PhysicsConstants::default();
        let expected_i = 0.4 * 0.23 * 0.03275 * 0.03275;
        assert!((c.inertia() - expected_i).abs() < 1e-15);
        assert!(c.mz() > 0.0 && c.mxy() > 0.0);

        let bigger = c.with_radius(0.05);
        assert!(bigger.inertia() > c.inertia());
        assert!(bigger.mxy() > c.mxy());
        assert_eq!(bigger.mz(), c.mz(), "vertical torque does not depend on radius");
    }

    #[test]
    fn throw_friction_decays_with_speed() {
        let c = PhysicsConstants::default();
        assert!((c.throw_mu(0.0) - 0.118).abs() < 1e-12);
        assert!(c.throw_mu(5.0) < c.throw_mu(1.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: PhysicsConstants = serde_json::from_str(r#"{ "mu_s": 0.2 }"#).unwrap();
        assert_eq!(c.mu_s, 0.2);
        assert_eq!(c.m, 0.23);
    }
}
