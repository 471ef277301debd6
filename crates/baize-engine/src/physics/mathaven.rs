//! Mathaven cushion model: integrates the impact in small impulse steps
//! through a compression phase and an energy-based restitution phase.
//!
//! Works in its own frame where the ball approaches the cushion along +y.

use std::f64::consts::TAU;

use crate::api::error::PhysicsError;

/// Sine of the cushion contact angle above the ball centre.
const SIN_THETA: f64 = 2.0 / 5.0;
/// Cosine of the cushion contact angle (√21/5).
const COS_THETA: f64 = 0.916_515_138_991_168;

/// Substeps per phase at nominal speed.
const N: u32 = 100;

/// Ball state inside the solver frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImpactState {
    pub vx: f64,
    pub vy: f64,
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

#[derive(Debug, Clone)]
pub struct Mathaven {
    m: f64,
    r: f64,
    ee: f64,
    mu_s: f64,
    mu_w: f64,
}

/// Per-solve scratch: current state, work done, and the substep counter.
struct Run {
    s: ImpactState,
    work: f64,
    steps: u32,
}

impl Mathaven {
    /// `ee` is the cushion restitution, `mu_s` table friction and `mu_w`
    /// cushion friction.
    pub fn new(m: f64, r: f64, ee: f64, mu_s: f64, mu_w: f64) -> Self {
        Self { m, r, ee, mu_s, mu_w }
    }

    /// Rebound state for a ball arriving with `incident`.
    pub fn solve(&self, incident: ImpactState) -> Result<ImpactState, PhysicsError> {
        let mut run = Run {
            s: incident,
            work: 0.0,
            steps: 0,
        };

        // compression
        let dp = (self.m * run.s.vy / N as f64).max(0.001);
        while run.s.vy > 0.0 {
            self.step(&mut run, dp)?;
        }

        // restitution
        let target = self.ee * self.ee * run.work;
        let dp = (target / N as f64).max(0.001);
        run.work = 0.0;
        while run.work < target {
            self.step(&mut run, dp)?;
        }

        Ok(run.s)
    }

    fn step(&self, run: &mut Run, dp: f64) -> Result<(), PhysicsError> {
        let (phi, phi_c) = self.slip_angles(&run.s);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_phi_c, cos_phi_c) = phi_c.sin_cos();
        let (m, r, mu_s, mu_w) = (self.m, self.r, self.mu_s, self.mu_w);
        let table_term = SIN_THETA + mu_w * sin_phi * COS_THETA;

        let s = &mut run.s;
        s.vx -= (1.0 / m) * (mu_w * cos_phi + mu_s * cos_phi_c * table_term) * dp;
        s.vy -= (1.0 / m)
            * (COS_THETA - mu_w * SIN_THETA * sin_phi + mu_s * sin_phi_c * table_term)
            * dp;

        let k = 5.0 / (2.0 * m * r);
        s.wx += -k * (mu_w * sin_phi + mu_s * sin_phi_c * table_term) * dp;
        s.wy += -k * (mu_w * cos_phi * SIN_THETA - mu_s * cos_phi_c * table_term) * dp;
        s.wz += k * (mu_w * cos_phi * COS_THETA) * dp;

        run.work += dp * s.vy.abs();

        run.steps += 1;
        if run.steps > 10 * N {
            return Err(PhysicsError::CushionSolverDiverged { steps: run.steps });
        }
        Ok(())
    }

    /// Slip directions at the cushion contact (I) and the cloth contact (C),
    /// both in [0, 2π).
    fn slip_angles(&self, s: &ImpactState) -> (f64, f64) {
        let r = self.r;
        let vx_i = s.vx + s.wy * r * SIN_THETA - s.wz * r * COS_THETA;
        let vy_i = -s.vy * SIN_THETA + s.wx * r;
        let vx_c = s.vx - s.wy * r;
        let vy_c = s.vy + s.wx * r;
        (
            vy_i.atan2(vx_i).rem_euclid(TAU),
            vy_c.atan2(vx_c).rem_euclid(TAU),
        )
    }
}
