use crate::api::config::SimConfig;
use crate::api::error::PhysicsError;
use crate::core::time::FixedTimestep;
use crate::model::cue::CueStrike;
use crate::model::outcome::Outcome;
use crate::model::rack::Layout;
use crate::model::table::Table;

/// Host-facing driver: turns variable frame times into fixed physics ticks
/// on one table.
///
/// A failed tick latches the simulation. Later frames return
/// [`PhysicsError::Halted`] until [`Simulation::reset`] racks a new table.
pub struct Simulation {
    config: SimConfig,
    table: Table,
    timestep: FixedTimestep,
    failure: Option<String>,
}

impl Simulation {
    pub fn new(config: SimConfig, layout: Layout) -> Result<Self, PhysicsError> {
        let table = Table::new(&config, layout)?;
        let timestep = Self::timestep_for(&config);
        Ok(Self {
            config,
            table,
            timestep,
            failure: None,
        })
    }

    fn timestep_for(config: &SimConfig) -> FixedTimestep {
        let timestep = FixedTimestep::new(config.fixed_dt);
        match config.step_cap {
            Some(cap) => timestep.with_step_cap(cap),
            None => timestep,
        }
    }

    /// Replace the table with a fresh layout and clear any failure.
    pub fn reset(&mut self, layout: Layout) -> Result<(), PhysicsError> {
        self.table = Table::new(&self.config, layout)?;
        self.timestep.reset();
        self.failure = None;
        Ok(())
    }

    /// Strike the cue ball. Offsets and power are clamped to the cue limits.
    pub fn hit(&mut self, strike: CueStrike) -> Result<(), PhysicsError> {
        if let Some(reason) = &self.failure {
            return Err(PhysicsError::Halted(reason.clone()));
        }
        let strike = strike.clamped(self.table.constants().r);
        self.table.hit(&strike);
        Ok(())
    }

    /// Run every physics tick due after `elapsed` seconds of host time.
    /// Returns the number of ticks run.
    pub fn frame(&mut self, elapsed: f64) -> Result<u32, PhysicsError> {
        if let Some(reason) = &self.failure {
            return Err(PhysicsError::Halted(reason.clone()));
        }
        let steps = self.timestep.accumulate(elapsed);
        let dt = self.timestep.dt();
        for step in 0..steps {
            if let Err(err) = self.table.advance(dt) {
                log::error!("tick {} of {} failed: {}", step + 1, steps, err);
                self.failure = Some(err.to_string());
                return Err(err);
            }
        }
        Ok(steps)
    }

    pub fn is_halted(&self) -> bool {
        self.failure.is_some()
    }

    pub fn is_settled(&self) -> bool {
        self.table.all_stationary()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn drain_outcomes(&mut self) -> Vec<Outcome> {
        self.table.drain_outcomes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BallId, BallState};
    use crate::model::geometry::TableGeometry;
    use crate::model::rack::Rack;
    use glam::DVec3;

    fn sim() -> Simulation {
        let config = SimConfig::default();
        let table = TableGeometry::new(&config.table, config.constants.r);
        let layout = Rack::triangle(&table, config.constants.r);
        Simulation::new(config, layout).unwrap()
    }

    #[test]
    fn frames_run_whole_ticks() {
        let mut sim = sim();
        assert_eq!(sim.frame(0.005).unwrap(), 2);
        assert_eq!(sim.frame(0.0031).unwrap(), 2);
        assert!((sim.table().clock() - 0.008).abs() < 1e-12);
    }

    #[test]
    fn strike_is_clamped() {
        let mut sim = sim();
        sim.hit(CueStrike::new(0.0, 1000.0).with_spin(2.0, 0.0)).unwrap();
        let r = sim.config().constants.r;
        let hit = sim.drain_outcomes()[0];
        assert!((hit.incident_speed - 160.0 * r).abs() < 1e-12);
        let cue = sim.table().ball(BallId(0)).unwrap();
        assert_eq!(cue.state, BallState::Sliding);
    }

    #[test]
    fn reset_restores_rack() {
        let mut sim = sim();
        sim.hit(CueStrike::new(0.0, 2.0)).unwrap();
        sim.frame(0.1).unwrap();
        let layout = Rack::single(DVec3::ZERO);
        sim.reset(layout).unwrap();
        assert_eq!(sim.table().balls().len(), 1);
        assert!(sim.is_settled());
        assert!(!sim.is_halted());
        assert_eq!(sim.table().clock(), 0.0);
    }
}
