use baize_engine::{
    CueStrike, FrameBuffer, Layout, PhysicsError, ProtocolLayout, Rack, SimConfig, Simulation,
    TableGeometry, TableSnapshot,
};

/// Named starting layouts the host can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RackKind {
    Triangle,
    Diamond,
    ThreeCushion,
}

impl RackKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "triangle" => Some(RackKind::Triangle),
            "diamond" => Some(RackKind::Diamond),
            "three_cushion" => Some(RackKind::ThreeCushion),
            _ => None,
        }
    }

    /// Adjust the table for this rack. Carom racks play on a pocketless table.
    pub fn configure(self, mut config: SimConfig) -> SimConfig {
        if self == RackKind::ThreeCushion {
            config.table.has_pockets = false;
        }
        config
    }

    pub fn layout(self, config: &SimConfig) -> Layout {
        let r = config.constants.r;
        let table = TableGeometry::new(&config.table, r);
        match self {
            RackKind::Triangle => Rack::triangle(&table, r),
            RackKind::Diamond => Rack::diamond(&table, r),
            RackKind::ThreeCushion => Rack::three_cushion(&table),
        }
    }
}

/// Owns the simulation and the frame the host reads after every tick.
///
/// Kept free of wasm-bindgen so it can be driven from native tests.
pub struct SimRunner {
    sim: Simulation,
    rack: RackKind,
    frame: FrameBuffer,
    layout: ProtocolLayout,
}

impl SimRunner {
    pub fn new(config: SimConfig, rack: RackKind) -> Result<Self, PhysicsError> {
        let config = rack.configure(config);
        let layout = ProtocolLayout::from_config(&config);
        let frame = FrameBuffer::new(&layout);
        let sim = Simulation::new(config.clone(), rack.layout(&config))?;
        let mut runner = Self {
            sim,
            rack,
            frame,
            layout,
        };
        runner.capture();
        Ok(runner)
    }

    /// Run the physics ticks due after `dt` seconds and refresh the frame.
    /// The frame is refreshed even when a tick fails so the host sees the
    /// halted flag.
    pub fn tick(&mut self, dt: f64) -> Result<u32, PhysicsError> {
        let result = self.sim.frame(dt);
        self.capture();
        result
    }

    pub fn hit(&mut self, strike: CueStrike) -> Result<(), PhysicsError> {
        self.sim.hit(strike)
    }

    /// Re-rack the layout chosen at init.
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        let layout = self.rack.layout(self.sim.config());
        self.sim.reset(layout)?;
        self.capture();
        Ok(())
    }

    pub fn serialise(&self) -> Result<String, PhysicsError> {
        self.sim
            .table()
            .serialise()
            .to_json()
            .map_err(PhysicsError::Snapshot)
    }

    /// Move balls to the positions in a JSON snapshot.
    pub fn restore(&mut self, json: &str) -> Result<(), PhysicsError> {
        let snapshot = TableSnapshot::from_json(json).map_err(PhysicsError::Snapshot)?;
        self.sim.table_mut().update_from_serialised(&snapshot)?;
        self.capture();
        Ok(())
    }

    fn capture(&mut self) {
        let outcomes = self.sim.drain_outcomes();
        self.frame
            .capture(self.sim.table(), &outcomes, self.sim.is_halted());
    }

    pub fn all_stationary(&self) -> bool {
        self.sim.is_settled()
    }

    pub fn is_halted(&self) -> bool {
        self.sim.is_halted()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    // ---- Pointer accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.frame.header_ptr()
    }

    pub fn balls_ptr(&self) -> *const f32 {
        self.frame.balls_ptr()
    }

    pub fn ball_count(&self) -> u32 {
        self.frame.ball_count()
    }

    pub fn outcomes_ptr(&self) -> *const f32 {
        self.frame.outcomes_ptr()
    }

    pub fn outcome_count(&self) -> u32 {
        self.frame.outcome_count()
    }

    // ---- Capacity accessors ----

    pub fn max_balls(&self) -> u32 {
        self.layout.max_balls as u32
    }

    pub fn max_outcomes(&self) -> u32 {
        self.layout.max_outcomes as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> SimRunner {
        SimRunner::new(SimConfig::default(), RackKind::ThreeCushion).unwrap()
    }

    #[test]
    fn parses_rack_names() {
        assert_eq!(RackKind::parse("diamond"), Some(RackKind::Diamond));
        assert_eq!(RackKind::parse("snooker"), None);
    }

    #[test]
    fn three_cushion_table_has_no_pockets() {
        let mut runner = runner();
        assert!(runner.sim.table().pockets().is_empty());
        assert!(!runner.sim.config().table.has_pockets);
        runner.reset().unwrap();
        assert!(runner.sim.table().pockets().is_empty());

        let pool = SimRunner::new(SimConfig::default(), RackKind::Triangle).unwrap();
        assert_eq!(pool.sim.table().pockets().len(), 6);
    }

    #[test]
    fn init_captures_first_frame() {
        let runner = runner();
        assert_eq!(runner.ball_count(), 3);
        assert_eq!(runner.outcome_count(), 0);
        assert!(runner.all_stationary());
    }

    #[test]
    fn hit_outcome_reaches_next_frame() {
        let mut runner = runner();
        runner.hit(CueStrike::new(0.0, 1.0)).unwrap();
        runner.tick(0.005).unwrap();
        assert!(runner.outcome_count() >= 1);
        assert_eq!(runner.frame().outcomes()[0].kind, 3.0);
        assert!(!runner.all_stationary());
        runner.tick(0.005).unwrap();
        assert_eq!(runner.outcome_count(), 0, "outcomes are per frame");
    }

    #[test]
    fn restore_moves_balls() {
        let mut runner = runner();
        let json = r#"{ "balls": [ { "id": 1, "pos": [0.1, 0.2, 0.0] } ] }"#;
        runner.restore(json).unwrap();
        let yellow = runner.frame().balls()[1];
        assert_eq!((yellow.x, yellow.y), (0.1, 0.2));
        assert!(runner.restore("not json").is_err());
    }

    #[test]
    fn reset_reracks() {
        let mut runner = runner();
        let before = runner.serialise().unwrap();
        runner.hit(CueStrike::new(0.5, 2.0)).unwrap();
        runner.tick(0.2).unwrap();
        runner.reset().unwrap();
        assert_eq!(runner.serialise().unwrap(), before);
    }
}
