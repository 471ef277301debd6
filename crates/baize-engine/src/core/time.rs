/// Fixed timestep accumulator.
/// Turns variable host frame times into whole physics ticks so the simulation
/// result does not depend on the display refresh rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per tick, in seconds.
    dt: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
    /// Optional bound on ticks per frame. Excess backlog is dropped.
    step_cap: Option<u32>,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            step_cap: None,
        }
    }

    /// Limit the ticks produced by a single `accumulate` call.
    pub fn with_step_cap(mut self, cap: u32) -> Self {
        self.step_cap = Some(cap);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// The remainder carries over to the next call.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if !(frame_dt > 0.0) {
            return 0;
        }
        self.accumulator += frame_dt;
        let mut steps = (self.accumulator / self.dt) as u32;
        if let Some(cap) = self.step_cap {
            if steps > cap {
                log::warn!(
                    "timestep backlog of {} ticks exceeds cap {}, dropping {:.3}s",
                    steps,
                    cap,
                    (steps - cap) as f64 * self.dt
                );
                steps = cap;
                self.accumulator = self.dt * cap as f64;
            }
        }
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Forget any carried remainder.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
