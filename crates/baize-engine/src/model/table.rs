//! The table: every ball plus the fixed geometry, stepped with a
//! collision-consistent scheduler.
//!
//! Each tick repeatedly asks "can everything advance by `t` without touching
//! anything?". The first predicted contact is resolved in place (velocities
//! only) and the whole pass starts over, because one resolution can change
//! the answer for pairs already checked. Positions move only once a pass
//! comes back clean.

use glam::DVec3;

use crate::api::config::SimConfig;
use crate::api::error::PhysicsError;
use crate::api::types::{BallId, BallState};
use crate::core::constants::PhysicsConstants;
use crate::model::ball::Ball;
use crate::model::cue::CueStrike;
use crate::model::geometry::{PocketGeometry, TableGeometry};
use crate::model::outcome::Outcome;
use crate::model::rack::Layout;
use crate::model::snapshot::{BallSnapshot, TableSnapshot};
use crate::physics::collision;
use crate::physics::cushion::{CushionModel, Rails};
use crate::physics::knuckle::Knuckle;
use crate::physics::pocket::Pocket;

/// Resolution passes allowed within one tick before giving up.
pub const MAX_RESOLUTION_DEPTH: u32 = 100;

pub struct Table {
    balls: Vec<Ball>,
    /// Every unordered ball pair, `(i, j)` with `i < j`.
    pairs: Vec<(usize, usize)>,
    cue_ball: BallId,
    outcomes: Vec<Outcome>,
    constants: PhysicsConstants,
    cushion_model: CushionModel,
    geometry: TableGeometry,
    pocket_geometry: Option<PocketGeometry>,
    pockets: Vec<Pocket>,
    knuckles: Vec<Knuckle>,
    /// Simulated seconds since construction.
    clock: f64,
}

impl Table {
    pub fn new(config: &SimConfig, layout: Layout) -> Result<Self, PhysicsError> {
        if layout.positions.is_empty() {
            return Err(PhysicsError::EmptyTable);
        }
        if layout.cue_ball.index() >= layout.positions.len() {
            return Err(PhysicsError::UnknownBall(layout.cue_ball));
        }

        let constants = config.constants;
        let geometry = TableGeometry::new(&config.table, constants.r);
        let pocket_geometry = geometry
            .has_pockets
            .then(|| PocketGeometry::new(&geometry, constants.r));
        let pockets = pocket_geometry.as_ref().map(|g| g.pockets()).unwrap_or_default();
        let knuckles = pocket_geometry.as_ref().map(|g| g.knuckles()).unwrap_or_default();

        let balls: Vec<Ball> = layout
            .positions
            .iter()
            .enumerate()
            .map(|(i, pos)| Ball::new(BallId(i as u32), *pos))
            .collect();

        let mut table = Self {
            pairs: Vec::new(),
            balls,
            cue_ball: layout.cue_ball,
            outcomes: Vec::new(),
            constants,
            cushion_model: config.cushion_model,
            geometry,
            pocket_geometry,
            pockets,
            knuckles,
            clock: 0.0,
        };
        table.initialise_pairs();
        log::info!(
            "table ready: {} balls, {:?} cushions, pockets={}",
            table.balls.len(),
            table.cushion_model,
            table.geometry.has_pockets
        );
        Ok(table)
    }

    fn initialise_pairs(&mut self) {
        let n = self.balls.len();
        self.pairs = (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .collect();
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance every ball by `t` seconds, resolving all contacts on the way.
    pub fn advance(&mut self, t: f64) -> Result<(), PhysicsError> {
        let mut depth = 0;
        while !self.prepare_advance_all(t)? {
            depth += 1;
            if depth > MAX_RESOLUTION_DEPTH {
                log::error!("gave up resolving contacts after {} passes", depth);
                return Err(PhysicsError::ResolutionDepthExceeded { depth, dt: t });
            }
        }
        let c = &self.constants;
        for ball in &mut self.balls {
            ball.update(t, c, &mut self.pockets);
        }
        self.clock += t;
        Ok(())
    }

    /// One evaluation pass. Resolves the first predicted contact and returns
    /// `false`, or returns `true` when nothing would touch.
    fn prepare_advance_all(&mut self, t: f64) -> Result<bool, PhysicsError> {
        for k in 0..self.pairs.len() {
            let (i, j) = self.pairs[k];
            if !self.prepare_advance_pair(i, j, t) {
                return Ok(false);
            }
        }
        for i in 0..self.balls.len() {
            if !self.prepare_advance_to_cushions(i, t)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn prepare_advance_pair(&mut self, i: usize, j: usize, t: f64) -> bool {
        let c = &self.constants;
        let (head, tail) = self.balls.split_at_mut(j);
        let (a, b) = (&mut head[i], &mut tail[0]);
        if !collision::will_collide(a, b, t, c) {
            return true;
        }
        let speed = collision::collide(a, b, c);
        log::trace!("{} hit {} at {:.3} m/s", a.id, b.id, speed);
        self.outcomes
            .push(Outcome::collision(a.id, b.id, speed, self.clock));
        false
    }

    fn prepare_advance_to_cushions(&mut self, i: usize, t: f64) -> Result<bool, PhysicsError> {
        let c = &self.constants;
        let ball = &mut self.balls[i];
        if !ball.on_table() {
            return Ok(true);
        }
        if self.geometry.is_clear(ball.future_position(t)) {
            return Ok(true);
        }

        let rails = Rails {
            table: &self.geometry,
            pockets: self.pocket_geometry.as_ref(),
        };
        if let Some(speed) = rails.bounce_any(ball, t, self.cushion_model, c)? {
            log::trace!("{} cushion at {:.3} m/s", ball.id, speed);
            self.outcomes.push(Outcome::cushion(ball.id, speed, self.clock));
            return Ok(false);
        }

        if let Some(knuckle) = Knuckle::find_bouncing(&self.knuckles, ball, t, c) {
            let speed = knuckle.bounce(ball, c);
            log::trace!("{} knuckle at {:.3} m/s", ball.id, speed);
            self.outcomes.push(Outcome::cushion(ball.id, speed, self.clock));
            return Ok(false);
        }

        if let Some(pocket) = Pocket::find_pocket(&self.pockets, ball, t) {
            let speed = pocket.fall(ball, t, c);
            self.outcomes
                .push(Outcome::pot(ball.id, pocket.id, speed, self.clock));
            return Ok(false);
        }

        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Queries and commands
    // -----------------------------------------------------------------------

    /// Strike the cue ball.
    pub fn hit(&mut self, strike: &CueStrike) {
        let c = &self.constants;
        let cue = &mut self.balls[self.cue_ball.index()];
        cue.hit(strike.angle, strike.power, strike.english(), c);
        self.outcomes
            .push(Outcome::hit(self.cue_ball, strike.power, self.clock));
        log::debug!("cue strike {:?}", strike);
    }

    pub fn all_stationary(&self) -> bool {
        self.balls.iter().all(|b| !b.in_motion())
    }

    /// Number of balls off the cloth (falling or pocketed).
    pub fn in_pockets(&self) -> usize {
        self.balls.iter().filter(|b| !b.on_table()).count()
    }

    /// Stop every ball where it is.
    pub fn halt(&mut self) {
        for ball in &mut self.balls {
            ball.set_stationary();
        }
    }

    /// Whether a ball at `pos` would overlap any ball other than `excluding`.
    pub fn overlaps_any(&self, pos: DVec3, excluding: BallId) -> bool {
        self.balls
            .iter()
            .filter(|b| b.id != excluding)
            .any(|b| b.pos.distance(pos) < 2.0 * self.constants.r)
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.index())
    }

    /// Mutable access for ball placement by a rules layer.
    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(id.index())
    }

    pub fn cue_ball(&self) -> BallId {
        self.cue_ball
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    pub fn constants(&self) -> &PhysicsConstants {
        &self.constants
    }

    pub fn cushion_model(&self) -> CushionModel {
        self.cushion_model
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Events raised since the last drain.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn drain_outcomes(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.outcomes)
    }

    // -----------------------------------------------------------------------
    // Serialisation
    // -----------------------------------------------------------------------

    /// Positions of every ball, keyed by id.
    pub fn serialise(&self) -> TableSnapshot {
        TableSnapshot {
            balls: self
                .balls
                .iter()
                .map(|b| BallSnapshot {
                    id: b.id,
                    pos: b.pos,
                    vel: None,
                    rvel: None,
                })
                .collect(),
        }
    }

    /// Build a table from a snapshot. Ball ids must cover `0..n`.
    pub fn from_serialised(
        config: &SimConfig,
        snapshot: &TableSnapshot,
        cue_ball: BallId,
    ) -> Result<Self, PhysicsError> {
        let n = snapshot.balls.len();
        let mut positions = vec![None; n];
        for b in &snapshot.balls {
            match positions.get_mut(b.id.index()) {
                Some(slot) if slot.is_none() => *slot = Some(b.pos),
                _ => return Err(PhysicsError::UnknownBall(b.id)),
            }
        }
        let positions = positions.into_iter().flatten().collect();
        let mut table = Self::new(config, Layout { positions, cue_ball })?;
        table.update_from_serialised(snapshot)?;
        Ok(table)
    }

    /// Overwrite the listed balls from a snapshot. A ball restored with a
    /// non-zero velocity or spin is sliding, every other ball is stationary.
    /// Pocket contents are forgotten.
    pub fn update_from_serialised(&mut self, snapshot: &TableSnapshot) -> Result<(), PhysicsError> {
        if let Some(bad) = snapshot.balls.iter().find(|b| b.id.index() >= self.balls.len()) {
            return Err(PhysicsError::UnknownBall(bad.id));
        }
        for s in &snapshot.balls {
            let ball = &mut self.balls[s.id.index()];
            ball.pos = s.pos;
            ball.vel = s.vel.unwrap_or(DVec3::ZERO);
            ball.rvel = s.rvel.unwrap_or(DVec3::ZERO);
            ball.state = if ball.vel == DVec3::ZERO && ball.rvel == DVec3::ZERO {
                BallState::Stationary
            } else {
                BallState::Sliding
            };
            ball.pocket = None;
        }
        self.reset_pockets();
        Ok(())
    }

    /// Flat `[x0, y0, x1, y1, ...]` in id order.
    pub fn short_serialise(&self) -> Vec<f64> {
        self.balls.iter().flat_map(|b| [b.pos.x, b.pos.y]).collect()
    }

    /// Place every ball from a flat position list and stop everything.
    pub fn update_from_short_serialised(&mut self, data: &[f64]) -> Result<(), PhysicsError> {
        let expected = self.balls.len() * 2;
        if data.len() != expected {
            return Err(PhysicsError::ShortSnapshotLength {
                expected,
                got: data.len(),
            });
        }
        for (ball, xy) in self.balls.iter_mut().zip(data.chunks_exact(2)) {
            ball.pos = DVec3::new(xy[0], xy[1], 0.0);
            ball.set_stationary();
            ball.pocket = None;
        }
        self.reset_pockets();
        Ok(())
    }

    fn reset_pockets(&mut self) {
        for pocket in &mut self.pockets {
            pocket.clear();
        }
    }
}
