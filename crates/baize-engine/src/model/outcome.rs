//! Events raised while the table runs, plus the queries rule layers ask of
//! a finished shot.

use serde::{Deserialize, Serialize};

use crate::api::types::{BallId, PocketId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Pot,
    Cushion,
    Collision,
    Hit,
}

impl OutcomeKind {
    /// Wire code used by the flat outcome buffer.
    pub fn code(self) -> u32 {
        match self {
            OutcomeKind::Pot => 0,
            OutcomeKind::Cushion => 1,
            OutcomeKind::Collision => 2,
            OutcomeKind::Hit => 3,
        }
    }
}

/// One physical event. Single-ball kinds carry the same ball in both slots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub ball_a: BallId,
    pub ball_b: BallId,
    /// Set for `Pot`.
    pub pocket: Option<PocketId>,
    pub incident_speed: f64,
    /// Simulated seconds since the table was created.
    pub timestamp: f64,
}

impl Outcome {
    pub fn pot(ball: BallId, pocket: PocketId, incident_speed: f64, timestamp: f64) -> Self {
        Self {
            kind: OutcomeKind::Pot,
            ball_a: ball,
            ball_b: ball,
            pocket: Some(pocket),
            incident_speed,
            timestamp,
        }
    }

    pub fn cushion(ball: BallId, incident_speed: f64, timestamp: f64) -> Self {
        Self::single(OutcomeKind::Cushion, ball, incident_speed, timestamp)
    }

    pub fn collision(a: BallId, b: BallId, incident_speed: f64, timestamp: f64) -> Self {
        Self {
            kind: OutcomeKind::Collision,
            ball_a: a,
            ball_b: b,
            pocket: None,
            incident_speed,
            timestamp,
        }
    }

    pub fn hit(ball: BallId, incident_speed: f64, timestamp: f64) -> Self {
        Self::single(OutcomeKind::Hit, ball, incident_speed, timestamp)
    }

    fn single(kind: OutcomeKind, ball: BallId, incident_speed: f64, timestamp: f64) -> Self {
        Self {
            kind,
            ball_a: ball,
            ball_b: ball,
            pocket: None,
            incident_speed,
            timestamp,
        }
    }

    /// Copy of the list where every collision involving `cue` names it first.
    pub fn cue_ball_first(cue: BallId, outcomes: &[Outcome]) -> Vec<Outcome> {
        outcomes
            .iter()
            .map(|o| {
                if o.kind == OutcomeKind::Collision && o.ball_b == cue {
                    Outcome {
                        ball_a: o.ball_b,
                        ball_b: o.ball_a,
                        ..*o
                    }
                } else {
                    *o
                }
            })
            .collect()
    }

    pub fn first_collision(outcomes: &[Outcome]) -> Option<&Outcome> {
        outcomes.iter().find(|o| o.kind == OutcomeKind::Collision)
    }

    pub fn pots(outcomes: &[Outcome]) -> Vec<BallId> {
        outcomes
            .iter()
            .filter(|o| o.kind == OutcomeKind::Pot)
            .map(|o| o.ball_a)
            .collect()
    }

    pub fn pot_count(outcomes: &[Outcome]) -> usize {
        outcomes.iter().filter(|o| o.kind == OutcomeKind::Pot).count()
    }

    pub fn is_cue_ball_potted(cue: BallId, outcomes: &[Outcome]) -> bool {
        outcomes
            .iter()
            .any(|o| o.kind == OutcomeKind::Pot && o.ball_a == cue)
    }

    /// At least one object ball dropped and the cue ball stayed up.
    pub fn potted_ball_no_foul(cue: BallId, outcomes: &[Outcome]) -> bool {
        outcomes
            .iter()
            .any(|o| o.kind == OutcomeKind::Pot && o.ball_a != cue)
            && !Self::is_cue_ball_potted(cue, outcomes)
    }

    pub fn cushion_count(ball: BallId, outcomes: &[Outcome]) -> usize {
        outcomes
            .iter()
            .filter(|o| o.kind == OutcomeKind::Cushion && o.ball_a == ball)
            .count()
    }

    /// Carom scoring: the cue ball touches both other balls, and touches at
    /// least three cushions before reaching the second of them.
    pub fn is_three_cushion_point(cue: BallId, outcomes: &[Outcome]) -> bool {
        let outcomes = Self::cue_ball_first(cue, outcomes);
        let mut first_contact: Option<BallId> = None;
        let mut cushions = 0;
        for o in &outcomes {
            match o.kind {
                OutcomeKind::Cushion if o.ball_a == cue => cushions += 1,
                OutcomeKind::Collision if o.ball_a == cue => match first_contact {
                    None => first_contact = Some(o.ball_b),
                    Some(first) if first != o.ball_b => return cushions >= 3,
                    Some(_) => {}
                },
                _ => {}
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUE: BallId = BallId(0);
    const YELLOW: BallId = BallId(1);
    const RED: BallId = BallId(2);

    #[test]
    fn collisions_are_canonicalised_cue_first() {
        let list = [
            Outcome::collision(YELLOW, CUE, 1.0, 0.0),
            Outcome::collision(YELLOW, RED, 1.0, 0.1),
        ];
        let fixed = Outcome::cue_ball_first(CUE, &list);
        assert_eq!(fixed[0].ball_a, CUE);
        assert_eq!(fixed[0].ball_b, YELLOW);
        assert_eq!(fixed[1], list[1]);
    }

    #[test]
    fn pot_queries() {
        let list = [
            Outcome::hit(CUE, 2.0, 0.0),
            Outcome::collision(CUE, RED, 1.5, 0.2),
            Outcome::pot(RED, PocketId(4), 0.8, 0.9),
        ];
        assert_eq!(Outcome::pots(&list), vec![RED]);
        assert_eq!(Outcome::pot_count(&list), 1);
        assert!(!Outcome::is_cue_ball_potted(CUE, &list));
        assert!(Outcome::potted_ball_no_foul(CUE, &list));
        assert_eq!(Outcome::first_collision(&list).map(|o| o.ball_b), Some(RED));
        assert_eq!(list[2].pocket, Some(PocketId(4)));
    }

    #[test]
    fn in_off_is_a_foul() {
        let list = [
            Outcome::pot(RED, PocketId(0), 0.8, 0.9),
            Outcome::pot(CUE, PocketId(1), 0.5, 1.1),
        ];
        assert!(Outcome::is_cue_ball_potted(CUE, &list));
        assert!(!Outcome::potted_ball_no_foul(CUE, &list));
    }

    #[test]
    fn three_cushions_before_second_ball_scores() {
        let list = [
            Outcome::hit(CUE, 3.0, 0.0),
            Outcome::collision(YELLOW, CUE, 2.0, 0.1),
            Outcome::cushion(CUE, 1.5, 0.2),
            Outcome::cushion(YELLOW, 1.0, 0.25),
            Outcome::cushion(CUE, 1.2, 0.3),
            Outcome::cushion(CUE, 1.0, 0.4),
            Outcome::collision(CUE, RED, 0.8, 0.5),
        ];
        assert!(Outcome::is_three_cushion_point(CUE, &list));
        assert_eq!(Outcome::cushion_count(CUE, &list), 3);
    }

    #[test]
    fn two_cushions_do_not_score() {
        let list = [
            Outcome::collision(CUE, YELLOW, 2.0, 0.1),
            Outcome::cushion(CUE, 1.5, 0.2),
            Outcome::cushion(CUE, 1.2, 0.3),
            Outcome::collision(CUE, YELLOW, 1.0, 0.35),
            Outcome::collision(CUE, RED, 0.8, 0.5),
            Outcome::cushion(CUE, 1.0, 0.6),
        ];
        assert!(!Outcome::is_three_cushion_point(CUE, &list));
    }
}
