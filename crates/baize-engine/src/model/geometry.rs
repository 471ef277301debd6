//! Table dimensions and the pocket/knuckle layout, all scaled from the ball
//! radius. Origin at the table centre, long axis along x.

use glam::DVec3;

use crate::api::config::TableConfig;
use crate::api::types::PocketId;
use crate::physics::knuckle::Knuckle;
use crate::physics::pocket::Pocket;

/// Reachable cloth and rail lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableGeometry {
    /// Largest |x| a ball centre reaches before touching a short rail.
    pub table_x: f64,
    /// Largest |y| a ball centre reaches before touching a long rail.
    pub table_y: f64,
    /// Short rail line.
    pub x: f64,
    /// Long rail line.
    pub y: f64,
    pub has_pockets: bool,
}

impl TableGeometry {
    pub fn new(config: &TableConfig, ball_radius: f64) -> Self {
        let table_x = config.half_length_radii * ball_radius;
        let table_y = config.half_width_radii * ball_radius;
        Self {
            table_x,
            table_y,
            x: table_x + ball_radius,
            y: table_y + ball_radius,
            has_pockets: config.has_pockets,
        }
    }

    /// Inside the open cloth, away from every rail.
    pub fn is_clear(&self, pos: DVec3) -> bool {
        pos.x.abs() < self.table_x && pos.y.abs() < self.table_y
    }
}

/// The two knuckles bounding a pocket mouth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PocketMouth {
    pub centre: DVec3,
    pub radius: f64,
    /// Knuckle on the left, looking into the pocket from the table.
    pub left: Knuckle,
    pub right: Knuckle,
}

/// Pocket and knuckle positions for a pocketed table.
#[derive(Debug, Clone, PartialEq)]
pub struct PocketGeometry {
    pub nw: PocketMouth,
    pub n: PocketMouth,
    pub ne: PocketMouth,
    pub sw: PocketMouth,
    pub s: PocketMouth,
    pub se: PocketMouth,
    pub knuckle_inset: f64,
    pub knuckle_radius: f64,
    pub middle_knuckle_inset: f64,
    pub middle_knuckle_radius: f64,
    pub corner_radius: f64,
    pub middle_radius: f64,
}

impl PocketGeometry {
    pub fn new(table: &TableGeometry, r: f64) -> Self {
        let px = table.table_x + r * 1.6;
        let py = table.table_y + r * 1.6;
        let knuckle_inset = r * 3.2;
        let knuckle_radius = r * 0.62;
        let middle_knuckle_inset = r * 2.77;
        let middle_knuckle_radius = r * 0.4;
        let corner_radius = r * 2.2;
        let middle_radius = r * 1.8;
        let (x, y) = (table.x, table.y);

        let k = |kx: f64, ky: f64, radius: f64| Knuckle::new(DVec3::new(kx, ky, 0.0), radius);

        let nw = PocketMouth {
            centre: DVec3::new(-px, py, 0.0),
            radius: corner_radius,
            left: k(-x - knuckle_radius, y - knuckle_inset, knuckle_radius),
            right: k(-x + knuckle_inset, y + knuckle_radius, knuckle_radius),
        };
        let n = PocketMouth {
            centre: DVec3::new(0.0, py + r * 1.4, 0.0),
            radius: middle_radius,
            left: k(-middle_knuckle_inset, y + middle_knuckle_radius, middle_knuckle_radius),
            right: k(middle_knuckle_inset, y + middle_knuckle_radius, middle_knuckle_radius),
        };
        let ne = PocketMouth {
            centre: DVec3::new(px, py, 0.0),
            radius: corner_radius,
            left: k(x - knuckle_inset, y + knuckle_radius, knuckle_radius),
            right: k(x + knuckle_radius, y - knuckle_inset, knuckle_radius),
        };
        let se = PocketMouth {
            centre: DVec3::new(px, -py, 0.0),
            radius: corner_radius,
            left: k(x + knuckle_radius, -y + knuckle_inset, knuckle_radius),
            right: k(x - knuckle_inset, -y - knuckle_radius, knuckle_radius),
        };
        let s = PocketMouth {
            centre: DVec3::new(0.0, -py - r * 1.4, 0.0),
            radius: middle_radius,
            left: k(middle_knuckle_inset, -y - middle_knuckle_radius, middle_knuckle_radius),
            right: k(-middle_knuckle_inset, -y - middle_knuckle_radius, middle_knuckle_radius),
        };
        let sw = PocketMouth {
            centre: DVec3::new(-px, -py, 0.0),
            radius: corner_radius,
            left: k(-x + knuckle_inset, -y - knuckle_radius, knuckle_radius),
            right: k(-x - knuckle_radius, -y + knuckle_inset, knuckle_radius),
        };

        Self {
            nw,
            n,
            ne,
            sw,
            s,
            se,
            knuckle_inset,
            knuckle_radius,
            middle_knuckle_inset,
            middle_knuckle_radius,
            corner_radius,
            middle_radius,
        }
    }

    fn mouths(&self) -> [&PocketMouth; 6] {
        [&self.nw, &self.sw, &self.n, &self.s, &self.ne, &self.se]
    }

    /// Fresh pockets with empty resting maps, indexed by `PocketId`.
    pub fn pockets(&self) -> Vec<Pocket> {
        self.mouths()
            .iter()
            .enumerate()
            .map(|(i, m)| Pocket::new(PocketId(i as u32), m.centre, m.radius))
            .collect()
    }

    /// All twelve knuckles.
    pub fn knuckles(&self) -> Vec<Knuckle> {
        self.mouths()
            .iter()
            .flat_map(|m| [m.left, m.right])
            .collect()
    }

    /// x ranges of the four long cushion segments (top and bottom share them).
    pub fn long_segments(&self) -> [(f64, f64); 2] {
        [
            (self.nw.right.pos.x, self.n.left.pos.x),
            (self.n.right.pos.x, self.ne.left.pos.x),
        ]
    }

    /// y range of the short cushion segments (left and right share it).
    pub fn short_segment(&self) -> (f64, f64) {
        (self.sw.right.pos.y, self.nw.left.pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> (TableGeometry, PocketGeometry) {
        let r = 0.03275;
        let table = TableGeometry::new(&TableConfig::default(), r);
        let pockets = PocketGeometry::new(&table, r);
        (table, pockets)
    }

    #[test]
    fn table_scales_from_radius() {
        let (table, _) = geometry();
        assert!((table.table_x - 43.0 * 0.03275).abs() < 1e-12);
        assert!((table.y - 22.0 * 0.03275).abs() < 1e-12);
        assert!(table.is_clear(DVec3::ZERO));
        assert!(!table.is_clear(DVec3::new(table.table_x + 0.001, 0.0, 0.0)));
    }

    #[test]
    fn six_pockets_twelve_knuckles() {
        let (_, geometry) = geometry();
        let pockets = geometry.pockets();
        assert_eq!(pockets.len(), 6);
        for (i, p) in pockets.iter().enumerate() {
            assert_eq!(p.id, PocketId(i as u32));
        }
        assert_eq!(geometry.knuckles().len(), 12);
    }

    #[test]
    fn layout_is_symmetric() {
        let (_, g) = geometry();
        assert_eq!(g.nw.centre.x, -g.ne.centre.x);
        assert_eq!(g.nw.centre.y, -g.sw.centre.y);
        assert_eq!(g.n.centre.y, -g.s.centre.y);
        assert_eq!(g.nw.right.pos.x, -g.ne.left.pos.x);
        assert_eq!(g.se.right.pos.y, g.sw.left.pos.y);
    }

    #[test]
    fn cushion_segments_stop_at_knuckles() {
        let (table, g) = geometry();
        let [(a0, a1), (b0, b1)] = g.long_segments();
        assert!(a0 > -table.x && a0 < a1 && a1 < 0.0);
        assert!(b0 > 0.0 && b0 < b1 && b1 < table.x);
        let (lo, hi) = g.short_segment();
        assert!(lo < 0.0 && hi > 0.0 && hi < table.y);
        assert_eq!(lo, -hi);
    }

    #[test]
    fn ball_near_middle_pocket_falls() {
        let (_, g) = geometry();
        let pockets = g.pockets();
        let s = &pockets[3];
        assert_eq!(s.pos, g.s.centre);
        let edge = s.pos.y + g.middle_radius + 0.01;
        let mut ball = crate::model::ball::Ball::new(crate::BallId(0), DVec3::new(0.0, edge, 0.0));
        ball.vel.y = -1.0;
        let found = Pocket::find_pocket(&pockets, &ball, 0.1);
        assert!(found.is_some(), "ball heading into the middle pocket should fall");
    }
}
