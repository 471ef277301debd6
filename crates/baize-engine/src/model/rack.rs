//! Starting layouts. Index 0 is always the cue ball.

use glam::DVec3;

use crate::api::types::BallId;
use crate::model::geometry::TableGeometry;

/// Spacing between racked ball centres, in diameters.
const RACK_GAP: f64 = 1.02;

/// sin(60°): row spacing in an equilateral rack.
const ROW_SPACING: f64 = 0.866_025_403_784_438_6;

/// Ball start positions in id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub positions: Vec<DVec3>,
    pub cue_ball: BallId,
}

pub struct Rack;

impl Rack {
    /// Cue ball on the head spot, fifteen balls in a triangle on the foot spot.
    pub fn triangle(table: &TableGeometry, r: f64) -> Layout {
        Self::rows(table, r, &[1, 2, 3, 4, 5])
    }

    /// Cue ball on the head spot, nine balls in a diamond on the foot spot.
    pub fn diamond(table: &TableGeometry, r: f64) -> Layout {
        Self::rows(table, r, &[1, 2, 3, 2, 1])
    }

    /// White and yellow on the head string, red on the foot spot.
    pub fn three_cushion(table: &TableGeometry) -> Layout {
        let head = -table.table_x / 2.0;
        Layout {
            positions: vec![
                DVec3::new(head, -table.table_y / 4.0, 0.0),
                DVec3::new(head, 0.0, 0.0),
                DVec3::new(-head, 0.0, 0.0),
            ],
            cue_ball: BallId(0),
        }
    }

    /// Cue ball alone at `pos`.
    pub fn single(pos: DVec3) -> Layout {
        Layout {
            positions: vec![pos],
            cue_ball: BallId(0),
        }
    }

    fn rows(table: &TableGeometry, r: f64, counts: &[usize]) -> Layout {
        let gap = 2.0 * r * RACK_GAP;
        let apex = table.table_x / 2.0;
        let mut positions = vec![DVec3::new(-apex, 0.0, 0.0)];
        for (row, &count) in counts.iter().enumerate() {
            let x = apex + row as f64 * gap * ROW_SPACING;
            for i in 0..count {
                let y = (i as f64 - (count - 1) as f64 / 2.0) * gap;
                positions.push(DVec3::new(x, y, 0.0));
            }
        }
        Layout {
            positions,
            cue_ball: BallId(0),
        }
    }
}
