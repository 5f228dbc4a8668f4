//! Pool ball data: types, colors, and triangle rack layout.

use glam::Vec2;
use pool_engine::VectorColor;
use serde::{Deserialize, Serialize};

/// Ball type. Solids and stripes are the two assignable groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallType {
    Solid,
    Striped,
    Black,
    Cue,
}

impl BallType {
    /// True for the two groups a player can be assigned.
    pub fn is_group(self) -> bool {
        matches!(self, BallType::Solid | BallType::Striped)
    }

    /// The other assignable group, if this is one.
    pub fn opposite(self) -> Option<BallType> {
        match self {
            BallType::Solid => Some(BallType::Striped),
            BallType::Striped => Some(BallType::Solid),
            _ => None,
        }
    }

    /// Stable numeric code for the host event buffer.
    pub fn code(self) -> f32 {
        match self {
            BallType::Solid => 1.0,
            BallType::Striped => 2.0,
            BallType::Black => 3.0,
            BallType::Cue => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BallType::Solid => "solids",
            BallType::Striped => "stripes",
            BallType::Black => "black",
            BallType::Cue => "cue",
        }
    }
}

// Standard ball palette (1-7 solid hues, 8 black)
pub const YELLOW: VectorColor = VectorColor::rgb(1.0, 0.84, 0.0);
pub const BLUE: VectorColor = VectorColor::rgb(0.0, 0.0, 0.7);
pub const RED: VectorColor = VectorColor::rgb(0.86, 0.0, 0.0);
pub const PURPLE: VectorColor = VectorColor::rgb(0.39, 0.0, 0.55);
pub const ORANGE: VectorColor = VectorColor::rgb(1.0, 0.39, 0.0);
pub const GREEN: VectorColor = VectorColor::rgb(0.0, 0.47, 0.0);
pub const MAROON: VectorColor = VectorColor::rgb(0.51, 0.12, 0.12);
pub const BLACK: VectorColor = VectorColor::rgb(0.04, 0.04, 0.04);
pub const CUE_WHITE: VectorColor = VectorColor::rgb(0.97, 0.97, 0.94);

const HUES: [VectorColor; 8] = [YELLOW, BLUE, RED, PURPLE, ORANGE, GREEN, MAROON, BLACK];

/// One racked ball as listed in a preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub number: u8,
    pub ball_type: BallType,
    /// Explicit color. Falls back to the standard palette by number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<VectorColor>,
}

impl BallSpec {
    pub fn new(number: u8, ball_type: BallType) -> Self {
        Self {
            number,
            ball_type,
            color: None,
        }
    }

    pub fn color(&self) -> VectorColor {
        if let Some(color) = self.color {
            return color;
        }
        match self.ball_type {
            BallType::Cue => CUE_WHITE,
            BallType::Black => BLACK,
            _ => HUES[(self.number.max(1) as usize - 1) % HUES.len()],
        }
    }
}

/// Triangle rack slots, filled row by row.
///
/// The apex points LEFT toward the cue ball and rows spread RIGHT. Row `r`
/// holds `r + 1` slots centred on `apex.y`, listed top to bottom. Returns
/// exactly `count` positions, so a partially filled last row is allowed.
///
/// With the standard 15-ball order `1, 9, 2, 3, 8, 10, 11, 4, 5, 12, 6, 13,
/// 14, 7, 15` this reproduces the usual 8-ball rack:
/// ```text
///  1
///  9   2
///  3   8  10
/// 11  4  5  12
///  6 13 14  7 15
/// ```
pub fn rack_positions(apex: Vec2, ball_radius: f32, count: usize) -> Vec<Vec2> {
    // Gap between balls (tight rack)
    let gap = ball_radius * 2.0 + 1.0;
    let row_offset = gap * 0.866; // sqrt(3)/2 for equilateral triangle

    let mut positions = Vec::with_capacity(count);
    let mut row = 0usize;
    while positions.len() < count {
        for slot in 0..=row {
            if positions.len() == count {
                break;
            }
            let v_offset = slot as f32 - row as f32 / 2.0;
            positions.push(Vec2::new(
                apex.x + row as f32 * row_offset,
                apex.y + v_offset * gap,
            ));
        }
        row += 1;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rack_shape() {
        let apex = Vec2::new(700.0, 250.0);
        let pos = rack_positions(apex, 12.0, 15);
        assert_eq!(pos.len(), 15);
        assert_eq!(pos[0], apex);

        // Slot 4 (centre of row 2) sits on the apex line, where the black goes
        assert!((pos[4].y - apex.y).abs() < 1e-4);
        // Row 4 spans four gaps vertically
        let gap = 25.0;
        assert!((pos[14].y - pos[10].y - 4.0 * gap).abs() < 1e-3);
    }

    #[test]
    fn racked_balls_do_not_overlap() {
        let pos = rack_positions(Vec2::new(500.0, 300.0), 12.0, 27);
        for (i, a) in pos.iter().enumerate() {
            for b in &pos[i + 1..] {
                assert!(a.distance(*b) >= 24.0, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn palette_fallback_matches_numbers() {
        assert_eq!(BallSpec::new(1, BallType::Solid).color(), YELLOW);
        assert_eq!(BallSpec::new(9, BallType::Striped).color(), YELLOW);
        assert_eq!(BallSpec::new(15, BallType::Striped).color(), MAROON);
        assert_eq!(BallSpec::new(8, BallType::Black).color(), BLACK);
        assert_eq!(BallSpec::new(0, BallType::Cue).color(), CUE_WHITE);

        let custom = BallSpec {
            color: Some(VectorColor::RED),
            ..BallSpec::new(3, BallType::Solid)
        };
        assert_eq!(custom.color(), VectorColor::RED);
    }

    #[test]
    fn group_helpers() {
        assert!(BallType::Solid.is_group());
        assert!(!BallType::Black.is_group());
        assert_eq!(BallType::Striped.opposite(), Some(BallType::Solid));
        assert_eq!(BallType::Cue.opposite(), None);
    }
}
