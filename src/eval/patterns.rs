//! Pattern weights for Renju evaluation
//!
//! The weight table is passed to the evaluator instead of living in global
//! constants, so alternate tables can be tried without touching the code.

use serde::{Deserialize, Serialize};

use crate::board::TOTAL_CELLS;

/// Score of a run by length and openness, plus the center bonus radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    /// Five or more in a row; also the magnitude of a decided game
    pub five: i32,
    /// Open four: `_OOOO_`
    pub open_four: i32,
    /// Four with at least one end closed
    pub four: i32,
    /// Open three: `_OOO_`
    pub open_three: i32,
    pub three: i32,
    pub open_two: i32,
    pub two: i32,
    /// A stone earns `center_radius - manhattan distance to center`, floored at 0
    pub center_radius: i32,
}

impl PatternWeights {
    pub const FIVE: i32 = 100_000;
    pub const OPEN_FOUR: i32 = 10_000;
    pub const FOUR: i32 = 1_000;
    pub const OPEN_THREE: i32 = 500;
    pub const THREE: i32 = 100;
    pub const OPEN_TWO: i32 = 50;
    pub const TWO: i32 = 10;
    pub const CENTER_RADIUS: i32 = 10;

    /// Score for a run of `count` stones, `open` when both ends are empty
    #[inline]
    pub fn run_score(&self, count: usize, open: bool) -> i32 {
        match (count, open) {
            (5.., _) => self.five,
            (4, true) => self.open_four,
            (4, false) => self.four,
            (3, true) => self.open_three,
            (3, false) => self.three,
            (2, true) => self.open_two,
            (2, false) => self.two,
            _ => 0,
        }
    }

    /// FIVE > OPEN_FOUR > FOUR > OPEN_THREE > THREE > OPEN_TWO > TWO > 0
    pub fn is_strictly_ordered(&self) -> bool {
        let ladder = [
            self.five,
            self.open_four,
            self.four,
            self.open_three,
            self.three,
            self.open_two,
            self.two,
            0,
        ];
        ladder.windows(2).all(|w| w[0] > w[1])
    }

    /// Largest score a full board can add up to fits in `i32`: every cell
    /// scoring `five` on all four axes plus the full center bonus.
    pub fn fits_board(&self) -> bool {
        let cells = TOTAL_CELLS as i64;
        let run = i64::from(self.five.max(0)) * 4 * cells;
        let center = i64::from(self.center_radius.max(0)) * cells;
        run + center <= i64::from(i32::MAX)
    }
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            five: Self::FIVE,
            open_four: Self::OPEN_FOUR,
            four: Self::FOUR,
            open_three: Self::OPEN_THREE,
            three: Self::THREE,
            open_two: Self::OPEN_TWO,
            two: Self::TWO,
            center_radius: Self::CENTER_RADIUS,
        }
    }
}
