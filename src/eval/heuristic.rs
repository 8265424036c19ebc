//! Heuristic evaluation function for Renju board positions
//!
//! Every stone is scored by the runs passing through it on the four axes,
//! plus a bonus for being near the center. The perspective's stones add,
//! the opponent's stones subtract, so the score is antisymmetric:
//! `evaluate(board, c) == -evaluate(board, c.opponent())` while the game runs.

use crate::board::{Board, Direction, Pos, Stone, TOTAL_CELLS};

use super::patterns::PatternWeights;

/// Clamp for the logistic transform in [`Evaluator::win_probability`]
const LOGIT_LIMIT: f64 = 10.0;

/// Score units per logistic unit
const LOGIT_SCALE: f64 = 1000.0;

/// An empty cell together with the static score of playing there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub pos: Pos,
    pub score: i32,
}

/// Static position evaluator
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: PatternWeights,
}

impl Evaluator {
    pub fn new(weights: PatternWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &PatternWeights {
        &self.weights
    }

    /// Evaluate the board from the perspective of the given color.
    ///
    /// Returns a score where:
    /// - Positive values indicate advantage for `perspective`
    /// - `weights.five` means `perspective` has won, `-weights.five` that it lost
    ///
    /// A drawn board is scored like a running one.
    #[must_use]
    pub fn evaluate(&self, board: &Board, perspective: Stone) -> i32 {
        if !perspective.is_occupied() {
            return 0;
        }

        if board.is_game_over() {
            match board.winner() {
                Some(winner) if winner == perspective => return self.weights.five,
                Some(_) => return self.weights.five.saturating_neg(),
                None => {}
            }
        }

        // Sums saturate so oversized weight tables clamp instead of wrapping
        let opponent = perspective.opponent();
        let mut score: i32 = 0;
        for pos in (0..TOTAL_CELLS).map(Pos::from_index) {
            let stone = board.get(pos);
            if stone == perspective {
                score = score.saturating_add(self.cell_value(board, pos, stone));
            } else if stone == opponent {
                score = score.saturating_sub(self.cell_value(board, pos, stone));
            }
        }
        score
    }

    /// Logistic squash of the evaluation into `[0, 1]`.
    ///
    /// Not a calibrated probability; the clamp only keeps `exp` finite.
    pub fn win_probability(&self, board: &Board, perspective: Stone) -> f64 {
        let x = (f64::from(self.evaluate(board, perspective)) / LOGIT_SCALE)
            .clamp(-LOGIT_LIMIT, LOGIT_LIMIT);
        1.0 / (1.0 + (-x).exp())
    }

    /// Try `stone` on every empty cell and return the `top_n` best by static
    /// score, highest first. Tie order is unspecified.
    pub fn best_moves(&self, board: &mut Board, stone: Stone, top_n: usize) -> Vec<ScoredMove> {
        if !stone.is_occupied() {
            return Vec::new();
        }

        let mut moves: Vec<ScoredMove> = board
            .empty_positions()
            .into_iter()
            .map(|pos| {
                let probe = board.probe(pos, stone);
                ScoredMove {
                    pos,
                    score: self.evaluate(&probe, stone),
                }
            })
            .collect();

        moves.sort_by(|a, b| b.score.cmp(&a.score));
        moves.truncate(top_n);
        moves
    }

    /// Run scores plus center bonus for one stone
    #[inline]
    fn cell_value(&self, board: &Board, pos: Pos, stone: Stone) -> i32 {
        self.stone_score(board, pos, stone)
            .saturating_add(self.center_bonus(pos))
    }

    /// Sum of run scores through one stone over the four axes
    fn stone_score(&self, board: &Board, pos: Pos, stone: Stone) -> i32 {
        Direction::ALL
            .iter()
            .map(|&dir| {
                let count = board.count_consecutive(pos, stone, dir);
                if count >= 5 {
                    return self.weights.five;
                }
                let open = run_end_is_empty(board, pos, stone, dir, 1)
                    && run_end_is_empty(board, pos, stone, dir, -1);
                self.weights.run_score(count, open)
            })
            .fold(0, i32::saturating_add)
    }

    #[inline]
    fn center_bonus(&self, pos: Pos) -> i32 {
        self.weights
            .center_radius
            .saturating_sub(i32::from(pos.manhattan(Pos::center())))
            .max(0)
    }
}

/// Walk past the run of `stone` through `pos` in one sense of `dir` and report
/// whether the first cell beyond it is empty. The wall is never empty.
fn run_end_is_empty(board: &Board, pos: Pos, stone: Stone, dir: Direction, sign: i32) -> bool {
    let mut step = sign;
    while let Some(next) = pos.offset(dir, step) {
        match board.get(next) {
            s if s == stone => step += sign,
            Stone::Empty => return true,
            _ => return false,
        }
    }
    false
}
