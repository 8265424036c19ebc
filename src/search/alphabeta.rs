//! Alpha-Beta minimax search under a depth and wall-clock budget
//!
//! The search plays speculative moves directly on the caller's board through
//! [`Board::speculate`] guards, so every placement is rolled back on every
//! exit path and the board is returned exactly as it was received.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use renju::board::{Board, Pos, Stone};
//! use renju::search::Searcher;
//!
//! let mut searcher = Searcher::default();
//! let mut board = Board::new();
//! board.place(Pos::center(), Stone::Black);
//!
//! if let Some(result) = searcher.best_move(&mut board, Stone::White, 2, Duration::from_secs(1)) {
//!     println!("Best move: {} ({})", result.pos, result.score);
//! }
//! ```

use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};
use crate::eval::Evaluator;
use crate::rules::is_forbidden;

/// Infinity score for alpha-beta bounds
const INF: i32 = i32::MAX;

/// Branching limits for move generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidates kept at the root after ordering
    pub root_limit: usize,
    /// Candidates kept at interior nodes after ordering
    pub interior_limit: usize,
    /// Chebyshev distance to an existing stone that makes a cell a candidate
    pub neighbor_radius: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_limit: 25,
            interior_limit: 15,
            neighbor_radius: 2,
        }
    }
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Alpha-beta cutoffs at interior nodes
    pub cutoffs: u64,
    /// Candidates skipped because Black may not play them
    pub forbidden_skips: u64,
    /// The deadline passed before the tree was fully scanned
    pub deadline_hit: bool,
}

/// Best move found by [`Searcher::best_move`]
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub pos: Pos,
    /// Backed-up score from the searching color's perspective
    pub score: i32,
    pub depth: u32,
    /// Interior and leaf nodes visited below the root
    pub nodes: u64,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Minimax searcher with alpha-beta pruning.
///
/// Holds no board state between calls; the counters are reset by every
/// [`Searcher::best_move`].
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    evaluator: Evaluator,
    config: SearchConfig,
    nodes: u64,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl Searcher {
    #[must_use]
    pub fn new(evaluator: Evaluator, config: SearchConfig) -> Self {
        Self {
            evaluator,
            config,
            ..Self::default()
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for the best move for `stone`.
    ///
    /// Returns `None` when `stone` is empty, the game is already over, or no
    /// candidate at the root is legal. The first legal root candidate is
    /// always searched; the deadline is polled before each later one and at
    /// the top of every interior node.
    pub fn best_move(
        &mut self,
        board: &mut Board,
        stone: Stone,
        max_depth: u32,
        time_limit: Duration,
    ) -> Option<SearchResult> {
        if !stone.is_occupied() || board.is_game_over() {
            return None;
        }

        let start = Instant::now();
        self.nodes = 0;
        self.stats = SearchStats::default();
        // An unrepresentable deadline means no deadline
        self.deadline = start.checked_add(time_limit);

        let child_depth = max_depth.saturating_sub(1);
        let mut best: Option<(Pos, i32)> = None;
        let mut alpha = -INF;

        for pos in self.candidates(board, stone, self.config.root_limit) {
            if best.is_some() && self.out_of_time() {
                self.stats.deadline_hit = true;
                break;
            }

            let Some(mut child) = board.speculate(pos, stone) else {
                continue;
            };
            let score = self.minimax(&mut child, child_depth, alpha, INF, false, stone);
            drop(child);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
            alpha = alpha.max(score);
        }

        let elapsed = start.elapsed();
        let (pos, score) = best?;

        debug!(
            "search {:?} depth={} nodes={} best={} score={} cutoffs={} skips={} deadline_hit={} elapsed={:?}",
            stone,
            max_depth,
            self.nodes,
            pos,
            score,
            self.stats.cutoffs,
            self.stats.forbidden_skips,
            self.stats.deadline_hit,
            elapsed
        );

        Some(SearchResult {
            pos,
            score,
            depth: max_depth,
            nodes: self.nodes,
            stats: self.stats.clone(),
            elapsed,
        })
    }

    /// Minimax with alpha-beta pruning.
    ///
    /// Scores are always taken from `perspective`; the side to move is
    /// `perspective` on maximizing plies and its opponent otherwise.
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        perspective: Stone,
    ) -> i32 {
        self.nodes += 1;

        if self.out_of_time() {
            self.stats.deadline_hit = true;
            return self.evaluator.evaluate(board, perspective);
        }

        if depth == 0 || board.is_game_over() {
            return self.evaluator.evaluate(board, perspective);
        }

        let to_move = if maximizing {
            perspective
        } else {
            perspective.opponent()
        };

        let mut best: Option<i32> = None;

        for pos in self.candidates(board, to_move, self.config.interior_limit) {
            let Some(mut child) = board.speculate(pos, to_move) else {
                continue;
            };
            let score = self.minimax(&mut child, depth - 1, alpha, beta, !maximizing, perspective);
            drop(child);

            if maximizing {
                best = Some(best.map_or(score, |b| b.max(score)));
                alpha = alpha.max(score);
            } else {
                best = Some(best.map_or(score, |b| b.min(score)));
                beta = beta.min(score);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        // No legal candidates
        best.unwrap_or_else(|| self.evaluator.evaluate(board, perspective))
    }

    /// Legal candidate moves for `stone`, best static score first.
    ///
    /// An empty board yields only the center. Otherwise every empty cell
    /// within `neighbor_radius` of a stone that `stone` may legally play is
    /// scored by placing it and evaluating for `stone`, then the list is cut
    /// to `limit`. Forbidden cells are dropped before scoring, so they never
    /// take a slot from a legal move.
    fn candidates(&mut self, board: &mut Board, stone: Stone, limit: usize) -> Vec<Pos> {
        if board.is_board_empty() {
            return vec![Pos::center()];
        }

        let radius = i32::from(self.config.neighbor_radius);
        let mut frontier: Vec<Pos> = board
            .empty_positions()
            .into_iter()
            .filter(|&pos| has_neighbor(board, pos, radius))
            .collect();

        if stone == Stone::Black {
            let mut skipped = 0;
            frontier.retain(|&pos| {
                let forbidden = is_forbidden(board, pos, stone);
                skipped += u64::from(forbidden);
                !forbidden
            });
            self.stats.forbidden_skips += skipped;
        }

        let mut scored: Vec<(Pos, i32)> = frontier
            .into_iter()
            .map(|pos| {
                let probe = board.probe(pos, stone);
                (pos, self.evaluator.evaluate(&probe, stone))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);
        scored.into_iter().map(|(pos, _)| pos).collect()
    }

    #[inline]
    fn out_of_time(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Any stone within Chebyshev distance `radius` of `pos`
fn has_neighbor(board: &Board, pos: Pos, radius: i32) -> bool {
    let (row, col) = (i32::from(pos.row), i32::from(pos.col));
    (-radius..=radius).any(|dr| {
        (-radius..=radius).any(|dc| {
            board
                .cell(row + dr, col + dc)
                .is_some_and(Stone::is_occupied)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TOTAL_CELLS;
    use crate::eval::PatternWeights;

    const BUDGET: Duration = Duration::from_secs(30);

    fn board_with(black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(r, c) in black {
            assert!(board.place(Pos::new(r, c), Stone::Black));
        }
        for &(r, c) in white {
            assert!(board.place(Pos::new(r, c), Stone::White));
        }
        board
    }

    /// Colors with runs of at most two on every axis
    fn no_five_color(pos: Pos) -> Stone {
        if (pos.col / 2 + pos.row) % 2 == 0 {
            Stone::Black
        } else {
            Stone::White
        }
    }

    #[test]
    fn test_search_empty_board() {
        let mut searcher = Searcher::default();
        let mut board = Board::new();

        let result = searcher
            .best_move(&mut board, Stone::Black, 3, BUDGET)
            .expect("center is always available");
        assert_eq!(result.pos, Pos::center());
        assert!(board.is_board_empty());
    }

    #[test]
    fn test_search_rejects_empty_stone_and_finished_game() {
        let mut searcher = Searcher::default();
        let mut board = Board::new();
        assert!(searcher.best_move(&mut board, Stone::Empty, 2, BUDGET).is_none());

        for col in 3..8 {
            board.place(Pos::new(7, col), Stone::Black);
        }
        assert!(board.is_game_over());
        assert!(searcher.best_move(&mut board, Stone::White, 2, BUDGET).is_none());
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut searcher = Searcher::default();
        let mut board = Board::new();
        for idx in 0..TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            board.place(pos, no_five_color(pos));
        }
        assert!(board.is_game_over());
        assert!(searcher.best_move(&mut board, Stone::Black, 2, BUDGET).is_none());
    }

    #[test]
    fn test_single_remaining_cell() {
        let mut searcher = Searcher::default();
        let mut board = Board::new();
        let last = Pos::new(7, 8);
        assert_eq!(no_five_color(last), Stone::White);
        for pos in (0..TOTAL_CELLS).map(Pos::from_index).filter(|&p| p != last) {
            assert!(board.place(pos, no_five_color(pos)));
        }

        let result = searcher
            .best_move(&mut board, Stone::White, 1, BUDGET)
            .expect("one empty cell left");
        assert_eq!(result.pos, last);
        assert_eq!(board.empty_positions(), vec![last]);
    }

    #[test]
    fn test_search_finds_winning_move() {
        let mut searcher = Searcher::default();
        let mut board = board_with(&[(7, 3), (7, 4), (7, 5), (7, 6)], &[(0, 0), (0, 1), (0, 2)]);

        let result = searcher
            .best_move(&mut board, Stone::Black, 2, BUDGET)
            .expect("legal moves exist");
        assert!(result.pos == Pos::new(7, 2) || result.pos == Pos::new(7, 7));
        assert_eq!(result.score, PatternWeights::FIVE);
    }

    #[test]
    fn test_search_blocks_opponent_four() {
        let mut searcher = Searcher::default();
        let mut board = board_with(&[(7, 2)], &[(7, 3), (7, 4), (7, 5), (7, 6)]);

        let result = searcher
            .best_move(&mut board, Stone::Black, 2, BUDGET)
            .expect("legal moves exist");
        assert_eq!(result.pos, Pos::new(7, 7));
        assert!(result.score > -PatternWeights::FIVE);
    }

    #[test]
    fn test_search_leaves_board_unchanged() {
        let mut searcher = Searcher::default();
        let mut board = board_with(&[(7, 7), (8, 8), (6, 9)], &[(7, 8), (8, 7)]);
        let before = board.clone();

        let result = searcher.best_move(&mut board, Stone::White, 3, BUDGET);
        assert!(result.is_some());
        assert_eq!(board, before);
        assert_eq!(board.current_player(), before.current_player());
    }

    #[test]
    fn test_search_skips_forbidden_double_three() {
        let mut searcher = Searcher::default();
        // (7,7) would make open threes on the row and the column
        let mut board = board_with(&[(7, 5), (7, 6), (5, 7), (6, 7)], &[(0, 0), (0, 14)]);
        assert!(is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));

        let result = searcher
            .best_move(&mut board, Stone::Black, 1, BUDGET)
            .expect("legal moves exist");
        assert_ne!(result.pos, Pos::new(7, 7));
        assert!(result.stats.forbidden_skips >= 1);
    }

    #[test]
    fn test_forbidden_point_does_not_take_candidate_slot() {
        let config = SearchConfig {
            root_limit: 1,
            ..SearchConfig::default()
        };
        let mut searcher = Searcher::new(Evaluator::default(), config);
        // (7,7) is the best static point for Black but a double-three
        let mut board = board_with(&[(7, 5), (7, 6), (5, 7), (6, 7)], &[(0, 0), (0, 14)]);
        let before = board.clone();

        let moves = searcher.candidates(&mut board, Stone::Black, 100);
        assert!(!moves.contains(&Pos::new(7, 7)));
        assert!(moves
            .iter()
            .all(|&pos| !is_forbidden(&mut board, pos, Stone::Black)));
        // White is unrestricted and still sees the point
        assert!(searcher
            .candidates(&mut board, Stone::White, 100)
            .contains(&Pos::new(7, 7)));

        let result = searcher
            .best_move(&mut board, Stone::Black, 1, BUDGET)
            .expect("a legal move survives the cut to one candidate");
        assert_ne!(result.pos, Pos::new(7, 7));
        assert!(!is_forbidden(&mut board, result.pos, Stone::Black));
        assert!(result.stats.forbidden_skips >= 1);
        assert_eq!(board, before);
    }

    #[test]
    fn test_zero_budget_still_returns_a_move() {
        let mut searcher = Searcher::default();
        let mut board = board_with(&[(7, 7), (8, 8)], &[(7, 8)]);

        let result = searcher
            .best_move(&mut board, Stone::White, 4, Duration::ZERO)
            .expect("first legal candidate is always searched");
        assert!(board.is_empty(result.pos));
        assert!(result.stats.deadline_hit);
    }

    #[test]
    fn test_node_count_and_candidate_limit() {
        let config = SearchConfig {
            root_limit: 3,
            interior_limit: 2,
            ..SearchConfig::default()
        };
        let mut searcher = Searcher::new(Evaluator::default(), config);
        let mut board = board_with(&[(7, 7)], &[(8, 8)]);

        let result = searcher
            .best_move(&mut board, Stone::Black, 2, BUDGET)
            .expect("legal moves exist");
        // At most 3 root children, each with at most 2 leaf children
        assert!(result.nodes >= 1 && result.nodes <= 3 * (1 + 2));
        assert_eq!(searcher.config().root_limit, 3);
    }

    #[test]
    fn test_candidates_stay_near_stones() {
        let mut searcher = Searcher::default();
        let mut board = board_with(&[(0, 0)], &[]);
        let moves = searcher.candidates(&mut board, Stone::White, 100);
        // 3x3 corner block minus the stone itself
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|p| p.chebyshev(Pos::new(0, 0)) <= 2));
    }

    #[test]
    fn test_search_config_json() {
        let config: SearchConfig =
            serde_json::from_str(r#"{ "root_limit": 10 }"#).expect("valid json");
        assert_eq!(config.root_limit, 10);
        assert_eq!(config.interior_limit, 15);
        assert_eq!(config.neighbor_radius, 2);
    }
}
