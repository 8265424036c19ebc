//! Main AI Engine wrapping the search behind a caller-facing configuration
//!
//! The engine never searches the caller's board. Each request copies the
//! board, so a foreground holder may keep its instance while a search runs
//! elsewhere.
//!
//! # Example
//!
//! ```
//! use renju::{AIEngine, Board, EngineConfig, Pos, Stone};
//!
//! // Use a shallow depth for a fast example
//! let mut engine = AIEngine::with_config(EngineConfig::default().with_depth(2));
//! let mut board = Board::new();
//! board.place(Pos::center(), Stone::Black);
//!
//! let result = engine.get_move_with_stats(&board, Stone::White);
//! println!("Best move: {:?}", result.best_move);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, Pos, Stone};
use crate::eval::{Evaluator, PatternWeights};
use crate::search::{SearchConfig, Searcher};

/// Failure to load an [`EngineConfig`] file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pattern weights must decrease strictly from five down to two")]
    UnorderedWeights,
    #[error("pattern weights are too large: a full board would overflow the score")]
    WeightsOverflow,
}

/// Engine settings. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_depth: u32,
    /// Wall-clock budget per move in milliseconds
    pub time_limit_ms: u64,
    pub weights: PatternWeights,
    pub search: SearchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            time_limit_ms: 5000,
            weights: PatternWeights::default(),
            search: SearchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file, rejecting weight tables that break the
    /// pattern ordering or could overflow a board score.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        if !config.weights.is_strictly_ordered() {
            return Err(ConfigError::UnorderedWeights);
        }
        if !config.weights.fits_board() {
            return Err(ConfigError::WeightsOverflow);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Result of a move request with search statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found, `None` when the game is over or nothing is legal
    pub best_move: Option<Pos>,
    /// Backed-up search score from the mover's perspective
    pub score: i32,
    /// Static win probability for the mover after playing `best_move`
    pub win_probability: f64,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
    pub deadline_hit: bool,
}

/// Main AI Engine for Renju.
///
/// # Example
///
/// ```
/// use renju::{AIEngine, Board, EngineConfig, Pos, Stone};
///
/// let mut engine = AIEngine::with_config(EngineConfig::default().with_depth(1));
/// let mut board = Board::new();
/// board.place(Pos::center(), Stone::Black);
/// if let Some(pos) = engine.get_move(&board, Stone::White) {
///     println!("Play at {pos}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AIEngine {
    searcher: Searcher,
    config: EngineConfig,
}

impl AIEngine {
    /// Create an engine with the default configuration (depth 3, 5 s).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            searcher: Searcher::new(Evaluator::new(config.weights), config.search),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        self.searcher.evaluator()
    }

    pub fn set_depth(&mut self, max_depth: u32) {
        self.config.max_depth = max_depth;
    }

    pub fn set_time_limit(&mut self, time_limit_ms: u64) {
        self.config.time_limit_ms = time_limit_ms;
    }

    /// Get the best move for the given position.
    ///
    /// Use [`AIEngine::get_move_with_stats`] for score and statistics.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, color: Stone) -> Option<Pos> {
        self.get_move_with_stats(board, color).best_move
    }

    /// Search a copy of `board` for `color` and report the move with its
    /// statistics. The caller's board is never touched.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, color: Stone) -> MoveResult {
        let start = Instant::now();
        let mut work = board.copy();

        let found = self.searcher.best_move(
            &mut work,
            color,
            self.config.max_depth,
            self.config.time_limit(),
        );
        let time_ms = millis(start.elapsed());

        let Some(result) = found else {
            info!("{color:?}: no move available ({time_ms}ms)");
            return MoveResult {
                best_move: None,
                score: 0,
                win_probability: self.evaluator().win_probability(board, color),
                time_ms,
                nodes: 0,
                deadline_hit: false,
            };
        };

        let win_probability = match work.speculate(result.pos, color) {
            Some(after) => self.searcher.evaluator().win_probability(&after, color),
            None => self.searcher.evaluator().win_probability(board, color),
        };

        info!(
            "{color:?} plays {} (score {}, p={:.3}, {} nodes, {}ms{})",
            result.pos,
            result.score,
            win_probability,
            result.nodes,
            time_ms,
            if result.stats.deadline_hit { ", out of time" } else { "" }
        );

        MoveResult {
            best_move: Some(result.pos),
            score: result.score,
            win_probability,
            time_ms,
            nodes: result.nodes,
            deadline_hit: result.stats.deadline_hit,
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}
