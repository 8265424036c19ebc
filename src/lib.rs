//! Renju AI Engine
//!
//! A Renju engine for the standard 15x15 board:
//! - Five in a row wins
//! - Black must make exactly five; an overline neither wins nor may be played
//! - Double-three and double-four are forbidden for Black
//! - White is unrestricted and wins with five or more
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board state, move history, win detection, coordinate notation
//! - [`rules`]: Forbidden-move detection for Black
//! - [`eval`]: Position evaluation and heuristics
//! - [`search`]: Alpha-beta minimax under a depth and time budget
//! - [`engine`]: Main AI engine with configuration
//!
//! # Quick Start
//!
//! ```
//! use renju::{AIEngine, Board, EngineConfig, Pos, Stone};
//!
//! let mut board = Board::new();
//! let mut engine = AIEngine::with_config(EngineConfig::default().with_depth(2));
//!
//! board.place(Pos::center(), Stone::Black);
//!
//! // AI responds as White
//! if let Some(pos) = engine.get_move(&board, Stone::White) {
//!     board.place(pos, Stone::White);
//!     println!("AI plays at {pos}");
//! }
//! ```

pub mod board;
pub mod engine;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Stone, BOARD_SIZE};
pub use engine::{AIEngine, ConfigError, EngineConfig, MoveResult};
pub use eval::{Evaluator, PatternWeights};
pub use rules::ForbiddenKind;
pub use search::{SearchConfig, Searcher};
