//! Evaluation module for Renju positions
//!
//! This module provides pattern scoring for board positions.
//! The evaluation considers:
//! - Line patterns (twos, threes, fours, fives), open or closed
//! - Positional bonus for stones near the center

pub mod heuristic;
pub mod patterns;

pub use heuristic::{Evaluator, ScoredMove};
pub use patterns::PatternWeights;
