//! Search module for the Renju AI
//!
//! Contains the depth- and time-bounded alpha-beta minimax search.

pub mod alphabeta;

pub use alphabeta::{SearchConfig, SearchResult, SearchStats, Searcher};
