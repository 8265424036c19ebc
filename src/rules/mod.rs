//! Game rules for Renju
//!
//! Win detection lives on [`crate::board::Board`]; this module holds the
//! forbidden-move rules that restrict Black.

pub mod forbidden;

// Re-exports for convenient access
pub use forbidden::{
    count_open_fours, count_open_threes, forbidden_kinds, forbidden_positions, forbidden_reason,
    is_double_four, is_double_three, is_forbidden, is_overline, is_valid_move, ForbiddenKind,
};
