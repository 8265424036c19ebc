//! Human coordinate notation (`H8` style)
//!
//! Columns are lettered left to right skipping `I`, rows are numbered from 1.
//! Row 7 / column 7 (zero-based) is the center point `H8`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Pos, BOARD_SIZE};

/// Column letters, `I` excluded
pub const COLUMN_LETTERS: &[u8; BOARD_SIZE] = b"ABCDEFGHJKLMNOP";

/// Failure to decode a coordinate string
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("empty coordinate")]
    Empty,

    #[error("invalid column letter '{0}'")]
    InvalidColumn(char),

    #[error("invalid row number '{0}'")]
    InvalidRow(String),

    #[error("row {0} is off the board (1-{max})", max = BOARD_SIZE)]
    RowOutOfRange(u32),
}

/// Column letter for a zero-based column index, `'?'` off the board
#[inline]
pub fn column_letter(col: u8) -> char {
    COLUMN_LETTERS
        .get(usize::from(col))
        .map_or('?', |&c| char::from(c))
}

/// Zero-based column for a letter (case-insensitive)
pub fn column_index(letter: char) -> Result<u8, CoordError> {
    let upper = letter.to_ascii_uppercase();
    COLUMN_LETTERS
        .iter()
        .position(|&c| char::from(c) == upper)
        .map(|idx| idx as u8)
        .ok_or(CoordError::InvalidColumn(letter))
}

/// Encode a position, e.g. `(7, 7)` -> `"H8"`
pub fn encode(pos: Pos) -> String {
    pos.to_string()
}

/// Decode a coordinate string, e.g. `"H8"` -> `(7, 7)`
pub fn decode(coord: &str) -> Result<Pos, CoordError> {
    coord.parse()
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col), u32::from(self.row) + 1)
    }
}

impl FromStr for Pos {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(CoordError::Empty)?;
        let col = column_index(letter)?;

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoordError::InvalidRow(digits.to_string()));
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| CoordError::InvalidRow(digits.to_string()))?;
        if row == 0 || row > BOARD_SIZE as u32 {
            return Err(CoordError::RowOutOfRange(row));
        }

        Ok(Pos::new((row - 1) as u8, col))
    }
}
