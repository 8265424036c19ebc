//! Board structure with move history, turn and terminal state

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use super::notation::{column_letter, CoordError};
use super::{Direction, Pos, Stone, BOARD_SIZE, TOTAL_CELLS};

/// A single placed stone. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pos: Pos,
    stone: Stone,
    index: usize,
    elapsed: Duration,
}

impl Move {
    pub fn new(pos: Pos, stone: Stone, index: usize, elapsed: Duration) -> Self {
        Self {
            pos,
            stone,
            index,
            elapsed,
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn row(&self) -> u8 {
        self.pos.row
    }

    #[inline]
    pub fn col(&self) -> u8 {
        self.pos.col
    }

    #[inline]
    pub fn stone(&self) -> Stone {
        self.stone
    }

    /// Zero-based sequence number in the game
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Thinking time spent on the move
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Coordinate notation, e.g. `H8`
    pub fn to_coordinate(&self) -> String {
        self.pos.to_string()
    }

    /// Parse coordinate notation into a board position
    pub fn from_coordinate(coord: &str) -> Result<Pos, CoordError> {
        coord.parse()
    }
}

/// Game board
///
/// All mutation goes through [`Board::place`] and [`Board::undo`], which keep
/// the history length equal to the number of stones on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Stone; BOARD_SIZE]; BOARD_SIZE],
    history: Vec<Move>,
    current_player: Stone,
    winner: Option<Stone>,
    game_over: bool,
    winning_line: Vec<Pos>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: [[Stone::Empty; BOARD_SIZE]; BOARD_SIZE],
            history: Vec::with_capacity(TOTAL_CELLS),
            current_player: Stone::Black,
            winner: None,
            game_over: false,
            winning_line: Vec::new(),
        }
    }

    /// Back to the empty starting position
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position (off-board reads as empty)
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if pos.in_bounds() {
            self.grid[pos.row as usize][pos.col as usize]
        } else {
            Stone::Empty
        }
    }

    /// Stone at signed coordinates, `None` off the board
    #[inline]
    pub fn cell(&self, row: i32, col: i32) -> Option<Stone> {
        Pos::checked(row, col).map(|pos| self.grid[pos.row as usize][pos.col as usize])
    }

    /// Check if position is on the board and empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        pos.in_bounds() && self.get(pos) == Stone::Empty
    }

    #[inline]
    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    #[inline]
    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Stones of the line that ended the game, empty while the game is running
    #[inline]
    pub fn winning_line(&self) -> &[Pos] {
        &self.winning_line
    }

    #[inline]
    pub fn move_history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.history.len()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Row-major iterator over every cell holding `stone`
    pub fn positions_of(&self, stone: Stone) -> impl Iterator<Item = Pos> + '_ {
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(move |&pos| self.get(pos) == stone)
    }

    /// All empty cells in row-major order
    pub fn empty_positions(&self) -> Vec<Pos> {
        self.positions_of(Stone::Empty).collect()
    }

    /// Place a stone with no recorded thinking time. See [`Board::place_timed`].
    pub fn place(&mut self, pos: Pos, stone: Stone) -> bool {
        self.place_timed(pos, stone, Duration::ZERO)
    }

    /// Place a stone and run win detection from the new stone.
    ///
    /// Returns `false` without touching the board when the cell is occupied or
    /// off the board, the stone is `Empty`, or the game is already over.
    pub fn place_timed(&mut self, pos: Pos, stone: Stone, elapsed: Duration) -> bool {
        if self.game_over || !stone.is_occupied() || !self.is_empty(pos) {
            return false;
        }

        self.grid[pos.row as usize][pos.col as usize] = stone;
        self.history
            .push(Move::new(pos, stone, self.history.len(), elapsed));
        self.current_player = stone.opponent();

        if let Some(line) = self.find_win(pos, stone) {
            self.winner = Some(stone);
            self.game_over = true;
            self.winning_line = line;
        } else if self.history.len() == TOTAL_CELLS {
            // Board exhausted: draw
            self.game_over = true;
        }

        true
    }

    /// Take back the last move. Terminal state is cleared, not recomputed.
    pub fn undo(&mut self) -> bool {
        let Some(last) = self.history.pop() else {
            return false;
        };
        self.grid[last.row() as usize][last.col() as usize] = Stone::Empty;
        self.current_player = last.stone();
        self.winner = None;
        self.game_over = false;
        self.winning_line.clear();
        true
    }

    /// Independent copy of the board
    pub fn copy(&self) -> Board {
        self.clone()
    }

    /// Length of the run of `stone` through `pos` along `dir`, counting `pos`
    /// itself. The caller guarantees `pos` holds `stone`.
    pub fn count_consecutive(&self, pos: Pos, stone: Stone, dir: Direction) -> usize {
        1 + self.run_length(pos, stone, dir, 1) + self.run_length(pos, stone, dir, -1)
    }

    /// The run counted by [`Board::count_consecutive`], from one end to the other
    pub fn line_stones(&self, pos: Pos, stone: Stone, dir: Direction) -> Vec<Pos> {
        let back = self.run_length(pos, stone, dir, -1) as i32;
        let forward = self.run_length(pos, stone, dir, 1) as i32;
        (-back..=forward)
            .filter_map(|step| pos.offset(dir, step))
            .collect()
    }

    /// Stones of `stone` adjacent to `pos` walking in one sense of `dir`
    fn run_length(&self, pos: Pos, stone: Stone, dir: Direction, sign: i32) -> usize {
        let mut count = 0;
        let mut step = sign;
        while let Some(next) = pos.offset(dir, step) {
            if self.get(next) != stone {
                break;
            }
            count += 1;
            step += sign;
        }
        count
    }

    /// Winning line through the stone just placed, if any.
    ///
    /// Black needs exactly five; an overline does not win. White wins on five
    /// or more. The first qualifying axis in [`Direction::ALL`] order is used.
    fn find_win(&self, pos: Pos, stone: Stone) -> Option<Vec<Pos>> {
        Direction::ALL.into_iter().find_map(|dir| {
            let count = self.count_consecutive(pos, stone, dir);
            let wins = match stone {
                Stone::Black => count == 5,
                Stone::White => count >= 5,
                Stone::Empty => false,
            };
            wins.then(|| self.line_stones(pos, stone, dir))
        })
    }

    /// Temporarily write `stone` into `pos` for pattern analysis.
    ///
    /// Only the cell changes; history, turn and terminal state are left alone.
    /// The previous content is restored when the guard drops.
    pub fn probe(&mut self, pos: Pos, stone: Stone) -> Probe<'_> {
        let prev = self.get(pos);
        if pos.in_bounds() {
            self.grid[pos.row as usize][pos.col as usize] = stone;
        }
        Probe {
            board: self,
            pos,
            prev,
        }
    }

    /// Play `stone` at `pos` through [`Board::place`], rolled back when the
    /// guard drops. `None` if the placement is rejected.
    pub fn speculate(&mut self, pos: Pos, stone: Stone) -> Option<Speculation<'_>> {
        let prev_player = self.current_player;
        if self.place(pos, stone) {
            Some(Speculation {
                board: self,
                prev_player,
            })
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE as u8 {
            write!(f, " {}", column_letter(col))?;
        }
        writeln!(f)?;
        for row in (0..BOARD_SIZE as u8).rev() {
            write!(f, "{:>3}", u32::from(row) + 1)?;
            for col in 0..BOARD_SIZE as u8 {
                let symbol = match self.get(Pos::new(row, col)) {
                    Stone::Black => '●',
                    Stone::White => '○',
                    Stone::Empty => '·',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Scoped single-cell overwrite, see [`Board::probe`]
pub struct Probe<'a> {
    board: &'a mut Board,
    pos: Pos,
    prev: Stone,
}

impl Deref for Probe<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        if self.pos.in_bounds() {
            self.board.grid[self.pos.row as usize][self.pos.col as usize] = self.prev;
        }
    }
}

/// Scoped full placement, see [`Board::speculate`].
///
/// Anything placed through the guard must be undone before the guard drops,
/// which nested guards do automatically.
pub struct Speculation<'a> {
    board: &'a mut Board,
    prev_player: Stone,
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for Speculation<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        self.board.undo();
        self.board.current_player = self.prev_player;
    }
}
