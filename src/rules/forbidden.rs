//! Renju forbidden-move rules for Black
//!
//! Black may not play a move that creates:
//! - an overline (six or more in a row),
//! - a double-three (open threes on two or more axes),
//! - a double-four (open fours on two or more axes).
//!
//! White is never restricted.
//!
//! Each axis contributes at most one pattern. Patterns are read from a short
//! window of cells centered on the move, in which off-board cells read as a
//! wall: never empty, never a stone, so no pattern can lean on the edge.

use std::collections::BTreeSet;
use std::fmt;

use crate::board::{Board, Direction, Pos, Stone, BOARD_SIZE};

/// Window widths: offsets -3..=+2 for threes, -3..=+3 for fours
const THREE_WINDOW: usize = 6;
const FOUR_WINDOW: usize = 7;

/// A cell as seen by the pattern matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Own,
    Foe,
    Wall,
}

use Cell::{Empty as E, Own as O};

/// `_XXX_`: exactly three stones and two empty flanks
const OPEN_THREE: [Cell; 5] = [E, O, O, O, E];
/// `_XXXX_`
const OPEN_FOUR: [Cell; 6] = [E, O, O, O, O, E];
const FOUR_OPEN_LEFT: [Cell; 5] = [E, O, O, O, O];
const FOUR_OPEN_RIGHT: [Cell; 5] = [O, O, O, O, E];

/// Reason a move is forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForbiddenKind {
    DoubleThree,
    DoubleFour,
    Overline,
}

impl fmt::Display for ForbiddenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForbiddenKind::DoubleThree => "Double Three (3-3)",
            ForbiddenKind::DoubleFour => "Double Four (4-4)",
            ForbiddenKind::Overline => "Overline (6+ stones)",
        };
        f.write_str(name)
    }
}

/// Read `N` cells along `dir`, starting `N / 2` cells behind `pos`
fn window<const N: usize>(board: &Board, pos: Pos, stone: Stone, dir: Direction) -> [Cell; N] {
    let start = -((N / 2) as i32);
    std::array::from_fn(|i| match pos.offset(dir, start + i as i32) {
        None => Cell::Wall,
        Some(p) => match board.get(p) {
            Stone::Empty => Cell::Empty,
            s if s == stone => Cell::Own,
            _ => Cell::Foe,
        },
    })
}

/// Open three on one axis through `pos`
fn has_open_three(board: &Board, pos: Pos, stone: Stone, dir: Direction) -> bool {
    let cells: [Cell; THREE_WINDOW] = window(board, pos, stone, dir);
    cells.windows(5).any(|seg| seg == OPEN_THREE)
}

/// Open four on one axis through `pos`.
///
/// Either `_XXXX_`, or a four with one empty end whose next cell outward is
/// inside the window and is neither the opponent nor the wall.
fn has_open_four(board: &Board, pos: Pos, stone: Stone, dir: Direction) -> bool {
    let cells: [Cell; FOUR_WINDOW] = window(board, pos, stone, dir);

    if cells.windows(6).any(|seg| seg == OPEN_FOUR) {
        return true;
    }

    let unblocked = |idx: Option<usize>| {
        idx.and_then(|i| cells.get(i))
            .is_some_and(|&c| c != Cell::Foe && c != Cell::Wall)
    };

    cells.windows(5).enumerate().any(|(i, seg)| {
        (seg == FOUR_OPEN_LEFT && unblocked(i.checked_sub(1)))
            || (seg == FOUR_OPEN_RIGHT && unblocked(Some(i + 5)))
    })
}

/// True if any axis through `pos` holds six or more black stones.
/// The move must already be on the board.
pub fn is_overline(board: &Board, pos: Pos) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| board.count_consecutive(pos, Stone::Black, dir) >= 6)
}

/// Number of axes through `pos` with an open three for `stone`
pub fn count_open_threes(board: &Board, pos: Pos, stone: Stone) -> usize {
    Direction::ALL
        .iter()
        .filter(|&&dir| has_open_three(board, pos, stone, dir))
        .count()
}

/// Number of axes through `pos` with an open four for `stone`
pub fn count_open_fours(board: &Board, pos: Pos, stone: Stone) -> usize {
    Direction::ALL
        .iter()
        .filter(|&&dir| has_open_four(board, pos, stone, dir))
        .count()
}

/// Two or more open threes through `pos` (move already on the board)
pub fn is_double_three(board: &Board, pos: Pos) -> bool {
    count_open_threes(board, pos, Stone::Black) >= 2
}

/// Two or more open fours through `pos` (move already on the board)
pub fn is_double_four(board: &Board, pos: Pos) -> bool {
    count_open_fours(board, pos, Stone::Black) >= 2
}

/// Every rule that playing `stone` at `pos` would break, in reporting order.
///
/// The stone is written into the cell for the duration of the check and the
/// previous content is restored before returning.
pub fn forbidden_kinds(board: &mut Board, pos: Pos, stone: Stone) -> Vec<ForbiddenKind> {
    if stone != Stone::Black || !pos.in_bounds() {
        return Vec::new();
    }

    let probe = board.probe(pos, stone);
    let mut kinds = Vec::new();
    if is_double_three(&probe, pos) {
        kinds.push(ForbiddenKind::DoubleThree);
    }
    if is_double_four(&probe, pos) {
        kinds.push(ForbiddenKind::DoubleFour);
    }
    if is_overline(&probe, pos) {
        kinds.push(ForbiddenKind::Overline);
    }
    kinds
}

/// Check if playing `stone` at `pos` is forbidden.
///
/// Only Black is ever restricted. The board is unchanged on return.
pub fn is_forbidden(board: &mut Board, pos: Pos, stone: Stone) -> bool {
    !forbidden_kinds(board, pos, stone).is_empty()
}

/// Every empty cell where `stone` may not play (always empty for White)
pub fn forbidden_positions(board: &mut Board, stone: Stone) -> BTreeSet<Pos> {
    if stone != Stone::Black {
        return BTreeSet::new();
    }

    let mut forbidden = BTreeSet::new();
    for idx in 0..BOARD_SIZE * BOARD_SIZE {
        let pos = Pos::from_index(idx);
        if board.is_empty(pos) && is_forbidden(board, pos, stone) {
            forbidden.insert(pos);
        }
    }
    forbidden
}

/// Human-readable list of the broken rules, empty when the move is allowed
pub fn forbidden_reason(board: &mut Board, pos: Pos, stone: Stone) -> String {
    forbidden_kinds(board, pos, stone)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check if a move is legal: the cell is empty and the move is not forbidden
pub fn is_valid_move(board: &mut Board, pos: Pos, stone: Stone) -> bool {
    board.is_empty(pos) && !is_forbidden(board, pos, stone)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_empty_board_nothing_forbidden() {
        let mut board = Board::new();
        assert!(!is_forbidden(&mut board, Pos::center(), Stone::Black));
        assert!(forbidden_positions(&mut board, Stone::Black).is_empty());
    }

    #[test]
    fn test_double_three_cross_pattern() {
        //     col: 5 6 7 8 9
        // row 6:   . . B . .
        // row 7:   . B X B .
        // row 8:   . . B . .
        let mut board = board_with(&[(7, 6), (7, 8), (6, 7), (8, 7)], &[]);
        let before = board.clone();

        assert!(is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));
        assert_eq!(board, before, "probe must restore the board");
        assert_eq!(
            forbidden_reason(&mut board, Pos::new(7, 7), Stone::Black),
            "Double Three (3-3)"
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_double_three_diagonal_cross() {
        let mut board = board_with(&[(6, 6), (8, 8), (6, 8), (8, 6)], &[]);
        {
            let probe = board.probe(Pos::new(7, 7), Stone::Black);
            assert_eq!(count_open_threes(&probe, Pos::new(7, 7), Stone::Black), 2);
        }
        assert!(is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));
    }

    #[test]
    fn test_single_open_three_allowed() {
        let mut board = board_with(&[(7, 6), (7, 8)], &[]);
        assert!(!is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));
        assert!(is_valid_move(&mut board, Pos::new(7, 7), Stone::Black));
    }

    #[test]
    fn test_blocked_three_is_not_open() {
        // W B X B on the row, open three on the column: only one qualifies
        let mut board = board_with(&[(7, 6), (7, 8), (6, 7), (8, 7)], &[(7, 5)]);
        assert!(!is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));
    }

    #[test]
    fn test_three_against_edge_is_not_open() {
        // Row: |B X B _ ...  three touching the left edge
        let mut board = board_with(&[(7, 0), (7, 2)], &[]);
        let probe = board.probe(Pos::new(7, 1), Stone::Black);
        assert_eq!(count_open_threes(&probe, Pos::new(7, 1), Stone::Black), 0);
    }

    #[test]
    fn test_three_one_cell_from_edge_is_open() {
        // Row: |_ B X B _ ...  the empty edge cell counts as an open flank
        let mut board = board_with(&[(7, 1), (7, 3)], &[]);
        let probe = board.probe(Pos::new(7, 2), Stone::Black);
        assert_eq!(count_open_threes(&probe, Pos::new(7, 2), Stone::Black), 1);
    }

    #[test]
    fn test_double_four() {
        // Row 7: B B B X _ _   and column 7: B B B X _ _
        let mut board = board_with(&[(7, 4), (7, 5), (7, 6), (4, 7), (5, 7), (6, 7)], &[]);
        let before = board.clone();
        assert!(is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));
        assert_eq!(
            forbidden_reason(&mut board, Pos::new(7, 7), Stone::Black),
            "Double Four (4-4)"
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_capped_four_does_not_count() {
        // Row 7: W B B B X _ W  is not open, column 7 four is
        let mut board = board_with(
            &[(7, 4), (7, 5), (7, 6), (4, 7), (5, 7), (6, 7)],
            &[(7, 3), (7, 9)],
        );
        let probe = board.probe(Pos::new(7, 7), Stone::Black);
        assert_eq!(count_open_fours(&probe, Pos::new(7, 7), Stone::Black), 1);
        drop(probe);
        assert!(!is_forbidden(&mut board, Pos::new(7, 7), Stone::Black));
    }

    #[test]
    fn test_four_capped_by_edge_is_not_open() {
        // Row 7: ... B B B X _ |  the cell past the open end is the wall
        let mut board = board_with(&[(7, 10), (7, 11), (7, 12)], &[]);
        let probe = board.probe(Pos::new(7, 13), Stone::Black);
        assert_eq!(count_open_fours(&probe, Pos::new(7, 13), Stone::Black), 0);
    }

    #[test]
    fn test_overline_forbidden() {
        let mut board = board_with(&[(7, 2), (7, 3), (7, 4), (7, 6), (7, 7), (7, 8)], &[]);
        assert!(is_forbidden(&mut board, Pos::new(7, 5), Stone::Black));
        assert!(forbidden_reason(&mut board, Pos::new(7, 5), Stone::Black)
            .contains("Overline (6+ stones)"));
    }

    #[test]
    fn test_exact_five_is_not_overline() {
        let mut board = board_with(&[(7, 3), (7, 4), (7, 6), (7, 7)], &[]);
        let probe = board.probe(Pos::new(7, 5), Stone::Black);
        assert!(!is_overline(&probe, Pos::new(7, 5)));
    }

    #[test]
    fn test_white_never_forbidden() {
        let mut board = board_with(&[], &[(7, 6), (7, 8), (6, 7), (8, 7)]);
        assert!(!is_forbidden(&mut board, Pos::new(7, 7), Stone::White));
        assert_eq!(forbidden_reason(&mut board, Pos::new(7, 7), Stone::White), "");
        assert!(forbidden_positions(&mut board, Stone::White).is_empty());
    }

    #[test]
    fn test_forbidden_positions_scan() {
        let mut board = board_with(&[(7, 6), (7, 8), (6, 7), (8, 7)], &[]);
        let before = board.clone();
        let forbidden = forbidden_positions(&mut board, Stone::Black);
        assert!(forbidden.contains(&Pos::new(7, 7)));
        assert!(forbidden.iter().all(|&p| board.is_empty(p)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_multiple_reasons_joined() {
        // Overline on the row plus a double-three on the column and diagonal
        let mut board = board_with(
            &[
                (7, 2), (7, 3), (7, 4), (7, 6), (7, 7), (7, 8),
                (6, 5), (8, 5), (6, 4), (8, 6),
            ],
            &[],
        );
        let reason = forbidden_reason(&mut board, Pos::new(7, 5), Stone::Black);
        assert_eq!(reason, "Double Three (3-3), Overline (6+ stones)");
    }

    #[test]
    fn test_out_of_bounds_not_forbidden() {
        let mut board = Board::new();
        assert!(!is_forbidden(&mut board, Pos { row: 20, col: 3 }, Stone::Black));
    }
}
