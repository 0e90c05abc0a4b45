/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Board, Cell, Coord, Move};

/// Applies an ordered move sequence to a board, returning the new board
/// value and the Om piece's updated position.
///
/// This is the state-reconstruction contract: replaying a full move
/// history against an initial board yields the current position, with no
/// other state involved. The input board is never mutated; all moves are
/// processed in order on one working copy.
///
/// Per-move semantics:
/// - A directional push is honored only when the adjacent target cell
///   exists and is non-Empty. The target cell takes the Om's value and the
///   vacated cell becomes Empty. Note that the guard is raw non-emptiness;
///   the legal-move generator layers the exact color requirement on top,
///   and the two checks are kept separate on purpose.
/// - A push toward the board edge, or into an Empty cell, is a silent
///   no-op, never an error.
/// - [`Move::Rotate`] toggles the Om orientation in place.
pub fn apply(board: &Board, om: Coord, moves: &[Move]) -> (Board, Coord) {
    let size = board.size();
    let mut cells = board.cells_to_vec();
    let mut om = om;

    let at = |cells: &[Cell], row: isize, col: isize| -> Cell {
        if row >= 0 && col >= 0 && (row as usize) < size && (col as usize) < size {
            cells[row as usize * size + col as usize]
        } else {
            Cell::Empty
        }
    };

    for mv in moves {
        let idx = om.row * size + om.col;
        match mv {
            Move::Rotate => cells[idx] = cells[idx].rotated(),
            push => {
                let (dr, dc) = push.delta();
                let (row, col) = (om.row as isize + dr, om.col as isize + dc);
                if !at(&cells, row, col).is_empty() {
                    let target = row as usize * size + col as usize;
                    cells[target] = cells[idx];
                    cells[idx] = Cell::Empty;
                    om = Coord::new(row as usize, col as usize);
                }
            }
        }
    }

    (Board::from_cells(size, cells), om)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn test_push_displaces_into_target() {
        let board = decode("00000000").unwrap();
        let om = board.center();

        let (next, next_om) = apply(&board, om, &[Move::North]);
        assert_eq!(next_om, Coord::new(1, 2));
        assert_eq!(next.get(Coord::new(1, 2)), Cell::OmUpright);
        assert_eq!(next.get(Coord::new(2, 2)), Cell::Empty);
        // The original board value is untouched.
        assert_eq!(board.get(Coord::new(2, 2)), Cell::OmUpright);
    }

    #[test]
    fn test_push_into_empty_is_a_noop() {
        let board: Board = "\
. . . . .
. . . . .
. b O b .
. . . . .
. . . . ."
            .parse()
            .unwrap();
        let om = Coord::new(2, 2);

        let (next, next_om) = apply(&board, om, &[Move::North]);
        assert_eq!(next_om, om);
        assert_eq!(next, board);
    }

    #[test]
    fn test_push_off_the_edge_is_a_noop() {
        let board: Board = "\
b b O b b
b b b b b
b b b b b
b b b b b
b b b b b"
            .parse()
            .unwrap();
        let om = Coord::new(0, 2);

        let (next, next_om) = apply(&board, om, &[Move::North]);
        assert_eq!(next_om, om);
        assert_eq!(next, board);
    }

    #[test]
    fn test_rotation_is_an_involution() {
        let board = decode("00000000").unwrap();
        let om = board.center();

        let (once, _) = apply(&board, om, &[Move::Rotate]);
        assert_eq!(once.get(om), Cell::OmInverted);

        let (twice, twice_om) = apply(&board, om, &[Move::Rotate, Move::Rotate]);
        assert_eq!(twice_om, om);
        assert_eq!(twice, board);
    }

    #[test]
    fn test_apply_is_associative_over_concatenation() {
        let board = decode("a5c3f012").unwrap();
        let om = board.center();
        let moves = [Move::North, Move::Rotate, Move::West, Move::South, Move::East];

        let (all_at_once, om_a) = apply(&board, om, &moves);
        let (head, om_h) = apply(&board, om, &moves[..2]);
        let (split, om_s) = apply(&head, om_h, &moves[2..]);

        assert_eq!(all_at_once, split);
        assert_eq!(om_a, om_s);
    }
}
