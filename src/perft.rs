/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{movegen, transform, Board, Coord, Move, Result, Style};

/// Counts the leaf positions of the legal-move tree at `depth`.
///
/// The classic move-generator shakedown: every counted node went through
/// the full generator (look-ahead pruning included), so the totals are
/// sensitive to any rule regression. Positions with no legal moves count
/// as leaves wherever they occur.
pub fn perft(
    board: &Board,
    om: Coord,
    style: Style,
    previous: Option<Move>,
    depth: usize,
) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = movegen::legal_moves(board, om, style, previous)?;
    if moves.is_empty() {
        return Ok(1);
    }

    let mut nodes = 0;
    for (mv, _) in &moves {
        let (next, next_om) = transform::apply(board, om, &[mv]);
        nodes += perft(&next, next_om, style, Some(mv), depth - 1)?;
    }

    Ok(nodes)
}

/// Like [`perft`], but prints the per-move subtotals before the total.
pub fn print_perft(
    board: &Board,
    om: Coord,
    style: Style,
    previous: Option<Move>,
    depth: usize,
) -> Result<u64> {
    let mut total = 0;
    if depth > 0 {
        for (mv, _) in &movegen::legal_moves(board, om, style, previous)? {
            let (next, next_om) = transform::apply(board, om, &[mv]);
            let nodes = perft(&next, next_om, style, Some(mv), depth - 1)?;
            println!("{mv}: {nodes}");
            total += nodes;
        }
    } else {
        total = 1;
    }

    println!("\n{total}");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn test_perft_depth_one_counts_legal_moves() {
        let board = decode("00000000").unwrap();
        let om = board.center();

        let legal = movegen::legal_moves(&board, om, Style::Push, None).unwrap();
        let nodes = perft(&board, om, Style::Push, None, 1).unwrap();
        assert_eq!(nodes, legal.len() as u64);
    }

    #[test]
    fn test_perft_counts_terminal_positions_as_leaves() {
        let board: Board = "\
r r r r r
r r . r r
r . O . r
r r . r r
r r r r r"
            .parse()
            .unwrap();
        let om = Coord::new(2, 2);

        assert_eq!(perft(&board, om, Style::Push, None, 3).unwrap(), 1);
    }

    #[test]
    fn test_perft_all_blue_depth_two() {
        // Root: north, south, rotate. After either push the Om keeps two
        // blue vertical lanes minus the vacated cell; after the rotation
        // the horizontal lanes open instead.
        let board = decode("00000000").unwrap();
        let om = board.center();

        let d1 = perft(&board, om, Style::Push, None, 1).unwrap();
        let d2 = perft(&board, om, Style::Push, None, 2).unwrap();
        assert_eq!(d1, 3);
        assert!(d2 > d1);
    }
}
