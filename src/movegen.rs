/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use crate::{transform, Board, Cell, Coord, Error, Move, MoveSet, Result};

/// The rule set a game is played under.
///
/// Only [`Style::Push`] is implemented. [`Style::Flip`] exists in the
/// game's rules literature and is accepted by parsers so that callers get
/// the dedicated [`Error::UnsupportedStyle`] instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Push,
    Flip,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Flip => write!(f, "flip"),
        }
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "push" => Ok(Self::Push),
            "flip" => Ok(Self::Flip),
            other => Err(Error::UnsupportedStyle(other.to_string())),
        }
    }
}

/// Computes the set of legal moves for the side to move.
///
/// `previous` is the most recent move of the game, if any; it only
/// matters for the consecutive-rotation rule.
///
/// Push rules:
/// 1. The Om orientation fixes the two push colors: upright needs a Blue
///    neighbor for vertical pushes and a Red one for horizontal pushes,
///    inverted the reverse. A push is a candidate only on an exact color
///    match (the transform engine's weaker non-Empty guard is not enough
///    here).
/// 2. A candidate push survives only if the resulting position leaves the
///    next mover at least one reply, checked by a single look-ahead-free
///    call of this same generator. A move that strands the game on the
///    spot is not a legal move.
/// 3. Rotation is legal only if the previous move was not itself a
///    rotation, and only if at least one push opens up after it, checked
///    the same way, with the rotation fed in as the previous move so the
///    check cannot count a second rotation as the follow-up.
///
/// An empty result means the side to move loses immediately.
pub fn legal_moves(
    board: &Board,
    om: Coord,
    style: Style,
    previous: Option<Move>,
) -> Result<MoveSet> {
    generate(board, om, style, previous, true)
}

/// The generator behind [`legal_moves`], parameterized over look-ahead.
///
/// `look_ahead` gates the one-ply pruning of directional candidates.
/// The rotation viability check always runs, even in look-ahead-disabled
/// calls; it stays bounded because the child call sees `previous =
/// rotate` and therefore cannot recurse into a third level.
fn generate(
    board: &Board,
    om: Coord,
    style: Style,
    previous: Option<Move>,
    look_ahead: bool,
) -> Result<MoveSet> {
    if style != Style::Push {
        return Err(Error::UnsupportedStyle(style.to_string()));
    }

    let (vertical, horizontal) = match board.get(om) {
        Cell::OmUpright => (Cell::Blue, Cell::Red),
        _ => (Cell::Red, Cell::Blue),
    };

    let mut moves = MoveSet::new();

    for push in Move::PUSHES {
        let required = if push.is_vertical() { vertical } else { horizontal };
        let (dr, dc) = push.delta();
        if board.piece_at(om.row as isize + dr, om.col as isize + dc) != required {
            continue;
        }

        // The color matched, so the push stays in bounds.
        let target = om.offset(dr, dc, board.size()).unwrap();
        if look_ahead {
            let (next, next_om) = transform::apply(board, om, &[push]);
            if generate(&next, next_om, style, None, false)?.is_empty() {
                continue;
            }
        }
        moves.push(push, target);
    }

    if previous != Some(Move::Rotate) {
        let (rotated, _) = transform::apply(board, om, &[Move::Rotate]);
        if !generate(&rotated, om, style, Some(Move::Rotate), false)?.is_empty() {
            moves.push(Move::Rotate, om);
        }
    }

    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn test_all_blue_board_pushes_vertically() {
        // Upright Om wants Blue vertically and Red horizontally; on an
        // all-Blue board only the vertical pushes match, and rotating
        // opens the horizontal lanes, so rotation is legal too.
        let board = decode("00000000").unwrap();
        let om = board.center();

        let moves = legal_moves(&board, om, Style::Push, None).unwrap();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves.target(Move::North), Some(Coord::new(1, 2)));
        assert_eq!(moves.target(Move::South), Some(Coord::new(3, 2)));
        assert_eq!(moves.target(Move::Rotate), Some(om));
        assert!(!moves.contains(Move::West));
        assert!(!moves.contains(Move::East));
    }

    #[test]
    fn test_no_rotation_after_rotation() {
        let board = decode("00000000").unwrap();
        let om = board.center();

        let moves = legal_moves(&board, om, Style::Push, Some(Move::Rotate)).unwrap();
        assert!(!moves.contains(Move::Rotate));
        assert!(moves.contains(Move::North));
    }

    #[test]
    fn test_stranded_om_has_no_moves() {
        // No neighbor matches either orientation and rotation leads
        // nowhere: the side to move loses on the spot.
        let board: Board = "\
r r r r r
r r . r r
r . O . r
r r . r r
r r r r r"
            .parse()
            .unwrap();
        let om = Coord::new(2, 2);

        let moves = legal_moves(&board, om, Style::Push, None).unwrap();
        assert!(moves.is_empty());
    }

    #[test]
    fn test_look_ahead_prunes_dead_end_push() {
        // Pushing north strands the Om with four Empty neighbors and no
        // useful rotation, so only the southern lane survives.
        let board: Board = "\
. . . . .
. . b . .
. . O . .
. . b . .
. . b . ."
            .parse()
            .unwrap();
        let om = Coord::new(2, 2);

        let moves = legal_moves(&board, om, Style::Push, None).unwrap();
        assert!(!moves.contains(Move::North));
        assert!(!moves.contains(Move::Rotate));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves.target(Move::South), Some(Coord::new(3, 2)));
    }

    #[test]
    fn test_flip_style_is_rejected() {
        let board = decode("00000000").unwrap();
        let om = board.center();

        assert!(matches!(
            legal_moves(&board, om, Style::Flip, None),
            Err(Error::UnsupportedStyle(_))
        ));
    }

    #[test]
    fn test_generated_pushes_are_never_noops() {
        // Every returned push must point at a non-Empty, correctly colored
        // neighbor, so the transform engine always honors it.
        let board = decode("f0a51c3b").unwrap();
        let om = board.center();

        for (mv, target) in &legal_moves(&board, om, Style::Push, None).unwrap() {
            if mv == Move::Rotate {
                continue;
            }
            assert!(!board.get(target).is_empty());
            let (next, next_om) = transform::apply(&board, om, &[mv]);
            assert_eq!(next_om, target);
            assert_ne!(next, board);
        }
    }
}
