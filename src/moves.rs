/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use crate::{Coord, Error, Result};

/// One of the five symbolic actions a player can take.
///
/// The wire format is a single decimal digit per move, drawn from the
/// directional-keypad set {8, 2, 4, 6, 5}: 8 pushes north, 2 south,
/// 4 west, 6 east, and 5 rotates the Om piece in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    North,
    South,
    West,
    East,
    Rotate,
}

impl Move {
    /// All moves, in the order the generator considers them.
    pub const ALL: [Self; 5] = [Self::North, Self::South, Self::West, Self::East, Self::Rotate];

    /// The four directional pushes, in generator order.
    pub const PUSHES: [Self; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// The keypad digit used in the move-history wire format.
    #[inline(always)]
    pub const fn digit(&self) -> char {
        match self {
            Self::North => '8',
            Self::South => '2',
            Self::West => '4',
            Self::East => '6',
            Self::Rotate => '5',
        }
    }

    /// Parses a keypad digit into a [`Move`].
    ///
    /// Digits outside {2,4,5,6,8} are rejected, including the other
    /// numerals, which a merely-numeric validator would let slide.
    #[inline(always)]
    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '8' => Some(Self::North),
            '2' => Some(Self::South),
            '4' => Some(Self::West),
            '6' => Some(Self::East),
            '5' => Some(Self::Rotate),
            _ => None,
        }
    }

    /// The `(row, col)` delta of a directional push, `(0, 0)` for rotation.
    #[inline(always)]
    pub const fn delta(&self) -> (isize, isize) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::West => (0, -1),
            Self::East => (0, 1),
            Self::Rotate => (0, 0),
        }
    }

    /// Returns `true` if this move pushes vertically (north or south).
    #[inline(always)]
    pub const fn is_vertical(&self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    /// Human-readable name, for engine output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
            Self::Rotate => "rotate",
        }
    }
}

impl fmt::Display for Move {
    /// Displays the wire digit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_digit(c).ok_or(Error::InvalidMoveDigit(c)),
            _ => Err(Error::InvalidMoveDigit(s.chars().next().unwrap_or('?'))),
        }
    }
}

/// Parses a concatenated move-history string into an ordered move list.
///
/// The history, together with the initial board, is the entire persisted
/// game state; turn parity is derived from its length.
///
/// ```
/// # use sireum::{parse_history, Move};
/// assert_eq!(parse_history("825").unwrap(), vec![Move::North, Move::South, Move::Rotate]);
/// assert!(parse_history("87").is_err());
/// ```
pub fn parse_history(s: &str) -> Result<Vec<Move>> {
    s.chars()
        .map(|c| Move::from_digit(c).ok_or(Error::InvalidMoveDigit(c)))
        .collect()
}

/// Renders a move list back into the concatenated digit string.
pub fn history_string(moves: &[Move]) -> String {
    moves.iter().map(Move::digit).collect()
}

/// An ordered set of legal moves, each mapped to the coordinate the Om
/// piece would occupy after the move (rotation maps to the Om's own,
/// unchanged coordinate).
///
/// The target coordinates exist for presentation layers that draw
/// clickable destinations; the rules logic only cares about membership.
/// An empty set means the side to move has no legal moves and loses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSet(Vec<(Move, Coord)>);

impl MoveSet {
    pub(crate) fn new() -> Self {
        Self(Vec::with_capacity(Move::ALL.len()))
    }

    pub(crate) fn push(&mut self, mv: Move, target: Coord) {
        debug_assert!(!self.contains(mv));
        self.0.push((mv, target));
    }

    /// Returns `true` if the side to move has no legal moves (and loses).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of legal moves.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if `mv` is legal.
    pub fn contains(&self, mv: Move) -> bool {
        self.0.iter().any(|(m, _)| *m == mv)
    }

    /// The Om's destination for `mv`, if `mv` is legal.
    pub fn target(&self, mv: Move) -> Option<Coord> {
        self.0.iter().find(|(m, _)| *m == mv).map(|(_, t)| *t)
    }

    /// Iterates over `(move, target)` pairs in generator order.
    pub fn iter(&self) -> impl Iterator<Item = (Move, Coord)> + '_ {
        self.0.iter().copied()
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = (Move, Coord);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (Move, Coord)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}
