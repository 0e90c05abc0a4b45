/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{movegen, transform, Board, Coord, Move, Result, Style, MIN_SIZE};

/// Fixed depth budget for boards too large to search exhaustively.
///
/// A tunable latency/strength trade, not a correctness requirement.
pub const SHALLOW_DEPTH: usize = 6;

/// A depth bound that provably exhausts the game tree for side length `size`.
///
/// Every push consumes one of the `size^2 - 1` tokens and rotations cannot
/// repeat back-to-back, so no game lasts longer than `2 * (size^2 - 1) + 1`
/// plies.
#[inline(always)]
pub const fn exhaustive_depth(size: usize) -> usize {
    2 * (size * size - 1) + 1
}

/// Configuration for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum recursion depth. Depth exhaustion is a valued outcome
    /// (an even-odds-leaning-loss fallback), not an error.
    pub max_depth: usize,
}

impl SearchConfig {
    /// The depth policy observed in play: 5x5 boards are searched to the
    /// end of the game tree, larger boards get a fixed shallow budget.
    pub fn for_size(size: usize) -> Self {
        let max_depth = if size == MIN_SIZE {
            exhaustive_depth(size)
        } else {
            SHALLOW_DEPTH
        };
        Self { max_depth }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: SHALLOW_DEPTH,
        }
    }
}

/// Losing-probability weights for the legal moves of one position, in
/// generator order.
///
/// A weight of 0 marks a forced win for the searching side, 1 a certain
/// loss; intermediate values are heuristic under depth truncation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveWeights(Vec<(Move, f64)>);

impl MoveWeights {
    fn push(&mut self, mv: Move, weight: f64) {
        self.0.push((mv, weight));
    }

    /// Returns `true` if no moves were weighed (terminal position).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of weighed moves.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(move, weight)` pairs in generator order.
    pub fn iter(&self) -> impl Iterator<Item = (Move, f64)> + '_ {
        self.0.iter().copied()
    }

    /// The move with the minimal weight, ties broken by encounter order.
    pub fn minimal(&self) -> Option<(Move, f64)> {
        let mut best: Option<(Move, f64)> = None;
        for (mv, weight) in self.iter() {
            if best.map_or(true, |(_, w)| weight < w) {
                best = Some((mv, weight));
            }
        }
        best
    }

    /// Count of weights equal to zero, and the total count.
    fn zero_stats(&self) -> (usize, usize) {
        let zeros = self.0.iter().filter(|(_, w)| *w == 0.0).count();
        (zeros, self.0.len())
    }
}

/// The valued outcome of evaluating one position in the move tree.
///
/// Replaces a sentinel-keyed map encoding with explicit variants: depth
/// exhaustion and move starvation are outcomes of their own, not magic
/// keys sitting next to real moves.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The depth budget ran out before a natural terminal state: treat the
    /// subtree as unknown, assume roughly even odds leaning loss. Callers
    /// must not read depth-exhausted branches as provably good or bad.
    DepthExhausted,

    /// The side to move has no legal moves and has lost the game.
    NoMoves {
        /// Whether the starved side is the searching side.
        searcher_stuck: bool,
    },

    /// Weights for every legal move of the position.
    Weighted(MoveWeights),
}

impl Evaluation {
    /// The `(zero-valued, total)` outcome counts used by the parent ply.
    ///
    /// The terminal variants count as a single outcome: depth exhaustion
    /// is valued 0.5, starvation 1 or 0 depending on who is stuck. Only a
    /// starved opponent produces a zero.
    fn zero_stats(&self) -> (usize, usize) {
        match self {
            Self::DepthExhausted => (0, 1),
            Self::NoMoves { searcher_stuck } => (usize::from(!searcher_stuck), 1),
            Self::Weighted(weights) => weights.zero_stats(),
        }
    }
}

/// The result of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Number of positions evaluated.
    pub nodes: u64,

    /// The minimal-weight move, `None` on a terminal position.
    pub bestmove: Option<Move>,

    /// The weight of `bestmove`, or the terminal value of the position.
    pub weight: f64,

    /// The full weighted move map, for presentation layers.
    pub weights: MoveWeights,
}

impl SearchResult {
    /// Returns `true` if the chosen move forces a win for the searching side.
    #[inline(always)]
    pub fn is_forced_win(&self) -> bool {
        self.bestmove.is_some() && self.weight == 0.0
    }
}

/// A depth-bounded recursive search over the move tree, weighing each
/// candidate move by the searching side's probability of losing.
///
/// Purely functional over immutable board values: no I/O, no shared
/// state, no internal timeout. The depth budget is the sole mechanism
/// bounding work; callers wanting wall-clock limits impose them outside.
pub struct Search<'a> {
    /// The position to search from.
    board: &'a Board,

    /// The Om piece's position on `board`.
    om: Coord,

    style: Style,

    /// The most recent move of the game, for the consecutive-rotation rule.
    previous: Option<Move>,

    /// Whether the side to move at the root is the side this search plays for.
    searcher_to_move: bool,

    config: SearchConfig,

    nodes: u64,
}

impl<'a> Search<'a> {
    /// Constructs a search for the side to move at the root position.
    pub fn new(
        board: &'a Board,
        om: Coord,
        style: Style,
        previous: Option<Move>,
        config: SearchConfig,
    ) -> Self {
        Self {
            board,
            om,
            style,
            previous,
            searcher_to_move: true,
            config,
            nodes: 0,
        }
    }

    /// Flips which side the search plays for at the root.
    ///
    /// With `false`, the root's legal moves belong to the searching side's
    /// opponent, and the weights read as traps laid for the searcher.
    pub fn with_searcher_to_move(mut self, searcher_to_move: bool) -> Self {
        self.searcher_to_move = searcher_to_move;
        self
    }

    /// Runs the search to completion and reports the weighted move map
    /// along with the minimal-weight move.
    pub fn start(mut self) -> Result<SearchResult> {
        let evaluation = self.weigh(
            self.board,
            self.om,
            self.previous,
            self.searcher_to_move,
            self.config.max_depth,
        )?;

        let nodes = self.nodes;
        let result = match evaluation {
            Evaluation::Weighted(weights) => {
                // Ties go to the earliest candidate in generator order.
                let (bestmove, weight) = weights.minimal().unwrap();
                SearchResult {
                    nodes,
                    bestmove: Some(bestmove),
                    weight,
                    weights,
                }
            }
            Evaluation::NoMoves { searcher_stuck } => SearchResult {
                nodes,
                bestmove: None,
                weight: if searcher_stuck { 1.0 } else { 0.0 },
                weights: MoveWeights::default(),
            },
            Evaluation::DepthExhausted => SearchResult {
                nodes,
                bestmove: None,
                weight: 0.5,
                weights: MoveWeights::default(),
            },
        };

        Ok(result)
    }

    /// Evaluates one position of the move tree.
    ///
    /// For every legal move the child subtree is weighed from the other
    /// side's turn, and the move's weight is `1 - zeros/total` over the
    /// child outcomes. The quantifier differs by whose turn it is:
    ///
    /// - When the searching side moves here, the opponent chooses among
    ///   the child outcomes afterwards, so a move is a guaranteed win
    ///   (weight 0) only when *every* child outcome is a win; the first
    ///   such move short-circuits the remaining candidates, since one
    ///   winning move suffices.
    /// - When the opponent moves here, the searching side chooses next,
    ///   so *any* zero-valued child outcome already defuses the
    ///   opponent's move (weight 0).
    fn weigh(
        &mut self,
        board: &Board,
        om: Coord,
        previous: Option<Move>,
        searcher_to_move: bool,
        depth: usize,
    ) -> Result<Evaluation> {
        self.nodes += 1;

        if depth == 0 {
            return Ok(Evaluation::DepthExhausted);
        }

        let moves = movegen::legal_moves(board, om, self.style, previous)?;
        if moves.is_empty() {
            return Ok(Evaluation::NoMoves {
                searcher_stuck: searcher_to_move,
            });
        }

        let mut weights = MoveWeights::default();
        for (mv, _) in &moves {
            let (next, next_om) = transform::apply(board, om, &[mv]);
            let child = self.weigh(&next, next_om, Some(mv), !searcher_to_move, depth - 1)?;

            let (zeros, total) = child.zero_stats();
            let mut weight = 1.0 - zeros as f64 / total as f64;

            if searcher_to_move {
                weights.push(mv, weight);
                if weight == 0.0 {
                    break;
                }
            } else {
                if zeros > 0 {
                    weight = 0.0;
                }
                weights.push(mv, weight);
            }
        }

        Ok(Evaluation::Weighted(weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    /// A position whose only legal move leaves the opponent without a
    /// single reply: the southern lane runs dry immediately after.
    fn trap_board() -> Board {
        "\
. . . . .
. . . . .
. . O . .
. . b . .
. . b . ."
            .parse()
            .unwrap()
    }

    #[test]
    fn test_forced_win_when_searcher_moves_first() {
        let board = trap_board();
        let om = Coord::new(2, 2);
        let config = SearchConfig::for_size(board.size());

        let res = Search::new(&board, om, Style::Push, None, config)
            .start()
            .unwrap();

        assert_eq!(res.bestmove, Some(Move::South));
        assert_eq!(res.weight, 0.0);
        assert!(res.is_forced_win());
    }

    #[test]
    fn test_certain_loss_when_searcher_walks_into_the_dead_end() {
        // Same trap, seen from the other side: the opponent's only move
        // leaves the searching side starved, so it weighs a full 1.
        let board = trap_board();
        let om = Coord::new(2, 2);
        let config = SearchConfig::for_size(board.size());

        let res = Search::new(&board, om, Style::Push, None, config)
            .with_searcher_to_move(false)
            .start()
            .unwrap();

        assert_eq!(res.bestmove, Some(Move::South));
        assert_eq!(res.weight, 1.0);
        assert!(!res.is_forced_win());
    }

    #[test]
    fn test_starved_root_is_an_immediate_loss() {
        let board: Board = "\
r r r r r
r r . r r
r . O . r
r r . r r
r r r r r"
            .parse()
            .unwrap();
        let om = Coord::new(2, 2);

        let res = Search::new(&board, om, Style::Push, None, SearchConfig::default())
            .start()
            .unwrap();

        assert_eq!(res.bestmove, None);
        assert_eq!(res.weight, 1.0);
        assert!(res.weights.is_empty());
    }

    #[test]
    fn test_depth_exhaustion_is_a_valued_outcome() {
        let board = decode("00000000").unwrap();
        let om = board.center();

        // No budget at all: the root itself is unknown.
        let res = Search::new(&board, om, Style::Push, None, SearchConfig { max_depth: 0 })
            .start()
            .unwrap();
        assert_eq!(res.bestmove, None);
        assert_eq!(res.weight, 0.5);

        // A budget of one ply weighs every child as unknown-leaning-loss.
        let res = Search::new(&board, om, Style::Push, None, SearchConfig { max_depth: 1 })
            .start()
            .unwrap();
        assert_eq!(res.bestmove, Some(Move::North));
        assert_eq!(res.weight, 1.0);
        assert!(res.weights.iter().all(|(_, w)| w == 1.0));
    }

    #[test]
    fn test_depth_policy() {
        assert_eq!(SearchConfig::for_size(5).max_depth, exhaustive_depth(5));
        assert_eq!(SearchConfig::for_size(7).max_depth, SHALLOW_DEPTH);
        assert_eq!(SearchConfig::for_size(19).max_depth, SHALLOW_DEPTH);
    }

    #[test]
    fn test_exhaustive_search_terminates_on_a_sparse_board() {
        // Few tokens, so the full game tree is tiny even at the
        // exhaustive depth bound.
        let board: Board = "\
. . b . .
. . b . .
. . O . .
. . b . .
. . b . ."
            .parse()
            .unwrap();
        let om = Coord::new(2, 2);
        let config = SearchConfig::for_size(board.size());

        let res = Search::new(&board, om, Style::Push, None, config)
            .start()
            .unwrap();
        assert!(res.nodes > 0);
        if let Some(best) = res.bestmove {
            let legal = movegen::legal_moves(&board, om, Style::Push, None).unwrap();
            assert!(legal.contains(best));
        }
    }

    #[test]
    fn test_search_result_is_well_formed() {
        let board = decode("00000000").unwrap();
        let om = board.center();
        let config = SearchConfig::default();

        let res = Search::new(&board, om, Style::Push, None, config)
            .start()
            .unwrap();

        assert!(res.nodes > 0);
        let legal = movegen::legal_moves(&board, om, Style::Push, None).unwrap();
        assert!(legal.contains(res.bestmove.unwrap()));
        // A winning move short-circuits its siblings, so the map can be
        // shorter than the legal-move set, but never longer.
        assert!(!res.weights.is_empty());
        assert!(res.weights.len() <= legal.len());
        for (_, w) in res.weights.iter() {
            assert!((0.0..=1.0).contains(&w));
        }
    }
}
