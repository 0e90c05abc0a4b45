/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board itself: cells, coordinates, and the immutable grid value.
mod board;

/// The command-line interface to the engine.
mod cli;

/// Conversions between the packed hex wire format and boards, plus
/// random board generation.
mod codec;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// Everything that can go wrong, and how it is reported.
mod error;

/// Legal-move generation, including the one-ply look-ahead pruning.
mod movegen;

/// Moves, the digit wire format, and ordered legal-move sets.
mod moves;

/// Game-tree leaf counting for validating move generation.
mod perft;

/// Main engine logic; all search related code.
mod search;

/// Pure application of move sequences to board values.
mod transform;

pub use board::*;
pub use cli::*;
pub use codec::*;
pub use engine::*;
pub use error::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use search::*;
pub use transform::*;
