/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Convenience alias over the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the engine can produce.
///
/// All of these are caller-input errors: the engine is pure, so there is
/// never any partial state to roll back, and none of them are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The board parameter was not a valid hexadecimal string.
    #[error("board does not have a valid hexadecimal value")]
    InvalidEncoding,

    /// The decoded bit length matches no supported odd board size.
    #[error("board size out of bounds: {nbytes} bytes matches no odd size in 5..=19")]
    SizeOutOfRange { nbytes: usize },

    /// The move history contained a character outside the legal digit set {2,4,5,6,8}.
    #[error("move history contains invalid digit {0:?}")]
    InvalidMoveDigit(char),

    /// A game style other than "push" was requested.
    #[error("style {0:?} is not supported")]
    UnsupportedStyle(String),

    /// A random board was requested with a size outside [5,19], or an even one.
    #[error("size must be an odd number between 5 and 19, got {0}")]
    SizeConstraintViolation(usize),

    /// A textual board fixture could not be parsed.
    #[error("invalid board grid: {0}")]
    InvalidGrid(String),
}
