/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use rand::{rngs::OsRng, RngCore};

use crate::{Board, Cell, Error, Result, MAX_SIZE, MIN_SIZE};

/// Number of bytes a board of side length `size` packs into.
///
/// `ceil(size^2 / 8)`: one bit per cell, rounded up to whole bytes. The
/// trailing slack bits of the last byte carry no meaning.
#[inline(always)]
pub const fn byte_len(size: usize) -> usize {
    (size * size + 7) / 8
}

/// Infers the board side length from a packed byte count.
///
/// The smallest odd `n` in `[5, 19]` whose [`byte_len`] matches wins; the
/// supported sizes produce distinct byte counts, so the match is unique.
fn size_for_bytes(nbytes: usize) -> Option<usize> {
    let mut size = MIN_SIZE;
    while size <= MAX_SIZE {
        if byte_len(size) == nbytes {
            return Some(size);
        }
        size += 2;
    }
    None
}

/// Decodes a hex-encoded bit pack into a [`Board`].
///
/// The input is read as a base-16 big integer whose binary expansion is
/// zero-extended to `4 * len` bits; bits map to cells row-major, bit value
/// plus one giving the color (0 ⇒ Blue, 1 ⇒ Red), skipping over Empty.
/// The board side is inferred from the byte count, and the center cell is
/// then overwritten with the upright Om piece; the color bit packed there
/// is never read.
///
/// ```
/// # use sireum::{decode, Cell};
/// let board = decode("00000000").unwrap();
/// assert_eq!(board.size(), 5);
/// assert_eq!(board.get(board.center()), Cell::OmUpright);
/// ```
pub fn decode(hex: &str) -> Result<Board> {
    // Validate the hex value before looking at the length, so a garbled
    // parameter reports as a bad encoding rather than a bad size.
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidEncoding);
    }

    if hex.len() % 2 != 0 {
        // An odd number of hex digits can never pack to whole bytes.
        return Err(Error::SizeOutOfRange {
            nbytes: hex.len() / 2,
        });
    }
    let nbytes = hex.len() / 2;
    let size = size_for_bytes(nbytes).ok_or(Error::SizeOutOfRange { nbytes })?;

    // Each hex digit contributes four bits, most significant first.
    let nibbles: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).unwrap_or_default() as u8)
        .collect();
    let bit = |i: usize| (nibbles[i / 4] >> (3 - i % 4)) & 1;

    let mut cells = Vec::with_capacity(size * size);
    for i in 0..size * size {
        cells.push(if bit(i) == 0 { Cell::Blue } else { Cell::Red });
    }
    cells[(size / 2) * size + size / 2] = Cell::OmUpright;

    Ok(Board::from_cells(size, cells))
}

/// Packs a [`Board`] back into its hex representation.
///
/// The inverse of [`decode`], needed only for round-trip testing: the
/// production flow decodes boards that originate from random byte
/// generation and never re-encodes them. The Om cell and any Empty cells
/// pack as a zero bit, so only a freshly decoded board round-trips
/// exactly.
pub fn encode(board: &Board) -> String {
    let nbytes = byte_len(board.size());
    let mut bytes = vec![0u8; nbytes];
    for (i, cell) in board.cells().enumerate() {
        if cell == Cell::Red {
            bytes[i / 8] |= 1 << (7 - i % 8);
        }
    }
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Draws the byte pack for a fresh random board of side length `size`.
///
/// Uses the operating system's CSPRNG: the board seed is the only
/// unpredictable element of the protocol, so a weaker source won't do.
/// When `size^2` is not a multiple of 8 the trailing bits of the last
/// byte are simply never read by the decoder; they are left as drawn.
pub fn random_board(size: usize) -> Result<Vec<u8>> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) || size % 2 == 0 {
        return Err(Error::SizeConstraintViolation(size));
    }

    let mut bytes = vec![0u8; byte_len(size)];
    OsRng.fill_bytes(&mut bytes);
    Ok(bytes)
}

/// Like [`random_board`], but hex-encoded for direct use as a session string.
pub fn random_board_hex(size: usize) -> Result<String> {
    Ok(random_board(size)?
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
