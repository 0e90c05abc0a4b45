/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::{builder::PossibleValue, Parser, Subcommand, ValueEnum};

use crate::Style;

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(multicall = true, about, rename_all = "lower")]
pub struct Cli {
    #[command(subcommand)]
    pub command: EngineCommand,
}

/// Everything the engine can be asked to do over its line protocol.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "lower")]
pub enum EngineCommand {
    /// Start a new game on a freshly generated random board.
    New {
        /// Board side length; odd, between 5 and 19.
        #[arg(short, long, default_value = "5")]
        size: usize,

        /// Game style to play.
        #[arg(long, default_value = "push")]
        style: Style,
    },

    /// Load a session: a hex board string plus an optional move history.
    #[command(alias = "pos")]
    Position {
        /// The board parameter, as produced by `new`.
        board: String,

        /// Concatenated move digits from {2,4,5,6,8}, oldest first.
        moves: Option<String>,
    },

    /// Print the current board along with the turn or winner heading.
    #[command(alias = "d")]
    Display,

    /// Show all legal moves for the side to move.
    Moves,

    /// Apply one or more moves (as history digits) for the side to move.
    ///
    /// Each move must be legal at its point of application; parity of the
    /// accumulated history decides whose turn it is.
    Play { moves: String },

    /// Search the current position and report the weighted move map.
    Go {
        /// Override the depth budget chosen by board size.
        #[arg(short, long)]
        depth: Option<usize>,

        /// If set, the chosen move is appended to the game like a played move.
        #[arg(short, long, default_value = "false")]
        play: bool,
    },

    /// Print the session string that fully reconstructs this game.
    State,

    /// Count the legal-move tree's leaf nodes at the supplied depth.
    Perft { depth: usize },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,
}

impl FromStr for EngineCommand {
    type Err = clap::Error;

    /// Attempt to parse an [`EngineCommand`] from a line of input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cli::try_parse_from(s.split_ascii_whitespace()).map(|cli| cli.command)
    }
}

impl ValueEnum for Style {
    fn value_variants<'a>() -> &'a [Self] {
        &[Style::Push, Style::Flip]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        // Possible values are the lowercase style names; `flip` parses
        // fine and is then rejected by the rules with UnsupportedStyle.
        let name = match self {
            Style::Push => "push",
            Style::Flip => "flip",
        };
        Some(PossibleValue::new(name))
    }
}
