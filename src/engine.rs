/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{bail, Context, Result};

use crate::{
    legal_moves, parse_history, print_perft, random_board_hex, transform, Board, Coord,
    EngineCommand, Move, Search, SearchConfig, Style,
};

/// One game, reconstructible from its parameters alone.
///
/// The session is exactly what the wire carries: the initial board's hex
/// string and the ordered move digits. The current position is replayed
/// from scratch on demand; no other mutable game state exists anywhere.
#[derive(Debug, Clone)]
pub struct Session {
    /// The board parameter, kept verbatim for re-emission.
    board_hex: String,

    /// The decoded initial board (Om at center).
    initial: Board,

    /// Every move played so far, oldest first.
    history: Vec<Move>,

    style: Style,
}

impl Session {
    /// Starts a fresh session on a random board of the given size.
    pub fn random(size: usize, style: Style) -> crate::Result<Self> {
        Self::from_parts(&random_board_hex(size)?, None, style)
    }

    /// Rebuilds a session from its wire parameters.
    pub fn from_parts(
        board_hex: &str,
        moves: Option<&str>,
        style: Style,
    ) -> crate::Result<Self> {
        let initial = crate::decode(board_hex)?;
        let history = moves.map(parse_history).transpose()?.unwrap_or_default();
        Ok(Self {
            board_hex: board_hex.to_string(),
            initial,
            history,
            style,
        })
    }

    /// Replays the move history, yielding the current board and Om position.
    pub fn current(&self) -> (Board, Coord) {
        transform::apply(&self.initial, self.initial.center(), &self.history)
    }

    /// The most recent move, if any.
    pub fn previous(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// The player whose turn it is: 1 on even history length, else 2.
    pub fn player_to_move(&self) -> usize {
        self.history.len() % 2 + 1
    }

    /// The current turn number, starting at 1.
    pub fn turn(&self) -> usize {
        self.history.len() + 1
    }

    /// The winner once the side to move is starved: the *other* player.
    pub fn winner(&self) -> usize {
        if self.history.len() % 2 == 0 {
            2
        } else {
            1
        }
    }

    /// The session string: everything needed to reconstruct this game.
    pub fn state_string(&self) -> String {
        let mut s = format!("board={}", self.board_hex);
        if !self.history.is_empty() {
            s.push_str(&format!(" moves={}", crate::history_string(&self.history)));
        }
        s
    }
}

/// The Sireum engine.
#[derive(Debug)]
pub struct Engine {
    /// The game being played, replayed from its session parameters.
    session: Session,

    /// One half of a channel, responsible for sending commands to the engine.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] on a random 5x5 push game, to be
    /// executed with [`Engine::run`].
    pub fn new() -> Result<Self> {
        let (sender, receiver) = channel();

        Ok(Self {
            session: Session::random(5, Style::Push)?,
            sender,
            receiver,
        })
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("failed to send command to engine")
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits
    /// on received commands. Searches run synchronously inside the loop;
    /// the depth budget bounds their work.
    pub fn run(&mut self) -> Result<()> {
        println!("{}", self.name());

        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        while let Ok(cmd) = self.receiver.recv() {
            match cmd {
                EngineCommand::New { size, style } => match Session::random(size, style) {
                    Ok(session) => {
                        self.session = session;
                        println!("{}", self.session.state_string());
                        self.display();
                    }
                    Err(e) => eprintln!("Error: {e}"),
                },

                EngineCommand::Position { board, moves } => {
                    match Session::from_parts(&board, moves.as_deref(), Style::Push) {
                        Ok(session) => {
                            self.session = session;
                            self.display();
                        }
                        Err(e) => eprintln!("Error: {e}"),
                    }
                }

                EngineCommand::Display => self.display(),

                EngineCommand::Moves => {
                    let (board, om) = self.session.current();
                    match legal_moves(&board, om, self.session.style, self.session.previous()) {
                        Ok(moves) if moves.is_empty() => println!("(none)"),
                        Ok(moves) => {
                            for (mv, target) in &moves {
                                println!("{mv} ({}) -> {target}", mv.name());
                            }
                        }
                        Err(e) => eprintln!("Error: {e}"),
                    }
                }

                EngineCommand::Play { moves } => {
                    if let Err(e) = self.play(&moves) {
                        eprintln!("Error: {e}");
                    } else {
                        self.display();
                    }
                }

                EngineCommand::Go { depth, play } => {
                    if let Err(e) = self.go(depth, play) {
                        eprintln!("Error: {e}");
                    }
                }

                EngineCommand::State => println!("{}", self.session.state_string()),

                EngineCommand::Perft { depth } => {
                    let (board, om) = self.session.current();
                    if let Err(e) =
                        print_perft(&board, om, self.session.style, self.session.previous(), depth)
                    {
                        eprintln!("Error: {e}");
                    }
                }

                EngineCommand::Exit => break,
            }
        }

        Ok(())
    }

    /// Executes the `display` command: the turn/winner heading, then the grid.
    fn display(&self) {
        let (board, om) = self.session.current();
        let heading =
            match legal_moves(&board, om, self.session.style, self.session.previous()) {
                Ok(moves) if moves.is_empty() => {
                    format!("Player {} wins!", self.session.winner())
                }
                Ok(_) => format!(
                    "Player: {} | Turn: {}",
                    self.session.player_to_move(),
                    self.session.turn()
                ),
                Err(e) => format!("Error: {e}"),
            };
        println!("{heading}\n{board}");
    }

    /// Applies a digit string of moves for the side to move, one at a time.
    ///
    /// Unlike the raw transform (which shrugs off illegal moves), playing
    /// an illegal move here is an error: history parity is the turn
    /// authority, so silently absorbing a no-op would corrupt whose turn
    /// it is.
    fn play(&mut self, moves: &str) -> Result<()> {
        for mv in parse_history(moves)? {
            let (board, om) = self.session.current();
            let legal = legal_moves(&board, om, self.session.style, self.session.previous())?;
            if legal.is_empty() {
                bail!("the game is over: player {} wins", self.session.winner());
            }
            if !legal.contains(mv) {
                bail!("move {mv} ({}) is not legal here", mv.name());
            }
            self.session.history.push(mv);
        }
        Ok(())
    }

    /// Executes the `go` command: searches the current position, prints the
    /// weighted move map and the chosen move, optionally playing it.
    fn go(&mut self, depth: Option<usize>, play: bool) -> Result<()> {
        let (board, om) = self.session.current();
        let config = depth
            .map(|max_depth| SearchConfig { max_depth })
            .unwrap_or_else(|| SearchConfig::for_size(board.size()));

        let res = Search::new(&board, om, self.session.style, self.session.previous(), config)
            .start()?;

        println!("info depth {} nodes {}", config.max_depth, res.nodes);
        for (mv, weight) in res.weights.iter() {
            println!("info move {mv} ({}) weight {weight:.3}", mv.name());
        }

        match res.bestmove {
            Some(best) => {
                let forced = if res.is_forced_win() { " (forced win)" } else { "" };
                println!("bestmove {best} weight {:.3}{forced}", res.weight);
                if play {
                    self.session.history.push(best);
                    self.display();
                }
            }
            None => {
                println!("bestmove (none)");
                println!("Player {} wins!", self.session.winner());
            }
        }

        Ok(())
    }
}

/// Loops endlessly to await input via `stdin`, sending all
/// successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("failed to send 'exit' command after receiving empty input")?;

            bail!("engine received input of 0 bytes and is quitting");
        }

        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("failed to send command to engine")?,

            // Invalid commands print their usage error and keep the loop alive.
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_replay_matches_manual_application() {
        let session = Session::from_parts("00000000", Some("82"), Style::Push).unwrap();
        let initial = crate::decode("00000000").unwrap();
        let (expected, expected_om) = transform::apply(
            &initial,
            initial.center(),
            &[Move::North, Move::South],
        );

        let (board, om) = session.current();
        assert_eq!(board, expected);
        assert_eq!(om, expected_om);
    }

    #[test]
    fn test_turn_parity_conventions() {
        let mut session = Session::from_parts("00000000", None, Style::Push).unwrap();
        assert_eq!(session.player_to_move(), 1);
        assert_eq!(session.turn(), 1);
        assert_eq!(session.winner(), 2);

        session.history.push(Move::North);
        assert_eq!(session.player_to_move(), 2);
        assert_eq!(session.turn(), 2);
        assert_eq!(session.winner(), 1);
    }

    #[test]
    fn test_state_string_roundtrip() {
        let session = Session::from_parts("00000000", Some("825"), Style::Push).unwrap();
        assert_eq!(session.state_string(), "board=00000000 moves=825");
    }

    #[test]
    fn test_session_rejects_bad_history() {
        assert!(Session::from_parts("00000000", Some("87"), Style::Push).is_err());
    }
}
