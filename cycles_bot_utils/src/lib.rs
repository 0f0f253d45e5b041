mod connection;
pub use connection::*;

use std::io;

use cycles::{Direction, GameState};

/// The link between a bot and the game server.
pub trait Connection {
    /// Opens the session under the display name `name`.
    fn connect(&mut self, name: &str) -> io::Result<()>;

    /// Whether the session is still running.
    fn is_active(&self) -> bool;

    /// Blocks until the server sends the next turn.
    ///
    /// Returns `Ok(None)` once the round is over; afterwards, the connection is
    /// no longer active.
    fn receive_game_state(&mut self) -> io::Result<Option<GameState>>;

    /// Sends the move for the current turn.
    fn send_move(&mut self, direction: Direction) -> io::Result<()>;
}
