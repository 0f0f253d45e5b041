use serde::{Deserialize, Serialize};

use crate::{Direction, GameState};

/// Message from the server to a bot.
///
/// Messages are JSON objects, one per line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The state of the round at the start of a turn.
    ///
    /// The response should be a [`ClientMessage::Move`].
    GameState(GameState),
    /// The round is over. The bot should shut down.
    Bye,
}

/// Message from a bot to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Sent once, right after connecting.
    Join {
        /// The display name the bot plays under.
        name: String,
    },
    /// The move for the current turn.
    Move { direction: Direction },
}
