use std::io;

use crate::decision::NoValidMove;

#[derive(Debug)]
/// The reasons a bot stops playing before the round is over.
pub enum BotError {
    /// The session could not be opened.
    ConnectionUnavailable {
        name: String,
        source: Option<io::Error>,
    },
    /// Every neighbouring cell is a wall or outside of the grid.
    NoValidMove { name: String, source: NoValidMove },
    /// Reading a state or sending a move failed mid-round.
    ConnectionLost { name: String, source: io::Error },
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::ConnectionUnavailable { source, .. } => {
                source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
            }
            BotError::NoValidMove { source, .. } => Some(source),
            BotError::ConnectionLost { source, .. } => Some(source),
        }
    }
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::ConnectionUnavailable { name, .. } => write!(f, "{}: Connection failed", name),
            BotError::NoValidMove { name, .. } => write!(f, "{}: No valid moves available", name),
            BotError::ConnectionLost { name, .. } => write!(f, "{}: Lost the connection", name),
        }
    }
}
