use cycles::{Direction, GameState, Player, Position};
use cycles_bot_utils::Connection;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::decision::decide_move;
use crate::error::BotError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Playing,
    /// Absorbing: a terminated client never plays again.
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved(Direction),
    RoundOver,
}

/// Plays one round over a [`Connection`], one move per received state.
pub struct BotClient<C, R> {
    connection: C,
    name: String,
    state: Option<GameState>,
    // Our own entry from the most recent state that had one. Starts out at the
    // origin, so that every state gets a move.
    me: Player,
    rng: R,
    phase: Phase,
}

impl<C: Connection, R: Rng> BotClient<C, R> {
    /// Opens the session under `name`.
    ///
    /// `rng` is used for tie-breaking for the whole round, so seed it once.
    pub fn new(connection: C, name: &str, rng: R) -> Result<Self, BotError> {
        let mut client = Self {
            connection,
            name: String::from(name),
            state: None,
            me: Player {
                name: String::from(name),
                position: Position::default(),
                id: 0,
            },
            rng,
            phase: Phase::Connecting,
        };
        let connected = client.connection.connect(name);
        match connected {
            Ok(()) if client.connection.is_active() => {
                info!(name, "Connected");
                client.phase = Phase::Playing;
                Ok(client)
            }
            Ok(()) => Err(client.terminate(BotError::ConnectionUnavailable {
                name: client.name.clone(),
                source: None,
            })),
            Err(err) => Err(client.terminate(BotError::ConnectionUnavailable {
                name: client.name.clone(),
                source: Some(err),
            })),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The most recently received state.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Our own player, as of the last state that listed it.
    pub fn me(&self) -> &Player {
        &self.me
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Plays turns until the round is over.
    pub fn run(&mut self) -> Result<(), BotError> {
        while self.phase == Phase::Playing && self.connection.is_active() {
            if self.play_turn()? == TurnOutcome::RoundOver {
                break;
            }
        }
        self.phase = Phase::Terminated;
        Ok(())
    }

    /// Waits for the next state, then answers it with a move.
    pub fn play_turn(&mut self) -> Result<TurnOutcome, BotError> {
        if self.phase != Phase::Playing {
            return Ok(TurnOutcome::RoundOver);
        }

        let state = match self.connection.receive_game_state() {
            Ok(Some(state)) => state,
            Ok(None) => {
                info!(name = %self.name, "Round is over");
                self.phase = Phase::Terminated;
                return Ok(TurnOutcome::RoundOver);
            }
            Err(source) => {
                let name = self.name.clone();
                return Err(self.terminate(BotError::ConnectionLost { name, source }));
            }
        };
        debug!(name = %self.name, frame = state.frame, "Received state");

        match state.player(&self.name) {
            Some(player) => self.me = player.clone(),
            None => warn!(
                name = %self.name,
                frame = state.frame,
                "Own player is missing from the state, keeping the last known position"
            ),
        }
        let state = &*self.state.insert(state);

        let direction = match decide_move(state, &self.me, &mut self.rng) {
            Ok(direction) => direction,
            Err(source) => {
                let name = self.name.clone();
                return Err(self.terminate(BotError::NoValidMove { name, source }));
            }
        };

        debug!(name = %self.name, %direction, "Sending move");
        if let Err(source) = self.connection.send_move(direction) {
            let name = self.name.clone();
            return Err(self.terminate(BotError::ConnectionLost { name, source }));
        }
        Ok(TurnOutcome::Moved(direction))
    }

    fn terminate(&mut self, err: BotError) -> BotError {
        self.phase = Phase::Terminated;
        err
    }
}
