use serde::{Deserialize, Serialize};

use crate::Position;

/// A participant in the current round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The display name, unique within a round and stable across turns.
    pub name: String,
    /// The cell the player currently occupies.
    pub position: Position,
    /// The marker the server writes into the grid for this player's walls.
    /// Never zero.
    pub id: u32,
}

/// A snapshot of one turn, as sent by the server.
///
/// The grid is stored row-major. A cell is `0` when it is empty, anything else
/// is a wall (or a player standing on it). Walls never disappear within a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedGameState")]
pub struct GameState {
    width: i32,
    height: i32,
    grid: Vec<i32>,
    /// All players in the round, in the order the server lists them.
    pub players: Vec<Player>,
    /// The server's turn counter.
    pub frame: u64,
}

/// Serialized form of a [`GameState`], before the dimensions are checked.
#[derive(Deserialize)]
struct UncheckedGameState {
    width: i32,
    height: i32,
    grid: Vec<i32>,
    players: Vec<Player>,
    #[serde(default)]
    frame: u64,
}

impl TryFrom<UncheckedGameState> for GameState {
    type Error = InvalidGameState;

    fn try_from(state: UncheckedGameState) -> Result<Self, Self::Error> {
        GameState::new(
            state.width,
            state.height,
            state.grid,
            state.players,
            state.frame,
        )
    }
}

impl GameState {
    pub fn new(
        width: i32,
        height: i32,
        grid: Vec<i32>,
        players: Vec<Player>,
        frame: u64,
    ) -> Result<Self, InvalidGameState> {
        if width < 0 || height < 0 {
            return Err(InvalidGameState::NegativeDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if grid.len() != expected {
            return Err(InvalidGameState::GridSizeMismatch {
                expected,
                actual: grid.len(),
            });
        }
        let state = Self {
            width,
            height,
            grid,
            players,
            frame,
        };
        if let Some(player) = state
            .players
            .iter()
            .find(|player| !state.is_inside_grid(player.position))
        {
            return Err(InvalidGameState::PlayerOutsideGrid {
                name: player.name.clone(),
                position: player.position,
            });
        }
        Ok(state)
    }

    /// A grid with no walls, for when only the players matter.
    pub fn empty(width: i32, height: i32, players: Vec<Player>) -> Result<Self, InvalidGameState> {
        let cells = width.max(0) as usize * height.max(0) as usize;
        Self::new(width, height, vec![0; cells], players, 0)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_inside_grid(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Returns the marker at `pos`.
    ///
    /// Panics if `pos` is not inside the grid; check with
    /// [`is_inside_grid()`](Self::is_inside_grid) first.
    pub fn get_grid_cell(&self, pos: Position) -> i32 {
        assert!(
            self.is_inside_grid(pos),
            "{} is outside of the {}x{} grid",
            pos,
            self.width,
            self.height
        );
        self.grid[pos.y as usize * self.width as usize + pos.x as usize]
    }

    /// Whether a player could move onto `pos` this turn.
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_inside_grid(pos) && self.get_grid_cell(pos) == 0
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    /// Every player except the one called `name`.
    pub fn opponents<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Player> + 'a {
        self.players.iter().filter(move |player| player.name != name)
    }

    /// Marks `pos` with `marker`, for building states by hand.
    #[cfg(any(test, feature = "arbitrary"))]
    pub fn set_grid_cell(&mut self, pos: Position, marker: i32) {
        assert!(self.is_inside_grid(pos), "{} is outside of the grid", pos);
        let idx = pos.y as usize * self.width as usize + pos.x as usize;
        self.grid[idx] = marker;
    }
}

/// The error type for constructing a [`GameState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidGameState {
    NegativeDimensions { width: i32, height: i32 },
    GridSizeMismatch { expected: usize, actual: usize },
    PlayerOutsideGrid { name: String, position: Position },
}

impl std::error::Error for InvalidGameState {}

impl std::fmt::Display for InvalidGameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidGameState::NegativeDimensions { width, height } => {
                write!(f, "Grid dimensions {}x{} are negative", width, height)
            }
            InvalidGameState::GridSizeMismatch { expected, actual } => write!(
                f,
                "Grid has {} cells, but its dimensions require {}",
                actual, expected
            ),
            InvalidGameState::PlayerOutsideGrid { name, position } => write!(
                f,
                "Player {} stands at {}, outside of the grid",
                name, position
            ),
        }
    }
}
