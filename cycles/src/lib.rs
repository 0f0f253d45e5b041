pub use game_state::*;
pub use geometry::*;
pub use protocol::*;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod game_state;
mod geometry;
mod protocol;
