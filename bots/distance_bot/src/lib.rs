mod client;
pub mod decision;
mod error;
pub use client::*;
pub use decision::{decide_move, NoValidMove};
pub use error::*;
