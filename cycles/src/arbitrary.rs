use std::collections::BTreeSet;

use quickcheck::Arbitrary;

use crate::{GameState, Player, Position};

/// A small, consistent [`GameState`]: every player stands on a cell marked
/// with its own id, and some other cells are walls.
#[derive(Clone, Debug)]
pub struct ArbitraryGameState(pub GameState);

impl quickcheck::Arbitrary for ArbitraryGameState {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let width = i32::from(u8::arbitrary(g) % 8) + 1;
        let height = i32::from(u8::arbitrary(g) % 8) + 1;
        let mut state = GameState::empty(width, height, Vec::new()).unwrap();

        // Roughly a quarter of the cells are old walls
        for y in 0..height {
            for x in 0..width {
                if u8::arbitrary(g) % 4 == 0 {
                    let marker = i32::from(u8::arbitrary(g) % 4) + 1;
                    state.set_grid_cell(Position::new(x, y), marker);
                }
            }
        }

        let num_players = usize::from(u8::arbitrary(g) % 4) + 1;
        let mut taken = BTreeSet::new();
        for id in 1..=num_players as u32 {
            let position = Position::new(
                i32::from(u8::arbitrary(g)) % width,
                i32::from(u8::arbitrary(g)) % height,
            );
            if !taken.insert((position.x, position.y)) {
                continue;
            }
            state.set_grid_cell(position, id as i32);
            state.players.push(Player {
                name: format!("player{}", id),
                position,
                id,
            });
        }

        ArbitraryGameState(state)
    }
}
