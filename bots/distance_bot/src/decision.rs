use cycles::{Direction, GameState, Player, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Scores closer than this to the best score count as equally good.
pub const TIE_TOLERANCE: f64 = 1e-6;

/// No direction leads to an empty cell inside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoValidMove {
    pub position: Position,
}

impl std::error::Error for NoValidMove {}

impl std::fmt::Display for NoValidMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No valid moves available from {}", self.position)
    }
}

/// The directions from `position` that lead to an empty cell inside the grid,
/// in wire-code order.
pub fn valid_moves(state: &GameState, position: Position) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|dir| state.is_free(position + dir.offset()))
        .collect()
}

/// Distance from `position` to the closest player not called `name`.
///
/// Infinite if there is nobody else.
pub fn min_distance_to_opponents(state: &GameState, name: &str, position: Position) -> f64 {
    state
        .opponents(name)
        .map(|opponent| position.distance_to(opponent.position))
        .fold(f64::INFINITY, f64::min)
}

/// Pairs each of the `moves` with the distance it would leave `me` from the
/// closest opponent.
pub fn score_moves(state: &GameState, me: &Player, moves: &[Direction]) -> Vec<(Direction, f64)> {
    moves
        .iter()
        .map(|&dir| {
            let score = min_distance_to_opponents(state, &me.name, me.position + dir.offset());
            debug!(name = %me.name, direction = %dir, score, "Scored move");
            (dir, score)
        })
        .collect()
}

/// All moves whose score is as good as the best one, up to [`TIE_TOLERANCE`].
pub fn tie_break_set(scored: &[(Direction, f64)]) -> Vec<Direction> {
    let best = scored
        .iter()
        .map(|&(_, score)| score)
        .fold(f64::NEG_INFINITY, f64::max);
    scored
        .iter()
        // Equality first: inf - inf is NaN
        .filter(|&&(_, score)| score == best || (best - score).abs() < TIE_TOLERANCE)
        .map(|&(dir, _)| dir)
        .collect()
}

/// Picks the move that keeps `me` as far as possible from the closest
/// opponent, choosing uniformly at random among equally good moves.
///
/// The caller owns `rng` and should seed it once, not per turn.
pub fn decide_move<R: Rng + ?Sized>(
    state: &GameState,
    me: &Player,
    rng: &mut R,
) -> Result<Direction, NoValidMove> {
    let no_valid_move = NoValidMove {
        position: me.position,
    };
    let moves = valid_moves(state, me.position);
    if moves.is_empty() {
        return Err(no_valid_move);
    }

    let scored = score_moves(state, me, &moves);
    let best_moves = tie_break_set(&scored);
    let direction = *best_moves.choose(rng).ok_or(no_valid_move)?;
    debug!(
        name = %me.name,
        %direction,
        candidates = best_moves.len(),
        "Selected move"
    );
    Ok(direction)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use cycles::arbitrary::ArbitraryGameState;
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn player(name: &str, x: i32, y: i32, id: u32) -> Player {
        Player {
            name: String::from(name),
            position: Position::new(x, y),
            id,
        }
    }

    /// Lays out `players` on an otherwise empty grid, marking their cells.
    fn state_with(width: i32, height: i32, players: Vec<Player>) -> GameState {
        let mut state = GameState::empty(width, height, Vec::new()).unwrap();
        for p in &players {
            state.set_grid_cell(p.position, p.id as i32);
        }
        state.players = players;
        state
    }

    /// How often each direction is chosen over `trials` decisions.
    fn histogram(state: &GameState, me: &Player, trials: usize) -> BTreeMap<Direction, usize> {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = BTreeMap::new();
        for _ in 0..trials {
            *counts.entry(decide_move(state, me, &mut rng).unwrap()).or_default() += 1;
        }
        counts
    }

    quickcheck! {
        fn chosen_move_is_valid(input: ArbitraryGameState, seed: u64) -> bool {
            let state = input.0;
            let mut rng = StdRng::seed_from_u64(seed);
            state.players.iter().all(|me| match decide_move(&state, me, &mut rng) {
                Ok(dir) => state.is_free(me.position + dir.offset()),
                Err(NoValidMove { position }) => {
                    position == me.position && valid_moves(&state, me.position).is_empty()
                }
            })
        }
    }

    quickcheck! {
        fn chosen_move_is_in_tie_break_set(input: ArbitraryGameState, seed: u64) -> bool {
            let state = input.0;
            let mut rng = StdRng::seed_from_u64(seed);
            let me = &state.players[0];
            let moves = valid_moves(&state, me.position);
            let best = tie_break_set(&score_moves(&state, me, &moves));
            (0..8).all(|_| match decide_move(&state, me, &mut rng) {
                Ok(dir) => best.contains(&dir),
                Err(_) => moves.is_empty(),
            })
        }
    }

    quickcheck! {
        fn without_opponents_all_valid_moves_tie(input: ArbitraryGameState) -> bool {
            let mut state = input.0;
            state.players.truncate(1);
            let me = &state.players[0];
            let moves = valid_moves(&state, me.position);
            tie_break_set(&score_moves(&state, me, &moves)) == moves
        }
    }

    #[test]
    fn moves_away_from_single_opponent() {
        let me = player("alexa", 2, 2, 1);
        let state = state_with(5, 5, vec![me.clone(), player("bob", 2, 0, 2)]);

        assert_eq!(valid_moves(&state, me.position), Direction::ALL);
        let scored: BTreeMap<Direction, f64> =
            score_moves(&state, &me, &Direction::ALL).into_iter().collect();
        assert_eq!(scored[&Direction::Up], 1.0);
        assert_eq!(scored[&Direction::Down], 3.0);
        assert!((scored[&Direction::Left] - 5f64.sqrt()).abs() < 1e-9);
        assert!((scored[&Direction::Right] - 5f64.sqrt()).abs() < 1e-9);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(decide_move(&state, &me, &mut rng), Ok(Direction::Down));
        }
    }

    #[test]
    fn never_moves_into_a_wall() {
        // Opponents in the far corners keep every free neighbour equally far away
        let me = player("alexa", 2, 2, 1);
        let mut state = state_with(
            5,
            5,
            vec![me.clone(), player("bob", 0, 4, 2), player("carol", 4, 4, 3)],
        );
        state.set_grid_cell(Position::new(2, 1), 3);

        let moves = valid_moves(&state, me.position);
        assert_eq!(moves, [Direction::Right, Direction::Down, Direction::Left]);

        let counts = histogram(&state, &me, 3000);
        assert!(!counts.contains_key(&Direction::Up));
        let best: BTreeSet<Direction> = tie_break_set(&score_moves(&state, &me, &moves))
            .into_iter()
            .collect();
        assert_eq!(counts.keys().copied().collect::<BTreeSet<_>>(), best);
    }

    #[test]
    fn equidistant_neighbours_are_picked_uniformly() {
        let me = player("alexa", 2, 2, 1);
        let mut state = state_with(5, 5, vec![me.clone()]);
        state.set_grid_cell(Position::new(2, 1), 3);

        let counts = histogram(&state, &me, 3000);
        assert_eq!(counts.len(), 3);
        for dir in [Direction::Right, Direction::Down, Direction::Left] {
            let n = counts[&dir];
            assert!((800..1200).contains(&n), "{} chosen {} times", dir, n);
        }
    }

    #[test]
    fn cornered() {
        let me = player("alexa", 0, 0, 1);
        let mut state = state_with(3, 3, vec![me.clone(), player("bob", 2, 2, 2)]);
        state.set_grid_cell(Position::new(1, 0), 1);
        state.set_grid_cell(Position::new(0, 1), 2);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            decide_move(&state, &me, &mut rng),
            Err(NoValidMove {
                position: Position::new(0, 0)
            })
        );
    }

    #[test]
    fn tied_best_moves_are_chosen_equally_often() {
        // Opponents directly above and below leave left and right at the same distance
        let me = player("alexa", 3, 1, 1);
        let state = state_with(
            7,
            3,
            vec![me.clone(), player("bob", 3, 0, 2), player("carol", 3, 2, 3)],
        );
        let moves = valid_moves(&state, me.position);
        assert_eq!(moves, [Direction::Right, Direction::Left]);
        let best = tie_break_set(&score_moves(&state, &me, &moves));
        assert_eq!(best, [Direction::Right, Direction::Left]);

        let counts = histogram(&state, &me, 2000);
        let right = counts[&Direction::Right];
        let left = counts[&Direction::Left];
        assert_eq!(right + left, 2000);
        assert!((850..1150).contains(&right), "right chosen {} times", right);
    }

    #[test]
    fn near_equal_scores_tie() {
        let scored = [
            (Direction::Up, 2.0),
            (Direction::Right, 2.0 - 1e-9),
            (Direction::Down, 1.5),
        ];
        assert_eq!(tie_break_set(&scored), [Direction::Up, Direction::Right]);

        let unconstrained = [(Direction::Up, f64::INFINITY), (Direction::Left, f64::INFINITY)];
        assert_eq!(
            tie_break_set(&unconstrained),
            [Direction::Up, Direction::Left]
        );
    }

    #[test]
    fn own_position_is_not_an_opponent() {
        let me = player("alexa", 1, 1, 1);
        let state = state_with(3, 3, vec![me.clone()]);
        assert_eq!(
            min_distance_to_opponents(&state, "alexa", Position::new(1, 0)),
            f64::INFINITY
        );
    }
}
