use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use worm::{Coords, Direction, GameError, GameState, Phase, Rules, StepOutcome};

const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

fn assert_invariants(state: &GameState) {
    let body: Vec<Coords> = state.body().collect();
    let unique: HashSet<Coords> = body.iter().copied().collect();

    assert_eq!(body.len(), state.len());
    assert_eq!(unique.len(), body.len(), "segments overlap: {:?}", body);
    assert!(body.iter().all(|pos| state.in_bounds(*pos)));
    assert_eq!(state.head(), body.first().copied());

    if let Some(target) = state.target() {
        assert!(state.in_bounds(target.position));
        assert!((1..=9).contains(&target.value));
        assert!(!unique.contains(&target.position), "target on the worm at {:?}", target.position);
    } else {
        assert_eq!(body.len() as i32, state.width() * state.height());
    }
}

/// Plays one game with random turns until it ends, checking the invariants
/// after every step. Returns the number of steps survived.
fn play_randomly(seed: u64, width: i32, height: i32) -> usize {
    let mut turns = ChaCha8Rng::seed_from_u64(seed ^ 0xFFFF);
    let mut state = GameState::with_seed(Rules { initial_growth: 2 }, seed);
    state.reset(width, height).unwrap();
    assert_invariants(&state);

    for steps in 0.. {
        if steps % 3 == 0 {
            let direction = *DIRECTIONS.choose(&mut turns).unwrap();
            state.set_direction(direction).unwrap();
        }

        let score = state.score();
        let len = state.len();
        let outcome = state.step().unwrap();
        assert_invariants(&state);

        match outcome {
            StepOutcome::Advanced { new_head, removed_tail } => {
                assert_eq!(state.head(), Some(new_head));
                assert_eq!(state.score(), score);
                let expected = if removed_tail.is_some() { len } else { len + 1 };
                assert_eq!(state.len(), expected);
            }
            StepOutcome::AteTarget { new_head, value, .. } => {
                assert_eq!(state.head(), Some(new_head));
                assert_eq!(state.score(), score + u64::from(value));
                assert!(state.pending_growth() >= value);
            }
            StepOutcome::HitWall { fatal } => {
                assert!(!state.in_bounds(fatal));
                assert_eq!(state.len(), len);
                return steps;
            }
            StepOutcome::HitSelf { fatal } => {
                assert!(state.body().any(|pos| pos == fatal));
                assert_eq!(state.len(), len);
                return steps;
            }
            StepOutcome::AlreadyOver => panic!("game ended without a fatal step"),
        }
    }

    unreachable!()
}

#[test]
fn random_games_keep_invariants() {
    for seed in 0..200 {
        play_randomly(seed, 6, 5);
    }
}

#[test]
fn random_games_on_narrow_grids() {
    for seed in 0..50 {
        play_randomly(seed, 1, 8);
        play_randomly(seed, 8, 1);
        play_randomly(seed, 2, 2);
    }
}

#[test]
fn same_seed_same_game() {
    let run = |seed| {
        let mut state = GameState::with_seed(Rules::default(), seed);
        state.reset(30, 20).unwrap();
        let mut trace = vec![state.target()];

        for direction in [Direction::Up, Direction::Left, Direction::Down].iter().cycle().take(60) {
            state.set_direction(*direction).unwrap_or(false);
            if state.step().unwrap().is_fatal() {
                break;
            }
            trace.push(state.target());
        }

        (trace, state.score(), state.body().collect::<Vec<_>>())
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn fixed_seed_replays_after_reset() {
    let mut state = GameState::with_seed(Rules::default(), 42);
    state.reset(25, 25).unwrap();
    let first = state.target();

    state.reset(25, 25).unwrap();

    assert_eq!(state.target(), first);
}

#[test]
fn game_over_is_terminal_until_reset() {
    let mut state = GameState::new(Rules::default());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.step(), Err(GameError::NotStarted));

    state.reset(1, 3).unwrap();
    assert_eq!(state.head(), Some((0, 1)));
    assert_eq!(state.step(), Ok(StepOutcome::HitWall { fatal: (1, 1) }));
    assert_eq!(state.step(), Ok(StepOutcome::AlreadyOver));
    assert_eq!(state.set_direction(Direction::Down), Err(GameError::GameOver));

    state.reset(1, 3).unwrap();
    assert_eq!(state.set_direction(Direction::Down), Ok(true));
    match state.step().unwrap() {
        StepOutcome::Advanced { new_head, .. } | StepOutcome::AteTarget { new_head, .. } => {
            assert_eq!(new_head, (0, 2))
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn initial_growth_comes_from_rules() {
    let mut state = GameState::with_seed(Rules { initial_growth: 4 }, 1);
    state.reset(50, 3).unwrap();
    assert_eq!(state.pending_growth(), 4);

    let mut tails = vec![];
    let mut ate = false;
    for _ in 0..6 {
        match state.step().unwrap() {
            StepOutcome::Advanced { removed_tail, .. } => tails.push(removed_tail.is_some()),
            StepOutcome::AteTarget { removed_tail, .. } => {
                ate = true;
                tails.push(removed_tail.is_some())
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!(&tails[..4], &[false, false, false, false]);
    assert!(state.len() >= 5);
    if !ate {
        assert_eq!(&tails[4..], &[true, true]);
        assert_eq!(state.len(), 5);
    }
}
