use std::collections::HashSet;

use log::{debug, info, trace, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GameError;
use crate::worm::Worm;
use crate::Coords;
use Direction::*;
use StepOutcome::*;

pub const MIN_TARGET_VALUE: u32 = 1;
pub const MAX_TARGET_VALUE: u32 = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector of the direction, `y` growing downwards.
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// The cell one step away from `pos` in this direction.
    pub fn next_cell(self, pos: Coords) -> Coords {
        let (dx, dy) = self.delta();
        (pos.0 + dx, pos.1 + dy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No game has been started yet.
    Idle,
    Playing,
    /// A fatal collision happened; only a reset leaves this phase.
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub position: Coords,
    pub value: u32,
}

/// What a call to [`GameState::step`] did, with enough detail to redraw
/// only the cells that changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { new_head: Coords, removed_tail: Option<Coords> },
    AteTarget { new_head: Coords, removed_tail: Option<Coords>, value: u32 },
    /// `fatal` is the out-of-bounds cell the head tried to enter.
    HitWall { fatal: Coords },
    HitSelf { fatal: Coords },
    AlreadyOver,
}

impl StepOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, HitWall { .. } | HitSelf { .. })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    /// Steps at the start of a game during which the worm grows.
    pub initial_growth: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Seeding {
    Entropy,
    Fixed(u64),
    /// Keep drawing from the generator handed in by the caller.
    Injected,
}

#[derive(Debug)]
pub struct GameState<R = ChaCha8Rng> {
    rules: Rules,
    seeding: Seeding,
    rng: R,
    phase: Phase,
    width: i32,
    height: i32,
    direction: Direction,
    worm: Worm,
    pending_growth: u32,
    score: u64,
    target: Option<Target>,
}

impl GameState {
    /// A game whose generator is re-seeded from OS entropy on every reset.
    pub fn new(rules: Rules) -> Self {
        GameState::with_seeding(rules, Seeding::Entropy)
    }

    /// A game that replays the same targets after every reset.
    pub fn with_seed(rules: Rules, seed: u64) -> Self {
        GameState::with_seeding(rules, Seeding::Fixed(seed))
    }
}

impl<R: Rng + SeedableRng> GameState<R> {
    /// A game drawing from `rng`, which resets keep using without re-seeding.
    pub fn with_rng(rules: Rules, rng: R) -> Self {
        GameState::from_parts(rules, Seeding::Injected, rng)
    }

    fn with_seeding(rules: Rules, seeding: Seeding) -> Self {
        let rng = match seeding {
            Seeding::Fixed(seed) => R::seed_from_u64(seed),
            _ => R::from_entropy(),
        };
        GameState::from_parts(rules, seeding, rng)
    }

    fn from_parts(rules: Rules, seeding: Seeding, rng: R) -> Self {
        GameState {
            rules,
            seeding,
            rng,
            phase: Phase::Idle,
            width: 0,
            height: 0,
            direction: Right,
            worm: Worm::new(),
            pending_growth: 0,
            score: 0,
            target: None,
        }
    }

    /// Starts a new game on a `width` x `height` grid.
    ///
    /// The worm starts as a single segment in the middle of the grid heading
    /// right. Any game in progress is discarded.
    pub fn reset(&mut self, width: i32, height: i32) -> Result<(), GameError> {
        if width <= 0 || height <= 0 {
            return Err(GameError::EmptyGrid { width, height });
        }

        match self.seeding {
            Seeding::Entropy => self.rng = R::from_entropy(),
            Seeding::Fixed(seed) => self.rng = R::seed_from_u64(seed),
            Seeding::Injected => {}
        }

        self.width = width;
        self.height = height;
        self.direction = Right;
        self.worm = Worm::new();
        self.worm.push_head((width / 2, height / 2));
        self.pending_growth = self.rules.initial_growth;
        self.score = 0;
        self.generate_target();
        self.phase = Phase::Playing;

        debug!(
            "new {}x{} game, head at {:?}, target {:?}",
            width, height, (width / 2, height / 2), self.target
        );
        Ok(())
    }

    /// Sets the heading used by the next [`GameState::step`].
    ///
    /// Returns `Ok(false)` and keeps the current heading if `direction` would
    /// turn the head straight back onto the segment behind it.
    pub fn set_direction(&mut self, direction: Direction) -> Result<bool, GameError> {
        self.ensure_playing()?;

        let mut body = self.worm.segments();
        if let (Some(head), Some(neck)) = (body.next(), body.next()) {
            if direction.next_cell(head) == neck {
                trace!("ignoring U-turn to {:?}", direction);
                return Ok(false);
            }
        }

        self.direction = direction;
        Ok(true)
    }

    /// Advances the game by one move of the worm.
    pub fn step(&mut self) -> Result<StepOutcome, GameError> {
        match self.phase {
            Phase::Idle => return Err(GameError::NotStarted),
            Phase::GameOver => return Ok(AlreadyOver),
            Phase::Playing => {}
        }

        let head = self.worm.head().expect("a worm in play always has a head");
        let new_head = self.direction.next_cell(head);

        if !self.in_bounds(new_head) {
            self.phase = Phase::GameOver;
            info!("ran into a wall at {:?}, score {}", new_head, self.score);
            return Ok(HitWall { fatal: new_head });
        }

        // The tail has not moved yet, so it counts as an obstacle too
        if self.worm.contains(new_head) {
            self.phase = Phase::GameOver;
            info!("ran into itself at {:?}, score {}", new_head, self.score);
            return Ok(HitSelf { fatal: new_head });
        }

        self.worm.push_head(new_head);

        let removed_tail = if self.pending_growth == 0 {
            self.worm.pop_tail()
        } else {
            self.pending_growth -= 1;
            None
        };

        trace!("head {:?}, removed tail {:?}", new_head, removed_tail);

        match self.target {
            Some(target) if target.position == new_head => {
                self.pending_growth += target.value;
                self.score += u64::from(target.value);
                self.generate_target();
                debug!("ate {} at {:?}, score {}", target.value, new_head, self.score);
                Ok(AteTarget { new_head, removed_tail, value: target.value })
            }
            _ => Ok(Advanced { new_head, removed_tail }),
        }
    }

    pub fn in_bounds(&self, pos: Coords) -> bool {
        (0..self.width).contains(&pos.0) && (0..self.height).contains(&pos.1)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn head(&self) -> Option<Coords> {
        self.worm.head()
    }

    /// Segment positions from head to tail.
    pub fn body(&self) -> impl Iterator<Item = Coords> + '_ {
        self.worm.segments()
    }

    pub fn len(&self) -> usize {
        self.worm.len()
    }

    /// `None` before the first reset, or once the worm fills the grid.
    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    ///////////////////////////////////////////////////////////////////////////

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Idle => Err(GameError::NotStarted),
            Phase::GameOver => Err(GameError::GameOver),
            Phase::Playing => Ok(()),
        }
    }

    fn generate_target(&mut self) {
        let value = self.rng.gen_range(MIN_TARGET_VALUE..=MAX_TARGET_VALUE);

        self.target = self.random_free_cell().map(|position| Target { position, value });

        match self.target {
            Some(target) => debug_assert!(self.in_bounds(target.position)),
            None => warn!("no free cell left for a target"),
        }
    }

    /// Samples cells at random, then falls back to picking among all the free
    /// cells once the grid is too crowded for sampling to hit one quickly.
    fn random_free_cell(&mut self) -> Option<Coords> {
        let occupied: HashSet<Coords> = self.worm.segments().collect();
        let cells = (self.width as usize).saturating_mul(self.height as usize);

        for _ in 0..cells {
            let pos = (self.rng.gen_range(0..self.width), self.rng.gen_range(0..self.height));
            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }

        let free: Vec<Coords> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
