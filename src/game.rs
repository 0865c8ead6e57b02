use std::convert::TryFrom;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use worm::{Coords, Direction::{self, *}, GameError, GameState, StepOutcome::{self, *}};

use crate::cli::Cli;
use crate::term::{ScreenPos, TermInt, TermManager};

const WORM_BODY_CHAR: char = '█';
const DEAD_WORM_CHAR: char = 'X';

// The play area sits inside a box drawn below the header row, leaving the
// bottom row for status text.
const HEADER_ROW: TermInt = 0;
const BOX_TOP: TermInt = 1;
const PLAY_LEFT: i32 = 1;
const PLAY_TOP: i32 = 2;
const SCORE_WIDTH: TermInt = 11;

/// What the player chose once a game is over.
enum Flow {
    Restart,
    Quit,
}

pub struct WormGame {
    term: TermManager,
    state: GameState,
    tick: Duration,
    paused: bool,
}

impl WormGame {
    pub fn new(cli: &Cli) -> Result<Self> {
        let state = match cli.seed {
            Some(seed) => GameState::with_seed(cli.rules(), seed),
            None => GameState::new(cli.rules()),
        };

        Ok(WormGame { term: TermManager::new()?, state, tick: cli.tick(), paused: false })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()?;
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore()?;
        Ok(())
    }

    /// Runs games back to back until the player quits.
    pub fn run(&mut self) -> Result<()> {
        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        loop {
            if let Flow::Quit = self.play()? {
                info!("player quit");
                return Ok(());
            }
        }
    }

    fn show_intro(&mut self) -> Result<Flow> {
        self.term.clear()?;
        self.term.show_message(&[
            "Arrow keys, WASD or HJKL to move",
            "Eat the numbers to grow",
            "Esc to pause",
            "q or Ctrl+C to quit",
            "",
            "Press any key to begin",
        ])?;

        self.wait_for_key()
    }

    fn play(&mut self) -> Result<Flow> {
        let (cols, rows) = self.term.get_terminal_size();
        let (width, height) = (i32::from(cols) - 2, i32::from(rows) - 4);

        match self.state.reset(width, height) {
            Ok(()) => {}
            Err(GameError::EmptyGrid { .. }) => return self.too_small(),
            Err(e) => return Err(e.into()),
        }

        self.paused = false;
        self.draw_all()?;

        let mut last_step = Instant::now();

        loop {
            let timeout = if self.paused {
                self.tick
            } else {
                self.step_interval().checked_sub(last_step.elapsed()).unwrap_or_default()
            };

            for ev in self.term.read_events_queue(timeout)? {
                match ev {
                    Event::Key(key) if is_quit(&key) => return Ok(Flow::Quit),
                    Event::Key(KeyEvent { code: KeyCode::Esc, .. }) => self.toggle_pause()?,
                    Event::Key(key) => {
                        if let (false, Some(dir)) = (self.paused, direction_for(&key)) {
                            self.state.set_direction(dir)?;
                        }
                    }
                    Event::Resize(..) => {
                        debug!("terminal resized to {:?}", self.term.get_terminal_size());
                        return Ok(Flow::Restart);
                    }
                    _ => {}
                }
            }

            if self.paused || last_step.elapsed() < self.step_interval() {
                continue;
            }
            last_step = Instant::now();

            let outcome = self.state.step()?;
            match outcome {
                Advanced { .. } | AteTarget { .. } => self.draw_step(&outcome)?,
                HitWall { fatal } => return self.game_over(fatal, "You ran into a wall!"),
                HitSelf { fatal } => return self.game_over(fatal, "The worm ran into itself!"),
                AlreadyOver => return self.wait_for_key(),
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Terminal characters are taller than they are wide, so vertical moves
    /// are slowed down to look as fast as horizontal ones.
    fn step_interval(&self) -> Duration {
        match self.state.direction() {
            Up | Down => self.tick.mul_f64(1.35),
            Left | Right => self.tick,
        }
    }

    fn wait_for_key(&mut self) -> Result<Flow> {
        match self.term.read_event_blocking()? {
            Event::Key(key) if is_quit(&key) => Ok(Flow::Quit),
            _ => Ok(Flow::Restart),
        }
    }

    fn too_small(&mut self) -> Result<Flow> {
        self.term.clear()?;
        self.term.show_message(&["Terminal too small", "Resize it, or press q to quit"])?;

        loop {
            match self.term.read_event_blocking()? {
                Event::Key(key) if is_quit(&key) => return Ok(Flow::Quit),
                Event::Resize(..) => return Ok(Flow::Restart),
                _ => {}
            }
        }
    }

    fn game_over(&mut self, fatal: Coords, reason: &str) -> Result<Flow> {
        let body: Vec<Coords> = self.state.body().collect();
        for pos in body.into_iter().chain(std::iter::once(fatal)) {
            self.print_cell(pos, DEAD_WORM_CHAR)?;
        }
        self.draw_status(reason)?;

        let score = format!("Score: {}", self.state.score());
        self.term.show_message(&[
            "Game over!",
            &score,
            "",
            "Press any key to play again,",
            "or q to quit.",
        ])?;

        self.wait_for_key()
    }

    fn draw_all(&mut self) -> Result<()> {
        self.term.clear()?;

        let (cols, rows) = self.term.get_terminal_size();
        self.term.draw_borders((0, BOX_TOP), (cols, rows - 2))?;

        let body: Vec<Coords> = self.state.body().collect();
        for (i, pos) in body.iter().enumerate() {
            let ch = if i == 0 { self.head_char() } else { WORM_BODY_CHAR };
            self.print_cell(*pos, ch)?;
        }

        self.draw_target()?;
        self.draw_header()?;
        self.draw_status("")?;
        self.term.flush()?;
        Ok(())
    }

    fn draw_step(&mut self, outcome: &StepOutcome) -> Result<()> {
        let (new_head, removed_tail) = match *outcome {
            Advanced { new_head, removed_tail } | AteTarget { new_head, removed_tail, .. } => {
                (new_head, removed_tail)
            }
            _ => return Ok(()),
        };

        // A new target may land on the cell the tail just left
        if let Some(tail) = removed_tail {
            self.print_cell(tail, ' ')?;
        }

        let neck = self.state.body().nth(1);
        if let Some(neck) = neck {
            self.print_cell(neck, WORM_BODY_CHAR)?;
        }

        if let AteTarget { .. } = outcome {
            self.draw_target()?;
            if self.state.target().is_none() {
                self.draw_status("No room left for another number!")?;
            }
        }

        let head_char = self.head_char();
        self.print_cell(new_head, head_char)?;
        self.draw_header()?;
        self.term.flush()?;
        Ok(())
    }

    fn draw_target(&mut self) -> Result<()> {
        if let Some(target) = self.state.target() {
            let ch = std::char::from_digit(target.value, 10).unwrap_or('?');
            self.print_cell(target.position, ch)?;
        }
        Ok(())
    }

    fn draw_header(&mut self) -> Result<()> {
        let (cols, _) = self.term.get_terminal_size();
        let grow_by = format!("Grow By: {:<4}", self.state.pending_growth());
        let score = format!("Score: {:<4}", self.state.score());

        self.term.print_str_at((1, HEADER_ROW), &grow_by)?;
        self.term.print_str_at((cols.saturating_sub(SCORE_WIDTH), HEADER_ROW), &score)?;
        Ok(())
    }

    fn draw_status(&mut self, text: &str) -> Result<()> {
        let (cols, rows) = self.term.get_terminal_size();
        let line = format!("{:<width$}", text, width = cols.saturating_sub(2) as usize);
        self.term.print_str_at((1, rows.saturating_sub(1)), &line)?;
        Ok(())
    }

    fn print_cell(&mut self, pos: Coords, ch: char) -> Result<()> {
        if let Some(screen_pos) = screen_pos(pos) {
            self.term.print_at(screen_pos, ch)?;
        }
        Ok(())
    }

    fn head_char(&self) -> char {
        match self.state.direction() {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Screen position of a grid cell. Cells just outside the grid land on the
/// box around it, which is where a wall hit is drawn.
fn screen_pos(pos: Coords) -> Option<ScreenPos> {
    let x = TermInt::try_from(pos.0 + PLAY_LEFT).ok()?;
    let y = TermInt::try_from(pos.1 + PLAY_TOP).ok()?;
    Some((x, y))
}

fn direction_for(key: &KeyEvent) -> Option<Direction> {
    match key.code {
        KeyCode::Char('w') | KeyCode::Char('k') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Char('h') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Char('j') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Char('l') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
            | KeyEvent { code: KeyCode::Char('q'), .. }
    )
}
