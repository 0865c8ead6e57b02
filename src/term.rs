use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal, Result};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type TermInt = u16;
pub type ScreenPos = (TermInt, TermInt);

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: ScreenPos,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    /// Waits for the next key press or resize.
    pub fn read_event_blocking(&mut self) -> Result<Event> {
        loop {
            let ev = read()?;
            if self.accept(&ev) {
                return Ok(ev);
            }
        }
    }

    /// Collects the key presses and resizes arriving within `timeout`.
    pub fn read_events_queue(&mut self, timeout: Duration) -> Result<Vec<Event>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            let ev = read()?;
            if self.accept(&ev) {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> ScreenPos {
        (self.width, self.height)
    }

    /// Draws a box with its top left corner at `top_left`.
    pub fn draw_borders(&mut self, top_left: ScreenPos, size: ScreenPos) -> Result<()> {
        let (width, height) = size;
        if width < 2 || height < 2 {
            return Ok(());
        }

        let (start_x, start_y) = top_left;
        let end_x = start_x + width - 1;
        let end_y = start_y + height - 1;

        for x in start_x..=end_x {
            let ch = if x == start_x || x == end_x {'+'} else {'-'};
            self.print_at((x, start_y), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in start_y + 1..end_y {
            self.print_at((start_x, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(i) = self.index(pos) {
                    let ch = self.screen[i];
                    self.print_at_no_save(pos, ch)?;
                }
            }
        }

        self.flush()
    }

    /// Prints `ch` and remembers it so it can be restored after a message.
    /// Positions outside the terminal are ignored.
    pub fn print_at(&mut self, pos: ScreenPos, ch: char) -> Result<()> {
        if let Some(i) = self.index(pos) {
            self.screen[i] = ch;
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: ScreenPos, text: &str) -> Result<()> {
        for (x_diff, ch) in text.chars().enumerate() {
            self.print_at((pos.0.saturating_add(x_diff as TermInt), pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.current_msg = None;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: ScreenPos, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if self.index(pos).is_some() {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        Ok(())
    }

    fn index(&self, pos: ScreenPos) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    /// Keeps key presses and resizes, tracking the new size on a resize.
    fn accept(&mut self, ev: &Event) -> bool {
        match ev {
            Event::Key(KeyEvent { .. }) => true,
            Event::Resize(width, height) => {
                self.width = *width;
                self.height = *height;
                self.current_msg = None;
                self.screen = vec![' '; self.width as usize * self.height as usize];
                true
            }
            _ => false,
        }
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: ScreenPos) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> ScreenPos {
        self.top_left
    }
}
