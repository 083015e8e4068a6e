use crate::{TermInt, TermCoords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// What was last printed at a screen position, so a message box can be
/// lifted off again.
#[derive(Copy, Clone, PartialEq)]
struct ScreenCell {
    ch: char,
    color: Option<Color>,
}

const BLANK: ScreenCell = ScreenCell { ch: ' ', color: None };

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    viewport: TermCoords,
    stdout: Stdout,
    screen: Vec<ScreenCell>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: TermCoords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let stdout = stdout();
        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, viewport: (width, height), stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("disabling raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("leaving alternate screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("reading terminal event")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for a key press.
    pub fn read_key_timeout(&self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !poll(timeout).context("polling terminal events")? {
            return Ok(None);
        }

        match read().context("reading terminal event")? {
            Event::Key(ev) => Ok(Some(ev)),
            _ => Ok(None),
        }
    }

    /// Throws away whatever input is already queued.
    pub fn drain_events(&self) -> Result<()> {
        while poll(Duration::from_millis(0)).context("polling terminal events")? {
            read().context("reading terminal event")?;
        }
        Ok(())
    }

    pub fn get_terminal_size(&self) -> TermCoords {
        (self.width, self.height)
    }

    /// Restricts message boxes to the top-left `size` area of the screen.
    pub fn set_viewport(&mut self, size: TermCoords) {
        self.viewport = (size.0.min(self.width), size.1.min(self.height));
    }

    pub fn draw_borders(&mut self, top_left: TermCoords, size: TermCoords) -> Result<()> {
        let (width, height) = size;
        let (x0, y0) = top_left;

        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x0 + x, y0), ch, None)?;
            self.print_at((x0 + x, end_y), ch, None)?;
        }

        for y in 1..height - 1 {
            self.print_at((x0, y0 + y), '|', None)?;
            self.print_at((end_x, y0 + y), '|', None)?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.viewport.0 / 2, self.viewport.1 / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

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
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(cell) = self.cell_at((x, y)) {
                    self.queue_cell((x, y), cell)?;
                }
            }
        }

        self.flush()
    }

    /// Prints `text` starting at `pos`, one column per char.
    pub fn print_str_at(&mut self, pos: TermCoords, text: &str, color: Option<Color>) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch, color)?;
        }
        Ok(())
    }

    pub fn print_at(&mut self, pos: TermCoords, ch: char, color: Option<Color>) -> Result<()> {
        let cell = ScreenCell { ch, color };
        self.queue_cell(pos, cell)?;
        if let Some(idx) = self.index(pos) {
            self.screen[idx] = cell;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All)).context("clearing screen")?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("flushing terminal")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: TermCoords, ch: char) -> Result<()> {
        // Message boxes go around the screen buffer so hiding them can put
        // the board back
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::ResetColor, style::Print(ch))?;
        Ok(())
    }

    fn queue_cell(&mut self, pos: TermCoords, cell: ScreenCell) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;
        match cell.color {
            Some(color) => queue!(self.stdout, style::SetForegroundColor(color), style::Print(cell.ch), style::ResetColor)?,
            None => queue!(self.stdout, style::Print(cell.ch))?,
        }
        Ok(())
    }

    fn index(&self, pos: TermCoords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn cell_at(&self, pos: TermCoords) -> Option<ScreenCell> {
        self.index(pos).map(|idx| self.screen[idx])
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: TermCoords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> TermCoords {
        self.top_left
    }
}
