use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use crossterm::style::Color;
use log::{debug, info, warn};

use crate::config::{GameConfig, CELL_WIDTH};
use crate::engine::{GameEvent, GameState, GameStatus};
use crate::input::Control;
use crate::storage::{self, HighScoreStore};
use crate::term::TermManager;
use crate::ticker::Ticker;
use crate::{Coords, TermCoords, TermInt};

/// The score bar takes row 0, the bordered board starts below it.
const BOARD_TOP_LEFT: TermCoords = (0, 1);

/// How long to block on input when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

const CELL_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';

const FOOD_COLOR: Color = Color::Rgb { r: 0xFF, g: 0x52, b: 0x52 };
const HEAD_COLOR: Color = Color::Rgb { r: 0x4C, g: 0xAF, b: 0x50 };
const BODY_COLOR: Color = Color::Rgb { r: 0x38, g: 0x8E, b: 0x3C };
const DEAD_SNAKE_COLOR: Color = Color::DarkGrey;

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame<S> {
    config: GameConfig,
    paused: bool,
    term: TermManager,
    state: GameState,
    store: S,
    ticker: Ticker,
}

impl<S: HighScoreStore> SnakeGame<S> {
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        let high_score = storage::load_or_default(&store);
        let state = GameState::new(config.tile_count, high_score);

        Ok(SnakeGame {
            config,
            paused: false,
            term: TermManager::new()?,
            state,
            store,
            ticker: Ticker::new(),
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        let (need_w, need_h) = self.config.board_size();
        let (w, h) = self.term.get_terminal_size();
        ensure!(
            w >= need_w && h >= need_h,
            "terminal is {}x{} but a {}-tile board needs at least {}x{}",
            w, h, self.config.tile_count, need_w, need_h
        );

        self.term.setup()?;
        self.term.set_viewport((need_w, need_h));
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.ticker.cancel();
        self.term.restore()
    }

    pub fn run(&mut self) -> Result<()> {
        let (w, h) = self.config.board_size();
        self.term.clear()?;
        self.term.draw_borders(BOARD_TOP_LEFT, (w, h - BOARD_TOP_LEFT.1))?;
        self.draw()?;

        loop {
            if self.show_intro()? == Flow::Quit {
                return Ok(());
            }
            if self.play()? == Flow::Quit {
                return Ok(());
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_intro(&mut self) -> Result<Flow> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press Enter or Space to start",
        ])?;

        loop {
            match Control::from_key_event(&self.term.read_key_blocking()?) {
                Some(Control::Start) => break,
                Some(Control::Quit) => return Ok(Flow::Quit),
                _ => {}
            }
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    fn play(&mut self) -> Result<Flow> {
        self.state.start();
        self.paused = false;
        self.draw()?;
        self.ticker.arm(self.state.speed(), Instant::now());

        loop {
            let now = Instant::now();

            if self.ticker.poll(now) {
                let events = self.state.tick();
                apply_events(&events, &mut self.store, &mut self.ticker, now);
                self.draw()?;

                if self.state.status() == GameStatus::Over {
                    self.ticker.cancel();
                    return self.game_over(&events);
                }
                continue;
            }

            let timeout = self.ticker.time_until_due(now).unwrap_or(IDLE_POLL);
            let key_ev = match self.term.read_key_timeout(timeout)? {
                Some(ev) => ev,
                None => continue,
            };

            match Control::from_key_event(&key_ev) {
                Some(Control::Quit) => return Ok(Flow::Quit),
                Some(Control::Pause) => self.toggle_pause()?,
                Some(Control::Turn(dir)) if !self.paused => {
                    if self.state.change_direction(dir) {
                        debug!("heading {:?}", self.state.direction());
                    }
                }
                _ => {}
            }
        }
    }

    fn game_over(&mut self, events: &[GameEvent]) -> Result<Flow> {
        let won = events.contains(&GameEvent::BoardFilled);

        let score_line = format!("Score: {}", self.state.score());
        self.term.show_message(&[
            if won {"You won!"} else {"Game over!"},
            score_line.as_str(),
            "",
            "Press any key to continue,",
            "or CTRL+C to quit.",
        ])?;

        // Keys mashed just before the crash should not dismiss the message
        self.term.drain_events()?;
        let key_ev = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        if Control::from_key_event(&key_ev) == Some(Control::Quit) {
            Ok(Flow::Quit)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.ticker.cancel();
            self.term.show_message(&["Paused", "Press Esc to resume", "or CTRL+C to quit"])?;
        } else {
            self.term.hide_message()?;
            self.ticker.arm(self.state.speed(), Instant::now());
        }

        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
        Ok(())
    }

    /// Repaints the score bar and every grid cell from the current state.
    fn draw(&mut self) -> Result<()> {
        let (width, _) = self.config.board_size();
        let bar = format!(" Score: {}   High Score: {}", self.state.score(), self.state.high_score());
        let bar = format!("{:<width$}", bar, width = width as usize);
        self.term.print_str_at((0, 0), &bar, None)?;

        let n = self.state.tile_count();
        for y in 0..n {
            for x in 0..n {
                paint_cell(&mut self.term, (x, y), ' ', None)?;
            }
        }

        let snapshot = self.state.snapshot();
        if let Some(food) = snapshot.food {
            paint_cell(&mut self.term, food, CELL_CHAR, Some(FOOD_COLOR))?;
        }
        // A crashed snake is drawn crossed out, a board-filling one is not
        let crashed = snapshot.status == GameStatus::Over && snapshot.food.is_some();
        for (i, pos) in snapshot.snake.body().iter().enumerate() {
            let (ch, color) = match (crashed, i) {
                (true, _) => (DEAD_SNAKE_CHAR, DEAD_SNAKE_COLOR),
                (false, 0) => (CELL_CHAR, HEAD_COLOR),
                (false, _) => (CELL_CHAR, BODY_COLOR),
            };
            paint_cell(&mut self.term, *pos, ch, Some(color))?;
        }

        self.term.flush()
    }
}

/// Persists a beaten high score and re-arms the ticker on a speed change.
fn apply_events<S: HighScoreStore>(events: &[GameEvent], store: &mut S, ticker: &mut Ticker, now: Instant) {
    for event in events {
        match event {
            GameEvent::HighScore(score) => {
                if let Err(e) = store.save(*score) {
                    warn!("could not save high score {}: {:#}", score, e);
                }
            }
            GameEvent::SpeedChanged(speed) => {
                debug!("rescheduling ticks every {:?} (was {:?})", speed, ticker.interval());
                ticker.arm(*speed, now);
            }
            GameEvent::FoodEaten { score } => debug!("food eaten, score {}", score),
            GameEvent::WallCollision | GameEvent::SelfCollision | GameEvent::BoardFilled => {
                info!("game ended: {:?}", event);
            }
            GameEvent::Advanced => {}
        }
    }
}

/// Screen position of the first column of a grid cell.
fn cell_origin((x, y): Coords) -> TermCoords {
    (
        BOARD_TOP_LEFT.0 + 1 + x as TermInt * CELL_WIDTH,
        BOARD_TOP_LEFT.1 + 1 + y as TermInt,
    )
}

fn paint_cell(term: &mut TermManager, pos: Coords, ch: char, color: Option<Color>) -> Result<()> {
    let (x, y) = cell_origin(pos);
    for col in 0..CELL_WIDTH {
        term.print_at((x + col, y), ch, color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn cells_map_inside_the_border() {
        assert_eq!(cell_origin((0, 0)), (1, 2));
        assert_eq!(cell_origin((1, 0)), (3, 2));
        assert_eq!(cell_origin((10, 10)), (21, 12));

        // Last cell of the default board ends just before the right border
        let (w, h) = GameConfig::default().board_size();
        let (x, y) = cell_origin((19, 19));
        assert_eq!(x + CELL_WIDTH, w - 1);
        assert_eq!(y, h - 2);
    }

    #[test]
    fn high_score_events_are_persisted() {
        let mut store = MemoryStore::default();
        let mut ticker = Ticker::new();
        let now = Instant::now();

        apply_events(&[GameEvent::FoodEaten { score: 10 }, GameEvent::Advanced], &mut store, &mut ticker, now);
        assert_eq!(store.saves, 0);

        apply_events(&[GameEvent::HighScore(20)], &mut store, &mut ticker, now);
        assert_eq!(store.saves, 1);
        assert_eq!(storage::load_or_default(&store), 20);
    }

    #[test]
    fn speed_change_rearms_ticker() {
        let mut store = MemoryStore::default();
        let mut ticker = Ticker::new();
        let now = Instant::now();
        ticker.arm(Duration::from_millis(100), now);

        let later = now + Duration::from_millis(100);
        apply_events(&[GameEvent::SpeedChanged(Duration::from_millis(99))], &mut store, &mut ticker, later);
        assert_eq!(ticker.interval(), Duration::from_millis(99));
        assert_eq!(ticker.time_until_due(later), Some(Duration::from_millis(99)));
    }
}
