use std::time::Duration;

use log::{debug, info};
use rand::{rngs::ThreadRng, seq::SliceRandom, Rng};

use crate::config::{
    BASE_SPEED_MS, FOOD_SAMPLE_ATTEMPTS, INITIAL_SNAKE_LENGTH, MIN_SPEED_MS, SCORE_PER_FOOD,
    SPEED_RAMP_DIVISOR, START_HEAD,
};
use crate::snake::{Direction, Snake};
use crate::{Coords, GridInt};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Over,
}

/// Everything a single `tick` can report back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Advanced,
    FoodEaten { score: u32 },
    /// The high score was beaten and should be persisted.
    HighScore(u32),
    /// The caller must re-arm its timer at this interval.
    SpeedChanged(Duration),
    WallCollision,
    SelfCollision,
    /// The snake covers the whole grid, no food can be placed.
    BoardFilled,
}

pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Option<Coords>,
    pub status: GameStatus,
}

pub fn speed_for_score(score: u32) -> Duration {
    let slowdown = (score / SPEED_RAMP_DIVISOR) as u64;
    Duration::from_millis(BASE_SPEED_MS.saturating_sub(slowdown).max(MIN_SPEED_MS))
}

pub struct GameState<R = ThreadRng> {
    rng: R,
    tile_count: GridInt,
    snake: Snake,
    food: Option<Coords>,
    score: u32,
    high_score: u32,
    speed: Duration,
    status: GameStatus,
}

impl GameState<ThreadRng> {
    pub fn new(tile_count: GridInt, high_score: u32) -> Self {
        GameState::with_rng(tile_count, high_score, rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(tile_count: GridInt, high_score: u32, rng: R) -> Self {
        let mut state = GameState {
            rng,
            tile_count,
            snake: Snake::new(START_HEAD, INITIAL_SNAKE_LENGTH, Direction::Right),
            food: None,
            score: 0,
            high_score,
            speed: speed_for_score(0),
            status: GameStatus::NotStarted,
        };
        state.spawn_food();
        state
    }

    /// Begins a fresh game. Does nothing while a game is already running.
    pub fn start(&mut self) -> bool {
        if self.status == GameStatus::Running {
            return false;
        }

        self.reset();
        info!("game started, high score {}", self.high_score);
        true
    }

    pub fn reset(&mut self) {
        self.snake = Snake::new(START_HEAD, INITIAL_SNAKE_LENGTH, Direction::Right);
        self.score = 0;
        self.speed = speed_for_score(0);
        self.status = GameStatus::Running;
        self.spawn_food();
    }

    /// Places food on a random cell outside the snake. Returns `None` only
    /// when the snake occupies every cell.
    pub fn spawn_food(&mut self) -> Option<Coords> {
        let n = self.tile_count;

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = (self.rng.gen_range(0..n), self.rng.gen_range(0..n));
            if !self.snake.contains(pos) {
                self.food = Some(pos);
                debug!("food spawned at {:?}", pos);
                return self.food;
            }
        }

        // Crowded board, pick directly among what is left
        let free: Vec<Coords> = (0..n)
            .flat_map(|y| (0..n).map(move |x| (x, y)))
            .filter(|pos| !self.snake.contains(*pos))
            .collect();
        self.food = free.choose(&mut self.rng).copied();
        debug!("food spawned at {:?} from {} free cells", self.food, free.len());
        self.food
    }

    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.status != GameStatus::Running {
            return vec![];
        }

        let new_head = self.snake.next_head();

        if !self.in_bounds(new_head) {
            return self.finish(GameEvent::WallCollision);
        }
        if self.snake.contains(new_head) {
            return self.finish(GameEvent::SelfCollision);
        }

        self.snake.push_head(new_head);

        if self.food != Some(new_head) {
            self.snake.pop_tail();
            return vec![GameEvent::Advanced];
        }

        self.score += SCORE_PER_FOOD;
        let mut events = vec![GameEvent::FoodEaten { score: self.score }];

        if self.score > self.high_score {
            self.high_score = self.score;
            events.push(GameEvent::HighScore(self.high_score));
        }

        let speed = speed_for_score(self.score);
        if speed != self.speed {
            debug!("speed {:?} -> {:?}", self.speed, speed);
            self.speed = speed;
            events.push(GameEvent::SpeedChanged(speed));
        }

        if self.spawn_food().is_none() {
            events.push(GameEvent::BoardFilled);
            self.status = GameStatus::Over;
            info!("board filled by {} cells, final score {}", self.snake.len(), self.score);
            return events;
        }

        events.push(GameEvent::Advanced);
        events
    }

    /// Applies a direction request for the next tick. Ignored unless the game
    /// is running, and refused when it would reverse the snake.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.snake.set_direction(direction)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { snake: &self.snake, food: self.food, status: self.status }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn tile_count(&self) -> GridInt {
        self.tile_count
    }

    ///////////////////////////////////////////////////////////////////////////

    fn finish(&mut self, event: GameEvent) -> Vec<GameEvent> {
        self.status = GameStatus::Over;
        info!("game over ({:?}), final score {}", event, self.score);
        vec![event]
    }

    fn in_bounds(&self, (x, y): Coords) -> bool {
        (0..self.tile_count).contains(&x) && (0..self.tile_count).contains(&y)
    }
}
