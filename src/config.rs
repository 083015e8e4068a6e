use std::{env, ffi::OsString, path::PathBuf};

use anyhow::{ensure, Context, Result};

use crate::{Coords, GridInt, TermInt};

pub const DEFAULT_TILE_COUNT: GridInt = 20;
const MAX_TILE_COUNT: GridInt = 200;

pub const BASE_SPEED_MS: u64 = 100;
pub const MIN_SPEED_MS: u64 = 50;
pub const SPEED_RAMP_DIVISOR: u32 = 50;
pub const SCORE_PER_FOOD: u32 = 10;

pub const START_HEAD: Coords = (10, 10);
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Random draws tried before falling back to scanning the free cells.
pub const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Terminal columns used by one grid cell, so cells look roughly square.
pub const CELL_WIDTH: TermInt = 2;

const TILE_COUNT_VAR: &str = "SNAKE_TILE_COUNT";
const HIGH_SCORE_PATH_VAR: &str = "SNAKE_HIGH_SCORE_PATH";

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub tile_count: GridInt,
    /// `None` means the per-user data directory.
    pub high_score_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { tile_count: DEFAULT_TILE_COUNT, high_score_path: None }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var(TILE_COUNT_VAR).ok(), env::var_os(HIGH_SCORE_PATH_VAR))
    }

    fn from_vars(tile_count: Option<String>, high_score_path: Option<OsString>) -> Result<Self> {
        let mut config = GameConfig::default();

        if let Some(raw) = tile_count {
            config.tile_count = raw.trim().parse()
                .with_context(|| format!("invalid {} value {:?}", TILE_COUNT_VAR, raw))?;
        }
        if let Some(path) = high_score_path.filter(|p| !p.is_empty()) {
            config.high_score_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (head_x, head_y) = START_HEAD;
        ensure!(
            self.tile_count > head_x && self.tile_count > head_y,
            "tile count {} is too small for the starting snake at {:?}",
            self.tile_count,
            START_HEAD
        );
        ensure!(
            self.tile_count <= MAX_TILE_COUNT,
            "tile count {} is larger than the maximum of {}",
            self.tile_count,
            MAX_TILE_COUNT
        );
        Ok(())
    }

    /// Terminal area needed to show the board: score bar, border and cells.
    pub fn board_size(&self) -> (TermInt, TermInt) {
        let tiles = self.tile_count as TermInt;
        (tiles * CELL_WIDTH + 2, tiles + 3)
    }
}
