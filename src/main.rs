mod config;
mod engine;
mod game;
mod input;
mod snake;
mod storage;
mod term;
mod ticker;

use anyhow::Result;
use log::info;

use config::GameConfig;
use storage::FileStore;

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);

/// Grid coordinates are signed so a step off the left or top edge is
/// representable before it is rejected.
pub type GridInt = i16;
pub type Coords = (GridInt, GridInt);

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = GameConfig::from_env()?;
    let path = match &config.high_score_path {
        Some(path) => path.clone(),
        None => FileStore::default_path()?,
    };
    let store = FileStore::new(path);
    info!("high score stored at {}", store.path().display());

    let mut game = game::SnakeGame::new(config, store)?;
    let res = game.initialize().and_then(|_| game.run());

    // Always hand the terminal back, but report the game's error first
    let restored = game.restore();
    res.and(restored)
}
