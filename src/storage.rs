use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = "high_score.json";

/// Durable home of the high score.
pub trait HighScoreStore {
    /// `Ok(None)` when nothing was ever stored.
    fn load(&self) -> Result<Option<u32>>;
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Reads the stored high score, falling back to 0 on any failure.
pub fn load_or_default<S: HighScoreStore + ?Sized>(store: &S) -> u32 {
    match store.load() {
        Ok(score) => score.unwrap_or(0),
        Err(e) => {
            warn!("could not read high score, starting from 0: {:#}", e);
            0
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    snake_high_score: u32,
}

/// JSON file store, written through a temp file and a rename.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileStore { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
            .context("could not resolve a data directory for the high score")?;
        Ok(dirs.data_local_dir().join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<Option<u32>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };

        let record: HighScoreRecord = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(record.snake_high_score))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&HighScoreRecord { snake_high_score: score })?;
        fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

/// Keeps the high score in memory only.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<u32>,
    pub saves: usize,
}

#[cfg(test)]
impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.value = Some(score);
        self.saves += 1;
        Ok(())
    }
}
