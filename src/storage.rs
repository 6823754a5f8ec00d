use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::types::AllTimeStats;

const STATISTICS_FILE: &str = "statistics.json";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load/save capability for the all-time record.
pub trait StatsStore {
    /// A missing record is not an error and loads as zero/zero.
    fn load(&self) -> Result<AllTimeStats, StorageError>;
    fn save(&self, stats: &AllTimeStats) -> Result<(), StorageError>;
}

/// Stores the record as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `statistics.json` in the platform config directory.
    pub fn in_config_dir() -> Self {
        match ensure_config_dir() {
            Ok(dir) => Self::new(dir.join(STATISTICS_FILE)),
            Err(e) => {
                log::warn!("no usable config directory ({e}), keeping statistics locally");
                Self::new(STATISTICS_FILE)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> Result<AllTimeStats, StorageError> {
        read_json(&self.path)
    }

    fn save(&self, stats: &AllTimeStats) -> Result<(), StorageError> {
        write_json(&self.path, stats)
    }
}

/// User preferences that survive restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound_enabled: bool,
    /// Number of flicker frames before the computer's pick is revealed.
    pub reveal_steps: u32,
    pub reveal_interval_ms: u64,
    // Absent on first run
    pub window_width: Option<i32>,
    pub window_height: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            reveal_steps: 15,
            reveal_interval_ms: 75,
            window_width: None,
            window_height: None,
        }
    }
}

fn project_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("io.github", "snakewatergun", "SnakeWaterGun")
        .map(|p| p.config_dir().to_path_buf())
}

fn ensure_config_dir() -> io::Result<PathBuf> {
    if let Some(dir) = project_config_dir() {
        fs::create_dir_all(&dir)?;
        Ok(dir)
    } else {
        Ok(std::env::current_dir()?)
    }
}

fn settings_path() -> io::Result<PathBuf> {
    Ok(ensure_config_dir()?.join(SETTINGS_FILE))
}

pub fn load_settings() -> Settings {
    let loaded = settings_path()
        .map_err(StorageError::from)
        .and_then(|p| read_json(&p));
    match loaded {
        Ok(s) => s,
        Err(e) => {
            log::warn!("could not read settings, using defaults: {e}");
            Settings::default()
        }
    }
}

pub fn save_settings(s: &Settings) -> Result<(), StorageError> {
    write_json(&settings_path()?, s)
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    if !path.is_file() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Write next to the target and rename over it, so a crash mid-write
/// leaves the previous file intact.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let data = serde_json::to_string_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// In-memory store for tests; counts saves and can be told to fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub stats: std::cell::Cell<AllTimeStats>,
    pub saves: std::cell::Cell<usize>,
    pub broken: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(stats: AllTimeStats) -> Self {
        Self {
            stats: std::cell::Cell::new(stats),
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl StatsStore for MemoryStore {
    fn load(&self) -> Result<AllTimeStats, StorageError> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::Other, "store unavailable").into());
        }
        Ok(self.stats.get())
    }

    fn save(&self, stats: &AllTimeStats) -> Result<(), StorageError> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::Other, "store unavailable").into());
        }
        self.stats.set(*stats);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
