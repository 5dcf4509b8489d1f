use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::provider::{DEFAULT_QUOTES_URL, DEFAULT_QUOTE_COUNT, MAX_QUOTE_COUNT};
use crate::session::{TestDuration, Theme};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration: TestDuration,
    pub theme: Theme,
    pub quote_count: usize,
    pub quotes_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration: TestDuration::default(),
            theme: Theme::default(),
            quote_count: DEFAULT_QUOTE_COUNT,
            quotes_url: DEFAULT_QUOTES_URL.to_string(),
        }
    }
}

impl Config {
    /// Replace stored values the command line would have rejected
    pub fn validated(mut self) -> Self {
        if !(1..=MAX_QUOTE_COUNT).contains(&self.quote_count) {
            log::warn!(
                "stored quote_count {} outside 1..={MAX_QUOTE_COUNT}, using {DEFAULT_QUOTE_COUNT}",
                self.quote_count
            );
            self.quote_count = DEFAULT_QUOTE_COUNT;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.validated(),
                Err(e) => log::warn!("ignoring unreadable config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
