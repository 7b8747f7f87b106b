use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub quick_quiz_questions: usize,
    pub practice_questions: usize,
    pub max_practice_repeats: usize,
    pub custom_min_questions: usize,
    pub custom_max_questions: usize,
    pub default_custom_questions: usize,
    pub top_missed: usize,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quick_quiz_questions: 10,
            practice_questions: 10,
            max_practice_repeats: 3,
            custom_min_questions: 5,
            custom_max_questions: 50,
            default_custom_questions: 10,
            top_missed: 5,
            color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigInputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{value} is outside {min}-{max}")]
    OutOfRange { value: usize, min: usize, max: usize },
}

impl Config {
    /// Validate the question count typed in the custom quiz menu
    pub fn parse_question_count(&self, input: &str) -> Result<usize, ConfigInputError> {
        let trimmed = input.trim();
        let value: usize = trimmed
            .parse()
            .map_err(|_| ConfigInputError::NotANumber(trimmed.to_string()))?;

        let (min, max) = (self.custom_min_questions, self.custom_max_questions);
        if value < min || value > max {
            return Err(ConfigInputError::OutOfRange { value, min, max });
        }
        Ok(value)
    }
}

/// Persistence for [`Config`]. Loading never fails; saving is explicit only.
pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

/// `config.json` inside the data directory
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Config::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "cannot read config: {e}");
                return Config::default();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "ignoring config: {e}");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut data = serde_json::to_vec_pretty(cfg).map_err(io::Error::other)?;
        data.push(b'\n');
        fs::write(&self.path, data)
    }
}
