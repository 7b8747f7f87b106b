use crate::catalog::{Catalog, WordEntry};
use crate::session::SessionResult;
use crate::util::percentage;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lifetime counters persisted between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    #[serde(default)]
    pub total_quizzes: usize,
    #[serde(default)]
    pub total_questions: usize,
    #[serde(default)]
    pub correct_answers: usize,
    /// Lifetime mistakes per word; a key only appears once the word was missed
    #[serde(rename = "word_stats", default, deserialize_with = "null_as_default")]
    pub mistake_counts: BTreeMap<String, u32>,
}

fn null_as_default<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// A catalog word together with how often it was missed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedWord<'a> {
    pub entry: &'a WordEntry,
    pub count: u32,
}

impl StatisticsRecord {
    pub fn has_data(&self) -> bool {
        self.total_questions > 0
    }

    pub fn mistake_count(&self, term: &str) -> u32 {
        self.mistake_counts.get(term).copied().unwrap_or(0)
    }

    pub fn record_mistake(&mut self, term: &str) {
        *self.mistake_counts.entry(term.to_string()).or_insert(0) += 1;
    }

    /// Lifetime accuracy in percent, None before the first answered question
    pub fn accuracy(&self) -> Option<f64> {
        percentage(self.correct_answers, self.total_questions)
    }

    /// Add a finished session to the totals. Sessions without a single
    /// answer are not counted; returns whether the session was folded.
    pub fn fold_session(&mut self, session: &SessionResult) -> bool {
        if session.is_empty() {
            return false;
        }
        self.total_quizzes += 1;
        self.total_questions += session.answered;
        self.correct_answers += session.correct.min(session.answered);
        true
    }

    /// The `n` most-missed words, highest count first. Terms no longer in the
    /// catalog are skipped.
    pub fn top_missed<'a>(&self, catalog: &'a Catalog, n: usize) -> Vec<MissedWord<'a>> {
        self.mistake_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .take(n)
            .filter_map(|(term, &count)| catalog.find(term).map(|entry| MissedWord { entry, count }))
            .collect()
    }

    fn is_consistent(&self) -> bool {
        self.correct_answers <= self.total_questions
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} has more correct answers than questions", .path.display())]
    Inconsistent { path: PathBuf },

    #[error("could not create data dir {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("could not encode statistics: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait StatsStore {
    /// Ok(None) when nothing has been saved yet
    fn try_load(&self) -> Result<Option<StatisticsRecord>, StatsError>;

    fn save(&self, record: &StatisticsRecord) -> Result<(), StatsError>;

    /// Never fails: a missing file means a fresh start, an unreadable one is
    /// reported and replaced by defaults.
    fn load(&self) -> StatisticsRecord {
        match self.try_load() {
            Ok(Some(record)) => record,
            Ok(None) => StatisticsRecord::default(),
            Err(e) => {
                tracing::warn!("{e}; starting with fresh statistics");
                StatisticsRecord::default()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for FileStatsStore {
    fn try_load(&self) -> Result<Option<StatisticsRecord>, StatsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StatsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record: StatisticsRecord =
            serde_json::from_slice(&bytes).map_err(|source| StatsError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if !record.is_consistent() {
            return Err(StatsError::Inconsistent {
                path: self.path.clone(),
            });
        }

        Ok(Some(record))
    }

    fn save(&self, record: &StatisticsRecord) -> Result<(), StatsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StatsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut data = serde_json::to_vec_pretty(record)?;
        data.push(b'\n');

        // write beside the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        let write_err = |source: io::Error| StatsError::Write {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, data).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), "statistics saved");
        Ok(())
    }
}
