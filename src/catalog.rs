use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The three German definite articles, in menu order (1, 2, 3).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Article {
    Die,
    Der,
    Das,
}

impl Article {
    pub const ALL: [Article; 3] = [Article::Die, Article::Der, Article::Das];

    /// Numeric shortcut shown in the answer list
    pub fn shortcut(self) -> usize {
        match self {
            Article::Die => 1,
            Article::Der => 2,
            Article::Das => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A single vocabulary record from the word list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(rename = "word")]
    pub term: String,
    pub article: Article,
    #[serde(
        rename = "english",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub translation: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub plural: Option<String>,
}

impl WordEntry {
    pub fn new(term: impl Into<String>, article: Article) -> Self {
        Self {
            term: term.into(),
            article,
            translation: None,
            category: None,
            difficulty: None,
            plural: None,
        }
    }

    /// Case-insensitive match against the free-text difficulty label
    pub fn matches_difficulty(&self, difficulty: Difficulty) -> bool {
        self.difficulty
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(&difficulty.to_string()))
    }

    /// Auxiliary metadata shown on a hint request, in display order
    pub fn hint_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(ref en) = self.translation {
            parts.push(format!("EN: {en}"));
        }
        if let Some(ref category) = self.category {
            parts.push(format!("Category: {category}"));
        }
        if let Some(ref difficulty) = self.difficulty {
            parts.push(format!("Difficulty: {difficulty}"));
        }
        if let Some(ref plural) = self.plural {
            parts.push(format!("Plural: {plural}"));
        }
        parts
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("could not decode JSON at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no words found in {}", .path.display())]
    Empty { path: PathBuf },
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    version: String,
    #[serde(default)]
    data: Vec<WordEntry>,
}

/// The fixed word list the quiz draws from
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    entries: Vec<WordEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<WordEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty {
                path: PathBuf::from("<inline>"),
            });
        }
        Ok(Self {
            version: String::new(),
            entries,
        })
    }

    /// Parse a catalog document; `origin` is only used for error messages.
    pub fn from_json(src: &str, origin: &Path) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(src).map_err(|source| CatalogError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        if file.data.is_empty() {
            return Err(CatalogError::Empty {
                path: origin.to_path_buf(),
            });
        }

        Ok(Self {
            version: file.version,
            entries: file.data,
        })
    }

    /// Read the catalog at `path`, retrying with the same file name under
    /// `fallback_dir` when the primary location cannot be read.
    pub fn load(path: &Path, fallback_dir: Option<&Path>) -> Result<Self, CatalogError> {
        let primary_err = match fs::read_to_string(path) {
            Ok(src) => return Self::from_json(&src, path),
            Err(e) => e,
        };

        if let (Some(dir), Some(name)) = (fallback_dir, path.file_name()) {
            let alt = dir.join(name);
            if alt != path {
                if let Ok(src) = fs::read_to_string(&alt) {
                    tracing::debug!(path = %alt.display(), "loading word list from fallback location");
                    return Self::from_json(&src, &alt);
                }
            }
        }

        Err(CatalogError::Open {
            path: path.to_path_buf(),
            source: primary_err,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, term: &str) -> Option<&WordEntry> {
        self.entries.iter().find(|e| e.term == term)
    }
}
