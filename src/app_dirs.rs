use directories::ProjectDirs;
use std::path::PathBuf;

pub const STATS_FILE: &str = "stats.json";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_WORDS_FILE: &str = "words.json";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Per-user directory holding stats, config and the fallback word list
    pub fn data_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "german-quiz") {
            proj_dirs.config_dir().to_path_buf()
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".german_quiz")
        } else {
            PathBuf::from(".german_quiz")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_is_named_for_the_quiz() {
        let dir = AppDirs::data_dir();
        assert!(dir
            .components()
            .any(|c| c.as_os_str() == "german-quiz" || c.as_os_str() == ".german_quiz"));
    }
}
