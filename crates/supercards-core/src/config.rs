//! Board configuration

use std::path::PathBuf;

use crate::catalogue::DEFAULT_MISSION_COUNT;

/// Bookmark database file name inside the data directory
pub const DATABASE_FILE: &str = "bookmarks.redb";

/// Where a board keeps its bookmarks and finds its cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Directory holding the bookmark database
    pub data_dir: PathBuf,
    /// Directory holding `mission.json` and `assessment.json`
    pub catalogue_dir: PathBuf,
    /// Missions dealt per randomize
    pub mission_count: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalogue_dir: PathBuf::from("assets").join("cards-db"),
            mission_count: DEFAULT_MISSION_COUNT,
        }
    }
}

impl BoardConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_catalogue_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.catalogue_dir = dir.into();
        self
    }

    pub fn with_mission_count(mut self, count: usize) -> Self {
        self.mission_count = count;
        self
    }

    /// Path of the bookmark database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

/// Platform data directory for SuperCards (`<data dir>/supercards`)
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("supercards")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.mission_count, 3);
        assert!(config.data_dir.ends_with("supercards"));
        assert_eq!(config.catalogue_dir, PathBuf::from("assets/cards-db"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = BoardConfig::default()
            .with_data_dir("/tmp/cards")
            .with_mission_count(5);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/cards/bookmarks.redb"));
        assert_eq!(config.mission_count, 5);
    }
}
