//! Studio configuration, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::core::reveal::DEFAULT_WORD_DELAY;

pub const DEFAULT_DOWNLOAD_FILENAME: &str = "creative-writing.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid download filename '{0}': must be a bare file name")]
    InvalidFilename(String),
}

/// Presentation settings. The genre table is not configurable.
///
/// ```ron
/// (
///     word_delay_ms: 80,
///     download_filename: "creative-writing.txt",
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub word_delay_ms: u64,
    pub download_filename: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            word_delay_ms: DEFAULT_WORD_DELAY.as_millis() as u64,
            download_filename: DEFAULT_DOWNLOAD_FILENAME.to_string(),
        }
    }
}

impl StudioConfig {
    pub fn load_from_ron(path: &Path) -> Result<StudioConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<StudioConfig, ConfigError> {
        let config: StudioConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn word_delay(&self) -> Duration {
        Duration::from_millis(self.word_delay_ms)
    }

    /// The filename must name a file directly inside the save directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = Path::new(&self.download_filename);
        let bare = name.file_name().map(|f| f == name.as_os_str()).unwrap_or(false);
        if !bare {
            return Err(ConfigError::InvalidFilename(self.download_filename.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_eighty_ms_cadence() {
        let config = StudioConfig::default();
        assert_eq!(config.word_delay(), Duration::from_millis(80));
        assert_eq!(config.download_filename, "creative-writing.txt");
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = StudioConfig::parse_ron("(word_delay_ms: 5)").unwrap();
        assert_eq!(config.word_delay_ms, 5);
        assert_eq!(config.download_filename, DEFAULT_DOWNLOAD_FILENAME);
    }

    #[test]
    fn empty_struct_is_default() {
        assert_eq!(StudioConfig::parse_ron("()").unwrap(), StudioConfig::default());
    }

    #[test]
    fn rejects_paths_as_filename() {
        let err = StudioConfig::parse_ron(r#"(download_filename: "../story.txt")"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFilename(_)));
        assert!(StudioConfig::parse_ron(r#"(download_filename: "")"#).is_err());
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(matches!(
            StudioConfig::parse_ron("(word_delay_ms: \"fast\")"),
            Err(ConfigError::Ron(_))
        ));
    }
}
