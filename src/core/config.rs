/// Engine configuration, read from a RON file.
///
/// ```ron
/// (
///     lexicon_dir: "categories",
///     history_path: Some("history.json"),
///     count: 3,
///     seed: None,
///     default_category_types: Some("uncategorized, nouns"),
/// )
/// ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::lexicon::DEFAULT_LEXICON_DIR;

/// Config file looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "prompt.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `<category>.json` files and `category_types.json`.
    pub lexicon_dir: PathBuf,
    /// Where resolved templates are remembered. `None` disables history.
    pub history_path: Option<PathBuf>,
    /// How many sentences to generate per template.
    pub count: usize,
    /// Fixed seed for reproducible output. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Comma-separated type names written when `category_types.json` is missing.
    pub default_category_types: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lexicon_dir: PathBuf::from(DEFAULT_LEXICON_DIR),
            history_path: Some(PathBuf::from("history.json")),
            count: 1,
            seed: None,
            default_category_types: None,
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// Load `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_ron(path)
        } else {
            Ok(Self::default())
        }
    }
}
