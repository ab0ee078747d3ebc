/// Template history — an append-only JSON array of distinct templates.

use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::lexicon::write_atomic;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history file is invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
    entries: Vec<String>,
}

impl History {
    /// Open the history at `path`. A missing file is an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, template: &str) -> bool {
        self.entries.iter().any(|e| e == template)
    }

    /// Append `template` unless an identical entry exists, then save.
    /// Returns whether it was appended.
    pub fn record(&mut self, template: &str) -> Result<bool, HistoryError> {
        if self.contains(template) {
            return Ok(false);
        }
        let mut entries = self.entries.clone();
        entries.push(template.to_string());
        write_atomic(&self.path, &serde_json::to_string_pretty(&entries)?)?;
        self.entries = entries;
        debug!("recorded template #{} in {}", self.entries.len(), self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load(dir.path().join("history.json")).unwrap();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn record_dedups_by_exact_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = History::load(&path).unwrap();
        assert!(history.record("a [color] car").unwrap());
        assert!(!history.record("a [color] car").unwrap());
        assert!(history.record("a [color] car ").unwrap());

        let reloaded = History::load(&path).unwrap();
        assert_eq!(reloaded.entries(), ["a [color] car", "a [color] car "]);
    }

    #[test]
    fn failed_save_leaves_entry_unrecorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = History::load(&path).unwrap();

        // A directory in the way makes the rename fail.
        fs::create_dir(&path).unwrap();
        assert!(matches!(history.record("a [color] car"), Err(HistoryError::Io(_))));
        assert!(history.entries().is_empty());
        assert!(!dir.path().join("history.json.tmp").exists());

        fs::remove_dir(&path).unwrap();
        assert!(history.record("a [color] car").unwrap());
        assert_eq!(History::load(&path).unwrap().entries(), ["a [color] car"]);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(History::load(&path), Err(HistoryError::Json(_))));
    }
}
