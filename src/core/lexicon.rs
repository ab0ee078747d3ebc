/// Lexicon store — category word lists and category-type groupings.
///
/// The directory-backed [`LexiconStore`] reads one JSON array per category
/// (`<category>.json`) and one `category_types.json` object. Nothing is
/// cached: every lookup re-reads the backing file, so edits made by another
/// process show up on the next resolution.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::category::CategoryTypes;

/// Directory the lexicon lives in when nothing else is configured.
pub const DEFAULT_LEXICON_DIR: &str = "categories";
/// File holding the type → categories mapping.
pub const CATEGORY_TYPES_FILE: &str = "category_types.json";

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("category '{0}' has no word list")]
    UnknownCategory(String),
    #[error("could not read category '{category}': {source}")]
    ReadFailed {
        category: String,
        #[source]
        source: std::io::Error,
    },
    #[error("category '{category}' contains invalid JSON: {source}")]
    MalformedCategory {
        category: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("category types file not found at {0}")]
    CategoryTypesMissing(PathBuf),
    #[error("category types file is invalid JSON: {0}")]
    MalformedCategoryTypes(#[source] serde_json::Error),
    #[error("invalid JSON format: {0}")]
    InvalidFormat(#[source] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read access to a lexicon.
///
/// The `try_` methods report what went wrong; the plain methods are what
/// resolution uses and never fail.
pub trait LexiconSource {
    fn try_load_words(&self, category: &str) -> Result<Vec<String>, LexiconError>;

    fn try_load_category_types(&self) -> Result<CategoryTypes, LexiconError>;

    /// Whether a word list backs `category`, regardless of its contents.
    fn category_exists(&self, category: &str) -> bool;

    /// Word list for `category`, or an empty list if it cannot be loaded.
    fn load_words(&self, category: &str) -> Vec<String> {
        match self.try_load_words(category) {
            Ok(words) => words,
            Err(e) => {
                warn!("{e}; treating it as empty");
                Vec::new()
            }
        }
    }

    /// The type mapping, or the built-in default if it cannot be loaded.
    fn load_category_types(&self) -> CategoryTypes {
        match self.try_load_category_types() {
            Ok(types) => types,
            Err(e) => {
                warn!("{e}; using the built-in category types");
                CategoryTypes::builtin_default()
            }
        }
    }
}

/// A lexicon stored as a directory of JSON files.
#[derive(Debug, Clone)]
pub struct LexiconStore {
    dir: PathBuf,
}

impl Default for LexiconStore {
    fn default() -> Self {
        Self::new(DEFAULT_LEXICON_DIR)
    }
}

impl LexiconStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn category_path(&self, category: &str) -> PathBuf {
        self.dir.join(format!("{category}.json"))
    }

    pub fn category_types_path(&self) -> PathBuf {
        self.dir.join(CATEGORY_TYPES_FILE)
    }

    /// Load the type mapping, asking `prompt` for a comma-separated list of
    /// type names when the mapping file does not exist yet.
    ///
    /// A mapping built from the prompt is written to disk before being
    /// returned. If the prompt gives nothing usable, or the file exists but
    /// is invalid, the built-in default is returned and nothing is written.
    pub fn load_category_types_or_init<F>(&self, prompt: F) -> CategoryTypes
    where
        F: FnOnce() -> Option<String>,
    {
        match self.try_load_category_types() {
            Ok(types) => types,
            Err(LexiconError::CategoryTypesMissing(path)) => {
                warn!("no category types at {}", path.display());
                let Some(types) = prompt().and_then(|list| CategoryTypes::from_comma_list(&list))
                else {
                    return CategoryTypes::builtin_default();
                };
                if let Err(e) = self.save_category_types(&types) {
                    warn!("could not write default category types: {e}");
                }
                types
            }
            Err(e) => {
                warn!("{e}; using the built-in category types");
                CategoryTypes::builtin_default()
            }
        }
    }

    /// Every category listed under any type, for the dictionary view.
    pub fn all_categories(&self) -> Vec<String> {
        self.load_category_types().all_categories()
    }

    /// The word list sorted for display.
    pub fn sorted_words(&self, category: &str) -> Vec<String> {
        let mut words = self.load_words(category);
        words.sort();
        words
    }

    /// The word list as pretty-printed JSON, as shown in an editor.
    pub fn load_words_json(&self, category: &str) -> Result<String, LexiconError> {
        Ok(serde_json::to_string_pretty(&self.load_words(category))?)
    }

    pub fn save_words(&self, category: &str, words: &[String]) -> Result<(), LexiconError> {
        let contents = serde_json::to_string_pretty(words)?;
        write_atomic(&self.category_path(category), &contents)?;
        debug!("saved {} words to category '{category}'", words.len());
        Ok(())
    }

    /// Save editor text as the word list for `category`.
    ///
    /// Fails with [`LexiconError::InvalidFormat`] unless `raw` is a JSON
    /// array of strings; the existing file is left untouched in that case.
    pub fn save_words_json(&self, category: &str, raw: &str) -> Result<Vec<String>, LexiconError> {
        let words: Vec<String> =
            serde_json::from_str(raw.trim()).map_err(LexiconError::InvalidFormat)?;
        self.save_words(category, &words)?;
        Ok(words)
    }

    pub fn save_category_types(&self, types: &CategoryTypes) -> Result<(), LexiconError> {
        let contents = serde_json::to_string_pretty(types)?;
        write_atomic(&self.category_types_path(), &contents)?;
        debug!("saved {} category types", types.len());
        Ok(())
    }

    /// Save editor text as the type mapping. Same rules as [`Self::save_words_json`].
    pub fn save_category_types_json(&self, raw: &str) -> Result<CategoryTypes, LexiconError> {
        let types: CategoryTypes =
            serde_json::from_str(raw.trim()).map_err(LexiconError::InvalidFormat)?;
        self.save_category_types(&types)?;
        Ok(types)
    }
}

impl LexiconSource for LexiconStore {
    fn try_load_words(&self, category: &str) -> Result<Vec<String>, LexiconError> {
        let contents = match fs::read_to_string(self.category_path(category)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LexiconError::UnknownCategory(category.to_string()));
            }
            Err(source) => {
                return Err(LexiconError::ReadFailed {
                    category: category.to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents).map_err(|source| LexiconError::MalformedCategory {
            category: category.to_string(),
            source,
        })
    }

    fn try_load_category_types(&self) -> Result<CategoryTypes, LexiconError> {
        let path = self.category_types_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LexiconError::CategoryTypesMissing(path));
            }
            Err(e) => return Err(LexiconError::Io(e)),
        };
        serde_json::from_str(&contents).map_err(LexiconError::MalformedCategoryTypes)
    }

    fn category_exists(&self, category: &str) -> bool {
        let path = self.category_path(category);
        path.is_file() && path != self.category_types_path()
    }
}

/// An in-memory lexicon, for tests and for hosts without a filesystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLexicon {
    #[serde(default)]
    pub category_types: CategoryTypes,
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, name: &str, words: &[&str]) -> Self {
        self.categories.insert(
            name.to_string(),
            words.iter().map(|w| w.to_string()).collect(),
        );
        self
    }

    pub fn with_category_type(mut self, name: &str, categories: &[&str]) -> Self {
        self.category_types.insert(
            name,
            categories.iter().map(|c| c.to_string()).collect(),
        );
        self
    }
}

impl LexiconSource for MemoryLexicon {
    fn try_load_words(&self, category: &str) -> Result<Vec<String>, LexiconError> {
        self.categories
            .get(category)
            .cloned()
            .ok_or_else(|| LexiconError::UnknownCategory(category.to_string()))
    }

    fn try_load_category_types(&self) -> Result<CategoryTypes, LexiconError> {
        Ok(self.category_types.clone())
    }

    fn category_exists(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }
}

/// A snapshot of the type mapping taken at the start of a resolution,
/// paired with the source word lists are read from.
pub struct Lexicon<'a, S: LexiconSource + ?Sized> {
    source: &'a S,
    category_types: CategoryTypes,
}

impl<'a, S: LexiconSource + ?Sized> Lexicon<'a, S> {
    /// Read the current type mapping from `source`.
    pub fn load(source: &'a S) -> Self {
        let category_types = source.load_category_types();
        Self::with_category_types(source, category_types)
    }

    pub fn with_category_types(source: &'a S, category_types: CategoryTypes) -> Self {
        Self {
            source,
            category_types,
        }
    }

    pub fn category_types(&self) -> &CategoryTypes {
        &self.category_types
    }

    /// Words for `category`, re-read from the source on every call.
    pub fn words(&self, category: &str) -> Vec<String> {
        self.source.load_words(category)
    }

    /// A category is known if a type lists it or a word list backs it.
    pub fn is_category(&self, name: &str) -> bool {
        self.category_types.lists_category(name) || self.source.category_exists(name)
    }
}

/// Replace `path` with `contents` by writing a sibling file and renaming it.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, LexiconStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let store = LexiconStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn load_words_reads_array() {
        let (_dir, store) = store_with(&[("colors.json", r#"["red", "blue", "red"]"#)]);
        assert_eq!(store.load_words("colors"), vec!["red", "blue", "red"]);
    }

    #[test]
    fn missing_category_is_empty() {
        let (_dir, store) = store_with(&[]);
        assert!(store.load_words("nope").is_empty());
        assert!(matches!(
            store.try_load_words("nope"),
            Err(LexiconError::UnknownCategory(name)) if name == "nope"
        ));
        assert!(!store.category_exists("nope"));
    }

    #[test]
    fn malformed_category_is_empty() {
        let (_dir, store) = store_with(&[("broken.json", "[\"red\",")]);
        assert!(store.load_words("broken").is_empty());
        assert!(matches!(
            store.try_load_words("broken"),
            Err(LexiconError::MalformedCategory { .. })
        ));
        assert!(store.category_exists("broken"));
    }

    #[test]
    fn words_are_reread_after_edit() {
        let (dir, store) = store_with(&[("colors.json", r#"["red"]"#)]);
        assert_eq!(store.load_words("colors"), vec!["red"]);
        fs::write(dir.path().join("colors.json"), r#"["green"]"#).unwrap();
        assert_eq!(store.load_words("colors"), vec!["green"]);
    }

    #[test]
    fn missing_category_types_falls_back_to_default() {
        let (_dir, store) = store_with(&[]);
        assert!(matches!(
            store.try_load_category_types(),
            Err(LexiconError::CategoryTypesMissing(_))
        ));
        assert_eq!(store.load_category_types(), CategoryTypes::builtin_default());
    }

    #[test]
    fn invalid_category_types_falls_back_to_default() {
        let (_dir, store) = store_with(&[(CATEGORY_TYPES_FILE, "{not json")]);
        assert_eq!(store.load_category_types(), CategoryTypes::builtin_default());
        let prompted = store.load_category_types_or_init(|| Some("ignored".to_string()));
        assert_eq!(prompted, CategoryTypes::builtin_default());
    }

    #[test]
    fn init_writes_operator_types() {
        let (_dir, store) = store_with(&[]);
        let types = store.load_category_types_or_init(|| Some("places, people".to_string()));
        let names: Vec<&str> = types.names().collect();
        assert_eq!(names, vec!["places", "people"]);
        assert_eq!(store.try_load_category_types().unwrap(), types);
    }

    #[test]
    fn init_without_answer_uses_builtin_and_writes_nothing() {
        let (_dir, store) = store_with(&[]);
        let types = store.load_category_types_or_init(|| None);
        assert_eq!(types, CategoryTypes::builtin_default());
        assert!(!store.category_types_path().exists());
    }

    #[test]
    fn save_words_json_rejects_invalid_and_keeps_file() {
        let (_dir, store) = store_with(&[("colors.json", r#"["red"]"#)]);
        let err = store.save_words_json("colors", "[\"blue\"").unwrap_err();
        assert!(matches!(err, LexiconError::InvalidFormat(_)));
        let err = store.save_words_json("colors", r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidFormat(_)));
        assert_eq!(store.load_words("colors"), vec!["red"]);
    }

    #[test]
    fn save_words_json_writes_pretty_json() {
        let (_dir, store) = store_with(&[]);
        let words = store.save_words_json("animals", " [\"cat\",\"dog\"] \n").unwrap();
        assert_eq!(words, vec!["cat", "dog"]);
        let written = fs::read_to_string(store.category_path("animals")).unwrap();
        assert_eq!(written, "[\n  \"cat\",\n  \"dog\"\n]");
        assert!(!store.dir().join("animals.json.tmp").exists());
    }

    #[test]
    fn save_category_types_json_round_trips_order() {
        let (_dir, store) = store_with(&[]);
        let raw = r#"{"b": ["x"], "a": ["y", "z"]}"#;
        store.save_category_types_json(raw).unwrap();
        let names: Vec<String> = store
            .load_category_types()
            .names()
            .map(str::to_string)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(matches!(
            store.save_category_types_json("[1, 2]"),
            Err(LexiconError::InvalidFormat(_))
        ));
    }

    #[test]
    fn failed_rename_removes_temporary_file() {
        let (dir, store) = store_with(&[]);
        fs::create_dir(store.category_path("colors")).unwrap();
        let err = store.save_words("colors", &["red".to_string()]).unwrap_err();
        assert!(matches!(err, LexiconError::Io(_)));
        assert!(!dir.path().join("colors.json.tmp").exists());
    }

    #[test]
    fn sorted_words_and_json_view() {
        let (_dir, store) = store_with(&[("colors.json", r#"["red", "blue"]"#)]);
        assert_eq!(store.sorted_words("colors"), vec!["blue", "red"]);
        assert_eq!(
            store.load_words_json("colors").unwrap(),
            "[\n  \"red\",\n  \"blue\"\n]"
        );
    }

    #[test]
    fn lexicon_knows_listed_and_backed_categories() {
        let (_dir, store) = store_with(&[
            (CATEGORY_TYPES_FILE, r#"{"things": ["listed_only"]}"#),
            ("backed_only.json", "[]"),
        ]);
        let lexicon = Lexicon::load(&store);
        assert!(lexicon.is_category("listed_only"));
        assert!(lexicon.is_category("backed_only"));
        assert!(!lexicon.is_category("things"));
        assert!(!lexicon.is_category("missing"));
        assert!(!lexicon.is_category("category_types"));
    }

    #[test]
    fn memory_lexicon_behaves_like_store() {
        let memory = MemoryLexicon::new()
            .with_category("colors", &["red"])
            .with_category_type("uncategorized", &["colors"]);
        assert_eq!(memory.load_words("colors"), vec!["red"]);
        assert!(memory.load_words("other").is_empty());
        assert_eq!(
            memory.load_category_types().get("uncategorized").unwrap(),
            ["colors"]
        );
    }
}
