/// The prompt engine: template → sentences orchestration.
///
/// Wires together the lexicon store, the resolver, the random source and
/// the template history.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::config::{ConfigError, EngineConfig};
use crate::core::history::{History, HistoryError};
use crate::core::lexicon::{Lexicon, LexiconError, LexiconSource, LexiconStore};
use crate::core::resolver::{resolve, ResolveError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
}

/// The top-level engine. Built via `PromptEngine::builder()` for a lexicon
/// directory, or `PromptEngine::from_source()` for any other lexicon.
pub struct PromptEngine<S: LexiconSource = LexiconStore> {
    source: S,
    rng: StdRng,
    history: Option<History>,
}

/// Builder for a directory-backed `PromptEngine`.
pub struct PromptEngineBuilder {
    lexicon_dir: Option<PathBuf>,
    history_path: Option<PathBuf>,
    seed: Option<u64>,
    default_category_types: Option<String>,
}

impl PromptEngine<LexiconStore> {
    pub fn builder() -> PromptEngineBuilder {
        PromptEngineBuilder {
            lexicon_dir: None,
            history_path: None,
            seed: None,
            default_category_types: None,
        }
    }
}

impl<S: LexiconSource> PromptEngine<S> {
    /// An engine over `source` with no history. `None` seeds from entropy.
    pub fn from_source(source: S, seed: Option<u64>) -> Self {
        Self {
            source,
            rng: make_rng(seed),
            history: None,
        }
    }

    pub fn lexicon(&self) -> &S {
        &self.source
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Resolve `template` once against the current lexicon.
    pub fn generate(&mut self, template: &str) -> Result<String, PipelineError> {
        let output = self.resolve_once(template)?;
        self.remember(template);
        Ok(output)
    }

    /// Resolve `template` `count` times. Each resolution re-reads the
    /// category types, so edits made in between are picked up.
    pub fn generate_many(
        &mut self,
        template: &str,
        count: usize,
    ) -> Result<Vec<String>, PipelineError> {
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(self.resolve_once(template)?);
        }
        if count > 0 {
            self.remember(template);
        }
        Ok(results)
    }

    fn resolve_once(&mut self, template: &str) -> Result<String, ResolveError> {
        let lexicon = Lexicon::load(&self.source);
        resolve(template, &lexicon, &mut self.rng)
    }

    /// A history that cannot be saved does not cost the caller the output.
    fn remember(&mut self, template: &str) {
        if let Some(history) = self.history.as_mut() {
            match history.record(template) {
                Ok(true) => debug!("added template to history"),
                Ok(false) => {}
                Err(e) => warn!("could not save {}: {e}", history.path().display()),
            }
        }
    }
}

impl PromptEngineBuilder {
    /// Start from a loaded config. Later builder calls override it.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            lexicon_dir: Some(config.lexicon_dir.clone()),
            history_path: config.history_path.clone(),
            seed: config.seed,
            default_category_types: config.default_category_types.clone(),
        }
    }

    pub fn lexicon_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_dir = Some(path.into());
        self
    }

    pub fn history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    pub fn without_history(mut self) -> Self {
        self.history_path = None;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Type names to write if `category_types.json` does not exist yet.
    pub fn default_category_types(mut self, list: &str) -> Self {
        self.default_category_types = Some(list.to_string());
        self
    }

    pub fn build(self) -> Result<PromptEngine<LexiconStore>, PipelineError> {
        let store = match self.lexicon_dir {
            Some(dir) => LexiconStore::new(dir),
            None => LexiconStore::default(),
        };

        if let Some(list) = self.default_category_types {
            store.load_category_types_or_init(|| Some(list));
        }

        let history = match self.history_path {
            Some(path) => Some(History::load(path)?),
            None => None,
        };

        info!("lexicon at {}", store.dir().display());

        Ok(PromptEngine {
            source: store,
            rng: make_rng(self.seed),
            history,
        })
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
