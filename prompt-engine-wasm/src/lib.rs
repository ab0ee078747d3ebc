//! WASM bindings for prompt-engine — resolve templates in the browser.

use wasm_bindgen::prelude::*;

use prompt_engine::core::lexicon::{LexiconSource, MemoryLexicon};
use prompt_engine::core::pipeline::PromptEngine;
use prompt_engine::core::template::{combined_token, insert_placeholder, scan_placeholders};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct PlaceholderInfo {
    token: String,
    alternatives: Vec<String>,
    start: usize,
    end: usize,
}

#[derive(serde::Serialize)]
struct Insertion {
    template: String,
    cursor: usize,
}

// ---------------------------------------------------------------------------
// PromptDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct PromptDemo {
    engine: PromptEngine<MemoryLexicon>,
}

#[wasm_bindgen]
impl PromptDemo {
    /// Create an engine over a lexicon given as JSON.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "category_types": { "uncategorized": ["colors"] },
    ///   "categories": { "colors": ["red", "blue"] }
    /// }
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(lexicon_json: &str, seed: u64) -> Result<PromptDemo, JsError> {
        let lexicon: MemoryLexicon = serde_json::from_str(lexicon_json)
            .map_err(|e| JsError::new(&format!("Invalid lexicon JSON: {e}")))?;
        Ok(PromptDemo {
            engine: PromptEngine::from_source(lexicon, Some(seed)),
        })
    }

    /// Resolve a template once.
    pub fn generate(&mut self, template: &str) -> Result<String, JsError> {
        self.engine
            .generate(template)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))
    }

    /// Resolve a template `count` times. Returns a JSON array of strings.
    pub fn generate_many(&mut self, template: &str, count: usize) -> Result<String, JsError> {
        let outputs = self
            .engine
            .generate_many(template, count)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))?;
        serde_json::to_string(&outputs)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return the category types as a JSON object, in lexicon order.
    pub fn category_types(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.engine.lexicon().load_category_types())
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a category's words as a JSON array, sorted for display.
    pub fn words(&self, category: &str) -> Result<String, JsError> {
        let mut words = self.engine.lexicon().load_words(category);
        words.sort();
        serde_json::to_string(&words)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return the placeholders of `template` as a JSON array.
    pub fn placeholders(template: &str) -> Result<String, JsError> {
        let found: Vec<PlaceholderInfo> = scan_placeholders(template)
            .into_iter()
            .map(|p| PlaceholderInfo {
                alternatives: p.alternatives().iter().map(|a| a.to_string()).collect(),
                start: p.span.start,
                end: p.span.end,
                token: p.token,
            })
            .collect();
        serde_json::to_string(&found)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Insert `[name]` at a character cursor. Returns `{template, cursor}` JSON.
    pub fn insert(template: &str, cursor: usize, name: &str) -> Result<String, JsError> {
        let (template, cursor) = insert_placeholder(template, cursor, name);
        serde_json::to_string(&Insertion { template, cursor })
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Build a combined `[a/b]` token from a JSON array of category names.
    pub fn combine(names_json: &str) -> Result<Option<String>, JsError> {
        let names: Vec<String> = serde_json::from_str(names_json)
            .map_err(|e| JsError::new(&format!("Invalid names JSON: {e}")))?;
        Ok(combined_token(&names))
    }
}
