/// Language-model assistant interface.
///
/// The engine does not talk to any model itself. Hosts implement
/// [`Assistant`]; this module renders what is sent and filters what comes
/// back before it reaches the lexicon.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::core::lexicon::LexiconSource;
use crate::schema::category::CategoryTypes;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("assistant unavailable: {0}")]
    Unavailable(String),
    #[error("assistant returned an unusable response: {0}")]
    InvalidResponse(String),
}

pub trait Assistant {
    /// Candidate words for `category`, given its current `words`.
    fn suggest_words(&self, category: &str, words: &[String]) -> Result<Vec<String>, AssistError>;

    /// A replacement for `fragment`. The result is not checked for
    /// resolvable placeholders; that surfaces on the next resolution.
    fn rewrite_template(
        &self,
        fragment: &str,
        types_description: &str,
    ) -> Result<String, AssistError>;
}

/// One line per type: `name: cat_a, cat_b`.
pub fn describe_category_types(types: &CategoryTypes) -> String {
    types
        .iter()
        .map(|(name, cats)| {
            if cats.is_empty() {
                format!("{name}: (no categories)")
            } else {
                format!("{name}: {}", cats.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trimmed, non-empty candidates not already in `existing`, without repeats,
/// in the order they were suggested.
pub fn merge_suggestions<I>(existing: &[String], candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: FxHashSet<String> = existing.iter().cloned().collect();
    let mut fresh = Vec::new();
    for candidate in candidates {
        let word = candidate.trim();
        if word.is_empty() || seen.contains(word) {
            continue;
        }
        seen.insert(word.to_string());
        fresh.push(word.to_string());
    }
    fresh
}

/// Ask `assistant` for words for `category` and keep only new ones.
pub fn suggest_new_words<A, S>(
    assistant: &A,
    source: &S,
    category: &str,
) -> Result<Vec<String>, AssistError>
where
    A: Assistant + ?Sized,
    S: LexiconSource + ?Sized,
{
    let words = source.load_words(category);
    let candidates = assistant.suggest_words(category, &words)?;
    Ok(merge_suggestions(&words, candidates))
}

/// Ask `assistant` to rewrite `fragment` using the types in `types`.
pub fn rewrite_with_types<A>(
    assistant: &A,
    fragment: &str,
    types: &CategoryTypes,
) -> Result<String, AssistError>
where
    A: Assistant + ?Sized,
{
    assistant.rewrite_template(fragment, &describe_category_types(types))
}
