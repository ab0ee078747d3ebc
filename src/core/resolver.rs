/// Template resolution — turns a template and a lexicon into a sentence.
///
/// Resolution runs two passes. The first expands category-type
/// placeholders, which are recognised by exact name. The second expands
/// the remaining category and combined `[a/b]` placeholders, which are
/// recognised by shape. Doing types first keeps a type name from being
/// read as a single-alternative category token.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::core::lexicon::{Lexicon, LexiconSource};
use crate::core::template::scan_placeholders;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("category type '{0}' has no categories to choose from")]
    EmptyCategoryPool(String),
}

/// Resolve every placeholder in `template` that the lexicon knows.
///
/// Unknown tokens are left as written. A category whose word list is empty
/// or unreadable resolves to the empty string. Fails only when a
/// category-type placeholder names a type with no member categories.
pub fn resolve<S, R>(
    template: &str,
    lexicon: &Lexicon<'_, S>,
    rng: &mut R,
) -> Result<String, ResolveError>
where
    S: LexiconSource + ?Sized,
    R: Rng + ?Sized,
{
    let partial = resolve_category_types(template, lexicon, rng)?;
    Ok(resolve_categories(&partial, lexicon, rng))
}

/// Pass 1: replace each `[Type]` with a word from one of its categories.
fn resolve_category_types<S, R>(
    template: &str,
    lexicon: &Lexicon<'_, S>,
    rng: &mut R,
) -> Result<String, ResolveError>
where
    S: LexiconSource + ?Sized,
    R: Rng + ?Sized,
{
    let mut output = template.to_string();

    for (type_name, categories) in lexicon.category_types().iter() {
        let needle = format!("[{type_name}]");
        let mut cursor = 0;

        // Text inserted for this type is never searched again.
        while let Some(offset) = output[cursor..].find(&needle) {
            let start = cursor + offset;
            let category = categories
                .choose(rng)
                .ok_or_else(|| ResolveError::EmptyCategoryPool(type_name.to_string()))?;
            let word = pick_word(lexicon, category, rng);
            debug!("[{type_name}] -> {category} -> '{word}'");
            output.replace_range(start..start + needle.len(), &word);
            cursor = start + word.len();
        }
    }

    Ok(output)
}

/// Pass 2: replace category and combined placeholders, one draw per
/// occurrence, in the order they appear.
fn resolve_categories<S, R>(text: &str, lexicon: &Lexicon<'_, S>, rng: &mut R) -> String
where
    S: LexiconSource + ?Sized,
    R: Rng + ?Sized,
{
    let mut output = String::with_capacity(text.len());
    let mut copied_to = 0;

    for placeholder in scan_placeholders(text) {
        let alternatives = placeholder.alternatives();
        if !alternatives.iter().any(|name| lexicon.is_category(name)) {
            continue;
        }
        let Some(category) = alternatives.choose(rng) else {
            continue;
        };
        let word = pick_word(lexicon, category, rng);
        debug!("[{}] -> {category} -> '{word}'", placeholder.token);

        output.push_str(&text[copied_to..placeholder.span.start]);
        output.push_str(&word);
        copied_to = placeholder.span.end;
    }

    output.push_str(&text[copied_to..]);
    output
}

fn pick_word<S, R>(lexicon: &Lexicon<'_, S>, category: &str, rng: &mut R) -> String
where
    S: LexiconSource + ?Sized,
    R: Rng + ?Sized,
{
    lexicon
        .words(category)
        .choose(rng)
        .cloned()
        .unwrap_or_default()
}

/// Resolve `template` `count` times, each with its own draws.
pub fn resolve_many<S, R>(
    template: &str,
    lexicon: &Lexicon<'_, S>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>, ResolveError>
where
    S: LexiconSource + ?Sized,
    R: Rng + ?Sized,
{
    (0..count).map(|_| resolve(template, lexicon, rng)).collect()
}
