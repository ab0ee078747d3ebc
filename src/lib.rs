//! Prompt Engine — expands bracketed templates into sentences.
//!
//! Words come from a user-maintained lexicon: JSON word lists per category,
//! grouped into category types. A template such as
//! `"a [colors] [animal/plant]"` resolves to a concrete sentence by drawing
//! one word per placeholder.

pub mod core;
pub mod schema;

pub use crate::core::lexicon::{Lexicon, LexiconSource, LexiconStore, MemoryLexicon};
pub use crate::core::pipeline::{PipelineError, PromptEngine};
pub use crate::core::resolver::{resolve, ResolveError};
pub use crate::schema::category::CategoryTypes;
