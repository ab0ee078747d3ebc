pub mod assist;
pub mod config;
pub mod history;
pub mod lexicon;
pub mod lint;
pub mod pipeline;
pub mod resolver;
pub mod template;
