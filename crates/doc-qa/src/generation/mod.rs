//! Answer generation: sanitization, remote inference and the local heuristic

pub mod engine;
pub mod local;
pub mod prompt;
pub mod sanitize;

pub use engine::AnswerEngine;
pub use local::LocalAnswerer;
pub use prompt::PromptBuilder;
pub use sanitize::{sanitize_text, truncate_chars};
