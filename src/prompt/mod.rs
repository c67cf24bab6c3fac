pub mod builder;
pub mod tables;

pub use builder::{truncate_field, PromptBuilder, DEFAULT_MAX_FIELD_CHARS, TRUNCATION_MARKER};
