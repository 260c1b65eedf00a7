//! Prompt templates sent to the generation model.

pub mod recipe;

pub use recipe::{PromptDocument, FIELD_ORDER};
