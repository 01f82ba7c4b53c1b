//! Tusla Services Library
//!
//! Collaborating services that sit between the HTTP layer and the
//! repositories. Currently this is AI-assisted post categorization backed by
//! a local Ollama instance.

pub mod categorizer;
pub mod ollama;

pub use categorizer::CategorizerService;
pub use ollama::OllamaClient;
