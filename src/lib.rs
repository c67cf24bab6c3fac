//! Copysmith turns product details into marketing copy and matching imagery.
//!
//! Build [`InputParameters`], hand them to a [`GenerationOrchestrator`] wired to
//! a [`GenerationBackend`], and render the [`GenerationResult`] it returns.

pub mod backend;
pub mod bedrock;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;

pub use backend::{connect, GenerationBackend};
pub use bedrock::{BedrockClient, ImageClient, TextClient};
pub use config::{BedrockConfig, Config, GeminiConfig, ImageDispatch, OrchestratorConfig, Provider};
pub use error::{BackendError, CopyError, ErrorKind, Result, ValidationError};
pub use gemini::GeminiClient;
pub use models::*;
pub use orchestrator::GenerationOrchestrator;
pub use prompt::PromptBuilder;
