pub mod traits;

use crate::{
    bedrock::BedrockClient,
    config::{Config, Provider},
    error::Result,
    gemini::GeminiClient,
};
use std::sync::Arc;

pub use traits::{BackendResult, GenerationBackend};

/// Builds the shared, authenticated client for the configured provider.
pub async fn connect(config: &Config) -> Result<Arc<dyn GenerationBackend>> {
    let backend: Arc<dyn GenerationBackend> = match config.provider {
        Provider::Gemini => Arc::new(GeminiClient::new(config.gemini.clone())?),
        Provider::Bedrock => Arc::new(BedrockClient::new(config.bedrock.clone()).await?),
    };
    log::info!("Generation backend ready: {}", backend.name());
    Ok(backend)
}
