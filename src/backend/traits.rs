use crate::error::BackendError;
use crate::models::GeneratedImage;
use async_trait::async_trait;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// An authenticated generation service shared by every request.
///
/// Each call is a single attempt; implementations decide whether to retry
/// internally but must report the final outcome as one `BackendError`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn text_generate(&self, prompt: &str) -> BackendResult<String>;

    async fn image_generate(&self, prompt: &str) -> BackendResult<GeneratedImage>;

    fn name(&self) -> &str;
}
