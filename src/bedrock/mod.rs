pub mod image_client;
pub mod text_client;

use crate::{
    backend::{BackendResult, GenerationBackend},
    config::BedrockConfig,
    error::{BackendError, ErrorKind, Result},
    models::{GeneratedImage, ImageGenerationRequest, TextGenerationRequest},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::Client;

pub use image_client::ImageClient;
pub use text_client::TextClient;

#[derive(Clone)]
pub struct BedrockClient {
    text_client: TextClient,
    image_client: ImageClient,
    temperature: f32,
    max_tokens: i32,
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "copysmith",
                ))
                .region(aws_sdk_bedrockruntime::config::Region::new(
                    bedrock_config
                        .region
                        .clone()
                        .unwrap_or_else(|| "us-east-1".to_string()),
                ))
                .load()
                .await
        } else {
            aws_config::load_from_env().await
        };

        let client = Client::new(&aws_config);

        Ok(Self {
            text_client: TextClient::new(client.clone(), bedrock_config.text_model_id),
            image_client: ImageClient::new(client, bedrock_config.image_model_id),
            temperature: bedrock_config.temperature,
            max_tokens: bedrock_config.max_tokens,
        })
    }
}

#[async_trait]
impl GenerationBackend for BedrockClient {
    async fn text_generate(&self, prompt: &str) -> BackendResult<String> {
        let request = TextGenerationRequest {
            prompt: prompt.to_string(),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };
        self.text_client.generate(request).await
    }

    async fn image_generate(&self, prompt: &str) -> BackendResult<GeneratedImage> {
        self.image_client
            .generate(ImageGenerationRequest::new(prompt))
            .await
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}

/// Classifies an SDK failure by the Bedrock error code it carries.
pub(crate) fn map_sdk_error<E, R>(e: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &e {
        SdkError::TimeoutError(_) => BackendError::new(ErrorKind::Timeout, e.to_string()),
        SdkError::DispatchFailure(_) => BackendError::new(ErrorKind::Unavailable, e.to_string()),
        SdkError::ServiceError(_) => {
            let service_error = e.as_service_error();
            let code = service_error.and_then(|s| s.code()).unwrap_or("unknown");
            let message = format!(
                "Bedrock service error: {} - {}",
                code,
                service_error.and_then(|s| s.message()).unwrap_or("no message")
            );
            BackendError::new(kind_for_code(code), message)
        }
        _ => BackendError::new(ErrorKind::Other, format!("AWS SDK error: {}", e)),
    }
}

fn kind_for_code(code: &str) -> ErrorKind {
    match code {
        "ThrottlingException" | "ServiceQuotaExceededException" => ErrorKind::RateLimited,
        "AccessDeniedException" | "UnrecognizedClientException" | "ExpiredTokenException" => {
            ErrorKind::Auth
        }
        "ModelTimeoutException" => ErrorKind::Timeout,
        "ServiceUnavailableException" | "InternalServerException" | "ModelNotReadyException" => {
            ErrorKind::Unavailable
        }
        _ => ErrorKind::Other,
    }
}
