//! Google Gemini backend over the public REST API.
//!
//! Text and images both go through `generateContent`; image requests ask for
//! the IMAGE response modality and pick the first inline-data part.

pub mod types;

use crate::{
    backend::{BackendResult, GenerationBackend},
    config::GeminiConfig,
    error::{BackendError, CopyError, ErrorKind, Result},
    models::GeneratedImage,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const IMAGE_REQUEST_PREFIX: &str =
    "Please generate a photorealistic image based on this description: ";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            CopyError::ConfigError(
                "GOOGLE_API_KEY not found in environment variables. Please set it in a .env file."
                    .into(),
            )
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            config,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> BackendResult<GenerateContentResponse> {
        log::info!("Invoking Gemini model: {}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini API error {}: {}", status, body);
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn text_generate(&self, prompt: &str) -> BackendResult<String> {
        let request = GenerateContentRequest::user_prompt(
            prompt,
            GenerationConfig {
                temperature: Some(self.config.temperature),
                response_modalities: None,
            },
        );
        let response = self.generate_content(&self.config.text_model, &request).await?;
        extract_text(&response)
    }

    async fn image_generate(&self, prompt: &str) -> BackendResult<GeneratedImage> {
        let request = GenerateContentRequest::user_prompt(
            &format!("{}{}", IMAGE_REQUEST_PREFIX, prompt),
            GenerationConfig {
                temperature: None,
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            },
        );
        let response = self.generate_content(&self.config.image_model, &request).await?;
        extract_image(&response)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn api_error(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => {
            let kind = if error.is_api_key_failure() {
                ErrorKind::Auth
            } else {
                ErrorKind::from_status(status)
            };
            BackendError::new(
                kind,
                format!("{} {}: {}", error.code, error.status, error.message),
            )
        }
        Err(_) => BackendError::new(
            ErrorKind::from_status(status),
            format!("HTTP {}: {}", status, body),
        ),
    }
}

fn blocked(response: &GenerateContentResponse) -> Option<BackendError> {
    response.block_reason().map(|reason| {
        BackendError::new(
            ErrorKind::EmptyResponse,
            format!("prompt blocked by safety filters: {}", reason),
        )
    })
}

fn extract_text(response: &GenerateContentResponse) -> BackendResult<String> {
    if let Some(err) = blocked(response) {
        return Err(err);
    }

    let text: String = response
        .first_parts()
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(match response.finish_reason() {
            Some(reason) => BackendError::new(
                ErrorKind::EmptyResponse,
                format!("no text returned (finish reason: {})", reason),
            ),
            None => BackendError::empty("text"),
        });
    }
    Ok(text.trim().to_string())
}

fn extract_image(response: &GenerateContentResponse) -> BackendResult<GeneratedImage> {
    if let Some(err) = blocked(response) {
        return Err(err);
    }

    let mut image = None;
    for part in response.first_parts() {
        if let Some(text) = part.text.as_deref().filter(|t| !t.trim().is_empty()) {
            log::info!("Model also provided text: {}", text.trim());
        }
        if image.is_none() {
            image = part.inline_data.as_ref();
        }
    }

    let inline = image.ok_or_else(|| BackendError::empty("image"))?;
    let bytes = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| BackendError::malformed(format!("invalid base64 image data: {}", e)))?;

    Ok(GeneratedImage::new(bytes, inline.mime_type.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = GeminiClient::new(GeminiConfig::new());
        assert!(matches!(result, Err(CopyError::ConfigError(_))));
    }

    #[test]
    fn test_endpoint_uses_model_name() {
        let client = GeminiClient::new(
            GeminiConfig::new()
                .with_api_key("k")
                .with_base_url("http://localhost:9000/v1beta/"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest::user_prompt(
            "draw",
            GenerationConfig {
                temperature: None,
                response_modalities: Some(vec!["IMAGE".to_string()]),
            },
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "draw");
        assert_eq!(value["generationConfig"]["responseModalities"][0], "IMAGE");
        assert!(value["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Sip "},{"text":"happens."}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(extract_text(&response).unwrap(), "Sip happens.");
    }

    #[test]
    fn test_extract_text_empty_and_blocked() {
        let err = extract_text(&parse(r#"{"candidates":[]}"#)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyResponse);

        let err = extract_text(&parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyResponse);
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_extract_image_skips_text_parts() {
        let json = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"text":"Here you go"}},{{"inlineData":{{"mimeType":"image/png","data":"{}"}}}}]}}}}]}}"#,
            STANDARD.encode([7u8, 8, 9])
        );
        let image = extract_image(&parse(&json)).unwrap();
        assert_eq!(image.bytes, vec![7, 8, 9]);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_extract_image_without_inline_data() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]}}]}"#);
        let err = extract_image(&response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyResponse);
    }

    #[test]
    fn test_api_error_classification() {
        let err = api_error(
            429,
            r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert!(err.message.contains("Resource has been exhausted"));

        let err = api_error(403, "forbidden");
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.message, "HTTP 403: forbidden");
    }

    #[test]
    fn test_invalid_api_key_is_auth_failure() {
        let err = api_error(
            400,
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID","domain":"googleapis.com"}]}}"#,
        );
        assert_eq!(err.kind, ErrorKind::Auth);
        assert!(!err.kind.is_recoverable());

        let err = api_error(
            400,
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(err.kind, ErrorKind::Auth);

        let err = api_error(
            400,
            r#"{"error":{"code":400,"message":"Invalid JSON payload received.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(err.kind, ErrorKind::Other);
    }
}
