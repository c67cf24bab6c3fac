use crate::{
    backend::BackendResult,
    bedrock::map_sdk_error,
    error::{BackendError, ErrorKind},
    models::{
        ClaudeResponse, LlamaResponse, MistralResponse, ModelCategory, ModelInfo, ModelProvider,
        TextGenerationRequest, TitanTextResponse,
    },
};
use aws_sdk_bedrockruntime::{primitives::Blob, Client};
use serde_json::json;

#[derive(Clone)]
pub struct TextClient {
    client: Client,
    default_model_id: String,
}

impl TextClient {
    pub fn new(client: Client, default_model_id: impl Into<String>) -> Self {
        Self {
            client,
            default_model_id: default_model_id.into(),
        }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::new(
                "amazon.titan-text-express-v1",
                "Titan Text Express",
                ModelProvider::Amazon,
                ModelCategory::Text,
            ),
            ModelInfo::new(
                "anthropic.claude-3-haiku-20240307-v1:0",
                "Claude 3 Haiku",
                ModelProvider::Anthropic,
                ModelCategory::Text,
            ),
            ModelInfo::new(
                "meta.llama3-8b-instruct-v1:0",
                "Llama 3 8B Instruct",
                ModelProvider::Meta,
                ModelCategory::Text,
            ),
            ModelInfo::new(
                "mistral.mistral-7b-instruct-v0:2",
                "Mistral 7B Instruct",
                ModelProvider::Mistral,
                ModelCategory::Text,
            ),
        ]
    }

    pub async fn generate(&self, request: TextGenerationRequest) -> BackendResult<String> {
        let model_id = self.default_model_id.as_str();

        let provider = ModelProvider::from_model_id(model_id).ok_or_else(|| {
            BackendError::new(
                ErrorKind::Other,
                format!("Unsupported model ID: {}", model_id),
            )
        })?;

        let request_json = build_request_payload(&request, provider).to_string();

        log::info!("Invoking text model: {}", model_id);
        log::debug!("Text generation request payload: {}", request_json);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("Bedrock text generation error: {:?}", e);
                map_sdk_error(e)
            })?;

        let text = parse_text_response(response.body.as_ref(), provider)?;
        if text.trim().is_empty() {
            return Err(BackendError::empty("text"));
        }
        Ok(text)
    }
}

fn build_request_payload(
    request: &TextGenerationRequest,
    provider: ModelProvider,
) -> serde_json::Value {
    let max_tokens = request.max_tokens.unwrap_or(512);
    let temperature = request.temperature.unwrap_or(0.7);

    match provider {
        ModelProvider::Amazon => json!({
            "inputText": request.prompt,
            "textGenerationConfig": {
                "maxTokenCount": max_tokens,
                "temperature": temperature,
                "topP": 0.9
            }
        }),
        ModelProvider::Anthropic => json!({
            "messages": [
                {
                    "role": "user",
                    "content": request.prompt
                }
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
            "anthropic_version": "bedrock-2023-05-31"
        }),
        ModelProvider::Meta => json!({
            "prompt": request.prompt,
            "max_gen_len": max_tokens,
            "temperature": temperature,
            "top_p": 0.9
        }),
        ModelProvider::Mistral => json!({
            "prompt": request.prompt,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "top_p": 0.9
        }),
    }
}

fn parse_text_response(body: &[u8], provider: ModelProvider) -> BackendResult<String> {
    let text = match provider {
        ModelProvider::Amazon => {
            let response: TitanTextResponse = serde_json::from_slice(body)?;
            response
                .results
                .into_iter()
                .map(|r| r.output_text)
                .collect::<Vec<_>>()
                .join("")
        }
        ModelProvider::Anthropic => {
            let response: ClaudeResponse = serde_json::from_slice(body)?;
            response
                .content
                .into_iter()
                .filter(|c| c.kind == "text")
                .map(|c| c.text)
                .collect::<Vec<_>>()
                .join("")
        }
        ModelProvider::Meta => {
            let response: LlamaResponse = serde_json::from_slice(body)?;
            response.generation
        }
        ModelProvider::Mistral => {
            let response: MistralResponse = serde_json::from_slice(body)?;
            response
                .outputs
                .into_iter()
                .next()
                .map(|o| o.text)
                .unwrap_or_default()
        }
    };

    Ok(text.trim().to_string())
}
