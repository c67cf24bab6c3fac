use crate::{
    backend::BackendResult,
    bedrock::map_sdk_error,
    error::{BackendError, ErrorKind},
    models::{
        GeneratedImage, ImageGenerationRequest, ModelCategory, ModelInfo, ModelProvider,
        TitanImageResponse, TITAN_IMAGE_SIZE,
    },
    prompt::truncate_field,
};
use aws_sdk_bedrockruntime::{primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

/// Titan rejects text prompts longer than this many characters.
const TITAN_IMAGE_PROMPT_LIMIT: usize = 512;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    default_model_id: String,
}

impl ImageClient {
    pub fn new(client: Client, default_model_id: impl Into<String>) -> Self {
        Self {
            client,
            default_model_id: default_model_id.into(),
        }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::new(
                "amazon.titan-image-generator-v1",
                "Titan Image Generator G1",
                ModelProvider::Amazon,
                ModelCategory::Image,
            ),
            ModelInfo::new(
                "amazon.titan-image-generator-v2:0",
                "Titan Image Generator G1 v2",
                ModelProvider::Amazon,
                ModelCategory::Image,
            ),
        ]
    }

    pub async fn generate(&self, request: ImageGenerationRequest) -> BackendResult<GeneratedImage> {
        let model_id = self.default_model_id.as_str();

        if !model_id.starts_with("amazon.titan-image-generator") {
            return Err(BackendError::new(
                ErrorKind::Other,
                format!("Unsupported image model: {}", model_id),
            ));
        }

        let request_json = build_titan_payload(&request).to_string();

        log::info!("Generating image with model: {}", model_id);

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
                log::error!("Bedrock image generation error: {:?}", e);
                map_sdk_error(e)
            })?;

        decode_titan_response(response.body.as_ref())
    }
}

fn build_titan_payload(request: &ImageGenerationRequest) -> serde_json::Value {
    let text = truncate_field(&request.prompt, TITAN_IMAGE_PROMPT_LIMIT - 3);
    json!({
        "taskType": "TEXT_IMAGE",
        "textToImageParams": {
            "text": text,
        },
        "imageGenerationConfig": {
            "numberOfImages": 1,
            "width": TITAN_IMAGE_SIZE,
            "height": TITAN_IMAGE_SIZE,
            "quality": "standard",
            "cfgScale": 8.0
        }
    })
}

fn decode_titan_response(body: &[u8]) -> BackendResult<GeneratedImage> {
    let titan_response: TitanImageResponse = serde_json::from_slice(body)?;

    if let Some(error) = titan_response.error.filter(|e| !e.is_empty()) {
        return Err(BackendError::malformed(error));
    }

    let encoded = titan_response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::empty("image"))?;

    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| BackendError::malformed(format!("invalid base64 image data: {}", e)))?;

    Ok(GeneratedImage::new(bytes, "image/png"))
}
