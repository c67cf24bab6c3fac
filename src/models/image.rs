use serde::{Deserialize, Serialize};

/// Titan renders at a fixed square size; orientation is carried by the prompt.
pub const TITAN_IMAGE_SIZE: u32 = 1024;

#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    pub prompt: String,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct TitanImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    pub error: Option<String>,
}
