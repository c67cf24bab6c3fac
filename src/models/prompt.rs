use serde::{Deserialize, Serialize};

/// Prompts derived from one set of [`InputParameters`](super::InputParameters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    pub text_prompt: String,
    pub image_prompt: Option<String>,
}
