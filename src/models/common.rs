use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: ModelProvider,
    pub category: ModelCategory,
}

impl ModelInfo {
    pub fn new(id: &str, name: &str, provider: ModelProvider, category: ModelCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            provider,
            category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Text,
    Image,
}

/// Model family on Bedrock; decides the request and response JSON shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Amazon,
    Anthropic,
    Meta,
    Mistral,
}

impl ModelProvider {
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        // Inference profile ids carry a region prefix, e.g. "us.anthropic.claude-...".
        let id = model_id
            .split_once('.')
            .filter(|(prefix, _)| prefix.len() == 2)
            .map(|(_, rest)| rest)
            .unwrap_or(model_id);

        match id {
            id if id.starts_with("amazon.") => Some(ModelProvider::Amazon),
            id if id.starts_with("anthropic.") => Some(ModelProvider::Anthropic),
            id if id.starts_with("meta.") => Some(ModelProvider::Meta),
            id if id.starts_with("mistral.") => Some(ModelProvider::Mistral),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_model_id() {
        assert_eq!(
            ModelProvider::from_model_id("amazon.titan-text-express-v1"),
            Some(ModelProvider::Amazon)
        );
        assert_eq!(
            ModelProvider::from_model_id("us.anthropic.claude-3-haiku-20240307-v1:0"),
            Some(ModelProvider::Anthropic)
        );
        assert_eq!(
            ModelProvider::from_model_id("meta.llama3-8b-instruct-v1:0"),
            Some(ModelProvider::Meta)
        );
        assert_eq!(ModelProvider::from_model_id("cohere.command-text-v14"), None);
    }
}
