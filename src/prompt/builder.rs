use crate::models::{InputParameters, PromptSet};
use crate::prompt::tables;
use std::borrow::Cow;

/// Longest free-text field, in characters, embedded into a prompt.
pub const DEFAULT_MAX_FIELD_CHARS: usize = 2000;

/// Appended to a field that was cut at the ceiling.
pub const TRUNCATION_MARKER: &str = "...";

/// Builds model-ready prompts from [`InputParameters`].
///
/// Building is pure: the same parameters always give the same prompts, and
/// oversized fields are shortened rather than rejected.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    max_field_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            max_field_chars: DEFAULT_MAX_FIELD_CHARS,
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_field_chars(mut self, max_field_chars: usize) -> Self {
        self.max_field_chars = max_field_chars.max(1);
        self
    }

    pub fn build(&self, params: &InputParameters) -> PromptSet {
        PromptSet {
            text_prompt: self.text_prompt(params),
            image_prompt: params.generate_image.then(|| self.image_prompt(params)),
        }
    }

    pub fn text_prompt(&self, params: &InputParameters) -> String {
        let kind = params.content_type.label();
        format!(
            "You are an expert copywriter. Write marketing copy ({kind}) for the following product:\n\n\
             Product Name: {name}\n\
             Product Description/Key Features: {description}\n\
             Target Audience: {audience}\n\
             Desired Tone: {tone}\n\n\
             Format: {format}\n\
             Style: Use {style}.\n\
             Please ensure the {kind} is compelling and persuasive.\n\n\
             Generated Content:",
            kind = kind,
            name = self.field(&params.product_name),
            description = self.field(&params.description),
            audience = self.field(&params.audience),
            tone = params.tone.label(),
            format = tables::format_instruction(params.content_type),
            style = tables::tone_style(params.tone),
        )
    }

    /// Visual prompt reused for every requested image variation.
    ///
    /// Fixed cues come before the free-text fields, so a backend that cuts
    /// the prompt at a length limit loses description text first.
    pub fn image_prompt(&self, params: &InputParameters) -> String {
        format!(
            "A photorealistic product image. \
             Composition: {composition}. \
             Style: {visual}. \
             {scene} \
             High quality, professional photography, detailed, vibrant colors. \
             Subject: {name}, visually representing the core features of: {description}",
            composition = tables::composition_hint(params.aspect_ratio),
            visual = tables::tone_visual(params.tone),
            scene = tables::scene_cue(params.content_type),
            name = self.field(&params.product_name),
            description = self.field(&params.description),
        )
    }

    fn field<'a>(&self, value: &'a str) -> Cow<'a, str> {
        truncate_field(value.trim(), self.max_field_chars)
    }
}

/// Cuts `value` to at most `max_chars` characters, marking the cut.
pub fn truncate_field(value: &str, max_chars: usize) -> Cow<'_, str> {
    match value.char_indices().nth(max_chars) {
        None => Cow::Borrowed(value),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &value[..cut], TRUNCATION_MARKER)),
    }
}
