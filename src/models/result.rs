use crate::error::{BackendError, ErrorKind};
use crate::models::input::InputParameters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A failure carried as data inside a [`GenerationResult`] slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<BackendError> for ErrorInfo {
    fn from(e: BackendError) -> Self {
        Self {
            kind: e.kind,
            message: e.message,
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }

    /// Download name for the image in slot `index` (zero-based),
    /// e.g. `eco_bottle_ad_headline_image_1.png`.
    pub fn suggested_filename(&self, params: &InputParameters, index: usize) -> String {
        format!(
            "{}_{}_image_{}.{}",
            slug(&params.product_name),
            slug(params.content_type.label()),
            index + 1,
            self.extension()
        )
    }

    pub fn caption(params: &InputParameters, index: usize) -> String {
        format!(
            "{} - {} Image {}",
            params.product_name.trim(),
            params.content_type.label(),
            index + 1
        )
    }
}

/// Lower-cased, with every non-alphanumeric character replaced so the
/// result is always a single path component.
fn slug(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    Generated(String),
    Failed(ErrorInfo),
}

impl TextOutcome {
    pub fn value(&self) -> Option<&str> {
        match self {
            TextOutcome::Generated(text) => Some(text),
            TextOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            TextOutcome::Generated(_) => None,
            TextOutcome::Failed(info) => Some(info),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Generated(GeneratedImage),
    Failed(ErrorInfo),
}

impl ImageOutcome {
    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            ImageOutcome::Generated(image) => Some(image),
            ImageOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            ImageOutcome::Generated(_) => None,
            ImageOutcome::Failed(info) => Some(info),
        }
    }
}

/// Outcome of one request: the copy plus one entry per requested image slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub request_id: String,
    pub text: TextOutcome,
    pub images: Vec<ImageOutcome>,
}

impl GenerationResult {
    /// Successful images with their slot index.
    pub fn succeeded_images(&self) -> impl Iterator<Item = (usize, &GeneratedImage)> {
        self.images
            .iter()
            .enumerate()
            .filter_map(|(i, outcome)| outcome.image().map(|image| (i, image)))
    }

    /// Indices of image slots whose call failed.
    pub fn failed_slots(&self) -> Vec<usize> {
        self.images
            .iter()
            .enumerate()
            .filter(|(_, outcome)| outcome.error().is_some())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_complete_success(&self) -> bool {
        self.text.error().is_none() && self.images.iter().all(|o| o.error().is_none())
    }

    /// One human-readable line per failed item, numbered from 1 for images.
    pub fn describe_failures(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(info) = self.text.error() {
            lines.push(format!("text generation failed: {}", info));
        }
        for (i, outcome) in self.images.iter().enumerate() {
            if let Some(info) = outcome.error() {
                lines.push(format!("image {} failed: {}", i + 1, info));
            }
        }
        lines
    }
}
