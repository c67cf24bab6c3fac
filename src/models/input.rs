use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_IMAGE_COUNT: u32 = 1;
pub const MAX_IMAGE_COUNT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    ProductDescription,
    AdHeadline,
    SocialPost,
    EmailSubject,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::ProductDescription,
        ContentType::AdHeadline,
        ContentType::SocialPost,
        ContentType::EmailSubject,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::ProductDescription => "Product Description",
            ContentType::AdHeadline => "Ad Headline",
            ContentType::SocialPost => "Social Media Post",
            ContentType::EmailSubject => "Email Subject Line",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ContentType::ProductDescription => &["product_description", "description"],
            ContentType::AdHeadline => &["ad_headline", "headline"],
            ContentType::SocialPost => &["social_post", "social"],
            ContentType::EmailSubject => &["email_subject", "email"],
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ContentType::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.aliases().contains(&needle))
            .ok_or_else(|| ValidationError::UnknownOption {
                field: "content type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    Friendly,
    Excited,
    Luxurious,
    Playful,
    Direct,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Excited,
        Tone::Luxurious,
        Tone::Playful,
        Tone::Direct,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Excited => "Excited",
            Tone::Luxurious => "Luxurious",
            Tone::Playful => "Playful",
            Tone::Direct => "Direct",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownOption {
                field: "tone",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    TallPortrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Standard,
        AspectRatio::Portrait,
        AspectRatio::Widescreen,
        AspectRatio::TallPortrait,
    ];

    /// The short `w:h` form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::TallPortrait => "9:16",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1 (Square)",
            AspectRatio::Standard => "4:3 (Standard)",
            AspectRatio::Portrait => "3:4 (Portrait)",
            AspectRatio::Widescreen => "16:9 (Widescreen)",
            AspectRatio::TallPortrait => "9:16 (Tall Portrait)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == needle || r.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownOption {
                field: "aspect ratio",
                value: s.to_string(),
            })
    }
}

/// Everything the caller supplies for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputParameters {
    pub product_name: String,
    pub description: String,
    pub audience: String,
    pub content_type: ContentType,
    pub tone: Tone,
    #[serde(default)]
    pub generate_image: bool,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_image_count")]
    pub image_count: u32,
}

fn default_image_count() -> u32 {
    MIN_IMAGE_COUNT
}

impl InputParameters {
    /// Text-only request; use [`InputParameters::with_images`] to ask for imagery.
    pub fn new(
        product_name: impl Into<String>,
        description: impl Into<String>,
        audience: impl Into<String>,
        content_type: ContentType,
        tone: Tone,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            description: description.into(),
            audience: audience.into(),
            content_type,
            tone,
            generate_image: false,
            aspect_ratio: AspectRatio::default(),
            image_count: default_image_count(),
        }
    }

    pub fn with_images(mut self, aspect_ratio: AspectRatio, image_count: u32) -> Self {
        self.generate_image = true;
        self.aspect_ratio = aspect_ratio;
        self.image_count = image_count;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("product name"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyField("description"));
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::EmptyField("audience"));
        }
        if self.generate_image
            && !(MIN_IMAGE_COUNT..=MAX_IMAGE_COUNT).contains(&self.image_count)
        {
            return Err(ValidationError::ImageCountOutOfRange(self.image_count));
        }
        Ok(())
    }

    /// Number of image slots the result must carry.
    pub fn requested_images(&self) -> usize {
        if self.generate_image {
            self.image_count as usize
        } else {
            0
        }
    }
}
