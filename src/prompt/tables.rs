//! Fixed phrase tables the prompt builder draws from.
//!
//! Every enum member maps to exactly one phrase. Image backends take no
//! structured orientation, so aspect ratio only ever reaches them as text
//! from [`composition_hint`].

use crate::models::{AspectRatio, ContentType, Tone};

/// Output-shape instruction for the copywriting model.
pub fn format_instruction(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::ProductDescription => {
            "Write a persuasive, paragraph-length product description. Focus on benefits \
             and unique selling points, and finish with a clear call to action."
        }
        ContentType::AdHeadline => {
            "Write one short, punchy ad headline of no more than 12 words, suitable for a \
             digital ad banner. Return only the headline, not a full description."
        }
        ContentType::SocialPost => {
            "Write a social-media-ready post that is concise and engaging, includes 2-3 \
             relevant hashtags and a few emojis, and ends with a clear call to action."
        }
        ContentType::EmailSubject => {
            "Write a single concise email subject line that is intriguing and designed to \
             maximize open rates. Return only the subject line."
        }
    }
}

pub fn tone_style(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "polished, credible, businesslike language",
        Tone::Friendly => "warm, approachable, conversational language",
        Tone::Excited => "energetic, enthusiastic, high-impact language",
        Tone::Luxurious => "elevated, aspirational, premium language",
        Tone::Playful => "light-hearted, witty, fun language",
        Tone::Direct => "plain, confident, straight-to-the-point language",
    }
}

pub fn tone_visual(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "clean, polished commercial product photography",
        Tone::Friendly => "warm, inviting lifestyle photography",
        Tone::Excited => "bold, dynamic, high-energy photography",
        Tone::Luxurious => "luxurious product photography with rich materials and soft dramatic light",
        Tone::Playful => "bright, playful, colorful photography",
        Tone::Direct => "minimal, uncluttered product photography",
    }
}

pub fn scene_cue(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::ProductDescription => {
            "Show the product in a clean, well-lit studio setting, highlighting its key features."
        }
        ContentType::AdHeadline => {
            "Create a dynamic, eye-catching visual that evokes curiosity and complements an advertisement."
        }
        ContentType::SocialPost => {
            "Make it vibrant and shareable, in a lifestyle context suited to a social media feed."
        }
        ContentType::EmailSubject => {
            "Create a conceptual image that subtly hints at the product's benefits or purpose."
        }
    }
}

pub fn composition_hint(aspect_ratio: AspectRatio) -> &'static str {
    match aspect_ratio {
        AspectRatio::Square => "square composition (1:1 aspect ratio)",
        AspectRatio::Standard => "standard landscape composition (4:3 aspect ratio)",
        AspectRatio::Portrait => "portrait orientation (3:4 aspect ratio)",
        AspectRatio::Widescreen => "wide landscape orientation (16:9 aspect ratio)",
        AspectRatio::TallPortrait => "tall portrait orientation (9:16 aspect ratio)",
    }
}
