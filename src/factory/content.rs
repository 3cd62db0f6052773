use crate::{
    config::scroll::{ScrollConfig, Span},
    foundation::{
        error::WallResult,
        random::{WallRng, random_choice, random_range, seeded_rng},
    },
    model::item::{ImageContent, ImageSize, TextColor, TextContent},
};

/// Longest text kept before truncation, in characters.
pub const MAX_TEXT_CHARS: usize = 30;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Title used when an image comes without one.
pub const DEFAULT_IMAGE_TITLE: &str = "Creative Wall Image";

/// Raw image input.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageData {
    /// Source URL.
    pub url: String,
    /// Optional alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageData {
    /// Image input without a title.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    fn title_or_default(&self) -> String {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_owned(),
            _ => DEFAULT_IMAGE_TITLE.to_owned(),
        }
    }
}

/// Builds item payloads with randomized display attributes.
#[derive(Debug)]
pub struct ContentFactory {
    font_size: Span,
    colors: Vec<TextColor>,
    rng: WallRng,
}

impl ContentFactory {
    /// OS-seeded factory.
    pub fn new(config: &ScrollConfig) -> Self {
        Self::with_rng(config, seeded_rng(None))
    }

    /// Reproducible factory.
    pub fn with_seed(config: &ScrollConfig, seed: u64) -> Self {
        Self::with_rng(config, seeded_rng(Some(seed)))
    }

    fn with_rng(config: &ScrollConfig, rng: WallRng) -> Self {
        Self {
            font_size: config.sizes.text_font_size,
            colors: config.colors.clone(),
            rng,
        }
    }

    /// Image payload with a random size class.
    pub fn create_image_content(&mut self, data: &ImageData) -> WallResult<ImageContent> {
        let size = *random_choice(&mut self.rng, &ImageSize::ALL)?;
        Ok(self.create_image_content_with_size(data, size))
    }

    /// Image payload with a fixed size class.
    pub fn create_image_content_with_size(
        &self,
        data: &ImageData,
        size: ImageSize,
    ) -> ImageContent {
        ImageContent {
            url: data.url.clone(),
            title: data.title_or_default(),
            size,
        }
    }

    /// Text payload with a random color and font size.
    ///
    /// Fails when the color table is empty.
    pub fn create_text_content(&mut self, text: &str) -> WallResult<TextContent> {
        let color = *random_choice(&mut self.rng, &self.colors)?;
        Ok(self.create_text_content_with_color(text, color, None))
    }

    /// Text payload with a fixed color; the font size is random unless given.
    pub fn create_text_content_with_color(
        &mut self,
        text: &str,
        color: TextColor,
        font_size: Option<f64>,
    ) -> TextContent {
        let range = self.font_size;
        let font_size =
            font_size.unwrap_or_else(|| random_range(&mut self.rng, range.min, range.max));
        TextContent {
            text: truncate_text(text, MAX_TEXT_CHARS),
            color,
            font_size,
        }
    }

    /// Image payloads in input order.
    pub fn create_image_content_batch(
        &mut self,
        data: &[ImageData],
    ) -> WallResult<Vec<ImageContent>> {
        data.iter().map(|d| self.create_image_content(d)).collect()
    }

    /// Text payloads in input order.
    pub fn create_text_content_batch(&mut self, texts: &[String]) -> WallResult<Vec<TextContent>> {
        texts.iter().map(|t| self.create_text_content(t)).collect()
    }

    /// Whether an image payload has a URL and a title.
    pub fn validate_image_content(&self, content: &ImageContent) -> bool {
        !content.url.is_empty() && !content.title.is_empty()
    }

    /// Whether a text payload has text, a known color, and a positive font size.
    pub fn validate_text_content(&self, content: &TextContent) -> bool {
        !content.text.is_empty()
            && self.colors.contains(&content.color)
            && content.font_size.is_finite()
            && content.font_size > 0.0
    }
}

/// Keep at most `max_chars` characters, appending [`ELLIPSIS`] when something was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_owned(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/content.rs"]
mod tests;
