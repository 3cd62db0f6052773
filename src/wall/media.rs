use std::path::Path;

use crate::{
    factory::content::{DEFAULT_IMAGE_TITLE, ImageData},
    foundation::error::{WallError, WallResult},
};

/// Most images kept from a raw feed.
pub const MAX_FEED_IMAGES: usize = 80;
/// Most texts kept from a raw feed.
pub const MAX_FEED_TEXTS: usize = 15;

/// Normalized wall input: image references and text snippets.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MediaData {
    /// Image inputs.
    #[serde(default)]
    pub images: Vec<ImageData>,
    /// Text inputs.
    #[serde(default)]
    pub texts: Vec<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct RawMediaItem {
    #[serde(default)]
    media_url_https: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl MediaData {
    /// Parse a media document from disk. See [`Self::from_raw_json`].
    pub fn from_json_path(path: &Path) -> WallResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            WallError::Other(anyhow::anyhow!("read media '{}': {e}", path.display()))
        })?;
        Self::from_raw_json(&bytes)
    }

    /// Parse either the raw feed (`[{media_url_https?, text?}]`) or the normalized
    /// `{images, texts}` shape.
    ///
    /// Raw feed entries with a URL become images titled by their text; non-empty texts become
    /// text inputs. Both lists are capped.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_raw_json(bytes: &[u8]) -> WallResult<Self> {
        let doc: serde_json::Value = serde_json::from_slice(bytes)?;
        let media = match doc {
            serde_json::Value::Array(entries) => Self::from_raw_entries(entries)?,
            obj @ serde_json::Value::Object(_) => {
                let mut media: Self = serde_json::from_value(obj)?;
                media.images.truncate(MAX_FEED_IMAGES);
                media.texts.truncate(MAX_FEED_TEXTS);
                media
            }
            _ => {
                return Err(WallError::validation(
                    "media document must be an array of feed entries or an {images, texts} object",
                ));
            }
        };
        tracing::debug!(images = media.images.len(), texts = media.texts.len(), "media parsed");
        Ok(media)
    }

    fn from_raw_entries(entries: Vec<serde_json::Value>) -> WallResult<Self> {
        if let Some(i) = entries.iter().position(|e| !e.is_object()) {
            return Err(WallError::validation(format!("feed entry {i} is not an object")));
        }
        let raw = entries
            .into_iter()
            .map(serde_json::from_value::<RawMediaItem>)
            .collect::<Result<Vec<_>, _>>()?;

        let images = raw
            .iter()
            .filter_map(|item| {
                item.media_url_https.as_ref().map(|url| ImageData {
                    url: url.clone(),
                    title: Some(
                        item.text
                            .clone()
                            .unwrap_or_else(|| DEFAULT_IMAGE_TITLE.to_owned()),
                    ),
                })
            })
            .take(MAX_FEED_IMAGES)
            .collect();
        let texts = raw
            .into_iter()
            .filter_map(|item| item.text.filter(|t| !t.is_empty()))
            .take(MAX_FEED_TEXTS)
            .collect();
        Ok(Self { images, texts })
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.texts.is_empty()
    }
}

/// An image input needs a non-empty URL.
pub fn validate_image_data(image: &ImageData) -> bool {
    !image.url.is_empty()
}

/// A text input needs at least one non-whitespace character.
pub fn validate_text_data(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
#[path = "../../tests/unit/wall/media.rs"]
mod tests;
