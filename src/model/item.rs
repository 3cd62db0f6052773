use crate::{
    config::scroll::SizeConfig,
    foundation::core::{Position, Size},
};

/// Stable identifier of a scroll item (`img-…` / `txt-…`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Borrow the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Item category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Image tile.
    Image,
    /// Chalk text snippet.
    Text,
}

impl ItemKind {
    /// Lowercase name, also used as the serialized discriminant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    /// Id prefix used by the item factory.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Image => "img",
            Self::Text => "txt",
        }
    }
}

/// Display size class of an image tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// 100 px by default.
    Small,
    /// 120 px by default.
    Medium,
    /// 150 px by default.
    Large,
    /// 180 px by default.
    Xlarge,
}

impl ImageSize {
    /// Every size class, smallest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::Xlarge];

    /// Square edge for this class from the size table.
    pub fn edge(self, sizes: &SizeConfig) -> f64 {
        match self {
            Self::Small => sizes.image.small,
            Self::Medium => sizes.image.medium,
            Self::Large => sizes.image.large,
            Self::Xlarge => sizes.image.xlarge,
        }
    }
}

/// Chalk color of a text snippet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    /// Yellow chalk.
    Yellow,
    /// Pink chalk.
    Pink,
    /// Blue chalk.
    Blue,
    /// Green chalk.
    Green,
    /// White chalk.
    White,
}

impl TextColor {
    /// Every color.
    pub const ALL: [Self; 5] = [
        Self::Yellow,
        Self::Pink,
        Self::Blue,
        Self::Green,
        Self::White,
    ];
}

/// Image payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageContent {
    /// Source URL.
    pub url: String,
    /// Alt text.
    pub title: String,
    /// Display size class.
    pub size: ImageSize,
}

/// Text payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// Display text, at most 30 characters plus an ellipsis.
    pub text: String,
    /// Chalk color.
    pub color: TextColor,
    /// Font size in em.
    pub font_size: f64,
}

/// Kind-specific payload; the variant is the item's discriminant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ItemContent {
    /// Image tile.
    Image(ImageContent),
    /// Text snippet.
    Text(TextContent),
}

impl ItemContent {
    /// Discriminant of this payload.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Image(_) => ItemKind::Image,
            Self::Text(_) => ItemKind::Text,
        }
    }
}

/// One image or text entity animated across the board.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollItem {
    /// Unique, immutable id.
    pub id: ItemId,
    /// Current position; only `x` moves between wraps.
    pub position: Position,
    /// Speed in px/s, never negative.
    pub velocity: f64,
    /// Paint order.
    pub z_index: i32,
    /// Cosmetic rotation in degrees.
    pub rotation: f64,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub content: ItemContent,
}

impl ScrollItem {
    /// Item category.
    pub fn kind(&self) -> ItemKind {
        self.content.kind()
    }

    /// Whether this is an image item.
    pub fn is_image(&self) -> bool {
        matches!(self.content, ItemContent::Image(_))
    }

    /// Whether this is a text item.
    pub fn is_text(&self) -> bool {
        matches!(self.content, ItemContent::Text(_))
    }

    /// Width used for wrap-around decisions.
    pub fn estimated_width(&self, sizes: &SizeConfig) -> f64 {
        estimated_width(&self.content, sizes)
    }

    /// Width and height used for virtualization and snapshots.
    pub fn estimated_size(&self, sizes: &SizeConfig) -> Size {
        estimated_size(&self.content, sizes)
    }
}

/// Root font size the em-based text sizes resolve against, in px.
pub const ROOT_FONT_PX: f64 = 16.0;

/// Text line height as a multiple of the font size.
const TEXT_LINE_HEIGHT: f64 = 1.5;

/// Estimated width of a payload.
///
/// Images use the size table; text uses `chars × font_size × factor`, capped.
pub fn estimated_width(content: &ItemContent, sizes: &SizeConfig) -> f64 {
    match content {
        ItemContent::Image(img) => img.size.edge(sizes),
        ItemContent::Text(t) => {
            let chars = t.text.chars().count() as f64;
            (chars * t.font_size * sizes.text_width_factor).min(sizes.text_max_width)
        }
    }
}

/// Estimated bounding size of a payload.
pub fn estimated_size(content: &ItemContent, sizes: &SizeConfig) -> Size {
    match content {
        ItemContent::Image(img) => {
            let edge = img.size.edge(sizes);
            Size::new(edge, edge)
        }
        ItemContent::Text(t) => Size::new(
            estimated_width(content, sizes),
            t.font_size * ROOT_FONT_PX * TEXT_LINE_HEIGHT,
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/item.rs"]
mod tests;
