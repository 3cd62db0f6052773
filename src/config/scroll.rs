use std::path::Path;

use crate::{
    foundation::error::{WallError, WallResult},
    store::items::{MAX_GLOBAL_VELOCITY, MIN_GLOBAL_VELOCITY},
};

/// Inclusive numeric range used for jitter and font-size tables.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Span {
    /// Create a span.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `v` into the span.
    pub fn clamp(self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }

    /// Whether `v` lies within the span (both ends inclusive).
    pub fn contains(self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    fn check(self, what: &str) -> WallResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 || self.min > self.max
        {
            return Err(WallError::validation(format!(
                "{what} must be a finite, non-negative, ordered range (got {}..{})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Velocity tunables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    /// Base speed in px/s.
    pub default: f64,
    /// Global speed percentage bounds.
    pub percent: Span,
    /// Per-item jitter factor for images.
    pub image_jitter: Span,
    /// Per-item jitter factor for text.
    pub text_jitter: Span,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            default: 150.0,
            percent: Span::new(10.0, 150.0),
            image_jitter: Span::new(0.4, 1.6),
            text_jitter: Span::new(0.3, 1.3),
        }
    }
}

/// Spawn and wrap-around tunables, in px.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Distance past the right edge at which recycled items reappear.
    pub offscreen_offset: f64,
    /// Fixed spacing between spawn slots after the staggered ones.
    pub min_spacing: f64,
    /// Random extra spacing added to each late spawn slot.
    pub random_spacing: f64,
    /// Random extra distance added on wrap-around.
    pub wrap_around_buffer: f64,
    /// Smallest spawn Y.
    pub min_y: f64,
    /// Reserved band at the bottom of the board.
    pub bottom_margin: f64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            offscreen_offset: 50.0,
            min_spacing: 150.0,
            random_spacing: 100.0,
            wrap_around_buffer: 100.0,
            min_y: 20.0,
            bottom_margin: 150.0,
        }
    }
}

/// Frame loop tunables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Cadence used by the headless frame driver.
    pub target_fps: f64,
    /// Items per processing batch.
    pub batch_size: usize,
    /// Upper clamp for a single frame's delta, in seconds.
    pub max_delta_secs: f64,
    /// Lower clamp for a single frame's delta, in seconds.
    pub min_delta_secs: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            batch_size: 10,
            max_delta_secs: 0.1,
            min_delta_secs: 0.0,
        }
    }
}

/// Square image edge per display size, in px.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageSizeTable {
    /// `small` edge.
    pub small: f64,
    /// `medium` edge.
    pub medium: f64,
    /// `large` edge.
    pub large: f64,
    /// `xlarge` edge.
    pub xlarge: f64,
}

impl Default for ImageSizeTable {
    fn default() -> Self {
        Self {
            small: 100.0,
            medium: 120.0,
            large: 150.0,
            xlarge: 180.0,
        }
    }
}

/// Item size tables used by factories, wrap checks, and virtualization.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    /// Image edge per size.
    pub image: ImageSizeTable,
    /// Text font size range, in em.
    pub text_font_size: Span,
    /// Estimated px per character per em.
    pub text_width_factor: f64,
    /// Cap on estimated text width, in px.
    pub text_max_width: f64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            image: ImageSizeTable::default(),
            text_font_size: Span::new(1.2, 2.0),
            text_width_factor: 12.0,
            text_max_width: 300.0,
        }
    }
}

/// Render-side virtualization tunables, in px.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VirtualizationConfig {
    /// Horizontal slack around the viewport for the point check.
    pub buffer_zone: f64,
    /// Margin grown around the viewport for the intersection check.
    pub root_margin: f64,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            buffer_zone: 200.0,
            root_margin: 100.0,
        }
    }
}

/// All wall tunables.
///
/// Every field has a default, so a JSON file only needs the values it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Velocity tunables.
    pub velocity: VelocityConfig,
    /// Position tunables.
    pub position: PositionConfig,
    /// Frame loop tunables.
    pub animation: AnimationConfig,
    /// Size tables.
    pub sizes: SizeConfig,
    /// Text color table. Must not be empty.
    pub colors: Vec<crate::model::item::TextColor>,
    /// Virtualization tunables.
    pub virtualization: VirtualizationConfig,
    /// Engine strategy and diagnostics switches.
    pub performance: PerformanceFlags,
    /// Horizontal and vertical chrome subtracted from the viewport to get the board.
    pub chrome_width: f64,
    /// See [`ScrollConfig::chrome_width`].
    pub chrome_height: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            velocity: VelocityConfig::default(),
            position: PositionConfig::default(),
            animation: AnimationConfig::default(),
            sizes: SizeConfig::default(),
            colors: crate::model::item::TextColor::ALL.to_vec(),
            virtualization: VirtualizationConfig::default(),
            performance: PerformanceFlags::default(),
            chrome_width: 60.0,
            chrome_height: 120.0,
        }
    }
}

impl ScrollConfig {
    /// Load a config from a JSON file, defaulting any missing field, then validate it.
    pub fn from_json_path(path: &Path) -> WallResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            WallError::Other(anyhow::anyhow!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Parse and validate a config from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> WallResult<Self> {
        let cfg: Self = serde_json::from_slice(bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> WallResult<()> {
        let finite_non_neg = |v: f64, what: &str| -> WallResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(WallError::validation(format!(
                    "{what} must be finite and >= 0 (got {v})"
                )));
            }
            Ok(())
        };

        finite_non_neg(self.velocity.default, "velocity.default")?;
        self.velocity.percent.check("velocity.percent")?;
        let store_span = Span::new(MIN_GLOBAL_VELOCITY, MAX_GLOBAL_VELOCITY);
        if !store_span.contains(self.velocity.percent.min)
            || !store_span.contains(self.velocity.percent.max)
        {
            return Err(WallError::validation(format!(
                "velocity.percent must lie within {MIN_GLOBAL_VELOCITY}..={MAX_GLOBAL_VELOCITY} \
                 (got {}..{})",
                self.velocity.percent.min, self.velocity.percent.max
            )));
        }
        self.velocity.image_jitter.check("velocity.image_jitter")?;
        self.velocity.text_jitter.check("velocity.text_jitter")?;

        let p = &self.position;
        for (v, what) in [
            (p.offscreen_offset, "position.offscreen_offset"),
            (p.min_spacing, "position.min_spacing"),
            (p.random_spacing, "position.random_spacing"),
            (p.wrap_around_buffer, "position.wrap_around_buffer"),
            (p.min_y, "position.min_y"),
            (p.bottom_margin, "position.bottom_margin"),
        ] {
            finite_non_neg(v, what)?;
        }

        let a = &self.animation;
        if a.batch_size == 0 {
            return Err(WallError::validation("animation.batch_size must be >= 1"));
        }
        if !a.target_fps.is_finite() || a.target_fps <= 0.0 {
            return Err(WallError::validation("animation.target_fps must be > 0"));
        }
        Span::new(a.min_delta_secs, a.max_delta_secs).check("animation delta clamp")?;

        let s = &self.sizes;
        for (v, what) in [
            (s.image.small, "sizes.image.small"),
            (s.image.medium, "sizes.image.medium"),
            (s.image.large, "sizes.image.large"),
            (s.image.xlarge, "sizes.image.xlarge"),
            (s.text_width_factor, "sizes.text_width_factor"),
            (s.text_max_width, "sizes.text_max_width"),
        ] {
            finite_non_neg(v, what)?;
        }
        s.text_font_size.check("sizes.text_font_size")?;

        if self.colors.is_empty() {
            return Err(WallError::validation("colors must not be empty"));
        }

        finite_non_neg(self.virtualization.buffer_zone, "virtualization.buffer_zone")?;
        finite_non_neg(self.virtualization.root_margin, "virtualization.root_margin")?;
        finite_non_neg(self.chrome_width, "chrome_width")?;
        finite_non_neg(self.chrome_height, "chrome_height")?;
        Ok(())
    }

    /// Viewport chrome as a size.
    pub fn chrome(&self) -> crate::foundation::core::Size {
        crate::foundation::core::Size::new(self.chrome_width, self.chrome_height)
    }
}

/// Feature switches selecting the engine strategy and diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PerformanceFlags {
    /// Use the delegated (background worker) engine.
    pub use_worker: bool,
    /// Restrict rendering to the virtualized item set.
    pub use_virtual_scroll: bool,
    /// Emit periodic statistics at `debug`.
    pub debug_mode: bool,
}

#[cfg(test)]
#[path = "../../tests/unit/config/scroll.rs"]
mod tests;
