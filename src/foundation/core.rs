use crate::foundation::error::{WallError, WallResult};

pub use kurbo::{Point, Rect, Size};

/// Free coordinates in board pixel space.
///
/// `x` decreases over time (leftward scroll); `y` is fixed per item after spawn.
pub type Position = Point;

/// Bounded visual area items move within, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoardDimensions {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl BoardDimensions {
    /// Create board dimensions without validation.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Create validated board dimensions (finite, non-negative).
    pub fn checked(width: f64, height: f64) -> WallResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(WallError::validation(
                "board width/height must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Derive the board from a host viewport by subtracting the surrounding chrome.
    ///
    /// Never returns negative extents.
    pub fn from_viewport(viewport: Size, chrome: Size) -> Self {
        Self {
            width: (viewport.width - chrome.width).max(0.0),
            height: (viewport.height - chrome.height).max(0.0),
        }
    }

    /// Board as a rect anchored at the origin.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
