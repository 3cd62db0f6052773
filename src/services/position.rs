use crate::{
    config::scroll::PositionConfig,
    foundation::{
        core::{BoardDimensions, Position},
        random::{WallRng, random_range, seeded_rng},
    },
};

/// Offset of the first regularly spaced spawn slot past the right edge.
const LATE_SLOT_START: f64 = 350.0;

/// Number of hand-staggered spawn slots before regular spacing starts.
const STAGGERED_SLOTS: usize = 5;

/// Spawn, advance, and wrap-around policy for items on the board.
#[derive(Clone, Debug)]
pub struct PositionService {
    config: PositionConfig,
    board: BoardDimensions,
    rng: WallRng,
}

impl PositionService {
    /// OS-seeded service for a board.
    pub fn new(config: PositionConfig, board: BoardDimensions) -> Self {
        Self::with_rng(config, board, seeded_rng(None))
    }

    /// Reproducible service for tests and seeded runs.
    pub fn with_seed(config: PositionConfig, board: BoardDimensions, seed: u64) -> Self {
        Self::with_rng(config, board, seeded_rng(Some(seed)))
    }

    fn with_rng(config: PositionConfig, board: BoardDimensions, rng: WallRng) -> Self {
        Self { config, board, rng }
    }

    /// Spawn position for the `index`-th item of a batch.
    ///
    /// The first five slots are staggered from mid-board to just past the right edge so a fresh
    /// wall is populated immediately; later slots follow at `min_spacing` plus random jitter.
    ///
    /// Slot 0 lands at `0.6 * width ± 100`, which stays inside `[0.5, 0.7] * width` only on
    /// boards at least 1000 px wide. Narrower boards keep the fixed ±100 px jitter.
    pub fn generate_offscreen_position(&mut self, index: usize) -> Position {
        let w = self.board.width;
        let r = &mut self.rng;
        let x = match index {
            0 => w * 0.6 + random_range(r, -100.0, 100.0),
            1 => w * 0.8 + random_range(r, -50.0, 50.0),
            2 => w - 50.0 + random_range(r, 0.0, 100.0),
            3 => w + random_range(r, 50.0, 150.0),
            4 => w + random_range(r, 200.0, 300.0),
            _ => {
                let slot = (index - STAGGERED_SLOTS) as f64;
                w + LATE_SLOT_START
                    + slot * self.config.min_spacing
                    + random_range(r, 0.0, self.config.random_spacing)
            }
        };
        Position::new(x, self.random_y())
    }

    /// Spawn positions for indices `0..count`.
    pub fn generate_multiple_offscreen_positions(&mut self, count: usize) -> Vec<Position> {
        (0..count)
            .map(|i| self.generate_offscreen_position(i))
            .collect()
    }

    /// Leftward constant-velocity step; `y` is untouched.
    pub fn calculate_next_position(&self, current: Position, velocity: f64, dt: f64) -> Position {
        Position::new(current.x - velocity * dt, current.y)
    }

    /// True once the item's right edge has left the board's left edge.
    pub fn should_wrap_around(&self, position: Position, item_width: f64) -> bool {
        position.x < -item_width
    }

    /// Fresh position just past the right edge with a new random `y`.
    pub fn get_wrap_around_position(&mut self) -> Position {
        let x = self.board.width
            + self.config.offscreen_offset
            + random_range(&mut self.rng, 0.0, self.config.wrap_around_buffer);
        Position::new(x, self.random_y())
    }

    /// Replace the board bounds; affects later spawns and wraps only.
    pub fn update_board_dimensions(&mut self, width: f64, height: f64) {
        self.board = BoardDimensions::new(width, height);
    }

    /// Current board bounds.
    pub fn board_dimensions(&self) -> BoardDimensions {
        self.board
    }

    /// Whether an item box overlaps the board.
    pub fn is_in_viewport(&self, position: Position, item_width: f64, item_height: f64) -> bool {
        let horizontal = position.x + item_width > 0.0 && position.x < self.board.width;
        let vertical = position.y + item_height > 0.0 && position.y < self.board.height;
        horizontal && vertical
    }

    /// Spawn/wrap tunables.
    pub fn config(&self) -> &PositionConfig {
        &self.config
    }

    // Short boards collapse the band to `min_y` instead of inverting it.
    fn random_y(&mut self) -> f64 {
        let min_y = self.config.min_y;
        let max_y = (self.board.height - self.config.bottom_margin).max(min_y);
        random_range(&mut self.rng, min_y, max_y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/position.rs"]
mod tests;
