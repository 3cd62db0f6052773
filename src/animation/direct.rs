use crate::{
    animation::timing::{AnimationEngine, FrameLoop, PerformanceInfo},
    config::scroll::{ScrollConfig, SizeConfig},
    foundation::{
        core::{BoardDimensions, Position},
        error::WallResult,
        random::{WallRng, random_range, seeded_rng},
    },
    model::item::ItemId,
    services::position::PositionService,
    store::items::ItemStore,
};

/// Main-thread strategy: positions are computed inline and written straight into the store.
#[derive(Debug)]
pub struct DirectEngine {
    frame: FrameLoop,
    position: Option<PositionService>,
    sizes: SizeConfig,
    batch_size: usize,
    fallback_rng: WallRng,
}

impl DirectEngine {
    /// Engine recycling items through `position`, or through a plain fallback when absent.
    pub fn new(config: &ScrollConfig, position: Option<PositionService>) -> Self {
        Self::with_rng(config, position, seeded_rng(None))
    }

    /// Same as [`DirectEngine::new`] with a seeded fallback RNG.
    pub fn with_seed(config: &ScrollConfig, position: Option<PositionService>, seed: u64) -> Self {
        Self::with_rng(config, position, seeded_rng(Some(seed)))
    }

    fn with_rng(config: &ScrollConfig, position: Option<PositionService>, rng: WallRng) -> Self {
        Self {
            frame: FrameLoop::new(&config.animation),
            position,
            sizes: config.sizes.clone(),
            batch_size: config.animation.batch_size.max(1),
            fallback_rng: rng,
        }
    }

    /// Attached position service, if any.
    pub fn position_service(&self) -> Option<&PositionService> {
        self.position.as_ref()
    }

    fn next_position(
        &mut self,
        current: Position,
        velocity: f64,
        width: f64,
        dt: f64,
        board: BoardDimensions,
    ) -> Position {
        let moved = Position::new(current.x - velocity * dt, current.y);
        if let Some(ps) = self.position.as_mut() {
            if ps.should_wrap_around(moved, width) {
                return ps.get_wrap_around_position();
            }
            moved
        } else if moved.x < -width {
            self.fallback_position(board)
        } else {
            moved
        }
    }

    fn fallback_position(&mut self, board: BoardDimensions) -> Position {
        let r = &mut self.fallback_rng;
        let x = board.width + 200.0 + random_range(r, 0.0, 200.0);
        let y = 20.0 + random_range(r, 0.0, 1.0) * (board.height - 170.0).max(0.0);
        Position::new(x, y)
    }
}

impl AnimationEngine for DirectEngine {
    fn start(&mut self, now_ms: f64) {
        if self.frame.start(now_ms) {
            tracing::debug!("direct engine started");
        }
    }

    fn stop(&mut self) {
        if self.frame.stop() {
            tracing::debug!("direct engine stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.frame.is_running()
    }

    fn fps(&self) -> u32 {
        self.frame.fps()
    }

    fn on_frame(&mut self, now_ms: f64, store: &mut ItemStore) -> WallResult<()> {
        let Some(dt) = self.frame.begin_frame(now_ms) else {
            return Ok(());
        };
        if store.is_paused() {
            return Ok(());
        }

        let board = store.board_dimensions();
        let snapshot: Vec<(ItemId, Position, f64, f64)> = store
            .visible_items()
            .into_iter()
            .map(|i| (i.id.clone(), i.position, i.velocity, i.estimated_width(&self.sizes)))
            .collect();

        for batch in snapshot.chunks(self.batch_size) {
            for (id, pos, velocity, width) in batch {
                let next = self.next_position(*pos, *velocity, *width, dt, board);
                store.update_item_position(id, next);
            }
        }
        Ok(())
    }

    fn performance_info(&self, store: &ItemStore) -> PerformanceInfo {
        PerformanceInfo {
            fps: self.fps(),
            is_running: self.is_running(),
            item_count: store.visible_items().len(),
            worker_status: None,
        }
    }

    fn handle_resize(&mut self, board: BoardDimensions) {
        if let Some(ps) = self.position.as_mut() {
            ps.update_board_dimensions(board.width, board.height);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/direct.rs"]
mod tests;
