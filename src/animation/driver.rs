use std::sync::Arc;

use crate::{
    animation::{scheduler::FrameScheduler, timing::AnimationEngine},
    foundation::{clock::Clock, error::WallResult},
    store::items::ItemStore,
};

/// Headless "next paint" source: calls an engine's frame callback at a fixed cadence.
///
/// Every frame is also fanned out through the driver's [`FrameScheduler`] so auxiliary
/// subscribers (statistics, diagnostics) share the same loop.
#[derive(Clone)]
pub struct FrameDriver {
    clock: Arc<dyn Clock>,
    frame_interval_ms: f64,
    scheduler: FrameScheduler,
}

impl std::fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("frame_interval_ms", &self.frame_interval_ms)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl FrameDriver {
    /// Driver ticking at `fps` frames per second. Non-positive rates fall back to 60.
    pub fn new(clock: Arc<dyn Clock>, fps: f64, max_delta_secs: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            scheduler: FrameScheduler::new(clock.clone(), max_delta_secs),
            clock,
            frame_interval_ms: 1000.0 / fps,
        }
    }

    /// Current monotonic time of the driver's clock.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Time between frames.
    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Shared loop for auxiliary per-frame subscribers.
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Deliver exactly `frames` frames, waiting one interval before each.
    pub fn run_frames(
        &self,
        engine: &mut dyn AnimationEngine,
        store: &mut ItemStore,
        frames: u64,
    ) -> WallResult<u64> {
        for _ in 0..frames {
            self.clock.wait(self.frame_interval_ms);
            let now = self.clock.now_ms();
            engine.on_frame(now, store)?;
            self.scheduler.tick(now);
        }
        Ok(frames)
    }

    /// Deliver frames until `duration_ms` of clock time has passed. Returns the frame count.
    pub fn run_for(
        &self,
        engine: &mut dyn AnimationEngine,
        store: &mut ItemStore,
        duration_ms: f64,
    ) -> WallResult<u64> {
        let frames = (duration_ms.max(0.0) / self.frame_interval_ms).ceil() as u64;
        self.run_frames(engine, store, frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
