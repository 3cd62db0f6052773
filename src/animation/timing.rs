use crate::{
    config::scroll::AnimationConfig,
    foundation::{core::BoardDimensions, error::WallResult},
    store::items::ItemStore,
};

/// Rolling frames-per-second estimate, recomputed about once per second.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start_ms: f64,
    fps: u32,
}

impl FpsCounter {
    /// Start a new measuring window at `now_ms`. The last estimate is kept.
    pub fn reset(&mut self, now_ms: f64) {
        self.frames = 0;
        self.window_start_ms = now_ms;
    }

    /// Count one frame; publish a new estimate once a full second has elapsed.
    pub fn record(&mut self, now_ms: f64) {
        self.frames += 1;
        let elapsed = now_ms - self.window_start_ms;
        if elapsed >= 1000.0 {
            self.fps = (f64::from(self.frames) * 1000.0 / elapsed).round() as u32;
            self.reset(now_ms);
        }
    }

    /// Last published estimate.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Start/stop state, frame-request bookkeeping, and delta clamping shared by both strategies.
#[derive(Clone, Debug)]
pub struct FrameLoop {
    running: bool,
    pending_frame: Option<u64>,
    next_request: u64,
    last_time_ms: f64,
    min_delta_secs: f64,
    max_delta_secs: f64,
    fps: FpsCounter,
}

impl FrameLoop {
    /// Stopped loop using the configured delta clamp.
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            running: false,
            pending_frame: None,
            next_request: 0,
            last_time_ms: 0.0,
            min_delta_secs: config.min_delta_secs,
            max_delta_secs: config.max_delta_secs,
            fps: FpsCounter::default(),
        }
    }

    /// Enter `Running` and request the first frame. Returns `false` if already running.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.last_time_ms = now_ms;
        self.fps.reset(now_ms);
        self.request_frame();
        true
    }

    /// Enter `Stopped` and cancel the pending frame. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.pending_frame = None;
        true
    }

    /// Whether the loop is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Id of the outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<u64> {
        self.pending_frame
    }

    /// Last published FPS estimate.
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Consume the pending frame request and return the clamped delta in seconds.
    ///
    /// Returns `None` when no frame is pending (stopped, or cancelled by `stop`). A new request
    /// is issued before returning so the loop keeps ticking.
    pub fn begin_frame(&mut self, now_ms: f64) -> Option<f64> {
        self.pending_frame.take()?;
        let raw = (now_ms - self.last_time_ms) / 1000.0;
        let delta = raw.min(self.max_delta_secs).max(self.min_delta_secs);
        self.last_time_ms = now_ms;
        self.fps.record(now_ms);
        self.request_frame();
        Some(delta)
    }

    fn request_frame(&mut self) {
        self.next_request += 1;
        self.pending_frame = Some(self.next_request);
    }
}

/// Availability of the background computation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    /// Not yet spawned, or waiting for its init acknowledgement.
    Initializing,
    /// Accepting work.
    Ready,
    /// The runtime cannot host a worker.
    Unsupported,
    /// Spawn or transport failed.
    Error,
}

/// Snapshot returned by [`AnimationEngine::performance_info`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInfo {
    /// Last FPS estimate.
    pub fps: u32,
    /// Whether the engine is running.
    pub is_running: bool,
    /// Number of animated (visible) items.
    pub item_count: usize,
    /// Worker availability; only reported by the delegated strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_status: Option<WorkerStatus>,
}

/// Common contract of the direct and delegated frame engines.
///
/// The host calls [`AnimationEngine::on_frame`] once per paint; after `stop` the call is inert
/// until the next `start`.
pub trait AnimationEngine {
    /// Stopped → Running. Idempotent.
    fn start(&mut self, now_ms: f64);

    /// Running → Stopped, cancelling the pending frame. Idempotent.
    fn stop(&mut self);

    /// Flip between running and stopped.
    fn toggle(&mut self, now_ms: f64) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now_ms);
        }
    }

    /// Whether the engine is running.
    fn is_running(&self) -> bool;

    /// Last FPS estimate.
    fn fps(&self) -> u32;

    /// Frame callback: advance or delegate the visible items.
    fn on_frame(&mut self, now_ms: f64, store: &mut ItemStore) -> WallResult<()>;

    /// Runtime diagnostics.
    fn performance_info(&self, store: &ItemStore) -> PerformanceInfo;

    /// Propagate new board bounds to the engine's services.
    fn handle_resize(&mut self, board: BoardDimensions);

    /// Release background resources. The engine is stopped afterwards.
    fn shutdown(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
