use std::time::{Duration, Instant};

use crate::{
    animation::{
        timing::{AnimationEngine, FrameLoop, PerformanceInfo, WorkerStatus},
        worker::{
            ComputeUnit, ThreadSpawner, WorkerConfig, WorkerItem, WorkerReply, WorkerRequest,
            WorkerSpawner,
        },
    },
    config::scroll::ScrollConfig,
    foundation::{core::BoardDimensions, error::WallResult},
    services::position::PositionService,
    store::items::ItemStore,
};

/// Off-thread strategy: each frame ships the visible snapshot to a compute unit and applies the
/// returned positions when they arrive.
///
/// At most one update is in flight. Frames that find an update still pending only do the timing
/// bookkeeping; they never block. Replies are applied from [`AnimationEngine::on_frame`], so the
/// store is only ever written from the caller's thread.
pub struct DelegatedEngine {
    frame: FrameLoop,
    position: Option<PositionService>,
    worker_config: WorkerConfig,
    batch_size: usize,
    board: BoardDimensions,
    spawner: Box<dyn WorkerSpawner>,
    worker: Option<Box<dyn ComputeUnit>>,
    status: WorkerStatus,
    pending_update: bool,
    in_flight_epoch: u64,
    // Bumped on every stop; a reply from an earlier run is never applied.
    run_generation: u64,
    in_flight_generation: u64,
}

impl std::fmt::Debug for DelegatedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedEngine")
            .field("running", &self.frame.is_running())
            .field("status", &self.status)
            .field("pending_update", &self.pending_update)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl DelegatedEngine {
    /// Engine backed by a [`ThreadSpawner`].
    pub fn new(
        config: &ScrollConfig,
        board: BoardDimensions,
        position: Option<PositionService>,
    ) -> Self {
        Self::with_spawner(config, board, position, Box::new(ThreadSpawner::default()))
    }

    /// Engine using a custom spawner; the unit is created lazily on the first `start`.
    pub fn with_spawner(
        config: &ScrollConfig,
        board: BoardDimensions,
        position: Option<PositionService>,
        spawner: Box<dyn WorkerSpawner>,
    ) -> Self {
        Self {
            frame: FrameLoop::new(&config.animation),
            position,
            worker_config: WorkerConfig {
                position: config.position.clone(),
                sizes: config.sizes.clone(),
            },
            batch_size: config.animation.batch_size.max(1),
            board,
            spawner,
            worker: None,
            status: WorkerStatus::Initializing,
            pending_update: false,
            in_flight_epoch: 0,
            run_generation: 0,
            in_flight_generation: 0,
        }
    }

    /// Current worker availability.
    pub fn worker_status(&self) -> WorkerStatus {
        self.status
    }

    /// Whether a background unit is available.
    pub fn is_worker_supported(&self) -> bool {
        !matches!(self.status, WorkerStatus::Unsupported)
    }

    /// Whether an update request is awaiting its reply.
    pub fn has_pending_update(&self) -> bool {
        self.pending_update
    }

    /// Attached position service, if any.
    pub fn position_service(&self) -> Option<&PositionService> {
        self.position.as_ref()
    }

    /// Block until the unit is initialized and no update is in flight, applying replies as
    /// they arrive. Returns `false` on timeout or when there is no usable unit.
    pub fn settle(&mut self, store: &mut ItemStore, timeout: Duration) -> WallResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.worker.is_none() || self.status == WorkerStatus::Error {
                return Ok(false);
            }
            if self.status == WorkerStatus::Ready && !self.pending_update {
                return Ok(true);
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return Ok(false);
            }
            let reply = match self.worker.as_mut() {
                Some(w) => w.recv_timeout(left),
                None => return Ok(false),
            };
            match reply {
                Ok(Some(reply)) => self.handle_reply(reply, store),
                Ok(None) => return Ok(false),
                Err(e) => {
                    self.fail(&e.to_string());
                    return Err(e);
                }
            }
        }
    }

    fn init_worker(&mut self) {
        match self.spawner.spawn() {
            Ok(None) => {
                tracing::warn!("background workers not supported");
                self.status = WorkerStatus::Unsupported;
            }
            Ok(Some(mut worker)) => {
                let init = WorkerRequest::Init {
                    board: self.board,
                    config: self.worker_config.clone(),
                };
                match worker.send(init) {
                    Ok(()) => {
                        self.worker = Some(worker);
                        self.status = WorkerStatus::Initializing;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to initialize worker");
                        worker.terminate();
                        self.status = WorkerStatus::Error;
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn worker");
                self.status = WorkerStatus::Error;
            }
        }
    }

    fn fail(&mut self, reason: &str) {
        tracing::error!(reason, "worker failed");
        if let Some(mut w) = self.worker.take() {
            w.terminate();
        }
        self.status = WorkerStatus::Error;
        self.pending_update = false;
    }

    fn drain_replies(&mut self, store: &mut ItemStore) {
        loop {
            let next = match self.worker.as_mut() {
                Some(w) => w.try_recv(),
                None => return,
            };
            match next {
                Ok(Some(reply)) => self.handle_reply(reply, store),
                Ok(None) => return,
                Err(e) => {
                    self.fail(&e.to_string());
                    return;
                }
            }
        }
    }

    fn handle_reply(&mut self, reply: WorkerReply, store: &mut ItemStore) {
        match reply {
            WorkerReply::Ready => tracing::debug!("worker ready"),
            WorkerReply::InitComplete => {
                tracing::debug!("worker initialization complete");
                self.status = WorkerStatus::Ready;
            }
            WorkerReply::UpdateComplete { positions } => {
                self.pending_update = false;
                let stale = !self.frame.is_running()
                    || self.in_flight_generation != self.run_generation
                    || store.is_paused()
                    || store.epoch() != self.in_flight_epoch;
                if stale {
                    tracing::debug!(count = positions.len(), "discarding stale worker update");
                    return;
                }
                for u in positions {
                    store.update_item_position_direct(&u.id, u.position.x, u.position.y);
                }
            }
            WorkerReply::ResizeComplete => tracing::debug!("worker resize complete"),
        }
    }

    fn dispatch(&mut self, dt: f64, store: &ItemStore) {
        if self.pending_update || self.status != WorkerStatus::Ready || store.is_paused() {
            return;
        }
        let items: Vec<WorkerItem> = store
            .visible_items()
            .into_iter()
            .map(|i| WorkerItem {
                id: i.id.clone(),
                position: i.position,
                velocity: i.velocity,
                content: i.content.clone(),
            })
            .collect();
        if items.is_empty() {
            return;
        }
        let request = WorkerRequest::UpdateBatch {
            items,
            delta_time: dt,
            batch_size: self.batch_size,
        };
        let sent = match self.worker.as_mut() {
            Some(w) => w.send(request),
            None => return,
        };
        match sent {
            Ok(()) => {
                self.pending_update = true;
                self.in_flight_epoch = store.epoch();
                self.in_flight_generation = self.run_generation;
            }
            Err(e) => self.fail(&e.to_string()),
        }
    }
}

impl AnimationEngine for DelegatedEngine {
    fn start(&mut self, now_ms: f64) {
        if self.frame.is_running() {
            return;
        }
        if self.worker.is_none() && self.status == WorkerStatus::Initializing {
            self.init_worker();
        }
        self.frame.start(now_ms);
        tracing::debug!(status = ?self.status, "delegated engine started");
    }

    fn stop(&mut self) {
        if self.frame.stop() {
            self.run_generation += 1;
            tracing::debug!("delegated engine stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.frame.is_running()
    }

    fn fps(&self) -> u32 {
        self.frame.fps()
    }

    fn on_frame(&mut self, now_ms: f64, store: &mut ItemStore) -> WallResult<()> {
        self.drain_replies(store);
        let Some(dt) = self.frame.begin_frame(now_ms) else {
            return Ok(());
        };
        self.dispatch(dt, store);
        Ok(())
    }

    fn performance_info(&self, store: &ItemStore) -> PerformanceInfo {
        PerformanceInfo {
            fps: self.fps(),
            is_running: self.is_running(),
            item_count: store.visible_items().len(),
            worker_status: Some(self.status),
        }
    }

    fn handle_resize(&mut self, board: BoardDimensions) {
        self.board = board;
        if let Some(ps) = self.position.as_mut() {
            ps.update_board_dimensions(board.width, board.height);
        }
        // Requests are delivered in order, so a unit still initializing gets the resize after
        // its init.
        let sent = match self.worker.as_mut() {
            Some(w) => w.send(WorkerRequest::Resize { board }),
            None => return,
        };
        if let Err(e) = sent {
            self.fail(&e.to_string());
        }
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(mut w) = self.worker.take() {
            w.terminate();
            self.status = WorkerStatus::Initializing;
        }
        self.pending_update = false;
    }
}

impl Drop for DelegatedEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/delegated.rs"]
mod tests;
