//! Background computation unit for the delegated engine.
//!
//! The unit owns its own copy of the wrap-around policy and talks to the engine exclusively
//! through two channels; no item state is shared.

use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    thread::JoinHandle,
    time::Duration,
};

use rayon::prelude::*;

use crate::{
    config::scroll::{PositionConfig, SizeConfig},
    foundation::{
        core::{BoardDimensions, Position},
        error::{WallError, WallResult},
    },
    model::item::{ItemContent, ItemId, estimated_width},
    services::position::PositionService,
};

/// Constants the unit needs to replicate wrap-around on its own.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkerConfig {
    /// Spawn/wrap tunables.
    pub position: PositionConfig,
    /// Size tables for width estimation.
    pub sizes: SizeConfig,
}

/// Item snapshot shipped to the unit each frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkerItem {
    /// Item id.
    pub id: ItemId,
    /// Position before the step.
    pub position: Position,
    /// Speed in px/s.
    pub velocity: f64,
    /// Payload, carrying the kind discriminant.
    #[serde(flatten)]
    pub content: ItemContent,
}

/// Position computed by the unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PositionUpdate {
    /// Item id.
    pub id: ItemId,
    /// New position.
    pub position: Position,
}

/// Engine → unit messages.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WorkerRequest {
    /// Board and constants; answered by `InitComplete`.
    Init {
        /// Board bounds.
        board: BoardDimensions,
        /// Wrap-around constants.
        config: WorkerConfig,
    },
    /// Advance a snapshot; answered by `UpdateComplete`.
    #[serde(rename_all = "camelCase")]
    UpdateBatch {
        /// Visible items.
        items: Vec<WorkerItem>,
        /// Clamped frame delta in seconds.
        delta_time: f64,
        /// Items per processing chunk.
        batch_size: usize,
    },
    /// New board bounds; answered by `ResizeComplete`.
    Resize {
        /// Board bounds.
        board: BoardDimensions,
    },
    /// Exit the unit's loop.
    Shutdown,
}

/// Unit → engine messages.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WorkerReply {
    /// The unit is up.
    Ready,
    /// `Init` was applied.
    InitComplete,
    /// Result of an `UpdateBatch`, in request order.
    UpdateComplete {
        /// One entry per requested item.
        positions: Vec<PositionUpdate>,
    },
    /// `Resize` was applied.
    ResizeComplete,
}

/// Message-passing seam between the delegated engine and whatever computes positions.
pub trait ComputeUnit {
    /// Queue a request without waiting.
    fn send(&mut self, request: WorkerRequest) -> WallResult<()>;

    /// Next reply if one is already available.
    fn try_recv(&mut self) -> WallResult<Option<WorkerReply>>;

    /// Wait up to `timeout` for the next reply.
    fn recv_timeout(&mut self, timeout: Duration) -> WallResult<Option<WorkerReply>>;

    /// Stop the unit and release its resources.
    fn terminate(&mut self);
}

/// Creates compute units on demand; returns `Ok(None)` when the runtime cannot host one.
pub trait WorkerSpawner {
    /// Spawn a fresh unit.
    fn spawn(&mut self) -> WallResult<Option<Box<dyn ComputeUnit>>>;
}

/// Options for [`ThreadWorker`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerOptions {
    /// Seed for the unit's wrap-around RNG.
    pub seed: Option<u64>,
    /// Size of the unit's rayon pool; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Spawner producing [`ThreadWorker`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSpawner {
    /// Options passed to every spawned worker.
    pub opts: WorkerOptions,
}

impl WorkerSpawner for ThreadSpawner {
    fn spawn(&mut self) -> WallResult<Option<Box<dyn ComputeUnit>>> {
        Ok(Some(Box::new(ThreadWorker::spawn(self.opts)?)))
    }
}

/// Spawner for runtimes without background execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedSpawner;

impl WorkerSpawner for UnsupportedSpawner {
    fn spawn(&mut self) -> WallResult<Option<Box<dyn ComputeUnit>>> {
        Ok(None)
    }
}

/// Compute unit running on a dedicated OS thread.
#[derive(Debug)]
pub struct ThreadWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerReply>,
    handle: Option<JoinHandle<WallResult<()>>>,
}

impl ThreadWorker {
    /// Start the worker thread. It announces itself with [`WorkerReply::Ready`].
    #[tracing::instrument]
    pub fn spawn(opts: WorkerOptions) -> WallResult<Self> {
        if let Some(0) = opts.threads {
            return Err(WallError::validation("worker 'threads' must be >= 1 when set"));
        }
        let (req_tx, req_rx) = mpsc::channel::<WorkerRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<WorkerReply>();

        let handle = std::thread::Builder::new()
            .name("scrollwall-worker".to_owned())
            .spawn(move || worker_main(opts, req_rx, reply_tx))
            .map_err(|e| WallError::worker(format!("failed to spawn worker thread: {e}")))?;

        Ok(Self {
            tx: req_tx,
            rx: reply_rx,
            handle: Some(handle),
        })
    }
}

impl ComputeUnit for ThreadWorker {
    fn send(&mut self, request: WorkerRequest) -> WallResult<()> {
        self.tx
            .send(request)
            .map_err(|_| WallError::worker("worker is not accepting requests"))
    }

    fn try_recv(&mut self) -> WallResult<Option<WorkerReply>> {
        match self.rx.try_recv() {
            Ok(reply) => Ok(Some(reply)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(WallError::worker("worker channel disconnected unexpectedly"))
            }
        }
    }

    fn recv_timeout(&mut self, timeout: Duration) -> WallResult<Option<WorkerReply>> {
        match self.rx.recv_timeout(timeout) {
            Ok(reply) => Ok(Some(reply)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(WallError::worker("worker channel disconnected unexpectedly"))
            }
        }
    }

    fn terminate(&mut self) {
        let _ = self.tx.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "worker exited with an error"),
                Err(_) => tracing::error!("worker thread panicked"),
            }
        }
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn worker_main(
    opts: WorkerOptions,
    rx: Receiver<WorkerRequest>,
    tx: Sender<WorkerReply>,
) -> WallResult<()> {
    let pool = build_thread_pool(opts.threads)?;
    let mut state = WorkerState::new(opts.seed);
    let reply = |msg: WorkerReply| {
        tx.send(msg)
            .map_err(|_| WallError::worker("engine stopped listening"))
    };

    reply(WorkerReply::Ready)?;
    while let Ok(request) = rx.recv() {
        match request {
            WorkerRequest::Init { board, config } => {
                state.init(board, config);
                reply(WorkerReply::InitComplete)?;
            }
            WorkerRequest::UpdateBatch {
                items,
                delta_time,
                batch_size,
            } => {
                let positions = pool.install(|| state.update_batch(&items, delta_time, batch_size));
                reply(WorkerReply::UpdateComplete { positions })?;
            }
            WorkerRequest::Resize { board } => {
                state.position.update_board_dimensions(board.width, board.height);
                reply(WorkerReply::ResizeComplete)?;
            }
            WorkerRequest::Shutdown => break,
        }
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> WallResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| WallError::worker(format!("failed to build rayon thread pool: {e}")))
}

enum Step {
    Moved(Position),
    Wrap,
}

/// Worker-side replica of the wrap-around policy.
pub(crate) struct WorkerState {
    position: PositionService,
    sizes: SizeConfig,
    seed: Option<u64>,
}

impl WorkerState {
    pub(crate) fn new(seed: Option<u64>) -> Self {
        let config = WorkerConfig::default();
        Self {
            position: Self::position_service(config.position, BoardDimensions::default(), seed),
            sizes: config.sizes,
            seed,
        }
    }

    fn position_service(
        config: PositionConfig,
        board: BoardDimensions,
        seed: Option<u64>,
    ) -> PositionService {
        match seed {
            Some(s) => PositionService::with_seed(config, board, s),
            None => PositionService::new(config, board),
        }
    }

    pub(crate) fn init(&mut self, board: BoardDimensions, config: WorkerConfig) {
        self.position = Self::position_service(config.position, board, self.seed);
        self.sizes = config.sizes;
    }

    /// Step every item; chunks run in parallel, wraps are resolved afterwards in order.
    pub(crate) fn update_batch(
        &mut self,
        items: &[WorkerItem],
        dt: f64,
        batch_size: usize,
    ) -> Vec<PositionUpdate> {
        let sizes = &self.sizes;
        let policy = &self.position;
        let steps: Vec<Step> = items
            .par_chunks(batch_size.max(1))
            .flat_map_iter(|chunk| {
                chunk.iter().map(move |item| {
                    let moved = policy.calculate_next_position(item.position, item.velocity, dt);
                    if policy.should_wrap_around(moved, estimated_width(&item.content, sizes)) {
                        Step::Wrap
                    } else {
                        Step::Moved(moved)
                    }
                })
            })
            .collect();

        items
            .iter()
            .zip(steps)
            .map(|(item, step)| PositionUpdate {
                id: item.id.clone(),
                position: match step {
                    Step::Moved(p) => p,
                    Step::Wrap => self.position.get_wrap_around_position(),
                },
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/worker.rs"]
mod tests;
