//! Scrollwall is a frame-driven engine for a continuously scrolling wall of images and text.
//!
//! Items drift leftward at per-item speeds, wrap back to the right edge after leaving the
//! board, and can be paused with a frame-accurate freeze cache for crisp snapshots.
//!
//! # Architecture
//!
//! 1. **Create**: [`ScrollItemFactory`] composes ids, spawn positions ([`PositionService`]),
//!    velocities ([`VelocityService`]) and payloads ([`ContentFactory`]).
//! 2. **Store**: [`ItemStore`] is the single source of truth, with an id index that always
//!    mirrors the list and a pause subsystem ([`PauseControl`]).
//! 3. **Animate**: an [`AnimationEngine`] advances the store's visible items each frame, either
//!    inline ([`DirectEngine`]) or through a background worker thread ([`DelegatedEngine`]).
//! 4. **Present**: [`VirtualScroll`] filters what a renderer should draw, and
//!    [`export_png`] paints the current frame to a PNG.
//!
//! Time comes from a [`Clock`]: [`SystemClock`] in real runs, [`ManualClock`] in tests and
//! offline simulation. [`FrameDriver`] plays the role of the host's "next paint" callback.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Self-healing controls**: unknown ids are no-ops and out-of-range numbers are clamped.
//! - **Reproducible**: every randomized service can be built from a seed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod config;
mod export;
mod factory;
mod foundation;
mod model;
mod services;
mod store;
mod virtualization;
mod wall;

pub use animation::delegated::DelegatedEngine;
pub use animation::direct::DirectEngine;
pub use animation::driver::FrameDriver;
pub use animation::scheduler::{FrameScheduler, FrameTimer, SchedulerStatus, Subscription};
pub use animation::timing::{
    AnimationEngine, FpsCounter, FrameLoop, PerformanceInfo, WorkerStatus,
};
pub use animation::worker::{
    ComputeUnit, PositionUpdate, ThreadSpawner, ThreadWorker, UnsupportedSpawner, WorkerConfig,
    WorkerItem, WorkerOptions, WorkerReply, WorkerRequest, WorkerSpawner,
};
pub use config::scroll::{
    AnimationConfig, ImageSizeTable, PerformanceFlags, PositionConfig, ScrollConfig, SizeConfig,
    Span, VelocityConfig, VirtualizationConfig,
};
pub use export::paint::{
    FrameImage, MAX_FRAME_EDGE, SnapshotOptions, chalk_rgba, paint_frame, painted_x,
};
pub use export::snapshot::{encode_png, export_png};
pub use factory::content::{
    ContentFactory, DEFAULT_IMAGE_TITLE, ELLIPSIS, ImageData, MAX_TEXT_CHARS, truncate_text,
};
pub use factory::item::{ItemSeed, ScrollItemFactory};
pub use foundation::clock::{Clock, ManualClock, SystemClock};
pub use foundation::core::{BoardDimensions, Point, Position, Rect, Size};
pub use foundation::error::{WallError, WallResult};
pub use foundation::random::{
    WallRng, random_bool, random_choice, random_int, random_range, seeded_rng, shuffle,
};
pub use model::item::{
    ImageContent, ImageSize, ItemContent, ItemId, ItemKind, ROOT_FONT_PX, ScrollItem,
    TextColor, TextContent, estimated_size, estimated_width,
};
pub use services::position::PositionService;
pub use services::velocity::VelocityService;
pub use store::items::{
    ItemPatch, ItemStore, ItemsCount, MAX_GLOBAL_VELOCITY, MIN_GLOBAL_VELOCITY,
};
pub use store::pause::{PauseControl, PauseState, SavedPosition};
pub use virtualization::virtual_scroll::{
    IntersectionChange, IntersectionTracker, RenderingStats, VirtualScroll,
};
pub use wall::manager::{GenerateOptions, GenerationSummary, ItemManager, ManagerStats};
pub use wall::media::{
    MAX_FEED_IMAGES, MAX_FEED_TEXTS, MediaData, validate_image_data, validate_text_data,
};
