use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scrollwall::{
    AnimationEngine, BoardDimensions, Clock, DelegatedEngine, DirectEngine, FrameDriver,
    FrameTimer, GenerateOptions, GenerationSummary, ItemManager, ItemStore, ManagerStats,
    ManualClock, MediaData, PauseControl, PerformanceInfo, RenderingStats, ScrollConfig, Size,
    SizeConfig, SnapshotOptions, SystemClock, ThreadSpawner, VirtualScroll, WorkerOptions,
};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);
const STATS_INTERVAL_SECS: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(name = "scrollwall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the wall headless and print performance info and store stats as JSON.
    Simulate(RunArgs),
    /// Run the wall, pause it, and export the frozen frame as a PNG.
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Media JSON: a raw feed array or an `{images, texts}` object.
    #[arg(long)]
    media: PathBuf,

    /// Config JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Frame rate; defaults to the configured target.
    #[arg(long)]
    fps: Option<f64>,

    /// Animation strategy; defaults to the config's `performance.use_worker`.
    #[arg(long, value_enum)]
    engine: Option<EngineChoice>,

    /// Global speed percentage (clamped to 10..=150).
    #[arg(long)]
    speed: Option<f64>,

    /// Number of animated items.
    #[arg(long)]
    count: Option<usize>,

    /// Hide text items.
    #[arg(long)]
    hide_texts: bool,

    /// Seed for every randomized service.
    #[arg(long)]
    seed: Option<u64>,

    /// Viewport width; the board is the viewport minus the configured chrome.
    #[arg(long, default_value_t = 1280.0)]
    viewport_width: f64,

    /// Viewport height.
    #[arg(long, default_value_t = 720.0)]
    viewport_height: f64,

    /// Pace frames in real time instead of advancing a simulated clock.
    #[arg(long)]
    realtime: bool,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output pixels per board pixel.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EngineChoice {
    Direct,
    Delegated,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport {
    frames: u64,
    generation: GenerationSummary,
    performance: PerformanceInfo,
    stats: ManagerStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    rendering: Option<RenderingStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<SnapshotReport>,
}

#[derive(Debug, serde::Serialize)]
struct SnapshotReport {
    path: PathBuf,
    width: u32,
    height: u32,
    frozen: usize,
}

struct Session {
    manager: ItemManager,
    driver: FrameDriver,
    clock: Arc<dyn Clock>,
    generation: GenerationSummary,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrollwall=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let report = match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args)?,
        Command::Snapshot(args) => cmd_snapshot(args)?,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize report")?
    );
    Ok(())
}

fn cmd_simulate(args: RunArgs) -> anyhow::Result<RunReport> {
    let mut session = prepare(&args)?;
    let (performance, rendering, ()) = run(&args, &mut session, |_, _| Ok(()))?;
    Ok(RunReport {
        frames: args.frames,
        generation: session.generation,
        performance,
        stats: session.manager.stats(),
        rendering,
        snapshot: None,
    })
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<RunReport> {
    let mut session = prepare(&args.run)?;
    let opts = SnapshotOptions {
        scale: args.scale,
        ..SnapshotOptions::default()
    };
    let out = args.out.clone();
    let (performance, rendering, snapshot) = run(&args.run, &mut session, |manager, clock| {
        let pause = PauseControl::new(clock);
        let frozen = pause.pause_and_capture(manager.store_mut());
        let sizes = manager.config().sizes.clone();
        let frame = scrollwall::export_png(manager.store(), &sizes, &opts, &out)
            .with_context(|| format!("export snapshot '{}'", out.display()))?;
        Ok(Some(SnapshotReport {
            path: out.clone(),
            width: frame.width,
            height: frame.height,
            frozen,
        }))
    })?;
    Ok(RunReport {
        frames: args.run.frames,
        generation: session.generation,
        performance,
        stats: session.manager.stats(),
        rendering,
        snapshot,
    })
}

fn prepare(args: &RunArgs) -> anyhow::Result<Session> {
    let config = match &args.config {
        Some(path) => ScrollConfig::from_json_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ScrollConfig::default(),
    };
    let media = MediaData::from_json_path(&args.media)
        .with_context(|| format!("load media '{}'", args.media.display()))?;

    let clock: Arc<dyn Clock> = if args.realtime {
        Arc::new(SystemClock::new())
    } else {
        Arc::new(ManualClock::new(SystemClock::new().epoch_millis()))
    };
    let fps = args.fps.unwrap_or(config.animation.target_fps);
    let driver = FrameDriver::new(Arc::clone(&clock), fps, config.animation.max_delta_secs);

    let viewport = Size::new(args.viewport_width, args.viewport_height);
    let board = BoardDimensions::from_viewport(viewport, config.chrome());
    let mut manager = ItemManager::new(config, Arc::clone(&clock), args.seed);
    manager.initialize_services(board.width, board.height);

    let generation = manager
        .generate_from_media(&media, GenerateOptions::default())
        .context("generate items")?;
    if let Some(speed) = args.speed {
        manager.update_global_speed(speed)?;
    }
    if let Some(count) = args.count {
        manager.update_item_count(count);
    }
    if args.hide_texts {
        manager.store_mut().set_show_texts(false);
    }
    tracing::info!(
        items = generation.total_count,
        width = board.width,
        height = board.height,
        "wall prepared"
    );

    Ok(Session {
        manager,
        driver,
        clock,
        generation,
    })
}

/// Render-side statistics switched on by the config's performance flags.
struct RenderWatch {
    virtual_scroll: Option<VirtualScroll>,
    timer: Option<FrameTimer>,
    report: bool,
    sizes: SizeConfig,
}

impl RenderWatch {
    fn new(config: &ScrollConfig, board: BoardDimensions, driver: &FrameDriver) -> Self {
        let flags = config.performance;
        let viewport = Size::new(board.width, board.height);
        Self {
            virtual_scroll: (flags.use_virtual_scroll || flags.debug_mode)
                .then(|| VirtualScroll::new(&config.virtualization, viewport)),
            timer: flags
                .debug_mode
                .then(|| FrameTimer::every(driver.scheduler(), STATS_INTERVAL_SECS)),
            report: flags.use_virtual_scroll,
            sizes: config.sizes.clone(),
        }
    }

    fn after_frame(&mut self, store: &ItemStore) {
        let (Some(vs), Some(timer)) = (self.virtual_scroll.as_mut(), self.timer.as_ref()) else {
            return;
        };
        if timer.take_due() {
            Self::refresh(vs, store, &self.sizes);
            vs.log_stats(store.items());
        }
    }

    fn finish(&mut self, store: &ItemStore) -> Option<RenderingStats> {
        let vs = self.virtual_scroll.as_mut().filter(|_| self.report)?;
        Self::refresh(vs, store, &self.sizes);
        Some(vs.rendering_stats(store.items()))
    }

    fn refresh(vs: &mut VirtualScroll, store: &ItemStore, sizes: &SizeConfig) {
        vs.observe_all(store.items());
        vs.refresh(store.items(), sizes);
    }
}

fn run<T>(
    args: &RunArgs,
    session: &mut Session,
    mut after: impl FnMut(&mut ItemManager, Arc<dyn Clock>) -> anyhow::Result<T>,
) -> anyhow::Result<(PerformanceInfo, Option<RenderingStats>, T)> {
    let position = session.manager.position_service()?;
    let board = session.manager.store().board_dimensions();
    let config = session.manager.config().clone();
    let Session {
        manager,
        driver,
        clock,
        ..
    } = session;

    let choice = args.engine.unwrap_or(if config.performance.use_worker {
        EngineChoice::Delegated
    } else {
        EngineChoice::Direct
    });
    let mut watch = RenderWatch::new(&config, board, driver);

    let mut engine: Box<dyn AnimationEngine> = match choice {
        EngineChoice::Direct => {
            let mut engine = match args.seed {
                Some(seed) => DirectEngine::with_seed(&config, Some(position), seed),
                None => DirectEngine::new(&config, Some(position)),
            };
            engine.start(driver.now_ms());
            for _ in 0..args.frames {
                driver.run_frames(&mut engine, manager.store_mut(), 1)?;
                watch.after_frame(manager.store());
            }
            Box::new(engine)
        }
        EngineChoice::Delegated => {
            let spawner = ThreadSpawner {
                opts: WorkerOptions {
                    seed: args.seed,
                    threads: None,
                },
            };
            let mut engine =
                DelegatedEngine::with_spawner(&config, board, Some(position), Box::new(spawner));
            engine.start(driver.now_ms());
            if !engine.settle(manager.store_mut(), SETTLE_TIMEOUT)? {
                tracing::warn!(status = ?engine.worker_status(), "worker did not become ready");
            }
            // Offline runs wait for each reply so every frame's update lands.
            for _ in 0..args.frames {
                driver.run_frames(&mut engine, manager.store_mut(), 1)?;
                engine.settle(manager.store_mut(), SETTLE_TIMEOUT)?;
                watch.after_frame(manager.store());
            }
            Box::new(engine)
        }
    };

    let extra = after(manager, Arc::clone(clock))?;
    let info = engine.performance_info(manager.store());
    engine.shutdown();
    Ok((info, watch.finish(manager.store()), extra))
}
