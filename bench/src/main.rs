use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use scrollwall::{
    AnimationEngine, Clock, DelegatedEngine, DirectEngine, ImageData, ItemManager, ManualClock,
    ScrollConfig, ThreadSpawner, WorkerOptions,
};
use serde_json::json;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
struct BenchArgs {
    counts: Vec<usize>,
    frames: u64,
    warmup: u32,
    repeats: u32,
    strategies: Vec<Strategy>,
    threads: Option<usize>,
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Direct,
    Delegated,
}

impl Strategy {
    fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Delegated => "delegated",
        }
    }
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.counts.is_empty() || args.counts.contains(&0) {
        anyhow::bail!("--counts must list item counts >= 1");
    }
    if args.frames == 0 || args.repeats == 0 {
        anyhow::bail!("--frames and --repeats must be > 0");
    }
    if let Some(n) = args.threads
        && n == 0
    {
        anyhow::bail!("--threads must be >= 1 when set");
    }

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), {frames} frames/run, counts={counts:?}, threads={threads}",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        frames = args.frames,
        counts = args.counts,
        threads = args
            .threads
            .map(|n| n.to_string())
            .unwrap_or_else(|| "auto".to_string()),
    );

    let mut results = Vec::new();
    for &strategy in &args.strategies {
        for &count in &args.counts {
            for i in 0..args.warmup {
                run_once(&args, strategy, count, i)
                    .with_context(|| format!("warmup {} x{count}", strategy.as_str()))?;
            }
            let mut runs = Vec::with_capacity(args.repeats as usize);
            for i in 0..args.repeats {
                runs.push(
                    run_once(&args, strategy, count, i)
                        .with_context(|| format!("run {} x{count}", strategy.as_str()))?,
                );
            }
            runs.sort_by_key(|d| d.as_nanos());
            let fps = |d: Duration| args.frames as f64 / d.as_secs_f64().max(f64::EPSILON);
            let (p50, p90, p99) = (p(&runs, 0.50), p(&runs, 0.90), p(&runs, 0.99));
            eprintln!(
                "  {strategy:9} items={count:4} p50={p50:>10}  p90={p90:>10}  p99={p99:>10}",
                strategy = strategy.as_str(),
                p50 = fmt_ms(p50),
                p90 = fmt_ms(p90),
                p99 = fmt_ms(p99),
            );
            results.push(json!({
                "strategy": strategy.as_str(),
                "items": count,
                "frames": args.frames,
                "p50_ms": p50.as_secs_f64() * 1000.0,
                "p90_ms": p90.as_secs_f64() * 1000.0,
                "p99_ms": p99.as_secs_f64() * 1000.0,
                "frames_per_sec_p50": fps(p50),
            }));
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "results": results }))?
    );
    Ok(())
}

fn run_once(
    args: &BenchArgs,
    strategy: Strategy,
    count: usize,
    run: u32,
) -> anyhow::Result<Duration> {
    let config = ScrollConfig::default();
    let clock = ManualClock::default();
    let seed = args.seed.wrapping_add(u64::from(run));
    let mut manager = ItemManager::new(config.clone(), Arc::new(clock.clone()), Some(seed));
    manager.initialize_services(1220.0, 600.0);

    let images: Vec<ImageData> = (0..count / 2)
        .map(|i| ImageData::new(format!("https://bench.invalid/{i}.jpg")))
        .collect();
    let texts: Vec<String> = (0..count - images.len())
        .map(|i| format!("bench text {i}"))
        .collect();
    manager.add_image_items(&images, 0)?;
    manager.add_text_items(&texts, images.len())?;
    manager.update_item_count(count);

    let position = manager.position_service()?;
    let board = manager.store().board_dimensions();
    let frame_ms = 1000.0 / config.animation.target_fps;

    let elapsed = match strategy {
        Strategy::Direct => {
            let mut engine = DirectEngine::with_seed(&config, Some(position), seed);
            engine.start(clock.now_ms());
            let t0 = Instant::now();
            for _ in 0..args.frames {
                clock.advance(frame_ms);
                engine.on_frame(clock.now_ms(), manager.store_mut())?;
            }
            t0.elapsed()
        }
        Strategy::Delegated => {
            let spawner = ThreadSpawner {
                opts: WorkerOptions {
                    seed: Some(seed),
                    threads: args.threads,
                },
            };
            let mut engine =
                DelegatedEngine::with_spawner(&config, board, Some(position), Box::new(spawner));
            engine.start(clock.now_ms());
            if !engine.settle(manager.store_mut(), SETTLE_TIMEOUT)? {
                anyhow::bail!("worker not ready: {:?}", engine.worker_status());
            }
            let t0 = Instant::now();
            for _ in 0..args.frames {
                clock.advance(frame_ms);
                engine.on_frame(clock.now_ms(), manager.store_mut())?;
                engine.settle(manager.store_mut(), SETTLE_TIMEOUT)?;
            }
            let elapsed = t0.elapsed();
            engine.shutdown();
            elapsed
        }
    };
    Ok(elapsed)
}

fn p(v: &[Duration], p: f64) -> Duration {
    if v.is_empty() {
        return Duration::ZERO;
    }
    let n = v.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    v[rank - 1]
}

fn fmt_ms(d: Duration) -> String {
    format!("{:.3}ms", d.as_secs_f64() * 1000.0)
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        counts: vec![20, 50, 100, 200],
        frames: 600,
        warmup: 1,
        repeats: 20,
        strategies: vec![Strategy::Direct, Strategy::Delegated],
        threads: None,
        seed: 7,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--counts" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --counts"))?;
                out.counts = v
                    .split(',')
                    .map(|s| {
                        s.trim()
                            .parse::<usize>()
                            .with_context(|| format!("parse --counts entry '{s}'"))
                    })
                    .collect::<anyhow::Result<_>>()?;
            }
            "--frames" => out.frames = parse_u64(args.next(), "--frames")?,
            "--warmup" => out.warmup = parse_u64(args.next(), "--warmup")? as u32,
            "--repeats" => out.repeats = parse_u64(args.next(), "--repeats")? as u32,
            "--seed" => out.seed = parse_u64(args.next(), "--seed")?,
            "--threads" => out.threads = Some(parse_u64(args.next(), "--threads")? as usize),
            "--strategy" => {
                let v = args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --strategy (direct|delegated|both)")
                })?;
                out.strategies = match v.as_str() {
                    "direct" => vec![Strategy::Direct],
                    "delegated" => vec![Strategy::Delegated],
                    "both" => vec![Strategy::Direct, Strategy::Delegated],
                    _ => anyhow::bail!("unknown --strategy '{v}' (expected direct|delegated|both)"),
                };
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"scrollwall-bench

Runs the frame engines over walls of increasing size and reports p50/p90/p99 run time
plus frames/sec as JSON on stdout.

Usage:
  cargo run -q --release
  cargo run -q --release -- --counts 20,200 --frames 1200
  cargo run -q --release -- --strategy delegated --threads 2

Args:
  --counts N,N,..  (default 20,50,100,200)
  --frames N       (default 600)
  --warmup N       (default 1)
  --repeats N      (default 20)
  --strategy S     direct|delegated|both (default both)
  --threads N      worker pool size for the delegated engine (default auto)
  --seed N         (default 7)
"#
    );
}

fn parse_u64(v: Option<String>, flag: &str) -> anyhow::Result<u64> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u64>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}
