//! Benchmark command implementation.

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::Args;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use outline_hull::{build_outline, compute_concave_hull, HullConfig, OutlineConfig, Point};

/// Arguments for `outline-hull bench`.
#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Number of random points
    #[arg(short = 'n', long, default_value_t = 2000)]
    pub points: usize,

    /// Seed for the random cloud
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Concavity threshold
    #[arg(short, long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub concavity: f64,

    /// Neighbourhood scale factor
    #[arg(short = 'k', long, default_value_t = 1.0)]
    pub scale_factor: f64,

    /// Number of timed runs
    #[arg(short, long, default_value_t = 3)]
    pub runs: u32,
}

/// Random points filling a U shape, so there is a notch to carve out.
pub fn u_shaped_cloud(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);

    while points.len() < count {
        let x: f64 = rng.random_range(0.0..100.0);
        let y: f64 = rng.random_range(0.0..100.0);
        // Cut the opening of the U
        if (30.0..70.0).contains(&x) && y > 40.0 {
            continue;
        }
        points.push(Point::new(x, y));
    }

    points
}

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &BenchArgs) -> Result<()> {
    ensure!(args.points >= 3, "need at least 3 points, got {}", args.points);
    ensure!(args.runs >= 1, "need at least 1 run");
    ensure!(args.scale_factor > 0.0, "scale factor must be positive");

    let config = HullConfig::default()
        .with_concavity(args.concavity)
        .with_scale_factor(args.scale_factor);

    info!("Generating {} points (seed {})", args.points, args.seed);
    let points = u_shaped_cloud(args.points, args.seed);

    let mut timings: Vec<Duration> = Vec::with_capacity(args.runs as usize);
    let mut edges = Vec::new();
    for run in 0..args.runs {
        let start = Instant::now();
        edges = compute_concave_hull(&points, &config)?;
        let elapsed = start.elapsed();
        info!("Run {}: {} edges in {:?}", run + 1, edges.len(), elapsed);
        timings.push(elapsed);
    }

    let outline = build_outline(&edges, &OutlineConfig::default());

    let total: Duration = timings.iter().sum();
    let best = timings.iter().min().copied().unwrap_or_default();
    let mean = total / args.runs;

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  BENCHMARK: CONCAVE HULL");
    println!("═══════════════════════════════════════════════");
    println!("  Points: {}", points.len());
    println!("  Concavity: {}", args.concavity);
    println!("  Scale factor: {}", args.scale_factor);
    println!("  Hull edges: {}", edges.len());
    println!("  Outline closed: {}", outline.is_closed());
    println!("  Runs: {}", args.runs);
    println!("  Time (mean): {:?}", mean);
    println!("  Time (best): {:?}", best);
    println!("  Time (ms): {:.2}", mean.as_secs_f64() * 1000.0);
    println!("═══════════════════════════════════════════════");

    Ok(())
}
