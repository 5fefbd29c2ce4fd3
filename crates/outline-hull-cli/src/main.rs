//! outline-hull - concave outlines for point clouds
//!
//! Usage:
//!   outline-hull outline <input> [options]   Compute an outline (JSON or SVG)
//!   outline-hull bench [options]             Benchmark on a random cloud
//!
//! Set RUST_LOG=debug (or trace) for detailed progress on stderr.

mod cli;

use clap::{Parser, Subcommand};

use cli::{cmd_benchmark, cmd_outline, BenchArgs, OutlineArgs};

#[derive(Parser, Debug)]
#[command(name = "outline-hull", version)]
#[command(about = "Concave outlines for 2D and 3D point clouds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the concave outline of a point cloud
    Outline(OutlineArgs),
    /// Benchmark hull generation on a seeded random cloud
    Bench(BenchArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Outline(args) => cmd_outline(args),
        Command::Bench(args) => cmd_benchmark(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
