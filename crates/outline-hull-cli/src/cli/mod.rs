//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `outline` - Compute the concave outline of a point cloud
//! - `bench` - Benchmark hull generation on a random cloud

pub mod benchmark;
pub mod common;
pub mod config;
pub mod outline;

pub use benchmark::{cmd_benchmark, BenchArgs};
pub use outline::{cmd_outline, OutlineArgs};
