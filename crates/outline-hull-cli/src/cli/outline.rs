//! Outline command implementation.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use log::{info, warn};
use serde::Serialize;

use outline_hull::{
    build_outline, compute_concave_hull, extrude_outline, smooth_outline, Outline, OutlineStats, Point,
    WallMesh,
};

use super::common::{load_point_cloud, outline_to_svg, write_output, OutputFormat};
use super::config::{FileConfig, Overrides, RunSettings};

/// Arguments for `outline-hull outline`.
#[derive(Args, Debug, Clone)]
pub struct OutlineArgs {
    /// Input point cloud: a .json or .svg file, or - for JSON on stdin
    pub input: String,

    /// Treat the input as an already ordered ring: skip the hull and only smooth and extrude it
    #[arg(long)]
    pub ordered: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Concavity threshold in -1..1; lower values keep the hull closer to convex [default: 0.5]
    #[arg(short, long, allow_negative_numbers = true)]
    pub concavity: Option<f64>,

    /// Neighbourhood size around each edge, relative to its length [default: 1.0]
    #[arg(short = 'k', long)]
    pub scale_factor: Option<f64>,

    /// Smooth the outline with N Catmull-Rom samples per edge
    #[arg(long, value_name = "N")]
    pub smooth: Option<u32>,

    /// Endpoint matching tolerance when joining edges [default: 0.001]
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Top slice of 3D input to keep, 0..1 [default: 0.05]
    #[arg(long)]
    pub height_threshold: Option<f64>,

    /// Extrude the outline into a wall mesh of this thickness
    #[arg(long, value_name = "THICKNESS", allow_negative_numbers = true)]
    pub extrude: Option<f64>,

    /// Height of the wall's top edge
    #[arg(long, allow_negative_numbers = true)]
    pub top_offset: Option<f64>,

    /// Reverse the wall mesh winding
    #[arg(long)]
    pub flip_faces: bool,

    /// YAML file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl OutlineArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            concavity: self.concavity,
            scale_factor: self.scale_factor,
            smooth: self.smooth,
            tolerance: self.tolerance,
            height_threshold: self.height_threshold,
            thickness: self.extrude,
            top_offset: self.top_offset,
            flip_faces: self.flip_faces,
        }
    }
}

/// A point in JSON output format.
#[derive(Serialize)]
struct JsonPoint {
    x: f64,
    y: f64,
}

/// Outline statistics for JSON output.
#[derive(Serialize)]
struct JsonStats {
    input_points: usize,
    hull_edges: usize,
    outline_points: usize,
    perimeter: f64,
    area: f64,
    elapsed_ms: f64,
}

/// Wall mesh in JSON output format.
#[derive(Serialize)]
struct JsonMesh {
    vertices: Vec<[f64; 3]>,
    triangles: Vec<[u32; 3]>,
}

impl From<WallMesh> for JsonMesh {
    fn from(mesh: WallMesh) -> Self {
        Self {
            vertices: mesh.vertices,
            triangles: mesh.triangles,
        }
    }
}

#[derive(Serialize)]
struct JsonOutput {
    outline: Vec<JsonPoint>,
    closed: bool,
    complete: bool,
    stats: JsonStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<JsonMesh>,
}

/// Execute the outline command.
pub fn cmd_outline(args: &OutlineArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = RunSettings::resolve(&file_config, &args.overrides())?;

    info!("Loading: {}", args.input);
    let cloud = load_point_cloud(&args.input)?;
    let input_points = cloud.len();
    // An ordered ring keeps every vertex; the height filter is for clouds
    let threshold = if args.ordered { 1.0 } else { settings.height_threshold };
    let points = cloud.into_points(threshold);
    info!("Loaded {} points", points.len());

    let start = Instant::now();
    let (mut outline, edge_count) = if args.ordered {
        let outline = Outline::from_ring(&points).with_context(|| format!("cannot use {} as a ring", args.input))?;
        let edges = outline.open_ring().len();
        (outline, edges)
    } else {
        hull_outline(&points, &settings, &args.input)?
    };

    if let Some(segments) = settings.smooth {
        outline.points = smooth_outline(&outline.points, segments);
    }

    let mesh = settings
        .extrusion
        .as_ref()
        .map(|config| extrude_outline(outline.open_ring(), config));

    let elapsed = start.elapsed();
    let stats = OutlineStats::from_outline(edge_count, &outline);
    info!(
        "Outline: {} edges -> {} points in {:?} (perimeter {:.2}, area {:.2})",
        stats.input_edges, stats.points, elapsed, stats.perimeter, stats.area
    );

    let content = match args.format {
        OutputFormat::Json => {
            let output = JsonOutput {
                outline: outline.points.iter().map(|p| JsonPoint { x: p.x, y: p.y }).collect(),
                closed: outline.is_closed(),
                complete: outline.complete,
                stats: JsonStats {
                    input_points,
                    hull_edges: stats.input_edges,
                    outline_points: stats.points,
                    perimeter: stats.perimeter,
                    area: stats.area,
                    elapsed_ms: elapsed.as_secs_f64() * 1000.0,
                },
                mesh: mesh.map(JsonMesh::from),
            };
            let mut json = serde_json::to_string_pretty(&output)?;
            json.push('\n');
            json
        }
        OutputFormat::Svg => {
            if mesh.is_some() {
                warn!("Wall mesh is only included in JSON output");
            }
            outline_to_svg(&outline.points, &points)
        }
    };

    write_output(args.output.as_deref(), &content)
}

/// Run the hull on a cloud and chain its edges. Returns the outline and the
/// number of hull edges.
fn hull_outline(points: &[Point], settings: &RunSettings, input: &str) -> Result<(Outline, usize)> {
    info!(
        "Computing hull (concavity {}, scale factor {})",
        settings.hull.concavity, settings.hull.scale_factor
    );
    let edges = compute_concave_hull(points, &settings.hull).with_context(|| format!("cannot outline {}", input))?;

    let outline = build_outline(&edges, &settings.outline);
    if !outline.complete {
        warn!("{} hull edges could not be joined into the outline", outline.unconsumed);
    }
    Ok((outline, edges.len()))
}
