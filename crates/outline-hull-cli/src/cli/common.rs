//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use serde::Deserialize;

use outline_hull::{collect_points_from_svg, filter_top_points, Point, Point3};

/// Output format for the generated outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Svg,
}

/// One entry of a JSON point list.
///
/// Accepts `[x, y]`, `[x, y, z]`, `{"x": .., "y": ..}` and
/// `{"x": .., "y": .., "z": ..}`. Three coordinates mean a y-up vertex.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum JsonPoint {
    Coords(Vec<f64>),
    Object {
        x: f64,
        y: f64,
        #[serde(default)]
        z: Option<f64>,
    },
}

/// Top-level JSON input: a bare array or `{"points": [...]}`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum JsonInput {
    Bare(Vec<JsonPoint>),
    Wrapped { points: Vec<JsonPoint> },
}

/// A parsed point cloud, before any height filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum PointCloud {
    Flat(Vec<Point>),
    Solid(Vec<Point3>),
}

impl PointCloud {
    pub fn len(&self) -> usize {
        match self {
            PointCloud::Flat(points) => points.len(),
            PointCloud::Solid(points) => points.len(),
        }
    }

    /// Reduce to 2D points; 3D clouds keep their top slice only.
    pub fn into_points(self, height_threshold: f64) -> Vec<Point> {
        match self {
            PointCloud::Flat(points) => points,
            PointCloud::Solid(points) => {
                let flat = filter_top_points(&points, height_threshold);
                info!(
                    "Kept {} of {} vertices within the top {:.1}%",
                    flat.len(),
                    points.len(),
                    height_threshold * 100.0
                );
                flat
            }
        }
    }
}

/// Parse a JSON point list.
pub fn parse_json_points(content: &str) -> Result<PointCloud> {
    let input: JsonInput = serde_json::from_str(content).context("invalid JSON point list")?;
    let entries = match input {
        JsonInput::Bare(points) => points,
        JsonInput::Wrapped { points } => points,
    };

    let mut flat = Vec::new();
    let mut solid = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        match entry {
            JsonPoint::Coords(c) if c.len() == 2 => flat.push(Point::new(c[0], c[1])),
            JsonPoint::Coords(c) if c.len() == 3 => solid.push(Point3::new(c[0], c[1], c[2])),
            JsonPoint::Coords(c) => bail!("point {} has {} coordinates, expected 2 or 3", i, c.len()),
            JsonPoint::Object { x, y, z: None } => flat.push(Point::new(x, y)),
            JsonPoint::Object { x, y, z: Some(z) } => solid.push(Point3::new(x, y, z)),
        }
    }

    match (flat.is_empty(), solid.is_empty()) {
        (_, true) => Ok(PointCloud::Flat(flat)),
        (true, false) => Ok(PointCloud::Solid(solid)),
        (false, false) => bail!("point list mixes 2D and 3D points"),
    }
}

/// Load a point cloud from a `.json` file, an `.svg` file or `-` (JSON on stdin).
pub fn load_point_cloud(input: &str) -> Result<PointCloud> {
    if input == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).context("failed to read stdin")?;
        debug!("Read {} bytes from stdin", content.len());
        return parse_json_points(&content);
    }

    let path = Path::new(input);
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", input))?;

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let points = collect_points_from_svg(&content).with_context(|| format!("failed to load {}", input))?;
        Ok(PointCloud::Flat(points))
    } else {
        parse_json_points(&content).with_context(|| format!("failed to load {}", input))
    }
}

/// Write to a file, or stdout when no path (or `-`) is given.
pub fn write_output(output_path: Option<&Path>, content: &str) -> Result<()> {
    match output_path.filter(|path| path.as_os_str() != "-") {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Render an outline and its source points to SVG.
///
/// The outline is one polyline; the input cloud is drawn as small dots
/// underneath it. The viewBox is fitted to the input with a margin.
pub fn outline_to_svg(outline: &[Point], cloud: &[Point]) -> String {
    let (min_x, min_y, max_x, max_y) = bounds(cloud.iter().chain(outline.iter()));
    let size = (max_x - min_x).max(max_y - min_y).max(1.0);
    let margin = size * 0.05;
    let dot = size * 0.004;
    let stroke = size * 0.002;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.2} {:.2} {:.2} {:.2}">
"#,
        min_x - margin,
        min_y - margin,
        max_x - min_x + margin * 2.0,
        max_y - min_y + margin * 2.0
    ));

    svg.push_str("<g id=\"points\" fill=\"gray\">\n");
    for p in cloud {
        svg.push_str(&format!("  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.3}\"/>\n", p.x, p.y, dot));
    }
    svg.push_str("</g>\n");

    if outline.len() >= 2 {
        // Build points string: "x1,y1 x2,y2 x3,y3 ..."
        let points: String = outline
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");

        svg.push_str(&format!(
            "<g id=\"outline\" stroke=\"black\" stroke-width=\"{:.3}\" fill=\"none\">\n  <polyline points=\"{}\"/>\n</g>\n",
            stroke, points
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn bounds<'a>(points: impl Iterator<Item = &'a Point>) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    if min_x > max_x {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (min_x, min_y, max_x, max_y)
    }
}
