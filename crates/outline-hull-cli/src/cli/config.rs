//! YAML run configuration.
//!
//! A config file holds the same knobs as the command line. Every field is
//! optional; flags given on the command line win over the file, the file
//! wins over built-in defaults.
//!
//! ```yaml
//! concavity: 0.7
//! scale_factor: 1.5
//! smooth: 4
//! height_threshold: 0.05
//! extrusion:
//!   thickness: 2.0
//!   flip_faces: true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use outline_hull::{ExtrusionConfig, HullConfig, OutlineConfig};

/// Default top slice kept from 3D vertex input.
pub const DEFAULT_HEIGHT_THRESHOLD: f64 = 0.05;

/// Contents of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub concavity: Option<f64>,
    pub scale_factor: Option<f64>,
    /// Catmull-Rom samples per outline edge
    pub smooth: Option<u32>,
    /// Endpoint matching tolerance for outline reconstruction
    pub tolerance: Option<f64>,
    /// Top slice of 3D input to keep (0 = top only, 1 = everything)
    pub height_threshold: Option<f64>,
    pub extrusion: Option<ExtrusionSection>,
}

/// Wall extrusion settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtrusionSection {
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default = "default_top_offset")]
    pub top_offset: f64,
    #[serde(default)]
    pub flip_faces: bool,
}

fn default_thickness() -> f64 {
    ExtrusionConfig::default().thickness
}

fn default_top_offset() -> f64 {
    ExtrusionConfig::default().top_offset
}

impl FileConfig {
    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Command line values that can override the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub concavity: Option<f64>,
    pub scale_factor: Option<f64>,
    pub smooth: Option<u32>,
    pub tolerance: Option<f64>,
    pub height_threshold: Option<f64>,
    pub thickness: Option<f64>,
    pub top_offset: Option<f64>,
    pub flip_faces: bool,
}

/// Fully resolved settings for one outline run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub hull: HullConfig,
    pub outline: OutlineConfig,
    pub smooth: Option<u32>,
    pub height_threshold: f64,
    pub extrusion: Option<ExtrusionConfig>,
}

impl RunSettings {
    /// Merge defaults, file values and command line overrides, in that order.
    pub fn resolve(file: &FileConfig, cli: &Overrides) -> Result<Self> {
        let defaults = HullConfig::default();
        let hull = HullConfig {
            concavity: cli.concavity.or(file.concavity).unwrap_or(defaults.concavity),
            scale_factor: cli.scale_factor.or(file.scale_factor).unwrap_or(defaults.scale_factor),
        };
        if !(hull.scale_factor > 0.0) {
            bail!("scale factor must be positive, got {}", hull.scale_factor);
        }

        let tolerance = cli.tolerance.or(file.tolerance).unwrap_or(OutlineConfig::default().tolerance);
        if !(tolerance > 0.0) {
            bail!("tolerance must be positive, got {}", tolerance);
        }

        let smooth = cli.smooth.or(file.smooth);
        if smooth == Some(0) {
            bail!("smooth needs at least 1 segment per curve");
        }

        let height_threshold = cli
            .height_threshold
            .or(file.height_threshold)
            .unwrap_or(DEFAULT_HEIGHT_THRESHOLD);
        if !(0.0..=1.0).contains(&height_threshold) {
            bail!("height threshold must be within 0..1, got {}", height_threshold);
        }

        // Extrusion is on when either the file has a section or --extrude is given
        let extrusion = match (&file.extrusion, cli.thickness) {
            (None, None) => None,
            (section, thickness) => {
                let base = section.clone().map(|s| {
                    ExtrusionConfig::default()
                        .with_thickness(s.thickness)
                        .with_top_offset(s.top_offset)
                        .with_flip_faces(s.flip_faces)
                });
                let mut config = base.unwrap_or_default();
                if let Some(t) = thickness {
                    config.thickness = t;
                }
                if let Some(offset) = cli.top_offset {
                    config.top_offset = offset;
                }
                config.flip_faces |= cli.flip_faces;
                Some(config)
            }
        };

        Ok(Self {
            hull,
            outline: OutlineConfig::default().with_tolerance(tolerance),
            smooth,
            height_threshold,
            extrusion,
        })
    }
}
