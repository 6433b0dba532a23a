//! Viewer configuration, read from an optional JSON file.
//!
//! Every section and field falls back to its default, so `{}` is a valid
//! configuration. Colors are written as `[r, g, b]` triples.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use image::Rgb;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::frame::Animation;
use crate::geometry::{Fractal, Style};
use crate::render::{Light, Material};
use crate::scene::Lattice;

/// Widest lattice half-width accepted.
pub const MAX_EXTENT: u32 = 1024;

/// Most triangles one frame may hold.
pub const MAX_FRAME_TRIANGLES: usize = 1 << 22;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn deserialize_rgb<'de, D>(de: D) -> Result<Rgb<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let (r, g, b) = Deserialize::deserialize(de)?;
    let rgb = Rgb([r, g, b]);

    Ok(rgb)
}

pub fn deserialize_rgb_sides<'de, D>(de: D) -> Result<[Rgb<u8>; 4], D::Error>
where
    D: Deserializer<'de>,
{
    let sides: [(u8, u8, u8); 4] = Deserialize::deserialize(de)?;
    let mut out = [Rgb([0, 0, 0]); 4];
    for (rgb, &(r, g, b)) in out.iter_mut().zip(sides.iter()) {
        *rgb = Rgb([r, g, b]);
    }

    Ok(out)
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Window {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            title: "Pyramids".into(),
            width: 640,
            height: 480,
            x: 10,
            y: 10,
        }
    }
}

/// Symmetric frustum with a fixed vertical extent of `[-1, 1]` at the near plane.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Projection {
    pub near: f64,
    pub far: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self { near: 2.0, far: 100.0 }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Fog {
    #[serde(deserialize_with = "deserialize_rgb")]
    pub color: Rgb<u8>,
}

impl Default for Fog {
    fn default() -> Self {
        Self { color: Rgb([0, 0, 0]) }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FractalConfig {
    pub threshold: f64,
    pub style: Style,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            threshold: crate::geometry::DEFAULT_THRESHOLD,
            style: Style::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: Window,
    pub projection: Projection,
    /// Distance from the eye to the lattice origin along the view axis.
    pub camera_distance: f64,
    /// Frames per second the event loop is paced to.
    pub framerate: u32,
    pub animation: Animation,
    pub fog: Fog,
    pub light: Light,
    pub material: Material,
    pub lattice: Lattice,
    pub fractal: FractalConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: Window::default(),
            projection: Projection::default(),
            camera_distance: 8.0,
            framerate: 60,
            animation: Animation::default(),
            fog: Fog::default(),
            light: Light::default(),
            material: Material::default(),
            lattice: Lattice::default(),
            fractal: FractalConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: ViewerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid(reason));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!("window size {}x{}", self.window.width, self.window.height));
        }
        if !(self.projection.near > 0.0 && self.projection.near < self.projection.far) {
            return invalid(format!("near {} / far {}", self.projection.near, self.projection.far));
        }
        if !(self.fractal.threshold > 0.0 && self.fractal.threshold.is_finite()) {
            return invalid(format!("fractal threshold {}", self.fractal.threshold));
        }
        if !(self.lattice.size.is_finite() && self.lattice.scale.is_finite()) {
            return invalid(format!("lattice size {} / scale {}", self.lattice.size, self.lattice.scale));
        }
        if self.framerate == 0 {
            return invalid("framerate 0".into());
        }
        if self.lattice.extent > MAX_EXTENT {
            return invalid(format!("lattice extent {} above {}", self.lattice.extent, MAX_EXTENT));
        }

        let fractal = Fractal::new(self.fractal.threshold, self.fractal.style.clone());
        let triangles = self.lattice.triangle_count(&fractal);
        if triangles > MAX_FRAME_TRIANGLES {
            return invalid(format!(
                "lattice size {} at threshold {} needs {} triangles per frame, above {}",
                self.lattice.size, self.fractal.threshold, triangles, MAX_FRAME_TRIANGLES
            ));
        }

        Ok(())
    }
}

#[test]
fn empty_object_is_default() {
    assert_eq!(ViewerConfig::default(), ViewerConfig::from_json("{}").unwrap());
}

#[test]
fn defaults_are_valid() {
    assert!(ViewerConfig::default().validate().is_ok());
}

#[test]
fn partial_sections_keep_other_defaults() {
    let config = ViewerConfig::from_json(
        r#"{
            "window": { "width": 1024 },
            "lattice": { "extent": 3, "layers": [0] },
            "fractal": { "style": { "base": [10, 20, 30] } }
        }"#,
    )
    .unwrap();

    assert_eq!(1024, config.window.width);
    assert_eq!(480, config.window.height);
    assert_eq!(3, config.lattice.extent);
    assert_eq!(vec![0], config.lattice.layers);
    assert_eq!(8.0, config.lattice.scale);
    assert_eq!(Rgb([10, 20, 30]), config.fractal.style.base);
    assert_eq!(Style::default().sides, config.fractal.style.sides);
}

#[test]
fn camera_distance_is_a_top_level_field() {
    let config = ViewerConfig::from_json(r#"{ "camera_distance": 12.5 }"#).unwrap();
    assert_eq!(12.5, config.camera_distance);
}

#[test]
fn side_colors_parse_as_triples() {
    let config = ViewerConfig::from_json(
        r#"{ "fractal": { "style": { "sides": [[0, 0, 0], [1, 1, 1], [2, 2, 2], [3, 3, 3]] } } }"#,
    )
    .unwrap();

    assert_eq!(Rgb([3, 3, 3]), config.fractal.style.sides[3]);
}

#[test]
fn rejects_inverted_planes() {
    let err = ViewerConfig::from_json(r#"{ "projection": { "near": 10.0, "far": 5.0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{}", err);
}

#[test]
fn rejects_non_positive_threshold() {
    let err = ViewerConfig::from_json(r#"{ "fractal": { "threshold": 0.0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{}", err);
}

#[test]
fn rejects_frames_too_deep_to_build() {
    for json in [
        r#"{ "lattice": { "size": 1e9 } }"#,
        r#"{ "lattice": { "size": 1e300 } }"#,
        r#"{ "fractal": { "threshold": 1e-9 } }"#,
    ]
    .iter()
    {
        let err = ViewerConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{}: {}", json, err);
    }

    // Depth 6 with the reference lattice: 112 * 12 * 5^6 = 21M triangles.
    assert!(ViewerConfig::from_json(r#"{ "lattice": { "size": 64.0 } }"#).is_err());
    // Depth 4: 112 * 12 * 5^4 = 840k triangles.
    assert!(ViewerConfig::from_json(r#"{ "lattice": { "size": 16.0 } }"#).is_ok());
}

#[test]
fn rejects_extent_beyond_limit() {
    let err = ViewerConfig::from_json(r#"{ "lattice": { "extent": 4000000000 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{}", err);

    let config = ViewerConfig::from_json(&format!(
        r#"{{ "lattice": {{ "extent": {}, "layers": [] }} }}"#,
        MAX_EXTENT
    ))
    .unwrap();
    assert_eq!(MAX_EXTENT, config.lattice.extent);
}

#[test]
fn rejects_malformed_json() {
    let err = ViewerConfig::from_json("{ window: }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{}", err);
}

#[test]
fn missing_file_is_io_error() {
    let err = ViewerConfig::load("/nonexistent/pyramids.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "{}", err);
}

#[test]
fn bundled_config_spells_out_defaults() {
    let config = ViewerConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/pyramids.json")).unwrap();
    assert_eq!(ViewerConfig::default(), config);
}
