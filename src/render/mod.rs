//! Software stand-in for the fixed-function pipeline: model-view and
//! projection transforms, back-face culling, depth testing, flat lighting and
//! fog.

mod raster;
mod shading;

use image::Rgb;

use crate::config::ViewerConfig;
use crate::frame::Tick;
use crate::matrix::Matrix4x4;

pub use self::raster::Renderer;
pub use self::shading::{fog, shade, Light, Material};

/// Everything about one frame's camera and atmosphere.
#[derive(Copy, Clone, Debug)]
pub struct View {
    pub model_view: Matrix4x4<f64>,
    pub projection: Matrix4x4<f64>,
    pub near: f64,
    pub light: Light,
    pub material: Material,
    pub fog_color: Rgb<u8>,
    pub fog_density: f64,
    pub clear: Rgb<u8>,
}

impl View {
    /// Eye pulled back `camera_distance` from the lattice origin, scene
    /// rotated by the tick's angle about the vertical axis.
    pub fn new(config: &ViewerConfig, tick: &Tick, aspect: f64) -> Self {
        let projection = &config.projection;
        let model_view =
            Matrix4x4::translation(0.0, 0.0, -config.camera_distance) * Matrix4x4::rotation_y(tick.angle);

        Self {
            model_view,
            projection: Matrix4x4::frustum(-aspect, aspect, -1.0, 1.0, projection.near, projection.far),
            near: projection.near,
            light: config.light,
            material: config.material,
            fog_color: config.fog.color,
            fog_density: tick.fog_density,
            clear: Rgb([0, 0, 0]),
        }
    }
}

#[test]
fn camera_sits_back_and_turns_the_scene() {
    use crate::vec3::Point3;

    let tick = Tick {
        angle: 90.0,
        fog_density: 0.0,
    };
    let view = View::new(&ViewerConfig::default(), &tick, 1.0);

    let origin = view.model_view.transform_point(Point3::default());
    assert!((origin - Point3::new(0.0, 0.0, -8.0)).len() < 1e-9, "{:?}", origin);

    // A quarter turn about +y carries +x onto -z, then 8 units back.
    let east = view.model_view.transform_point(Point3::new(1.0, 0.0, 0.0));
    assert!((east - Point3::new(0.0, 0.0, -9.0)).len() < 1e-9, "{:?}", east);

    let up = view.model_view.transform_point(Point3::new(0.0, 1.0, 0.0));
    assert!((up - Point3::new(0.0, 1.0, -8.0)).len() < 1e-9, "{:?}", up);
}
