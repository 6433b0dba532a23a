//! Procedurally generated field of self-similar pyramids.
//!
//! Geometry is rebuilt from scratch every frame: [`scene::build_frame`] walks
//! the placement lattice, [`geometry::Fractal`] subdivides each cell down to
//! pyramid pairs, and [`render::Renderer`] rasterizes the resulting triangle
//! stream. [`frame`] turns elapsed time and key presses into animation state.

#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod frame;
pub mod geometry;
pub mod matrix;
pub mod render;
pub mod scene;
pub mod transform;
pub mod vec3;
pub mod vec4;
