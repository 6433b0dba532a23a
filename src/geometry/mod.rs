//! Procedural geometry: triangles, pyramids and the fractal that places them.

mod fractal;
mod pyramid;
mod triangle;

pub use self::fractal::{Fractal, CAPACITY_HINT, CELL_TRIANGLES, DEFAULT_THRESHOLD};
pub use self::pyramid::{emit_pyramid, Orientation, Style, PYRAMID_TRIANGLES};
pub use self::triangle::{compute_normal, Triangle};
