//! Placement of fractal cells on a checkerboard lattice.

use std::convert::TryFrom;

use crate::geometry::{Fractal, Triangle, CAPACITY_HINT};
use crate::vec3::Point3;

/// Grid of candidate cell positions.
///
/// Integer pairs `(x, y)` in `[-extent, extent]²` are kept when `x + y` is odd
/// and the pair lies outside the central `[-exclusion, exclusion]²` square.
/// Each kept pair places one cell per layer at `(x, layer, y) * scale`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Lattice {
    pub extent: u32,
    pub exclusion: u32,
    pub scale: f64,
    pub layers: Vec<i32>,
    /// Size of the top-level cell at every placement.
    pub size: f64,
}

impl Default for Lattice {
    fn default() -> Self {
        Self {
            extent: 5,
            exclusion: 1,
            scale: 8.0,
            layers: vec![-1, 0],
            size: 8.0,
        }
    }
}

impl Lattice {
    #[inline]
    fn is_selected(&self, x: i64, y: i64) -> bool {
        let exclusion = i64::from(self.exclusion);
        let odd = (x + y) % 2 != 0;
        let central = x.abs() <= exclusion && y.abs() <= exclusion;

        odd && !central
    }

    /// Cell tops in scan order: x outermost, then y, then layer.
    pub fn placements(&self) -> Vec<Point3> {
        let extent = i64::from(self.extent);
        let mut out = Vec::with_capacity(self.placement_count().min(CAPACITY_HINT));

        for x in -extent..=extent {
            for y in -extent..=extent {
                if !self.is_selected(x, y) {
                    continue;
                }
                for &layer in &self.layers {
                    out.push(Point3::new(x as f64, f64::from(layer), y as f64).scale(self.scale));
                }
            }
        }

        out
    }

    /// Closed form for `placements().len()`.
    ///
    /// A square of odd side `n` centered on the origin holds `(n² - 1) / 2`
    /// pairs with odd sum, since the corners are even. Saturates at `usize::MAX`.
    pub fn placement_count(&self) -> usize {
        let odd_pairs = |half: u32| {
            let side = 2 * u128::from(half) + 1;
            (side * side - 1) / 2
        };
        let excluded = odd_pairs(self.exclusion.min(self.extent));
        let count = (odd_pairs(self.extent) - excluded).saturating_mul(self.layers.len() as u128);

        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Closed form for `build_frame(self, fractal).len()`, saturating at `usize::MAX`.
    pub fn triangle_count(&self, fractal: &Fractal) -> usize {
        self.placement_count().saturating_mul(fractal.triangle_count(self.size))
    }
}

/// Builds the full triangle stream of one frame, cell after cell in placement order.
pub fn build_frame(lattice: &Lattice, fractal: &Fractal) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(lattice.triangle_count(fractal).min(CAPACITY_HINT));
    build_frame_into(lattice, fractal, &mut out);
    out
}

/// Like [`build_frame`], but reuses `out`'s allocation. Previous contents are dropped.
pub fn build_frame_into(lattice: &Lattice, fractal: &Fractal, out: &mut Vec<Triangle>) {
    out.clear();
    for top in lattice.placements() {
        fractal.generate_into(top, lattice.size, out);
    }
}
