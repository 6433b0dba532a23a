//! Self-similar pyramid field.
//!
//! A cell `(top, size)` either splits into five half-size cells (one at `top`,
//! four around it half a size lower) or, once `size` reaches the threshold,
//! ends in a pyramid pair: one upright at `top` and one inverted at `top`
//! mirrored through `y = 0`.

use tracing::warn;

use crate::geometry::pyramid::{emit_pyramid, Orientation, Style, PYRAMID_TRIANGLES};
use crate::geometry::Triangle;
use crate::vec3::Point3;

pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Triangles emitted by one terminal cell.
pub const CELL_TRIANGLES: usize = 2 * PYRAMID_TRIANGLES;

/// Children per subdivision step.
const FANOUT: usize = 5;

/// Largest number of triangles reserved up front; bigger outputs grow on demand.
pub const CAPACITY_HINT: usize = 1 << 20;

#[derive(Clone, Debug, PartialEq)]
pub struct Fractal {
    threshold: f64,
    style: Style,
}

impl Default for Fractal {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            style: Style::default(),
        }
    }
}

impl Fractal {
    /// A non-positive or non-finite threshold would never stop subdividing,
    /// so it is replaced by the default.
    pub fn new(threshold: f64, style: Style) -> Self {
        let threshold = if threshold > 0.0 && threshold.is_finite() {
            threshold
        } else {
            warn!(threshold, "invalid stopping threshold, using {}", DEFAULT_THRESHOLD);
            DEFAULT_THRESHOLD
        };

        Self { threshold, style }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// NaN, infinities and non-positive sizes all count as terminal.
    #[inline]
    fn is_terminal(&self, size: f64) -> bool {
        !(size.is_finite() && size > self.threshold)
    }

    /// Number of subdivision levels above the terminal cells.
    pub fn depth(&self, size: f64) -> u32 {
        let mut depth = 0;
        let mut size = size;
        while !self.is_terminal(size) {
            size /= 2.0;
            depth += 1;
        }
        depth
    }

    /// Closed form for `generate(_, size).len()`, saturating at `usize::MAX`.
    pub fn triangle_count(&self, size: f64) -> usize {
        FANOUT
            .checked_pow(self.depth(size))
            .and_then(|cells| cells.checked_mul(CELL_TRIANGLES))
            .unwrap_or(usize::MAX)
    }

    pub fn generate(&self, top: Point3, size: f64) -> Vec<Triangle> {
        let mut out = Vec::with_capacity(self.triangle_count(size).min(CAPACITY_HINT));
        self.generate_into(top, size, &mut out);
        out
    }

    /// Appends the cell's triangles to `out`, recursing directly.
    pub fn generate_into(&self, top: Point3, size: f64, out: &mut Vec<Triangle>) {
        if self.is_terminal(size) {
            self.terminate(top, size, out);
            return;
        }

        let half = size / 2.0;
        for child in children(top, half).iter() {
            self.generate_into(*child, half, out);
        }
    }

    /// Same output as [`Fractal::generate`], in the same order, but keeps the
    /// pending cells on a heap stack instead of the call stack.
    pub fn generate_with_stack(&self, top: Point3, size: f64) -> Vec<Triangle> {
        let mut out = Vec::with_capacity(self.triangle_count(size).min(CAPACITY_HINT));
        let mut pending = vec![(top, size)];

        while let Some((top, size)) = pending.pop() {
            if self.is_terminal(size) {
                self.terminate(top, size, &mut out);
                continue;
            }

            let half = size / 2.0;
            pending.extend(children(top, half).iter().rev().map(|child| (*child, half)));
        }

        out
    }

    fn terminate(&self, top: Point3, size: f64, out: &mut Vec<Triangle>) {
        out.extend_from_slice(&emit_pyramid(top, size, Orientation::Upright, &self.style));
        out.extend_from_slice(&emit_pyramid(top.mirror_y(), size, Orientation::Inverted, &self.style));
    }
}

/// Child apexes: the parent apex itself, then the four corners.
fn children(top: Point3, half: f64) -> [Point3; FANOUT] {
    let y = top.y - half;

    [
        top,
        Point3::new(top.x - half, y, top.z - half),
        Point3::new(top.x - half, y, top.z + half),
        Point3::new(top.x + half, y, top.z + half),
        Point3::new(top.x + half, y, top.z - half),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_cell_has_depth_three() {
        let fractal = Fractal::default();

        assert_eq!(3, fractal.depth(8.0));
        assert_eq!(CELL_TRIANGLES * 125, fractal.triangle_count(8.0));
        assert_eq!(1500, fractal.generate(Point3::default(), 8.0).len());
    }

    #[test]
    fn count_matches_closed_form() {
        let fractal = Fractal::default();

        for &size in [0.1, 0.5, 1.0, 1.0001, 2.0, 3.0, 4.0, 5.5, 8.0, 16.0, 20.0].iter() {
            let depth = (size / fractal.threshold()).log2().ceil().max(0.0) as u32;
            assert_eq!(depth, fractal.depth(size), "size {}", size);
            assert_eq!(
                CELL_TRIANGLES * 5usize.pow(depth),
                fractal.generate(Point3::new(1.0, 2.0, 3.0), size).len(),
                "size {}",
                size
            );
        }
    }

    #[test]
    fn terminal_cell_is_mirrored_pair() {
        let fractal = Fractal::default();
        let top = Point3::new(2.0, 3.5, -4.0);
        let triangles = fractal.generate(top, 0.75);

        let mirrored = Point3::new(2.0, -3.5, -4.0);
        let mut expected = emit_pyramid(top, 0.75, Orientation::Upright, fractal.style()).to_vec();
        expected.extend_from_slice(&emit_pyramid(mirrored, 0.75, Orientation::Inverted, fractal.style()));

        assert_eq!(expected, triangles);
    }

    #[test]
    fn degenerate_sizes_terminate() {
        let fractal = Fractal::default();

        for &size in [0.0, -1.0, -1e9, std::f64::NAN, std::f64::INFINITY].iter() {
            assert_eq!(0, fractal.depth(size));
            assert_eq!(CELL_TRIANGLES, fractal.generate(Point3::default(), size).len());
        }
    }

    #[test]
    fn invalid_threshold_falls_back() {
        assert_eq!(DEFAULT_THRESHOLD, Fractal::new(0.0, Style::default()).threshold());
        assert_eq!(DEFAULT_THRESHOLD, Fractal::new(-2.0, Style::default()).threshold());
        assert_eq!(DEFAULT_THRESHOLD, Fractal::new(std::f64::NAN, Style::default()).threshold());
        assert_eq!(0.5, Fractal::new(0.5, Style::default()).threshold());
    }

    #[test]
    fn huge_sizes_saturate_the_count() {
        let fractal = Fractal::default();
        let size = f64::from(1u32 << 30);

        assert_eq!(30, fractal.depth(size));
        assert_eq!(usize::MAX, fractal.triangle_count(size));
        assert_eq!(usize::MAX, fractal.triangle_count(std::f64::MAX));
        // 12 * 5^26 is the largest count that fits in 64 bits.
        assert_eq!(CELL_TRIANGLES * 5usize.pow(26), fractal.triangle_count(f64::from(1u32 << 26)));
    }

    #[test]
    fn stack_matches_recursion() {
        let fractal = Fractal::default();
        let top = Point3::new(8.0, -8.0, 24.0);

        assert_eq!(fractal.generate(top, 8.0), fractal.generate_with_stack(top, 8.0));
    }

    #[test]
    fn children_fill_parent_footprint() {
        let fractal = Fractal::default();
        let triangles = fractal.generate(Point3::new(0.0, 8.0, 0.0), 8.0);

        // Upright pyramids only: those stay above the mirror plane.
        let upright = triangles.chunks(PYRAMID_TRIANGLES).step_by(2).flatten();
        let (mut min_x, mut max_x, mut min_y) = (0.0f64, 0.0f64, 8.0f64);
        for v in upright.flat_map(|t| t.vertices.iter()) {
            min_x = min_x.min(v.x);
            max_x = max_x.max(v.x);
            min_y = min_y.min(v.y);
        }

        assert_eq!((-8.0, 8.0, 0.0), (min_x, max_x, min_y));
    }
}
