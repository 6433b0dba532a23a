//! Square-based pyramid emitter.

use image::Rgb;

use crate::config::{deserialize_rgb, deserialize_rgb_sides};
use crate::geometry::Triangle;
use crate::vec3::Point3;

/// Number of triangles in one emitted pyramid: four sides and a split base.
pub const PYRAMID_TRIANGLES: usize = 6;

/// Face colors by role.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Style {
    /// Lateral faces, in emission order: -z, +x, +z, -x.
    #[serde(deserialize_with = "deserialize_rgb_sides")]
    pub sides: [Rgb<u8>; 4],
    #[serde(deserialize_with = "deserialize_rgb")]
    pub base: Rgb<u8>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            sides: [Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255]), Rgb([255, 0, 255])],
            base: Rgb([255, 255, 255]),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Apex above the base.
    Upright,
    /// Apex below the base.
    Inverted,
}

/// Emits the six triangles of a pyramid with the given apex.
///
/// The base is the square `apex ± size` in x and z, `size` below the apex for
/// [`Orientation::Upright`] and `size` above it for [`Orientation::Inverted`].
/// Every triangle is wound so that its normal points out of the solid.
pub fn emit_pyramid(apex: Point3, size: f64, orientation: Orientation, style: &Style) -> [Triangle; PYRAMID_TRIANGLES] {
    let dy = match orientation {
        Orientation::Upright => -size,
        Orientation::Inverted => size,
    };

    let corner = |dx: f64, dz: f64| Point3::new(apex.x + dx, apex.y + dy, apex.z + dz);
    let b1 = corner(-size, -size);
    let b2 = corner(-size, size);
    let b3 = corner(size, size);
    let b4 = corner(size, -size);

    // Mirroring about the base plane flips handedness, so inverted faces swap
    // their last two vertices to stay outward.
    let face = |p: Point3, q: Point3, r: Point3, color: Rgb<u8>| match orientation {
        Orientation::Upright => Triangle::flat([p, q, r], color),
        Orientation::Inverted => Triangle::flat([p, r, q], color),
    };

    [
        face(b4, b1, apex, style.sides[0]),
        face(b3, b4, apex, style.sides[1]),
        face(b2, b3, apex, style.sides[2]),
        face(b1, b2, apex, style.sides[3]),
        face(b1, b4, b2, style.base),
        face(b2, b4, b3, style.base),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_centroid(apex: Point3, size: f64, orientation: Orientation) -> Point3 {
        let dy = match orientation {
            Orientation::Upright => -size,
            Orientation::Inverted => size,
        };
        // Average of apex and four base corners; the corner offsets cancel in x and z.
        Point3::new(apex.x, apex.y + dy * 4.0 / 5.0, apex.z)
    }

    fn assert_outward(apex: Point3, size: f64, orientation: Orientation) {
        let center = solid_centroid(apex, size, orientation);

        for triangle in emit_pyramid(apex, size, orientation, &Style::default()).iter() {
            let outward = triangle.centroid() - center;
            assert!(
                triangle.face_normal().dot(&outward) > 0.0,
                "inward face {:?} for {:?} at {:?} size {}",
                triangle,
                orientation,
                apex,
                size
            );
        }
    }

    #[test]
    fn upright_faces_point_outward() {
        assert_outward(Point3::new(0.0, 0.0, 0.0), 1.0, Orientation::Upright);
        assert_outward(Point3::new(-3.0, 7.5, 12.0), 0.25, Orientation::Upright);
        assert_outward(Point3::new(40.0, -8.0, -40.0), 8.0, Orientation::Upright);
    }

    #[test]
    fn inverted_faces_point_outward() {
        assert_outward(Point3::new(0.0, 0.0, 0.0), 1.0, Orientation::Inverted);
        assert_outward(Point3::new(-3.0, 7.5, 12.0), 0.25, Orientation::Inverted);
        assert_outward(Point3::new(40.0, -8.0, -40.0), 8.0, Orientation::Inverted);
    }

    #[test]
    fn base_lies_one_size_from_apex() {
        let apex = Point3::new(1.0, 2.0, 3.0);

        let up = emit_pyramid(apex, 0.5, Orientation::Upright, &Style::default());
        assert!(up[4].vertices.iter().all(|v| v.y == 1.5));
        assert!(up[5].vertices.iter().all(|v| v.y == 1.5));

        let down = emit_pyramid(apex, 0.5, Orientation::Inverted, &Style::default());
        assert!(down[4].vertices.iter().all(|v| v.y == 2.5));
        assert!(down[0].vertices.iter().any(|v| *v == apex));
    }

    #[test]
    fn faces_take_colors_by_role() {
        let style = Style {
            sides: [Rgb([1, 0, 0]), Rgb([2, 0, 0]), Rgb([3, 0, 0]), Rgb([4, 0, 0])],
            base: Rgb([9, 9, 9]),
        };
        let triangles = emit_pyramid(Point3::default(), 1.0, Orientation::Upright, &style);

        let colors: Vec<_> = triangles.iter().map(|t| t.color[0]).collect();
        assert_eq!(vec![1, 2, 3, 4, 9, 9], colors);
    }

    #[test]
    fn zero_size_degrades_to_zero_normals() {
        let triangles = emit_pyramid(Point3::new(1.0, 1.0, 1.0), 0.0, Orientation::Upright, &Style::default());

        assert!(triangles.iter().all(|t| t.face_normal() == Point3::default()));
    }
}
