//! The unit handed to the rasterizer: three vertices, their normals and a color.

use image::Rgb;

use crate::matrix::Matrix4x4;
use crate::transform::Transform;
use crate::vec3::Point3;

/// Unnormalized face normal of the triangle `v0 -> v1 -> v2`.
///
/// Counter-clockwise vertices seen from outside give an outward normal. The
/// length is twice the triangle area; collinear points give the zero vector.
#[inline]
pub fn compute_normal(v0: Point3, v1: Point3, v2: Point3) -> Point3 {
    let a = v0 - v1;
    let b = v1 - v2;
    a.cross(&b)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    /// Counter-clockwise when viewed from the outward side.
    pub vertices: [Point3; 3],

    /// Per-vertex normals. Pyramid faces are flat, so all three repeat the face normal.
    pub normals: [Point3; 3],

    pub color: Rgb<u8>,
}

impl Triangle {
    /// Flat-shaded triangle whose normal is derived from its own winding.
    pub fn flat(vertices: [Point3; 3], color: Rgb<u8>) -> Self {
        let normal = compute_normal(vertices[0], vertices[1], vertices[2]);

        Self {
            vertices,
            normals: [normal; 3],
            color,
        }
    }

    pub fn smooth(vertices: [Point3; 3], normals: [Point3; 3], color: Rgb<u8>) -> Self {
        Self {
            vertices,
            normals,
            color,
        }
    }

    #[inline]
    pub fn face_normal(&self) -> Point3 {
        compute_normal(self.vertices[0], self.vertices[1], self.vertices[2])
    }

    #[inline]
    pub fn centroid(&self) -> Point3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]).scale(1.0 / 3.0)
    }
}

impl Transform<f64> for Triangle {
    fn transform(&mut self, transformation: &Matrix4x4<f64>) {
        for vertex in self.vertices.iter_mut() {
            *vertex = transformation.transform_point(*vertex);
        }
        for normal in self.normals.iter_mut() {
            *normal = transformation.transform_direction(*normal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn counter_clockwise_normal_points_at_viewer() {
        let n = compute_normal(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        assert_eq!(Point3::new(0.0, 0.0, 1.0), n);
    }

    #[test]
    fn normal_is_not_normalized() {
        let n = compute_normal(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );

        assert_eq!(Point3::new(0.0, 0.0, 12.0), n);
    }

    #[test]
    fn collinear_points_give_zero_normal() {
        let n = compute_normal(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );

        assert_eq!(Point3::default(), n);
    }

    #[test]
    fn flat_shares_one_normal() {
        let t = Triangle::flat(
            [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 0.0)],
            WHITE,
        );

        assert_eq!(t.normals[0], t.normals[1]);
        assert_eq!(t.normals[1], t.normals[2]);
        assert_eq!(Point3::new(0.0, 1.0, 0.0), t.face_normal());
    }

    #[test]
    fn smooth_keeps_vertex_normals() {
        let up = Point3::new(0.0, 1.0, 0.0);
        let side = Point3::new(1.0, 0.0, 0.0);
        let t = Triangle::smooth(
            [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 0.0)],
            [up, side, up],
            WHITE,
        );

        assert_eq!(side, t.normals[1]);
        assert_eq!(up, t.face_normal());
    }

    #[test]
    fn transform_rotates_normals_and_moves_vertices() {
        let mut t = Triangle::flat(
            [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            WHITE,
        );
        t.transform(&Matrix4x4::translation(0.0, 0.0, -8.0));

        assert_eq!(Point3::new(1.0, 0.0, -8.0), t.vertices[1]);
        assert_eq!(Point3::new(0.0, 0.0, 1.0), t.normals[0]);
    }
}
