use std::ops::{Add, Mul};

use crate::{vec3::Vec3, vec4::Vec4};

///
/// Index notation is: i, j - row, column. Vectors are columns, so `a * b`
/// applies `b` first.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Matrix4x4<T>([Vec4<T>; 4]);

impl<T: Copy> Matrix4x4<T> {
    pub fn new(v: [[T; 4]; 4]) -> Self {
        Matrix4x4([Vec4::from(v[0]), Vec4::from(v[1]), Vec4::from(v[2]), Vec4::from(v[3])])
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        self.0[i][j]
    }
}

impl Matrix4x4<f64> {
    pub fn identity() -> Self {
        Matrix4x4::new([[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]])
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Matrix4x4::new([[1.0, 0.0, 0.0, x], [0.0, 1.0, 0.0, y], [0.0, 0.0, 1.0, z], [0.0, 0.0, 0.0, 1.0]])
    }

    /// Counter-clockwise rotation about +Y when looking down the axis, in degrees.
    pub fn rotation_y(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();

        Matrix4x4::new([
            [cos,  0.0, sin, 0.0],
            [0.0,  1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0,  0.0, 0.0, 1.0],
        ])
    }

    /// Perspective frustum with the usual clip-space conventions: points on
    /// the near plane map to z = -1, points on the far plane to z = 1.
    pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);

        Matrix4x4::new([
            [2.0 * near / (right - left), 0.0, a, 0.0],
            [0.0, 2.0 * near / (top - bottom), b, 0.0],
            [0.0, 0.0, c, d],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3<f64>) -> Vec3<f64> {
        (self * Vec4::from(p)).into()
    }

    /// Applies only the linear part. Correct for normals as long as the
    /// matrix is a rigid motion, which is all the viewer ever builds.
    #[inline]
    pub fn transform_direction(&self, n: Vec3<f64>) -> Vec3<f64> {
        (self * Vec4::direction(n)).into()
    }
}

impl<'a, T: Copy + Add<Output = T> + Mul<Output = T>> Mul<Vec4<T>> for &'a Matrix4x4<T> {
    type Output = Vec4<T>;

    fn mul(self, vec: Vec4<T>) -> Self::Output {
        let row = |i: usize| {
            vec[0] * self.at(i, 0) + vec[1] * self.at(i, 1) + vec[2] * self.at(i, 2) + vec[3] * self.at(i, 3)
        };

        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

impl Mul<Matrix4x4<f64>> for Matrix4x4<f64> {
    type Output = Matrix4x4<f64>;

    fn mul(self, o: Matrix4x4<f64>) -> Self::Output {
        let mut out = [[0.0; 4]; 4];

        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.at(i, k) * o.at(k, j)).sum();
            }
        }

        Matrix4x4::new(out)
    }
}

#[test]
fn mul_matrix_vec() {
    let matrix = &Matrix4x4::new([[1, 0, 0, 10], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]);
    let vec = Vec4::new(10, 10, 10, 1);

    assert_eq!(Vec4::new(20, 10, 10, 1), matrix * vec);
}

#[test]
fn mul_identity() {
    let m = Matrix4x4::translation(1.0, 2.0, 3.0) * Matrix4x4::rotation_y(30.0);
    assert_eq!(m, m * Matrix4x4::identity());
    assert_eq!(m, Matrix4x4::identity() * m);
}

#[test]
fn translation_moves_points_not_directions() {
    let m = Matrix4x4::translation(0.0, 0.0, -8.0);
    let p = Vec3::new(1.0, 2.0, 3.0);

    assert_eq!(Vec3::new(1.0, 2.0, -5.0), m.transform_point(p));
    assert_eq!(p, m.transform_direction(p));
}

#[test]
fn rotation_y_quarter_turn() {
    let p = Matrix4x4::rotation_y(90.0).transform_point(Vec3::new(1.0, 0.0, 0.0));

    assert!(p.x.abs() < 1e-12);
    assert_eq!(0.0, p.y);
    assert!((p.z + 1.0).abs() < 1e-12);
}

#[test]
fn frustum_maps_near_and_far_planes() {
    let m = Matrix4x4::frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 100.0);

    let near = (&m * Vec4::from(Vec3::new(0.0, 0.0, -2.0))).project().unwrap();
    let far = (&m * Vec4::from(Vec3::new(0.0, 0.0, -100.0))).project().unwrap();

    assert!((near.z + 1.0).abs() < 1e-12);
    assert!((far.z - 1.0).abs() < 1e-12);
}
