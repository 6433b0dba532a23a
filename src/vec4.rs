use std::ops::Index;

use crate::vec3::Vec3;

/// Homogeneous coordinates, `w` last.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Vec4<T>([T; 4]);

impl<T> Vec4<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Vec4([x, y, z, w])
    }

    #[inline]
    pub fn x(&self) -> &T {
        self.index(0)
    }

    #[inline]
    pub fn y(&self) -> &T {
        self.index(1)
    }

    #[inline]
    pub fn z(&self) -> &T {
        self.index(2)
    }

    #[inline]
    pub fn w(&self) -> &T {
        self.index(3)
    }
}

impl Vec4<f64> {
    /// Direction vectors ignore the translation part of a transform.
    #[inline]
    pub fn direction(v: Vec3<f64>) -> Self {
        Vec4::new(v.x, v.y, v.z, 0.0)
    }

    /// Perspective division. Returns `None` for points at infinity.
    #[inline]
    pub fn project(&self) -> Option<Vec3<f64>> {
        let w = *self.w();
        if w == 0.0 {
            return None;
        }

        Some(Vec3::new(self.x() / w, self.y() / w, self.z() / w))
    }
}

impl<T: Copy> From<[T; 4]> for Vec4<T> {
    #[inline]
    fn from(v: [T; 4]) -> Self {
        Vec4::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Vec3<f64>> for Vec4<f64> {
    #[inline]
    fn from(v: Vec3<f64>) -> Self {
        Vec4::new(v.x, v.y, v.z, 1.0)
    }
}

impl From<Vec4<f64>> for Vec3<f64> {
    #[inline]
    fn from(v: Vec4<f64>) -> Self {
        Vec3::new(*v.x(), *v.y(), *v.z())
    }
}

impl<T> Index<usize> for Vec4<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

#[test]
fn project_divides_by_w() {
    let v = Vec4::new(2.0, 4.0, -6.0, 2.0);
    assert_eq!(Some(Vec3::new(1.0, 2.0, -3.0)), v.project());
    assert_eq!(None, Vec4::direction(Vec3::new(1.0, 0.0, 0.0)).project());
}
