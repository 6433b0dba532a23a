use crate::matrix::Matrix4x4;

/// In-place change of coordinate frame.
pub trait Transform<T> {
    fn transform(&mut self, transformation: &Matrix4x4<T>);
}
