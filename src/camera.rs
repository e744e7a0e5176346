//! Look-at camera and the single-scalar perspective projection.
//!
//! # Coordinate System
//!
//! Right-handed, y up. The camera looks from `eye` toward `center`; the view
//! basis `z` axis points from the target back to the eye.

use crate::math::{Matrix, Vec3};

/// Camera placement: where it sits, what it looks at, and which way is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(1.0, 1.0, 3.0), Vec3::ZERO, Vec3::UP)
    }
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    /// Distance between the eye and the look-at target.
    pub fn distance(&self) -> f32 {
        (self.eye - self.center).magnitude()
    }

    /// True when the look-at basis is well defined: the eye is away from the
    /// target and `up` is not parallel to the viewing direction.
    pub fn is_valid(&self) -> bool {
        match (self.eye - self.center).try_normalize() {
            Some(z) => self.up.cross(z).try_normalize().is_some(),
            None => false,
        }
    }

    pub fn model_view(&self) -> Matrix {
        look_at(self.eye, self.center, self.up)
    }

    pub fn projection(&self) -> Matrix {
        projection(self.distance())
    }
}

/// Builds the model-view matrix.
///
/// Rows 0..3 hold the orthonormal basis
/// `z = normalize(eye - center)`, `x = normalize(up × z)`, `y = z × x`,
/// and the last column holds `-center`. The caller must keep `up` away from
/// `eye - center`; a parallel pair has no basis (see [`Camera::is_valid`]).
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Matrix {
    let z = (eye - center).normalize();
    let x = up.cross(z).normalize();
    let y = z.cross(x).normalize();

    Matrix::from_rows(&[
        [x.x, x.y, x.z, -center.x],
        [y.x, y.y, y.z, -center.y],
        [z.x, z.y, z.z, -center.z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Identity with `m[3][2] = -1 / distance`.
///
/// The resulting w is `1 - z / distance`, so points move toward the vanishing
/// point as they recede. There are no near or far planes.
pub fn projection(distance: f32) -> Matrix {
    let mut m = Matrix::identity(4);
    if distance > f32::EPSILON {
        m[(3, 2)] = -1.0 / distance;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_look_at_down_negative_z_is_identity() {
        let m = look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::UP);
        assert_eq!(m, Matrix::identity(4));
    }

    #[test]
    fn test_look_at_rows_are_orthonormal() {
        let m = look_at(Vec3::new(1.0, 1.0, 3.0), Vec3::ZERO, Vec3::UP);
        let row = |r: usize| Vec3::new(m[(r, 0)], m[(r, 1)], m[(r, 2)]);
        for r in 0..3 {
            assert_relative_eq!(row(r).magnitude(), 1.0, epsilon = 1e-5);
        }
        assert_relative_eq!(row(0).dot(row(1)), 0.0, epsilon = 1e-5);
        assert_relative_eq!(row(1).dot(row(2)), 0.0, epsilon = 1e-5);
        assert_relative_eq!(row(0).dot(row(2)), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_translation_is_negated_center() {
        let m = look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 2.0, 3.0), Vec3::UP);
        assert_eq!(m[(0, 3)], -1.0);
        assert_eq!(m[(1, 3)], -2.0);
        assert_eq!(m[(2, 3)], -3.0);
    }

    #[test]
    fn test_projection_coefficient() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::UP);
        let p = camera.projection();
        assert_relative_eq!(p[(3, 2)], -0.25);
        // A point halfway to the eye is magnified by 2.
        let v = p.transform_point(Vec3::new(1.0, 1.0, 2.0));
        assert_relative_eq!(v.x, 2.0);
        assert_relative_eq!(v.y, 2.0);
    }

    #[test]
    fn test_parallel_up_is_invalid() {
        let camera = Camera::new(Vec3::new(0.0, 3.0, 0.0), Vec3::ZERO, Vec3::UP);
        assert!(!camera.is_valid());
        assert!(Camera::default().is_valid());
        assert!(!Camera::new(Vec3::ZERO, Vec3::ZERO, Vec3::UP).is_valid());
    }
}
