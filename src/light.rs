//! Lighting types for the renderer.

use crate::math::Vec3;

/// A directional light: every surface sees the same unit direction.
///
/// Intensity is the plain dot product of a unit normal (or a position, for
/// the position-keyed Gouraud variant) with the direction. It is not clamped
/// here; flat shading culls faces at `<= 0` and Gouraud clamps per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
}

impl DirectionalLight {
    /// Create a light along `direction`, normalized.
    ///
    /// Returns `None` for a zero-length or non-finite direction.
    pub fn new(direction: Vec3) -> Option<Self> {
        if !direction.is_finite() {
            return None;
        }
        direction
            .try_normalize()
            .map(|direction| Self { direction })
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// `v · direction`.
    #[inline]
    pub fn intensity(&self, v: Vec3) -> f32 {
        v.dot(self.direction)
    }

    /// Intensity of the face through `points`, using the unit normal
    /// `(v2 - v0) × (v1 - v0)`. A collinear face yields zero.
    pub fn face_intensity(&self, points: &[Vec3; 3]) -> f32 {
        let [v0, v1, v2] = *points;
        match (v2 - v0).cross(v1 - v0).try_normalize() {
            Some(normal) => self.intensity(normal),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_is_normalized() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -5.0)).unwrap();
        assert_eq!(light.direction(), Vec3::new(0.0, 0.0, -1.0));
        assert!(DirectionalLight::new(Vec3::ZERO).is_none());
        assert!(DirectionalLight::new(Vec3::new(f32::NAN, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_face_facing_the_light() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        // (v2 - v0) × (v1 - v0) = (0,1,0) × (1,0,0) = (0,0,-1)
        let face = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        assert_relative_eq!(light.face_intensity(&face), 1.0);

        let reversed = [face[0], face[2], face[1]];
        assert_relative_eq!(light.face_intensity(&reversed), -1.0);
    }

    #[test]
    fn test_angled_illumination() {
        let light = DirectionalLight::new(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(light.intensity(normal), 0.70710677, epsilon = 1e-5);
    }

    #[test]
    fn test_collinear_face_is_dark() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let face = [Vec3::ZERO, Vec3::ONE, Vec3::new(2.0, 2.0, 2.0)];
        assert_eq!(light.face_intensity(&face), 0.0);
    }
}
