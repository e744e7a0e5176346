//! Model space to screen space.
//!
//! A [`ScreenTransform`] maps a model-space vertex to `(x_pixel, y_pixel, depth)`.
//! Two mappings exist:
//!
//! - [`ScreenTransform::Orthographic`]: the fixed affine map
//!   `((x + 1) * w / 2, (y + 1) * h / 2, z)` for models inside `[-1, 1]`.
//! - [`ScreenTransform::Perspective`]: the composite
//!   `Viewport * Projection * ModelView` followed by the divide by w.
//!
//! Screen y grows upward; the output image is flipped when it is written.

use crate::camera::Camera;
use crate::math::{Matrix, Vec3};

/// Maps the cube `[-1, 1]^3` onto the pixel rectangle `[x, x + w] × [y, y + h]`
/// and the depth range `[0, depth]`.
pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth: f32) -> Matrix {
    let mut m = Matrix::identity(4);
    m[(0, 3)] = x + w / 2.0;
    m[(1, 3)] = y + h / 2.0;
    m[(2, 3)] = depth / 2.0;

    m[(0, 0)] = w / 2.0;
    m[(1, 1)] = h / 2.0;
    m[(2, 2)] = depth / 2.0;
    m
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenTransform {
    Orthographic { width: f32, height: f32 },
    Perspective { matrix: Matrix },
}

impl ScreenTransform {
    pub fn orthographic(width: u32, height: u32) -> Self {
        ScreenTransform::Orthographic {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Composite transform for `camera`, using the centred viewport that covers
    /// the middle three quarters of a `width × height` frame.
    pub fn perspective(camera: &Camera, width: u32, height: u32, depth: f32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let viewport = viewport(
            (width / 8) as f32,
            (height / 8) as f32,
            w * 3.0 / 4.0,
            h * 3.0 / 4.0,
            depth,
        );
        Self::from_parts(&viewport, &camera.projection(), &camera.model_view())
    }

    /// Composes `viewport * projection * model_view`.
    pub fn from_parts(viewport: &Matrix, projection: &Matrix, model_view: &Matrix) -> Self {
        ScreenTransform::Perspective {
            matrix: &(viewport * projection) * model_view,
        }
    }

    /// Maps a model-space point to screen space.
    ///
    /// Returns `None` when the point lands at or behind the eye plane
    /// (homogeneous `w <= 0`) or the result is not finite.
    pub fn project(&self, v: Vec3) -> Option<Vec3> {
        let screen = match self {
            ScreenTransform::Orthographic { width, height } => Vec3::new(
                (v.x + 1.0) * width / 2.0,
                (v.y + 1.0) * height / 2.0,
                v.z,
            ),
            ScreenTransform::Perspective { matrix } => {
                if matrix.w_of(v) <= 0.0 {
                    return None;
                }
                matrix.transform_point(v)
            }
        };
        screen.is_finite().then_some(screen)
    }
}
