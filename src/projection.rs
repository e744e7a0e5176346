//! Projection selection.
//!
//! [`Projection`] names which screen mapping a render uses and builds the
//! matching [`ScreenTransform`].

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::transform::ScreenTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Fixed affine mapping of `[-1, 1]` model coordinates; ignores the camera.
    Orthographic,
    /// Look-at camera, single-scalar perspective, centred viewport.
    #[default]
    Perspective,
}

impl Projection {
    pub fn screen_transform(
        &self,
        camera: &Camera,
        width: u32,
        height: u32,
        depth: f32,
    ) -> ScreenTransform {
        match self {
            Projection::Orthographic => ScreenTransform::orthographic(width, height),
            Projection::Perspective => ScreenTransform::perspective(camera, width, height, depth),
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Projection::Orthographic => write!(f, "orthographic"),
            Projection::Perspective => write!(f, "perspective"),
        }
    }
}
