//! A CPU triangle rasterizer.
//!
//! Loads one Wavefront OBJ mesh, maps it to screen space through a look-at
//! camera (or a fixed orthographic mapping), and fills each face with a
//! barycentric rasterizer backed by a z-buffer. The result is written as a
//! single image with its origin at the bottom-left.
//!
//! # Quick Start
//!
//! ```no_run
//! use tinyrast::prelude::*;
//!
//! # fn main() -> tinyrast::Result<()> {
//! let config = RenderConfig::default();
//! let mesh = Mesh::from_obj("obj/african_head.obj")?;
//! let mut engine = Engine::from_config(&config)?;
//! engine.render(&mesh, None)?;
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod texture;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use config::RenderConfig;
pub use engine::{Engine, IntensitySource, RenderMode, RenderStats, ShadingMode};
pub use error::{ConfigError, Error, LoadError, RenderError, Result};
pub use light::DirectionalLight;
pub use mesh::Mesh;
pub use projection::Projection;
pub use texture::Texture;
pub use transform::ScreenTransform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use tinyrast::prelude::*;
/// ```
pub mod prelude {
    // Scene setup
    pub use crate::camera::Camera;
    pub use crate::config::RenderConfig;
    pub use crate::light::DirectionalLight;
    pub use crate::projection::Projection;
    pub use crate::transform::ScreenTransform;

    // Engine
    pub use crate::engine::{Engine, IntensitySource, RenderMode, RenderStats, ShadingMode};

    // Assets
    pub use crate::mesh::Mesh;
    pub use crate::texture::Texture;

    // Math
    pub use crate::math::{Matrix, Vec2, Vec3};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        rasterize_triangle, FlatShader, FrameBuffer, GouraudShader, PixelShader, Triangle,
    };
}
