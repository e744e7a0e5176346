//! Linear algebra kernel: small value-type vectors and a dynamically sized matrix.

pub mod matrix;
pub mod vec2;
pub mod vec3;

pub use matrix::Matrix;
pub use vec2::Vec2;
pub use vec3::Vec3;
