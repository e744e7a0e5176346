//! Frame storage, triangle rasterization, and pixel shading.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;
pub mod shader;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{barycentric, rasterize_triangle, BoundingBox, EdgeOwnership, Triangle};
pub use renderer::Renderer;
pub use shader::{
    BoxBlendShader, FlatShader, Fragment, GouraudShader, PixelShader, TextureModulateShader,
    TextureShader,
};
