//! Pixel shaders for triangle rasterization.
//!
//! The rasterizer decides which pixels a triangle covers and resolves depth;
//! a [`PixelShader`] decides what colour each covered pixel gets. Per-vertex
//! attributes (UVs, light intensities, colours) live in the shader and are
//! blended with the fragment's barycentric weights.

use crate::colors;
use crate::math::Vec2;
use crate::texture::Texture;

use super::rasterizer::BoundingBox;

/// One covered pixel handed to a shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    /// Barycentric weights `[alpha, beta, gamma]` for vertices A, B, C.
    /// They sum to 1.
    pub lambda: [f32; 3],
    pub depth: f32,
}

impl Fragment {
    /// Blends three per-vertex scalars: `alpha * a + beta * b + gamma * c`.
    #[inline]
    pub fn interpolate(&self, values: [f32; 3]) -> f32 {
        self.lambda[0] * values[0] + self.lambda[1] * values[1] + self.lambda[2] * values[2]
    }
}

/// Trait for per-pixel shading computations.
///
/// The rasterizer calls `shade()` once for each pixel that is inside the
/// triangle and passes the depth test.
pub trait PixelShader {
    fn shade(&self, fragment: &Fragment) -> u32;
}

/// Constant colour for the whole triangle.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }

    /// White scaled by a face intensity.
    pub fn lit(intensity: f32) -> Self {
        Self::new(colors::modulate(colors::WHITE, intensity))
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _fragment: &Fragment) -> u32 {
        self.color
    }
}

/// Texture sampled at the interpolated UV, scaled by one face intensity.
pub struct TextureShader<'a> {
    texture: &'a Texture,
    uvs: [Vec2; 3],
    intensity: f32,
}

impl<'a> TextureShader<'a> {
    pub fn new(texture: &'a Texture, uvs: [Vec2; 3], intensity: f32) -> Self {
        Self {
            texture,
            uvs,
            intensity,
        }
    }
}

impl PixelShader for TextureShader<'_> {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> u32 {
        let uv = Vec2::weighted(self.uvs, fragment.lambda);
        colors::modulate(self.texture.sample(uv), self.intensity)
    }
}

/// Gouraud shading: per-vertex intensities interpolated and written as grey.
pub struct GouraudShader {
    intensities: [f32; 3],
}

impl GouraudShader {
    pub fn new(intensities: [f32; 3]) -> Self {
        Self { intensities }
    }
}

impl PixelShader for GouraudShader {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> u32 {
        let intensity = fragment.interpolate(self.intensities).clamp(0.0, 1.0);
        colors::gray(intensity)
    }
}

/// Texture colour multiplied by the interpolated per-vertex intensity.
pub struct TextureModulateShader<'a> {
    texture: &'a Texture,
    uvs: [Vec2; 3],
    intensities: [f32; 3],
}

impl<'a> TextureModulateShader<'a> {
    pub fn new(texture: &'a Texture, uvs: [Vec2; 3], intensities: [f32; 3]) -> Self {
        Self {
            texture,
            uvs,
            intensities,
        }
    }
}

impl PixelShader for TextureModulateShader<'_> {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> u32 {
        let uv = Vec2::weighted(self.uvs, fragment.lambda);
        let intensity = fragment.interpolate(self.intensities).clamp(0.0, 1.0);
        colors::modulate(self.texture.sample(uv), intensity)
    }
}

/// Blends three vertex colours across the triangle's bounding box.
///
/// This does not use the barycentric weights. With box-relative coordinates
/// `t1 = (x - min_x) / (max_x - min_x)` and `t2 = (y - min_y) / (max_y - min_y)`
/// each channel is
///
/// ```text
/// t1 <= t2:  (1 - t1) * c1 + (t1 - t2) * c2 + t2 * c3
/// t1 >  t2:  (1 - t2) * c1 + t2 * (t2 - t1) * c2 + (t1 - t2) * c3
/// ```
///
/// clamped to `0..=255`. A box with zero width or height uses `t = 0` on that
/// axis.
pub struct BoxBlendShader {
    colors: [(f32, f32, f32); 3],
    bbox: BoundingBox,
}

impl BoxBlendShader {
    pub fn new(vertex_colors: [u32; 3], bbox: BoundingBox) -> Self {
        let unpack = |c: u32| {
            let (r, g, b) = colors::unpack_rgb(c);
            (r as f32, g as f32, b as f32)
        };
        Self {
            colors: vertex_colors.map(unpack),
            bbox,
        }
    }

    #[inline]
    fn relative(value: i32, min: i32, max: i32) -> f32 {
        if max == min {
            0.0
        } else {
            (value - min) as f32 / (max - min) as f32
        }
    }

    #[inline]
    fn blend(t1: f32, t2: f32, c1: f32, c2: f32, c3: f32) -> f32 {
        if t1 <= t2 {
            (1.0 - t1) * c1 + (t1 - t2) * c2 + t2 * c3
        } else {
            (1.0 - t2) * c1 + t2 * (t2 - t1) * c2 + (t1 - t2) * c3
        }
    }
}

impl PixelShader for BoxBlendShader {
    fn shade(&self, fragment: &Fragment) -> u32 {
        let t1 = Self::relative(fragment.x, self.bbox.min_x, self.bbox.max_x);
        let t2 = Self::relative(fragment.y, self.bbox.min_y, self.bbox.max_y);
        let [c1, c2, c3] = self.colors;
        colors::pack_channels(
            Self::blend(t1, t2, c1.0, c2.0, c3.0),
            Self::blend(t1, t2, c1.1, c2.1, c3.1),
            Self::blend(t1, t2, c1.2, c2.2, c3.2),
        )
    }
}
