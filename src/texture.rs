use std::path::Path;

use crate::error::LoadError;
use crate::math::Vec2;

/// Represents a 2D texture for texture mapping.
///
/// Rows are stored bottom-up: row 0 is `v = 0`, matching OBJ texture
/// coordinates. Image files store the top row first, so [`Texture::from_file`]
/// flips them once at load time and sampling needs no mirroring.
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    /// Wraps ARGB pixels already laid out bottom row first.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height` or either dimension is zero.
    pub fn new(width: u32, height: u32, data: Vec<u32>) -> Self {
        assert!(width > 0 && height > 0, "texture dimensions must be non-zero");
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "texture data size doesn't match dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Load a texture from an image file (TGA, PNG, JPG, ...).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| LoadError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .flipv()
            .to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        log::info!("loaded texture {} ({}x{})", path.display(), width, height);
        Ok(Self::new(width, height, data))
    }

    /// Texel at integer coordinates, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.data[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// The texel is `(u * width, v * height)` truncated, clamped to the image
    /// so `u == 1.0` or slightly out-of-range coordinates hit the border.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> u32 {
        let x = Self::texel_index(uv.x, self.width);
        let y = Self::texel_index(uv.y, self.height);
        self.data[(y * self.width + x) as usize]
    }

    #[inline]
    fn texel_index(coord: f32, size: u32) -> u32 {
        let scaled = coord * size as f32;
        if scaled.is_nan() || scaled <= 0.0 {
            0
        } else {
            (scaled as u32).min(size - 1)
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
}
