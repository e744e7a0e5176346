//! Owning storage for one render and the drawing primitives that do not go
//! through the triangle rasterizer.
//!
//! [`Renderer`] owns the color buffer and the z-buffer, both sized at
//! construction. It hands out a [`FrameBuffer`] view for rasterization, draws
//! debug wireframes, and turns the finished buffer into an image.

use std::path::Path;

use image::{Rgb, RgbImage};

use super::framebuffer::FrameBuffer;
use crate::colors;
use crate::math::Vec3;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    background: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            color_buffer: vec![background; size],
            depth_buffer: vec![f32::NEG_INFINITY; size],
            width,
            height,
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Clear the depth buffer to prepare for a new render.
    /// Sets all depths to negative infinity so the first fragment always wins.
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(f32::NEG_INFINITY);
    }

    /// Restore both buffers to their initial state.
    pub fn reset(&mut self) {
        self.clear(self.background);
        self.clear_depth();
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(index) = self.index(x as i64, y as i64) {
            self.color_buffer[index] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x as i64, y as i64)
            .map(|index| self.color_buffer[index])
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Draws the three edges of a screen-space triangle. No depth testing.
    ///
    /// Each edge is clipped to the frame first, so vertices far off screen
    /// cost nothing beyond the visible part of the edge.
    pub fn draw_triangle_wireframe(&mut self, points: &[Vec3; 3], color: u32) {
        let (width, height) = (self.width as f64, self.height as f64);
        for i in 0..3 {
            let from = points[i];
            let to = points[(i + 1) % 3];
            let segment = [
                (from.x as f64, from.y as f64),
                (to.x as f64, to.y as f64),
            ];
            if let Some([(x0, y0), (x1, y1)]) = clip_segment(segment, width, height) {
                self.draw_line(x0 as i32, y0 as i32, x1 as i32, y1 as i32, color);
            }
        }
    }

    /// Draws a line by stepping one pixel at a time along the dominant axis.
    ///
    /// When the line is steeper than 45° the x and y roles are swapped so every
    /// step still advances exactly one pixel, and the endpoints are ordered so
    /// iteration always runs toward increasing x. The cross-axis coordinate is
    /// `y0 + (y1 - y0) * t`, truncated. Steps outside the frame are skipped,
    /// so any pair of endpoints is accepted.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (mut x0, mut y0, mut x1, mut y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);

        let steep = (x0 - x1).abs() < (y0 - y1).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        // Both endpoints coincide: a single pixel.
        if x0 == x1 {
            self.plot(x0, y0, steep, color);
            return;
        }

        let extent = i64::from(if steep { self.height } else { self.width });
        let span = (x1 - x0) as f64;
        let rise = (y1 - y0) as f64;
        for x in x0.max(0)..=x1.min(extent - 1) {
            let t = (x - x0) as f64 / span;
            let y = (y0 as f64 + rise * t) as i64;
            self.plot(x, y, steep, color);
        }
    }

    #[inline]
    fn plot(&mut self, x: i64, y: i64, steep: bool, color: u32) {
        let (x, y) = if steep { (y, x) } else { (x, y) };
        if let Some(index) = self.index(x, y) {
            self.color_buffer[index] = color;
        }
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }

    /// Converts the color buffer to an RGB image.
    ///
    /// Buffer row 0 is the bottom of the picture, so rows are flipped to put
    /// the origin at the bottom-left of the written image.
    pub fn to_image(&self) -> RgbImage {
        let (width, height) = (self.width, self.height);
        RgbImage::from_fn(width, height, |x, y| {
            let row = (height - 1 - y) as usize;
            let color = self.color_buffer[row * width as usize + x as usize];
            let (r, g, b) = colors::unpack_rgb(color);
            Rgb([r, g, b])
        })
    }

    /// Writes the image; the format follows the file extension (`.tga`, `.png`, ...).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}

/// Liang-Barsky clip of a segment against `[0, width] x [0, height]`.
///
/// Returns `None` when the segment misses the window or has a non-finite
/// coordinate. Endpoints inside the window come back unchanged.
fn clip_segment(
    segment: [(f64, f64); 2],
    width: f64,
    height: f64,
) -> Option<[(f64, f64); 2]> {
    let [(ax, ay), (bx, by)] = segment;
    if ![ax, ay, bx, by].iter().all(|c| c.is_finite()) {
        return None;
    }
    let (dx, dy) = (bx - ax, by - ay);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, ax), (dx, width - ax), (-dy, ay), (dy, height - ay)] {
        if p == 0.0 {
            // Parallel to this boundary and outside it.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let start = if t0 > 0.0 { (ax + dx * t0, ay + dy * t0) } else { (ax, ay) };
    let end = if t1 < 1.0 { (ax + dx * t1, ay + dy * t1) } else { (bx, by) };
    Some([start, end])
}
