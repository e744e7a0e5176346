//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a safe view into color and depth buffers with bounds-checked access.
//! The depth buffer enables hidden surface removal via the z-buffer algorithm.

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type - the [`Renderer`](super::Renderer)
/// owns the storage and hands this out for the duration of a draw.
///
/// # Depth Buffer
///
/// Depth is screen-space z taken straight from the transform stage, so larger
/// values are nearer the viewer. Each entry holds the largest depth accepted
/// so far at that pixel; a cleared buffer holds negative infinity.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from buffer slices and dimensions.
    ///
    /// # Panics
    /// Panics if buffer lengths don't match width * height
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Self {
        assert_eq!(
            color_buffer.len(),
            width as usize * height as usize,
            "Color buffer size doesn't match dimensions"
        );
        assert_eq!(
            depth_buffer.len(),
            width as usize * height as usize,
            "Depth buffer size doesn't match dimensions"
        );
        Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Depth test and update in one step.
    ///
    /// Accepts when `depth >= stored` (nearer or equal wins) and records the
    /// new depth. Out-of-bounds coordinates are always rejected.
    #[inline]
    pub fn test_and_set_depth(&mut self, x: i32, y: i32, depth: f32) -> bool {
        match self.index(x, y) {
            Some(idx) if depth >= self.depth_buffer[idx] => {
                self.depth_buffer[idx] = depth;
                true
            }
            _ => false,
        }
    }

    /// Set a pixel without depth testing. Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    /// Get the stored depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_keeps_maximum() {
        let mut color = vec![0u32; 4];
        let mut depth = vec![f32::NEG_INFINITY; 4];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        assert!(fb.test_and_set_depth(1, 1, 5.0));
        assert!(!fb.test_and_set_depth(1, 1, 4.0));
        assert!(fb.test_and_set_depth(1, 1, 5.0));
        assert!(fb.test_and_set_depth(1, 1, 9.0));
        assert_eq!(fb.get_depth(1, 1), Some(9.0));
        assert_eq!(fb.get_depth(0, 0), Some(f32::NEG_INFINITY));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut color = vec![0u32; 4];
        let mut depth = vec![f32::NEG_INFINITY; 4];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        assert!(!fb.test_and_set_depth(2, 0, 1.0));
        assert!(!fb.test_and_set_depth(0, -1, 1.0));
        fb.set_pixel(-1, 0, 7);
        fb.set_pixel(0, 2, 7);
        assert_eq!(fb.get_pixel(5, 5), None);
        assert!(color.iter().all(|&c| c == 0));
    }
}
