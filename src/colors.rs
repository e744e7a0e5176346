//! Packed ARGB8888 colour helpers.
//!
//! Colours travel through the pipeline as `u32` in `0xAARRGGBB` layout, the
//! same layout the frame buffer stores. Every operation that scales a channel
//! clamps the result to `0..=255` before packing.

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const RED: u32 = 0xFFFF0000;
pub const GREEN: u32 = 0xFF00FF00;
pub const BLUE: u32 = 0xFF0000FF;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Clamps a channel value in `0.0..=255.0` space and truncates it to a byte.
#[inline]
pub fn clamp_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Packs floating-point channels given in `0.0..=255.0` space.
#[inline]
pub fn pack_channels(r: f32, g: f32, b: f32) -> u32 {
    pack_rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b))
}

/// Scales every channel of `color` by `intensity`.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let (r, g, b) = unpack_rgb(color);
    pack_channels(
        r as f32 * intensity,
        g as f32 * intensity,
        b as f32 * intensity,
    )
}

/// Grey level for an intensity in `[0, 1]`.
#[inline]
pub fn gray(intensity: f32) -> u32 {
    let level = clamp_channel(255.0 * intensity);
    pack_rgb(level, level, level)
}
