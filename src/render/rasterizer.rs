//! Barycentric triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. Compute the triangle's integer bounding box and clamp it to the frame.
//! 2. For every integer pixel `P` in the box, evaluate the three edge
//!    numerators of the barycentric weights.
//! 3. Keep `P` when the weights pass the edge-ownership test.
//! 4. Interpolate depth, run the z-buffer test, and only then ask the shader
//!    for a colour.
//!
//! # Barycentric Coordinates
//!
//! ```text
//! area  = (B.x - A.x) * (C.y - A.y) - (C.x - A.x) * (B.y - A.y)
//! alpha = ((B.y - C.y) * (P.x - C.x) + (C.x - B.x) * (P.y - C.y)) / area
//! beta  = ((C.y - A.y) * (P.x - C.x) + (A.x - C.x) * (P.y - C.y)) / area
//! gamma = 1 - alpha - beta
//! ```
//!
//! The inside test works on the numerators, each multiplied by the sign of
//! `area`, so both windings are handled and integer-valued vertices give
//! exact zeros on the edges.
//!
//! # Edge Ownership
//!
//! A pixel exactly on an edge belongs to only one of the two triangles that
//! share that edge. An edge is owned when its inward-pointing normal has
//! `y > 0`, or `y == 0` and `x > 0`. The neighbour sees the same edge with the
//! opposite inward normal, so exactly one side claims it.

use super::framebuffer::FrameBuffer;
use super::shader::{Fragment, PixelShader};
use crate::math::{Vec2, Vec3};

/// Area magnitude at or below which a triangle is treated as degenerate.
const AREA_EPSILON: f32 = f32::EPSILON;

/// A triangle in screen space: pixel x/y plus depth in z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
}

impl Triangle {
    pub fn new(points: [Vec3; 3]) -> Self {
        Self { points }
    }

    /// Twice the signed area of the projected triangle.
    pub fn signed_area(&self) -> f32 {
        let [a, b, c] = self.points;
        signed_area(a.xy(), b.xy(), c.xy())
    }

    pub fn is_degenerate(&self) -> bool {
        let area = self.signed_area();
        !area.is_finite() || area.abs() <= AREA_EPSILON
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of(&self.points)
    }
}

/// Inclusive integer pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Integer min/max (floored) over the points' x and y coordinates.
    pub fn of(points: &[Vec3; 3]) -> Self {
        let [a, b, c] = points;
        Self {
            min_x: a.x.min(b.x).min(c.x).floor() as i32,
            min_y: a.y.min(b.y).min(c.y).floor() as i32,
            max_x: a.x.max(b.x).max(c.x).floor() as i32,
            max_y: a.y.max(b.y).max(c.y).floor() as i32,
        }
    }

    /// Clamps to `[0, width - 1] × [0, height - 1]`.
    ///
    /// Returns `None` when nothing of the box is left on screen.
    pub fn clamp(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let clamped = Self {
            min_x: self.min_x.max(0),
            min_y: self.min_y.max(0),
            max_x: self.max_x.min(width as i32 - 1),
            max_y: self.max_y.min(height as i32 - 1),
        };
        (clamped.min_x <= clamped.max_x && clamped.min_y <= clamped.max_y).then_some(clamped)
    }
}

/// Twice the signed area of triangle `abc`.
#[inline]
pub fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Un-normalized weights for `p`: each one is `alpha`, `beta`, `gamma`
/// multiplied by the signed area.
#[inline]
fn edge_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> [f32; 3] {
    [
        (b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y),
        (c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y),
        (a.y - b.y) * (p.x - a.x) + (b.x - a.x) * (p.y - a.y),
    ]
}

/// Barycentric weights `[alpha, beta, gamma]` of `p` against triangle `abc`.
///
/// Returns `None` for a degenerate (collinear or non-finite) triangle.
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<[f32; 3]> {
    let area = signed_area(a, b, c);
    if !area.is_finite() || area.abs() <= AREA_EPSILON {
        return None;
    }
    let [w0, w1, _] = edge_weights(a, b, c, p);
    let alpha = w0 / area;
    let beta = w1 / area;
    Some([alpha, beta, 1.0 - alpha - beta])
}

/// Which of a triangle's edges claim the pixels lying exactly on them.
///
/// Index `i` refers to the edge opposite vertex `i`, matching the weight
/// that becomes zero along it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeOwnership {
    owned: [bool; 3],
}

impl EdgeOwnership {
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self {
            owned: [
                owns_edge(b, c, a),
                owns_edge(c, a, b),
                owns_edge(a, b, c),
            ],
        }
    }

    /// Whether the edge opposite vertex `i` is owned.
    pub fn owns(&self, i: usize) -> bool {
        self.owned[i]
    }

    /// Inside test on weights oriented so the interior is positive.
    #[inline]
    pub fn accepts(&self, weights: [f32; 3]) -> bool {
        weights
            .iter()
            .zip(self.owned)
            .all(|(&w, owned)| w > 0.0 || (w == 0.0 && owned))
    }
}

fn owns_edge(from: Vec2, to: Vec2, opposite: Vec2) -> bool {
    let e = to - from;
    let mut normal = Vec2::new(-e.y, e.x);
    if normal.dot(opposite - from) < 0.0 {
        normal = -normal;
    }
    normal.y > 0.0 || (normal.y == 0.0 && normal.x > 0.0)
}

/// Fills `triangle` into `buffer`, calling `shader` for each pixel that is
/// inside and passes the depth test.
///
/// Degenerate triangles and triangles entirely off screen write nothing.
/// Returns the number of pixels written.
pub fn rasterize_triangle<S: PixelShader>(
    triangle: &Triangle,
    shader: &S,
    buffer: &mut FrameBuffer,
) -> usize {
    if triangle.is_degenerate() {
        return 0;
    }
    let Some(bbox) = triangle
        .bounding_box()
        .clamp(buffer.width(), buffer.height())
    else {
        return 0;
    };

    let [a, b, c] = triangle.points;
    let (a2, b2, c2) = (a.xy(), b.xy(), c.xy());
    let area = signed_area(a2, b2, c2);
    let orientation = area.signum();
    let ownership = EdgeOwnership::new(a2, b2, c2);

    let mut written = 0;
    for y in bbox.min_y..=bbox.max_y {
        for x in bbox.min_x..=bbox.max_x {
            let p = Vec2::new(x as f32, y as f32);
            let weights = edge_weights(a2, b2, c2, p).map(|w| w * orientation);
            if !ownership.accepts(weights) {
                continue;
            }

            let alpha = weights[0] * orientation / area;
            let beta = weights[1] * orientation / area;
            let lambda = [alpha, beta, 1.0 - alpha - beta];
            let depth = lambda[0] * a.z + lambda[1] * b.z + lambda[2] * c.z;

            if buffer.test_and_set_depth(x, y, depth) {
                let fragment = Fragment {
                    x,
                    y,
                    lambda,
                    depth,
                };
                buffer.set_pixel(x, y, shader.shade(&fragment));
                written += 1;
            }
        }
    }
    written
}
