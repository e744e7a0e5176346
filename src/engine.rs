//! Core rendering engine.
//!
//! The [`Engine`] struct runs the render loop: for every face of a [`Mesh`] it
//! projects the three corners to screen space, picks a pixel shader for the
//! active [`ShadingMode`], and hands the triangle to the rasterizer. Faces
//! interact only through the shared z-buffer.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::colors;
use crate::config::RenderConfig;
use crate::error::{ConfigError, RenderError};
use crate::light::DirectionalLight;
use crate::math::{Vec2, Vec3};
use crate::mesh::{Face, Mesh};
use crate::render::{
    rasterize_triangle, BoxBlendShader, FlatShader, GouraudShader, PixelShader, Renderer,
    TextureModulateShader, TextureShader, Triangle,
};
use crate::texture::Texture;
use crate::transform::ScreenTransform;

/// Which pixel shader fills the triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// One light intensity per face, white.
    Flat,
    /// One light intensity per face, scaling the sampled texture.
    FlatTextured,
    /// Per-vertex intensity interpolated and written as grey.
    #[default]
    Gouraud,
    /// Per-vertex intensity interpolated, scaling the sampled texture.
    GouraudTextured,
    /// Random per-vertex colours blended across the bounding box.
    VertexColor,
}

impl ShadingMode {
    pub fn name(&self) -> &'static str {
        match self {
            ShadingMode::Flat => "flat",
            ShadingMode::FlatTextured => "flat textured",
            ShadingMode::Gouraud => "gouraud",
            ShadingMode::GouraudTextured => "gouraud textured",
            ShadingMode::VertexColor => "vertex color",
        }
    }

    pub fn needs_texture(&self) -> bool {
        matches!(self, ShadingMode::FlatTextured | ShadingMode::GouraudTextured)
    }

    fn is_gouraud(&self) -> bool {
        matches!(self, ShadingMode::Gouraud | ShadingMode::GouraudTextured)
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a vertex's Gouraud intensity is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensitySource {
    /// Vertex normal · light.
    #[default]
    Normal,
    /// Raw vertex position · light.
    Position,
}

/// Rendering mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Shaded triangles only.
    #[default]
    Filled,
    /// Triangle edges only, no depth test.
    Wireframe,
    /// Shaded triangles with their edges drawn on top.
    FilledWireframe,
}

impl RenderMode {
    fn draws_filled(&self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    fn draws_wireframe(&self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::FilledWireframe)
    }
}

/// Per-render counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub faces: usize,
    /// Faces handed to the rasterizer or drawn as wireframe.
    pub drawn: usize,
    /// Faces facing away from the light under flat lighting.
    pub culled: usize,
    /// Faces with a corner at or behind the eye plane.
    pub clipped: usize,
    /// Faces with zero screen-space area.
    pub degenerate: usize,
    pub pixels_written: usize,
}

pub struct Engine {
    renderer: Renderer,
    transform: ScreenTransform,
    light: DirectionalLight,
    shading: ShadingMode,
    intensity_source: IntensitySource,
    render_mode: RenderMode,
    wireframe_color: u32,
    seed: u64,
    rng: StdRng,
    vertex_colors: HashMap<(i32, i32), u32>,
}

impl Engine {
    pub fn new(
        width: u32,
        height: u32,
        transform: ScreenTransform,
        light: DirectionalLight,
    ) -> Self {
        Self {
            renderer: Renderer::new(width, height, colors::BLACK),
            transform,
            light,
            shading: ShadingMode::default(),
            intensity_source: IntensitySource::default(),
            render_mode: RenderMode::default(),
            wireframe_color: colors::WHITE,
            seed: 0,
            rng: StdRng::seed_from_u64(0),
            vertex_colors: HashMap::new(),
        }
    }

    /// Builds an engine from a configuration, validating it first.
    pub fn from_config(config: &RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            renderer: Renderer::new(config.width, config.height, config.background_color()),
            transform: config.screen_transform(),
            light: config.light()?,
            shading: config.shading,
            intensity_source: config.intensity_source,
            render_mode: config.render_mode,
            wireframe_color: config.wireframe_color(),
            seed: config.seed,
            rng: StdRng::seed_from_u64(config.seed),
            vertex_colors: HashMap::new(),
        })
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.shading = mode;
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading
    }

    pub fn set_intensity_source(&mut self, source: IntensitySource) {
        self.intensity_source = source;
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_wireframe_color(&mut self, color: u32) {
        self.wireframe_color = color;
    }

    /// Seed for the vertex colour generator. Takes effect immediately.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.vertex_colors.clear();
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Clears both buffers, reseeds the colour generator and forgets cached
    /// vertex colours, so the next render starts from scratch.
    pub fn reset(&mut self) {
        self.renderer.reset();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.vertex_colors.clear();
    }

    /// Checks that `mesh` and `texture` can feed the active shading mode.
    pub fn check_inputs(&self, mesh: &Mesh, texture: Option<&Texture>) -> Result<(), RenderError> {
        if !self.render_mode.draws_filled() || mesh.face_count() == 0 {
            return Ok(());
        }
        let mode = self.shading.name();
        if self.shading.needs_texture() {
            if texture.is_none() {
                return Err(RenderError::MissingTexture(mode));
            }
            if !mesh.has_texcoords() {
                return Err(RenderError::MissingTexCoords(mode));
            }
        }
        if self.shading.is_gouraud()
            && self.intensity_source == IntensitySource::Normal
            && !mesh.has_normals()
        {
            return Err(RenderError::MissingNormals(mode));
        }
        Ok(())
    }

    /// Renders `mesh` into a freshly reset frame.
    pub fn render(
        &mut self,
        mesh: &Mesh,
        texture: Option<&Texture>,
    ) -> Result<RenderStats, RenderError> {
        self.check_inputs(mesh, texture)?;
        self.reset();

        let mut stats = RenderStats {
            faces: mesh.face_count(),
            ..RenderStats::default()
        };
        let mut outlines = Vec::new();

        for face in mesh.faces() {
            let positions = mesh.face_positions(face);
            let Some(screen) = self.project(positions) else {
                stats.clipped += 1;
                continue;
            };
            let triangle = Triangle::new(screen);
            if triangle.is_degenerate() {
                stats.degenerate += 1;
                continue;
            }

            if self.render_mode.draws_filled() {
                match self.fill(mesh, face, &positions, &triangle, texture) {
                    Some(pixels) => stats.pixels_written += pixels,
                    None => {
                        stats.culled += 1;
                        continue;
                    }
                }
            }
            if self.render_mode.draws_wireframe() {
                outlines.push(screen);
            }
            stats.drawn += 1;
        }

        for points in &outlines {
            self.renderer
                .draw_triangle_wireframe(points, self.wireframe_color);
        }

        log::info!(
            "rendered {}/{} faces ({} shading), {} pixels written",
            stats.drawn,
            stats.faces,
            self.shading,
            stats.pixels_written
        );
        if stats.clipped > 0 {
            log::warn!(
                "{} of {} faces had a vertex behind the eye and were skipped",
                stats.clipped,
                stats.faces
            );
        }
        log::debug!(
            "skipped faces: {} culled, {} behind the eye, {} degenerate",
            stats.culled,
            stats.clipped,
            stats.degenerate
        );
        Ok(stats)
    }

    fn project(&self, positions: [Vec3; 3]) -> Option<[Vec3; 3]> {
        let [a, b, c] = positions;
        Some([
            self.transform.project(a)?,
            self.transform.project(b)?,
            self.transform.project(c)?,
        ])
    }

    /// Rasterizes one face with the active shader. Returns `None` when the face
    /// is culled by flat lighting.
    fn fill(
        &mut self,
        mesh: &Mesh,
        face: &Face,
        positions: &[Vec3; 3],
        triangle: &Triangle,
        texture: Option<&Texture>,
    ) -> Option<usize> {
        match self.shading {
            ShadingMode::Flat => {
                let intensity = self.lit_face_intensity(positions)?;
                Some(self.rasterize(triangle, &FlatShader::lit(intensity)))
            }
            ShadingMode::FlatTextured => {
                let intensity = self.lit_face_intensity(positions)?;
                let shader = TextureShader::new(texture?, face_uvs(mesh, face), intensity);
                Some(self.rasterize(triangle, &shader))
            }
            ShadingMode::Gouraud => {
                let intensities = self.vertex_intensities(mesh, face, positions);
                Some(self.rasterize(triangle, &GouraudShader::new(intensities)))
            }
            ShadingMode::GouraudTextured => {
                let intensities = self.vertex_intensities(mesh, face, positions);
                let shader = TextureModulateShader::new(texture?, face_uvs(mesh, face), intensities);
                Some(self.rasterize(triangle, &shader))
            }
            ShadingMode::VertexColor => {
                let intensity = self.lit_face_intensity(positions)?;
                let colors = triangle
                    .points
                    .map(|p| self.vertex_color(p, intensity));
                let shader = BoxBlendShader::new(colors, triangle.bounding_box());
                Some(self.rasterize(triangle, &shader))
            }
        }
    }

    fn rasterize<S: PixelShader>(&mut self, triangle: &Triangle, shader: &S) -> usize {
        let mut fb = self.renderer.as_framebuffer();
        rasterize_triangle(triangle, shader, &mut fb)
    }

    /// Flat face intensity, or `None` when the face points away from the light.
    fn lit_face_intensity(&self, positions: &[Vec3; 3]) -> Option<f32> {
        let intensity = self.light.face_intensity(positions);
        (intensity > 0.0).then_some(intensity)
    }

    fn vertex_intensities(&self, mesh: &Mesh, face: &Face, positions: &[Vec3; 3]) -> [f32; 3] {
        match (self.intensity_source, mesh.face_normals(face)) {
            (IntensitySource::Normal, Some(normals)) => {
                normals.map(|n| self.light.intensity(n.normalize()))
            }
            // Only reachable for a face without normals; check_inputs rejects
            // such meshes up front.
            (IntensitySource::Normal, None) => [0.0; 3],
            (IntensitySource::Position, _) => positions.map(|v| self.light.intensity(v)),
        }
    }

    /// Colour for the vertex at screen position `p`, generated on first use.
    fn vertex_color(&mut self, p: Vec3, intensity: f32) -> u32 {
        let key = (p.x as i32, p.y as i32);
        let rng = &mut self.rng;
        *self.vertex_colors.entry(key).or_insert_with(|| {
            let r = rng.gen_range(0..255u8) as f32;
            let g = rng.gen_range(0..255u8) as f32;
            let b = rng.gen_range(0..255u8) as f32;
            colors::pack_channels(r * intensity, g * intensity, b * intensity)
        })
    }
}

/// Face UVs, or the origin for a face without them (check_inputs rejects
/// such meshes for the textured modes).
fn face_uvs(mesh: &Mesh, face: &Face) -> [Vec2; 3] {
    mesh.face_texcoords(face).unwrap_or([Vec2::ZERO; 3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceVertex;

    fn light() -> DirectionalLight {
        DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0)).unwrap()
    }

    fn engine(width: u32, height: u32) -> Engine {
        Engine::new(
            width,
            height,
            ScreenTransform::orthographic(width, height),
            light(),
        )
    }

    /// One triangle facing the light (normal (0, 0, -1)).
    fn facing_mesh(with_normals: bool, with_uvs: bool) -> Mesh {
        let vertices = vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ];
        let texcoords = if with_uvs {
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]
        } else {
            vec![]
        };
        let normals = if with_normals {
            vec![Vec3::new(0.0, 0.0, -1.0)]
        } else {
            vec![]
        };
        let corner = |i: usize| {
            FaceVertex::new(
                i,
                with_uvs.then_some(i),
                with_normals.then_some(0),
            )
        };
        let faces = vec![Face::new([corner(0), corner(1), corner(2)])];
        Mesh::from_parts(vertices, texcoords, normals, faces).unwrap()
    }

    #[test]
    fn test_flat_fills_facing_triangle() {
        let mut engine = engine(20, 20);
        engine.set_shading_mode(ShadingMode::Flat);
        let stats = engine.render(&facing_mesh(false, false), None).unwrap();
        assert_eq!(stats.faces, 1);
        assert_eq!(stats.drawn, 1);
        assert!(stats.pixels_written > 0);
        assert_eq!(engine.renderer().pixel(7, 7), Some(colors::WHITE));
    }

    #[test]
    fn test_flat_culls_faces_away_from_light() {
        let mut engine = Engine::new(
            20,
            20,
            ScreenTransform::orthographic(20, 20),
            DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0)).unwrap(),
        );
        engine.set_shading_mode(ShadingMode::Flat);
        let stats = engine.render(&facing_mesh(false, false), None).unwrap();
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.pixels_written, 0);
        assert!(engine
            .renderer()
            .color_buffer()
            .iter()
            .all(|&c| c == colors::BLACK));
    }

    #[test]
    fn test_gouraud_requires_normals() {
        let mut engine = engine(20, 20);
        assert_eq!(
            engine.render(&facing_mesh(false, false), None),
            Err(RenderError::MissingNormals("gouraud"))
        );
        engine.set_intensity_source(IntensitySource::Position);
        assert!(engine.render(&facing_mesh(false, false), None).is_ok());
    }

    #[test]
    fn test_textured_modes_require_inputs() {
        let mut engine = engine(20, 20);
        engine.set_shading_mode(ShadingMode::FlatTextured);
        assert_eq!(
            engine.render(&facing_mesh(true, true), None),
            Err(RenderError::MissingTexture("flat textured"))
        );
        let texture = Texture::new(1, 1, vec![colors::RED]);
        assert_eq!(
            engine.render(&facing_mesh(true, false), Some(&texture)),
            Err(RenderError::MissingTexCoords("flat textured"))
        );
        assert!(engine.render(&facing_mesh(true, true), Some(&texture)).is_ok());
        assert_eq!(engine.renderer().pixel(7, 7), Some(colors::RED));
    }

    #[test]
    fn test_wireframe_skips_capability_checks() {
        let mut engine = engine(20, 20);
        engine.set_render_mode(RenderMode::Wireframe);
        engine.set_shading_mode(ShadingMode::GouraudTextured);
        let stats = engine.render(&facing_mesh(false, false), None).unwrap();
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.pixels_written, 0);
        // Corner (-0.5, -0.5) lands on pixel (5, 5).
        assert_eq!(engine.renderer().pixel(5, 5), Some(colors::WHITE));
        // Interior stays empty.
        assert_eq!(engine.renderer().pixel(7, 7), Some(colors::BLACK));
    }

    #[test]
    fn test_wireframe_with_far_vertex() {
        let mut engine = engine(20, 20);
        engine.set_render_mode(RenderMode::Wireframe);
        let vertices = vec![
            Vec3::new(-1e10, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        ];
        let corner = |i| FaceVertex::new(i, None, None);
        let faces = vec![Face::new([corner(0), corner(1), corner(2)])];
        let mesh = Mesh::from_parts(vertices, vec![], vec![], faces).unwrap();

        let stats = engine.render(&mesh, None).unwrap();
        assert_eq!(stats.drawn, 1);
        // The bottom edge runs along row 5 from off screen to x = 15.
        for x in 0..=15 {
            assert_eq!(engine.renderer().pixel(x, 5), Some(colors::WHITE));
        }
        assert_eq!(engine.renderer().pixel(16, 5), Some(colors::BLACK));
    }

    #[test]
    fn test_gouraud_normal_intensity() {
        let mut engine = engine(20, 20);
        let stats = engine.render(&facing_mesh(true, false), None).unwrap();
        assert!(stats.pixels_written > 0);
        assert_eq!(engine.renderer().pixel(7, 7), Some(colors::WHITE));
    }

    #[test]
    fn test_vertex_colors_are_deterministic() {
        let mesh = facing_mesh(false, false);
        let mut engine = engine(20, 20);
        engine.set_shading_mode(ShadingMode::VertexColor);
        engine.set_seed(7);

        engine.render(&mesh, None).unwrap();
        let first = engine.renderer().color_buffer().to_vec();
        engine.render(&mesh, None).unwrap();
        assert_eq!(engine.renderer().color_buffer(), &first[..]);
        assert!(first.iter().any(|&c| c != colors::BLACK));
    }

    #[test]
    fn test_vertex_color_cache_is_keyed_by_screen_position() {
        let mut engine = engine(20, 20);
        let a = engine.vertex_color(Vec3::new(3.2, 4.9, 0.0), 1.0);
        let b = engine.vertex_color(Vec3::new(3.7, 4.1, 5.0), 0.5);
        assert_eq!(a, b);
        assert_eq!(engine.vertex_colors.len(), 1);
        engine.reset();
        assert!(engine.vertex_colors.is_empty());
    }

    #[test]
    fn test_points_behind_eye_are_counted() {
        use crate::camera::Camera;
        let camera = Camera::new(Vec3::new(0.0, 0.0, 0.4), Vec3::ZERO, Vec3::UP);
        let transform = ScreenTransform::perspective(&camera, 20, 20, 255.0);
        let mut engine = Engine::new(20, 20, transform, light());
        engine.set_shading_mode(ShadingMode::Flat);
        let vertices = vec![
            Vec3::new(-0.5, -0.5, 1.0),
            Vec3::new(0.5, -0.5, 1.0),
            Vec3::new(-0.5, 0.5, 1.0),
        ];
        let corner = |i| FaceVertex::new(i, None, None);
        let faces = vec![Face::new([corner(0), corner(1), corner(2)])];
        let mesh = Mesh::from_parts(vertices, vec![], vec![], faces).unwrap();
        let stats = engine.render(&mesh, None).unwrap();
        assert_eq!(stats.clipped, 1);
        assert_eq!(stats.drawn, 0);
    }
}
