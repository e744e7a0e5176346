//! Render settings.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! reproduces the stock render:
//!
//! ```toml
//! width = 800
//! height = 800
//! depth = 255.0
//! projection = "perspective"
//! light_dir = [1.0, -1.0, 1.0]
//! shading = "gouraud"
//! intensity_source = "normal"
//! render_mode = "filled"
//! texture = "texture/african_head_diffuse.tga"
//! output = "output.tga"
//! background = [0, 0, 0]
//! wireframe_color = [255, 255, 255]
//! seed = 0
//!
//! [camera]
//! eye = [1.0, 1.0, 3.0]
//! center = [0.0, 0.0, 0.0]
//! up = [0.0, 1.0, 0.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::colors;
use crate::engine::{IntensitySource, RenderMode, ShadingMode};
use crate::error::ConfigError;
use crate::light::DirectionalLight;
use crate::math::Vec3;
use crate::projection::Projection;
use crate::transform::ScreenTransform;

pub const DEFAULT_MESH: &str = "obj/african_head.obj";
pub const DEFAULT_TEXTURE: &str = "texture/african_head_diffuse.tga";
pub const DEFAULT_OUTPUT: &str = "output.tga";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub center: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [1.0, 1.0, 3.0],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl CameraConfig {
    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from_array(self.eye),
            Vec3::from_array(self.center),
            Vec3::from_array(self.up),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Depth range of the viewport: screen z spans `[0, depth]`.
    pub depth: f32,
    pub projection: Projection,
    /// Normalized on use.
    pub light_dir: [f32; 3],
    pub shading: ShadingMode,
    pub intensity_source: IntensitySource,
    pub render_mode: RenderMode,
    /// Only read by the textured shading modes.
    pub texture: Option<PathBuf>,
    pub output: PathBuf,
    pub background: [u8; 3],
    pub wireframe_color: [u8; 3],
    /// Seed for the vertex colour generator.
    pub seed: u64,
    pub camera: CameraConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            depth: 255.0,
            projection: Projection::default(),
            light_dir: [1.0, -1.0, 1.0],
            shading: ShadingMode::default(),
            intensity_source: IntensitySource::default(),
            render_mode: RenderMode::default(),
            texture: Some(PathBuf::from(DEFAULT_TEXTURE)),
            output: PathBuf::from(DEFAULT_OUTPUT),
            background: [0, 0, 0],
            wireframe_color: [255, 255, 255],
            seed: 0,
            camera: CameraConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Reads and validates a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = contents.parse()?;
        log::info!("loaded config {}", path.display());
        Ok(config)
    }

    /// Rejects settings the pipeline cannot render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::Invalid(format!(
                "frame size {}x{} is too large",
                self.width, self.height
            )));
        }
        if !self.depth.is_finite() || self.depth <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "depth must be positive, got {}",
                self.depth
            )));
        }
        self.light()?;
        if self.projection == Projection::Perspective && !self.camera.camera().is_valid() {
            return Err(ConfigError::Invalid(
                "camera eye must differ from center, and up must not be parallel to the view direction"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn light(&self) -> Result<DirectionalLight, ConfigError> {
        DirectionalLight::new(Vec3::from_array(self.light_dir)).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "light direction {:?} has no usable length",
                self.light_dir
            ))
        })
    }

    pub fn screen_transform(&self) -> ScreenTransform {
        self.projection
            .screen_transform(&self.camera.camera(), self.width, self.height, self.depth)
    }

    pub fn background_color(&self) -> u32 {
        let [r, g, b] = self.background;
        colors::pack_rgb(r, g, b)
    }

    pub fn wireframe_color(&self) -> u32 {
        let [r, g, b] = self.wireframe_color;
        colors::pack_rgb(r, g, b)
    }
}

impl std::str::FromStr for RenderConfig {
    type Err = ConfigError;

    /// Parses and validates TOML text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RenderConfig = "".parse().unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.width, 800);
        assert_eq!(config.shading, ShadingMode::Gouraud);
        assert_eq!(config.projection, Projection::Perspective);
        assert_eq!(config.output, PathBuf::from("output.tga"));
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: RenderConfig = r#"
            width = 320
            shading = "vertex_color"
            render_mode = "filled_wireframe"
            projection = "orthographic"

            [camera]
            eye = [0.0, 0.0, 5.0]
        "#
        .parse()
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 800);
        assert_eq!(config.shading, ShadingMode::VertexColor);
        assert_eq!(config.render_mode, RenderMode::FilledWireframe);
        assert_eq!(config.projection, Projection::Orthographic);
        assert_eq!(config.camera.eye, [0.0, 0.0, 5.0]);
        assert_eq!(config.camera.up, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rejects_zero_size() {
        let err = "width = 0".parse::<RenderConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_oversized_frame() {
        let err = "width = 70000\nheight = 70000"
            .parse::<RenderConfig>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!("width = 4096\nheight = 4096".parse::<RenderConfig>().is_ok());
    }

    #[test]
    fn test_rejects_zero_light() {
        let err = "light_dir = [0.0, 0.0, 0.0]"
            .parse::<RenderConfig>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_parallel_up() {
        let text = "[camera]\neye = [0.0, 4.0, 0.0]\nup = [0.0, 1.0, 0.0]";
        assert!(matches!(
            text.parse::<RenderConfig>(),
            Err(ConfigError::Invalid(_))
        ));
        // The orthographic mapping never builds a camera basis.
        let ortho = format!("projection = \"orthographic\"\n{text}");
        assert!(ortho.parse::<RenderConfig>().is_ok());
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            "width = ".parse::<RenderConfig>(),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            "shading = \"phong\"".parse::<RenderConfig>(),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "height = 600\nseed = 42").unwrap();
        let config = RenderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.height, 600);
        assert_eq!(config.seed, 42);

        assert!(matches!(
            RenderConfig::from_file("no/such/config.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = RenderConfig {
            shading: ShadingMode::FlatTextured,
            background: [10, 20, 30],
            ..RenderConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: RenderConfig = text.parse().unwrap();
        assert_eq!(back, config);
        assert_eq!(back.background_color(), colors::pack_rgb(10, 20, 30));
    }
}
