use std::path::PathBuf;

use clap::Parser;
use tinyrast::config::{RenderConfig, DEFAULT_MESH};
use tinyrast::{Engine, Error, Mesh, Texture};

/// Render a Wavefront OBJ mesh to an image file.
#[derive(Parser)]
#[command(name = "tinyrast")]
#[command(about = "Software triangle rasterizer")]
struct Cli {
    /// Mesh to render
    #[arg(default_value = DEFAULT_MESH)]
    mesh: PathBuf,

    /// TOML file with render settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    let mesh = Mesh::from_obj(&cli.mesh)?;
    let texture = match (&config.texture, config.shading.needs_texture()) {
        (Some(path), true) => Some(Texture::from_file(path)?),
        _ => None,
    };

    let mut engine = Engine::from_config(&config)?;
    engine.render(&mesh, texture.as_ref())?;

    engine
        .renderer()
        .save(&config.output)
        .map_err(|source| Error::Output {
            path: config.output.clone(),
            source,
        })?;
    log::info!("wrote {}", config.output.display());

    Ok(())
}
