//! Error types for loading, configuration, and rendering.
//!
//! All fallible top-level operations return [`Result<T>`], an alias for
//! `Result<T, Error>`. Per-triangle problems (degenerate or culled faces) are
//! not errors; the render loop skips and counts them.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which per-face index array an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    TexCoord,
    Normal,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Vertex => write!(f, "vertex"),
            IndexKind::TexCoord => write!(f, "texture coordinate"),
            IndexKind::Normal => write!(f, "normal"),
        }
    }
}

/// What went wrong on a single line of a mesh file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("malformed number `{0}`")]
    MalformedNumber(String),

    #[error("`{0}` record is missing components")]
    MissingComponent(&'static str),

    #[error("face needs at least 3 vertices, found {0}")]
    TooFewVertices(usize),

    #[error("indices are 1-based, found 0")]
    ZeroIndex,
}

/// Failure to load a mesh or a texture.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),

    #[error("line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("face {face}: {kind} index {index} out of range ({len} available)")]
    IndexOutOfRange {
        face: usize,
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failure to load or validate a [`RenderConfig`](crate::config::RenderConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// The chosen shading mode cannot run with the inputs it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{0} shading requires a texture")]
    MissingTexture(&'static str),

    #[error("{0} shading requires texture coordinates on every face")]
    MissingTexCoords(&'static str),

    #[error("{0} shading requires vertex normals on every face")]
    MissingNormals(&'static str),
}

/// Top-level error for the renderer.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
