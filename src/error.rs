//! Error type shared by the loaders and the render surface.
//!
//! Nothing in here is allowed to escape a frame: callers log the error with
//! `tracing` and carry on with a degraded result (no texture, default boss,
//! empty script).

use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// A boss or stage configuration file could not be read.
    ConfigIo { path: PathBuf, reason: String },
    /// A dialogue script could not be read.
    ScriptIo { path: PathBuf, reason: String },
    /// A texture could not be decoded or found.
    TextureLoad { path: PathBuf, reason: String },
    /// The render surface refused a draw call.
    Render(String),
}

impl GameError {
    pub fn config_io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::ConfigIo {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn script_io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::ScriptIo {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn texture_load(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::TextureLoad {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigIo { path, reason } => {
                write!(f, "could not open config file {}: {reason}", path.display())
            }
            Self::ScriptIo { path, reason } => {
                write!(f, "could not open dialogue file {}: {reason}", path.display())
            }
            Self::TextureLoad { path, reason } => {
                write!(f, "failed to load texture {}: {reason}", path.display())
            }
            Self::Render(reason) => write!(f, "render failed: {reason}"),
        }
    }
}

impl std::error::Error for GameError {}
