//! Runtime settings read from `BOW_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use crate::boss::{BOSS_SIZE, X_RANGE, Y_RANGE};
use crate::entities::Stage;
use crate::player::PLAYER_SIZE;
use crate::transform::Screen;

pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;
pub const DEFAULT_ASSET_DIR: &str = "Assets";
pub const DEFAULT_TARGET_FPS: u32 = 60;
pub const DEFAULT_LOG_FILE: &str = "bow_shooter.log";

/// Narrowest screen that still holds the boss wander band.
pub const MIN_SCREEN_WIDTH: u32 = (X_RANGE.1 + BOSS_SIZE) as u32;
/// Shortest screen that fits a low-flying boss above the player.
pub const MIN_SCREEN_HEIGHT: u32 = (Y_RANGE.1 + BOSS_SIZE + PLAYER_SIZE.1) as u32;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub asset_dir: PathBuf,
    pub target_fps: u32,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            target_fps: DEFAULT_TARGET_FPS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read_u32 = |name: &str, default: u32, min: u32| match lookup(name) {
            None => default,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value >= min => value,
                Ok(value) if value > 0 => {
                    tracing::warn!("{name}={value} is below the minimum of {min}, using {default}");
                    default
                }
                _ => {
                    tracing::warn!("{name}={raw:?} is not a positive integer, using {default}");
                    default
                }
            },
        };
        let read_path = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            screen_width: read_u32("BOW_SCREEN_WIDTH", DEFAULT_SCREEN_WIDTH, MIN_SCREEN_WIDTH),
            screen_height: read_u32("BOW_SCREEN_HEIGHT", DEFAULT_SCREEN_HEIGHT, MIN_SCREEN_HEIGHT),
            asset_dir: read_path("BOW_ASSET_DIR", DEFAULT_ASSET_DIR),
            target_fps: read_u32("BOW_TARGET_FPS", DEFAULT_TARGET_FPS, 1),
            log_file: read_path("BOW_LOG_FILE", DEFAULT_LOG_FILE),
        }
    }

    pub fn screen(&self) -> Screen {
        Screen::new(self.screen_width as f32, self.screen_height as f32)
    }

    pub fn frame_budget_ms(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::new(&self.asset_dir)
    }
}

/// Where a stage finds its boss files and scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn boss_config(&self, stage: Stage) -> PathBuf {
        self.root.join(stage.boss_config())
    }
}
