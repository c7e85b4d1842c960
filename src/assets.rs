//! Texture cache.
//!
//! The cache is an arena: it owns every `Texture` and hands out copyable
//! `TextureHandle`s. Entities only ever store handles, so dropping an entity
//! never frees texture data. The same path always yields the same handle.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Turns an asset path into texture data. Swapped out in tests and by the
/// terminal front-end.
pub trait TextureLoader {
    fn load(&mut self, path: &Path) -> Result<Texture, GameError>;
}

/// Reads image headers from disk. Relative paths are resolved against the
/// asset directory first, then against the working directory.
pub struct ImageFileLoader {
    root: PathBuf,
}

impl ImageFileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let under_root = self.root.join(path);
        if under_root.exists() {
            under_root
        } else {
            path.to_path_buf()
        }
    }
}

impl TextureLoader for ImageFileLoader {
    fn load(&mut self, path: &Path) -> Result<Texture, GameError> {
        let resolved = self.resolve(path);
        let (width, height) =
            image::image_dimensions(&resolved).map_err(|e| GameError::texture_load(&resolved, e))?;
        Ok(Texture {
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

pub struct TextureCache {
    loader: Box<dyn TextureLoader>,
    textures: Vec<Texture>,
    by_path: HashMap<PathBuf, TextureHandle>,
    /// Paths that already failed once; not retried so the log stays readable.
    missing: HashSet<PathBuf>,
}

impl TextureCache {
    pub fn new(loader: impl TextureLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            textures: Vec::new(),
            by_path: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    /// Lookup-or-load. `None` means the caller renders nothing for this
    /// entity; the failure has already been logged.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Option<TextureHandle> {
        let path = path.as_ref();
        if let Some(handle) = self.by_path.get(path) {
            return Some(*handle);
        }
        if self.missing.contains(path) {
            return None;
        }

        match self.loader.load(path) {
            Ok(texture) => {
                let handle = TextureHandle(self.textures.len() as u32);
                self.textures.push(texture);
                self.by_path.insert(path.to_path_buf(), handle);
                tracing::debug!("loaded texture {} as #{}", path.display(), handle.0);
                Some(handle)
            }
            Err(err) => {
                tracing::error!("{err}");
                self.missing.insert(path.to_path_buf());
                None
            }
        }
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.index())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

// ── Sprite set ────────────────────────────────────────────────────────────────

pub const PLAYER_TEXTURE: &str = "MainCharacter.bmp";
pub const PLAYER_ARROW_TEXTURE: &str = "arrow.bmp";
pub const ENEMY_TEXTURE: &str = "UndeadArchers.bmp";
pub const ENEMY_ARROW_TEXTURE: &str = "Arrow.bmp";
pub const RAIN_TEXTURE: &str = "EvilSpikes.bmp";
pub const SPREAD_TEXTURE: &str = "SoulReaper.bmp";
pub const ULTIMATE_TEXTURE: &str = "fireball.bmp";
pub const GHOST_TEXTURE: &str = "CursedFire.bmp";
pub const SLASH_TEXTURE: &str = "Slash.bmp";

/// Handles for every sprite a stage spawns at runtime, resolved once at
/// stage start so firing code never touches the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpriteSet {
    pub player: Option<TextureHandle>,
    pub player_arrow: Option<TextureHandle>,
    pub enemy: Option<TextureHandle>,
    pub enemy_arrow: Option<TextureHandle>,
    pub rain: Option<TextureHandle>,
    pub spread: Option<TextureHandle>,
    pub ultimate: Option<TextureHandle>,
    pub ghost: Option<TextureHandle>,
    pub slash: Option<TextureHandle>,
}

impl SpriteSet {
    pub fn load(cache: &mut TextureCache) -> Self {
        Self {
            player: cache.load(PLAYER_TEXTURE),
            player_arrow: cache.load(PLAYER_ARROW_TEXTURE),
            enemy: cache.load(ENEMY_TEXTURE),
            enemy_arrow: cache.load(ENEMY_ARROW_TEXTURE),
            rain: cache.load(RAIN_TEXTURE),
            spread: cache.load(SPREAD_TEXTURE),
            ultimate: cache.load(ULTIMATE_TEXTURE),
            ghost: cache.load(GHOST_TEXTURE),
            slash: cache.load(SLASH_TEXTURE),
        }
    }
}
