//! Boss behavior: wandering, attack patterns and config loading.
//!
//! A boss is configured from a small `Key: Value` text file, wanders inside a
//! fixed band near the top of the screen and runs every pattern in its list
//! whenever that pattern's cooldown lapses.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::assets::{SpriteSet, TextureCache, TextureHandle};
use crate::clock::Frame;
use crate::component::{Actor, Component, Entity, Sprite};
use crate::entities::{BossId, MotionKind, Owner, Pattern};
use crate::error::GameError;
use crate::projectile::{self, LaunchGate, Projectile, PLAYER_MIN_INTERVAL_MS};
use crate::render::RenderSurface;
use crate::transform::{Hitbox, Rect, Screen, Transform};

pub const BOSS_SIZE: f32 = 300.0;
pub const BOSS_SPEED: f32 = 100.0;
pub const DEFAULT_HP: i32 = 10;

/// Horizontal wander band for the boss's left edge.
pub const X_RANGE: (f32, f32) = (400.0, 1500.0);
/// Vertical wander band, only used by bosses that roam vertically.
pub const Y_RANGE: (f32, f32) = (0.0, 200.0);
/// Seconds between two direction coin tosses.
pub const DIRECTION_INTERVAL: std::ops::Range<f32> = 0.5..5.0;

/// Hostile rows spawn this far below the boss's top edge.
const BELOW_BOSS: f32 = 310.0;

const RAIN_COUNT: usize = 7;
const RAIN_BAND: f32 = 800.0;
const RAIN_SIZE: f32 = 60.0;

const SPREAD_SIZE: f32 = 100.0;
const SPREAD_SPEED: f32 = 200.0;

const ULTIMATE_SHOT_SIZE: f32 = 24.0;
const ULTIMATE_SPEED: f32 = 400.0;
/// Share of the boss width covered by an ultimate row.
const ULTIMATE_COVERAGE: f32 = 0.7;

const GHOST_SIZE: f32 = 80.0;
const GHOST_SPEED: f32 = 100.0;

const SLASH_SIZE: (f32, f32) = (160.0, 120.0);
const SLASH_SPEED: f32 = 450.0;

// ── Config ────────────────────────────────────────────────────────────────────

/// Something in a boss file that was skipped rather than applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    UnknownPattern(String),
    UnknownId(String),
    BadHp(String),
    MissingTexture,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPattern(token) => write!(f, "unknown pattern type: {token}"),
            Self::UnknownId(token) => write!(f, "unknown boss id: {token}"),
            Self::BadHp(value) => write!(f, "HP is not an integer: {value}"),
            Self::MissingTexture => write!(f, "no texture path set for boss"),
        }
    }
}

/// Values read from a boss file. Keys that never appeared stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BossConfig {
    pub id: Option<BossId>,
    pub name: Option<String>,
    pub hp: Option<i32>,
    pub patterns: Vec<Pattern>,
    pub texture: Option<PathBuf>,
}

impl BossConfig {
    /// Lines without a `:` and unknown keys are ignored. The key and value
    /// are split at the first `:` and trimmed.
    pub fn parse(text: &str) -> (Self, Vec<ConfigWarning>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "ID" => match BossId::from_token(value) {
                    Some(id) => config.id = Some(id),
                    None => warnings.push(ConfigWarning::UnknownId(value.to_string())),
                },
                "Name" => config.name = Some(value.to_string()),
                "HP" => match value.parse::<i32>() {
                    Ok(hp) => config.hp = Some(hp),
                    Err(_) => warnings.push(ConfigWarning::BadHp(value.to_string())),
                },
                "PatternList" => {
                    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                        match Pattern::from_token(token) {
                            Some(p) => config.patterns.push(p),
                            None => warnings.push(ConfigWarning::UnknownPattern(token.to_string())),
                        }
                    }
                }
                "Texture" => config.texture = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        if config.texture.as_deref().map_or(true, |p| p.as_os_str().is_empty()) {
            config.texture = None;
            warnings.push(ConfigWarning::MissingTexture);
        }
        (config, warnings)
    }
}

// ── Cooldowns ─────────────────────────────────────────────────────────────────

/// Seconds until each pattern may fire again.
#[derive(Clone, Debug, PartialEq)]
pub struct Cooldowns {
    pub rain: f32,
    pub spread: f32,
    pub ghost: f32,
    pub slash: f32,
    /// Counts down to the next ultimate burst.
    pub ultimate_timer: f32,
    /// Time left in the current burst.
    pub ultimate_period: f32,
}

impl Cooldowns {
    pub const RAIN_RATE: f32 = 3.0;
    pub const SPREAD_RATE: f32 = 3.0;
    pub const GHOST_RATE: f32 = 5.0;
    pub const SLASH_RATE: f32 = 7.0;
    pub const ULTIMATE_REARM: f32 = 15.0;
    pub const ULTIMATE_PERIOD: f32 = 5.0;

    fn tick(&mut self, dt: f32) {
        self.rain -= dt;
        self.spread -= dt;
        self.ghost -= dt;
        self.slash -= dt;
        self.ultimate_timer -= dt;
    }
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            rain: 0.0,
            spread: 0.0,
            ghost: 0.0,
            slash: 4.0,
            ultimate_timer: 10.0,
            ultimate_period: Self::ULTIMATE_PERIOD,
        }
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct Boss {
    body: Entity,
    pub id: BossId,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub patterns: Vec<Pattern>,
    pub texture_path: Option<PathBuf>,
    pub cooldowns: Cooldowns,
    /// Wander direction, each axis is +1 or -1.
    pub direction: (f32, f32),
    pub direction_timer: f32,
    projectiles: Vec<Projectile>,
    /// Player rectangle as of this frame; `None` disables aimed patterns.
    target: Option<Rect>,
    sprites: SpriteSet,
}

impl Boss {
    pub fn new(sprites: &SpriteSet) -> Self {
        let mut transform = Transform::default();
        transform.set_size(BOSS_SIZE, BOSS_SIZE);
        Self {
            body: Entity::with_body(transform, Hitbox::default(), None, BOSS_SPEED),
            id: BossId::Boss1,
            name: String::new(),
            hp: DEFAULT_HP,
            max_hp: DEFAULT_HP,
            patterns: Vec::new(),
            texture_path: None,
            cooldowns: Cooldowns::default(),
            direction: (1.0, 1.0),
            direction_timer: 0.0,
            projectiles: Vec::new(),
            target: None,
            sprites: *sprites,
        }
    }

    /// Read and apply a boss file. Warnings are logged and returned; a file
    /// that can't be read leaves the boss untouched.
    pub fn load_from_file(&mut self, path: &Path) -> Result<Vec<ConfigWarning>, GameError> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::config_io(path, e))?;
        let (config, warnings) = BossConfig::parse(&text);
        for warning in &warnings {
            tracing::warn!("{}: {warning}", path.display());
        }
        self.apply_config(config);
        tracing::debug!(
            "boss {:?} '{}' loaded with {} hp, patterns {:?}",
            self.id,
            self.name,
            self.hp,
            self.patterns
        );
        Ok(warnings)
    }

    /// Patterns are appended to whatever the boss already had.
    pub fn apply_config(&mut self, config: BossConfig) {
        if let Some(id) = config.id {
            self.id = id;
        }
        if let Some(name) = config.name {
            self.name = name;
        }
        if let Some(hp) = config.hp {
            self.hp = hp;
            self.max_hp = hp;
        }
        self.patterns.extend(config.patterns);
        if config.texture.is_some() {
            self.texture_path = config.texture;
        }
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.body.attach(Component::Texture(Sprite { texture }));
    }

    /// Refresh the player view used by aimed patterns.
    pub fn track(&mut self, target: Option<Rect>) {
        self.target = target;
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }

    pub fn take_projectiles(&mut self) -> Vec<Projectile> {
        let mut taken = std::mem::take(&mut self.projectiles);
        projectile::prune(&mut taken);
        taken
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        frame: Frame,
        rng: &mut R,
        gate: &mut LaunchGate,
        screen: Screen,
    ) {
        if self.body.transform().is_none() {
            return;
        }
        let dt = frame.dt;
        self.wander(dt, rng);
        self.body.dispatch_update(dt);

        self.cooldowns.tick(dt);
        for i in 0..self.patterns.len() {
            match self.patterns[i] {
                Pattern::Rain if self.cooldowns.rain <= 0.0 => {
                    self.fire_rain(gate, frame.now_ms);
                    self.cooldowns.rain = Cooldowns::RAIN_RATE;
                }
                Pattern::Spread if self.cooldowns.spread <= 0.0 => {
                    self.fire_spread();
                    self.cooldowns.spread = Cooldowns::SPREAD_RATE;
                }
                Pattern::Ultimate if self.cooldowns.ultimate_timer <= 0.0 => {
                    self.dragon_breath(gate, frame.now_ms);
                    self.cooldowns.ultimate_period -= dt;
                    if self.cooldowns.ultimate_period <= 0.0 {
                        self.cooldowns.ultimate_timer = Cooldowns::ULTIMATE_REARM;
                        self.cooldowns.ultimate_period = Cooldowns::ULTIMATE_PERIOD;
                    }
                }
                Pattern::GhostFire if self.cooldowns.ghost <= 0.0 => {
                    self.fire_ghost();
                    self.cooldowns.ghost = Cooldowns::GHOST_RATE;
                }
                Pattern::Slash if self.cooldowns.slash <= 0.0 => {
                    self.slash();
                    self.cooldowns.slash = Cooldowns::SLASH_RATE;
                }
                _ => {}
            }
        }

        for p in &mut self.projectiles {
            p.update(dt, screen);
        }
        projectile::prune(&mut self.projectiles);
    }

    /// Random walk inside the wander band. When the timer lapses a first
    /// toss may flip X; only if it doesn't, a second toss may flip Y.
    fn wander<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.direction_timer -= dt;
        if self.direction_timer <= 0.0 {
            if rng.gen_range(0..100) < 50 {
                self.direction.0 = -self.direction.0;
            } else if rng.gen_range(0..100) < 50 {
                self.direction.1 = -self.direction.1;
            }
            self.direction_timer = rng.gen_range(DIRECTION_INTERVAL);
        }

        let step = self.body.speed * dt;
        let rect = self.body.rect();
        let mut next_x = rect.x + step * self.direction.0;
        let mut next_y = rect.y;

        if self.id.roams_vertically() {
            next_y = rect.y + step * self.direction.1;
            if next_y > Y_RANGE.1 {
                next_y = Y_RANGE.1;
                self.direction.1 = -1.0;
            }
            if next_y < Y_RANGE.0 {
                next_y = Y_RANGE.0;
                self.direction.1 = 1.0;
            }
        }
        if next_x > X_RANGE.1 {
            next_x = X_RANGE.1;
            self.direction.0 = -1.0;
        }
        if next_x < X_RANGE.0 {
            next_x = X_RANGE.0;
            self.direction.0 = 1.0;
        }
        self.body.move_to(next_x, next_y);
    }

    fn shot(&self, motion: MotionKind, texture: Option<TextureHandle>) -> Projectile {
        Projectile::new(Owner::Boss, motion, texture)
    }

    // ── Patterns ──

    /// Seven spikes across an 800 px band, launched upward so they bounce
    /// off the top edge and come down as rain.
    pub fn fire_rain(&mut self, gate: &mut LaunchGate, now_ms: u64) {
        let rect = self.body.rect();
        let spacing = RAIN_BAND / (RAIN_COUNT - 1) as f32;
        let start_x = rect.x + rect.w / 2.0 - RAIN_BAND / 2.0;

        for i in 0..RAIN_COUNT {
            let x = start_x + spacing * i as f32;
            let mut spike = self
                .shot(MotionKind::Oscillating, self.sprites.rain)
                .with_size(RAIN_SIZE, RAIN_SIZE)
                .with_rotation(180.0)
                .placed_at(x, rect.y + BELOW_BOSS);
            spike.launch(x, rect.y, true, PLAYER_MIN_INTERVAL_MS, gate, now_ms);
            self.projectiles.push(spike);
        }
    }

    /// Thirteen shots fanning from straight right to straight left through
    /// straight down, 15 degrees apart.
    pub fn fire_spread(&mut self) {
        let (cx, cy) = self.body.rect().center();
        for step in 0..=12 {
            let mut shot = self
                .shot(MotionKind::Angled, self.sprites.spread)
                .with_speed(SPREAD_SPEED)
                .with_size(SPREAD_SIZE, SPREAD_SIZE);
            shot.launch_with_angle(cx, cy, step as f32 * 15.0);
            self.projectiles.push(shot);
        }
    }

    /// One row of the ultimate: small fireballs packed under the boss.
    pub fn dragon_breath(&mut self, gate: &mut LaunchGate, now_ms: u64) {
        let rect = self.body.rect();
        let count = (rect.w * ULTIMATE_COVERAGE / ULTIMATE_SHOT_SIZE) as usize;
        let total = ULTIMATE_SHOT_SIZE * count as f32;
        let start_x = rect.x + (rect.w - total) / 2.0;

        for i in 0..count {
            let x = start_x + ULTIMATE_SHOT_SIZE * i as f32;
            let mut fireball = self
                .shot(MotionKind::Oscillating, self.sprites.ultimate)
                .with_speed(ULTIMATE_SPEED)
                .with_oversize(ULTIMATE_SHOT_SIZE, ULTIMATE_SHOT_SIZE)
                .placed_at(x, rect.y + BELOW_BOSS);
            fireball.launch(x, rect.y, false, PLAYER_MIN_INTERVAL_MS, gate, now_ms);
            self.projectiles.push(fireball);
        }
    }

    /// Seven slow flames between 30 and 150 degrees.
    pub fn fire_ghost(&mut self) {
        let (cx, cy) = self.body.rect().center();
        for step in 0..7 {
            let mut flame = self
                .shot(MotionKind::Angled, self.sprites.ghost)
                .with_speed(GHOST_SPEED)
                .with_size(GHOST_SIZE, GHOST_SIZE);
            flame.launch_with_angle(cx, cy, 30.0 + step as f32 * 20.0);
            self.projectiles.push(flame);
        }
    }

    /// A fast spinning blade aimed at where the player stands right now.
    pub fn slash(&mut self) {
        let Some(target) = self.target else {
            tracing::debug!("boss '{}' has no target to slash at", self.name);
            return;
        };
        let rect = self.body.rect();
        let degrees = (target.y - rect.y).atan2(target.x - rect.x).to_degrees();
        let (w, h) = SLASH_SIZE;
        let mut blade = self
            .shot(MotionKind::Tracking, self.sprites.slash)
            .with_speed(SLASH_SPEED)
            .with_size(w, h);
        blade.launch_with_tracking(rect.x, rect.y, degrees);
        self.projectiles.push(blade);
    }

    pub fn on_hit(&mut self) {
        self.hp -= 1;
        if self.hp <= 0 {
            self.body.renderable = false;
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, textures: &TextureCache) {
        self.body.dispatch_render(surface, textures);
        for p in &self.projectiles {
            p.render(surface, textures);
        }
    }
}

impl Actor for Boss {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}
