//! Minion enemies and the formation they sweep in.

use rand::Rng;

use crate::assets::{SpriteSet, TextureCache, TextureHandle};
use crate::clock::Frame;
use crate::component::{Actor, Entity};
use crate::entities::{MotionKind, Owner};
use crate::projectile::{self, LaunchGate, Projectile, PLAYER_MIN_INTERVAL_MS};
use crate::render::RenderSurface;
use crate::transform::{Hitbox, Screen, Transform};

pub const ENEMY_SIZE: f32 = 70.0;
pub const ENEMY_SPEED: f32 = 100.0;
/// Fire cooldown is drawn per enemy from this range, in milliseconds.
pub const FIRE_INTERVAL_MS: std::ops::Range<f32> = 2000.0..5000.0;

// ── Formation ─────────────────────────────────────────────────────────────────

/// Lateral sweep shared by every enemy of a scene.
///
/// The scene adds the frame's step to `cumulative` once per frame; every
/// enemy then calls `stride` to get its displacement. Once `cumulative`
/// reaches `threshold` the formation turns around, keeping the overflow.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    pub cumulative: f32,
    pub moving_right: bool,
    pub threshold: f32,
    /// Displacement for the current frame; shrunk when it would overshoot.
    pub step: f32,
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            cumulative: 0.0,
            moving_right: true,
            threshold: 0.0,
            step: 0.0,
        }
    }
}

impl Formation {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record this frame's movement. Rounded to 1/1000 px to keep long
    /// sweeps from drifting.
    /// A formation with no room to sweep stays put.
    pub fn accumulate(&mut self, speed: f32, dt: f32) {
        if self.threshold <= 0.0 {
            self.step = 0.0;
            return;
        }
        self.step = speed * dt;
        self.cumulative = ((self.cumulative + self.step) * 1000.0).round() / 1000.0;
    }

    /// Signed horizontal displacement for one enemy this frame.
    pub fn stride(&mut self) -> f32 {
        if self.threshold <= 0.0 {
            return 0.0;
        }
        if self.cumulative >= self.threshold {
            self.moving_right = !self.moving_right;
            self.cumulative -= self.threshold;
        }
        if self.cumulative + self.step > self.threshold {
            self.step = (self.threshold - self.cumulative).max(0.0);
        }
        if self.moving_right {
            self.step
        } else {
            -self.step
        }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct Enemy {
    body: Entity,
    projectiles: Vec<Projectile>,
    fire_interval_ms: f32,
    last_fire_ms: u64,
    arrow: Option<TextureHandle>,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(
        x: f32,
        y: f32,
        now_ms: u64,
        sprites: &SpriteSet,
        rng: &mut R,
    ) -> Self {
        let body = Entity::with_body(
            Transform::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            Hitbox::default(),
            sprites.enemy,
            ENEMY_SPEED,
        );
        Self {
            body,
            projectiles: Vec::new(),
            fire_interval_ms: rng.gen_range(FIRE_INTERVAL_MS),
            last_fire_ms: now_ms,
            arrow: sprites.enemy_arrow,
        }
    }

    pub fn fire_interval_ms(&self) -> f32 {
        self.fire_interval_ms
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }

    /// Hand over every live projectile, leaving this enemy with none.
    pub fn take_projectiles(&mut self) -> Vec<Projectile> {
        let mut taken = std::mem::take(&mut self.projectiles);
        projectile::prune(&mut taken);
        taken
    }

    pub fn update(
        &mut self,
        frame: Frame,
        formation: &mut Formation,
        gate: &mut LaunchGate,
        screen: Screen,
    ) {
        if self.body.transform().is_none() {
            return;
        }
        let dx = formation.stride();
        self.body.translate(dx, 0.0);
        self.body.dispatch_update(frame.dt);

        let due = frame.now_ms.saturating_sub(self.last_fire_ms) as f32 >= self.fire_interval_ms;
        if self.is_alive() && due {
            self.fire(frame.now_ms, gate);
        }

        for p in &mut self.projectiles {
            p.update(frame.dt, screen);
        }
        projectile::prune(&mut self.projectiles);
    }

    fn fire(&mut self, now_ms: u64, gate: &mut LaunchGate) {
        let rect = self.body.rect();
        let mut arrow = Projectile::new(Owner::Enemy, MotionKind::Oscillating, self.arrow)
            .with_owner_width(rect.w);
        if arrow.launch(rect.x, rect.y, false, PLAYER_MIN_INTERVAL_MS, gate, now_ms) {
            self.projectiles.push(arrow);
            self.last_fire_ms = now_ms;
        }
    }

    /// Minions die on the first hit.
    pub fn on_hit(&mut self) {
        self.body.renderable = false;
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, textures: &TextureCache) {
        self.body.dispatch_render(surface, textures);
        for p in &self.projectiles {
            p.render(surface, textures);
        }
    }
}

impl Actor for Enemy {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}
