//! Projectile engine.
//!
//! A projectile is Idle until launched, Firing while it travels, and Expired
//! once it leaves the screen or hits something. Expired projectiles are no
//! longer renderable and get dropped by whichever collection holds them on
//! its next cleanup pass.

use crate::assets::{TextureCache, TextureHandle};
use crate::component::{Actor, Entity};
use crate::entities::{MotionKind, Owner};
use crate::render::RenderSurface;
use crate::transform::{Hitbox, Screen, Transform};

pub const DEFAULT_SPEED: f32 = 350.0;
/// Minimum gap between two player launches, in milliseconds.
pub const PLAYER_MIN_INTERVAL_MS: u64 = 1000;
/// Degrees per second for tracking projectiles.
pub const TRACKING_SPIN: f32 = 180.0;
pub const REBOUND_SPEED_FACTOR: f32 = 1.5;
/// Hitbox scale for boss and angled projectiles.
pub const HOSTILE_HITBOX_MOD: f32 = 0.6;

pub const PLAYER_ARROW_SIZE: (f32, f32) = (15.0, 40.0);
pub const ENEMY_ARROW_SIZE: (f32, f32) = (8.0, 26.0);

// ── Launch gate ───────────────────────────────────────────────────────────────

/// Rate limiter shared by every player projectile of a scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaunchGate {
    last_launch_ms: Option<u64>,
}

impl LaunchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens when nothing launched yet or `min_interval_ms` has passed since
    /// the last successful launch; opening records `now_ms`.
    pub fn try_open(&mut self, now_ms: u64, min_interval_ms: u64) -> bool {
        let open = match self.last_launch_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= min_interval_ms,
        };
        if open {
            self.last_launch_ms = Some(now_ms);
        }
        open
    }

    pub fn last_launch_ms(&self) -> Option<u64> {
        self.last_launch_ms
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flight {
    Idle,
    Firing,
    Expired,
}

#[derive(Debug, PartialEq)]
pub struct Projectile {
    body: Entity,
    pub owner: Owner,
    pub motion: MotionKind,
    /// Pixels per second; used by Angled and Tracking motion.
    pub velocity: (f32, f32),
    upward: bool,
    firing: bool,
    launched: bool,
    owner_width: f32,
    oversize: Option<(f32, f32)>,
}

impl Projectile {
    pub fn new(owner: Owner, motion: MotionKind, texture: Option<TextureHandle>) -> Self {
        let mut body = Entity::with_body(
            Transform::default(),
            Hitbox::default(),
            texture,
            DEFAULT_SPEED,
        );
        body.renderable = false;
        Self {
            body,
            owner,
            motion,
            velocity: (0.0, 0.0),
            upward: false,
            firing: false,
            launched: false,
            owner_width: 0.0,
            oversize: None,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.body.speed = speed;
        self
    }

    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        if let Some(t) = self.body.transform_mut() {
            t.set_size(w, h);
        }
        self
    }

    /// Width of the shooter, used to centre player and enemy arrows.
    pub fn with_owner_width(mut self, width: f32) -> Self {
        self.owner_width = width;
        self
    }

    /// Marks an ultimate projectile and sizes it accordingly.
    pub fn with_oversize(self, w: f32, h: f32) -> Self {
        let mut p = self.with_size(w, h);
        p.oversize = Some((w, h));
        p
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        if let Some(t) = self.body.transform_mut() {
            t.rotation = degrees;
        }
        self
    }

    /// Pre-launch placement, for patterns that position the shot themselves.
    pub fn placed_at(mut self, x: f32, y: f32) -> Self {
        self.body.move_to(x, y);
        self
    }

    pub fn speed(&self) -> f32 {
        self.body.speed
    }

    pub fn is_upward(&self) -> bool {
        self.upward
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn oversize(&self) -> Option<(f32, f32)> {
        self.oversize
    }

    pub fn state(&self) -> Flight {
        if self.firing {
            Flight::Firing
        } else if self.launched {
            Flight::Expired
        } else {
            Flight::Idle
        }
    }

    fn start(&mut self) {
        self.firing = true;
        self.launched = true;
        self.body.renderable = true;
    }

    /// Vertical launch. Player shots go through `gate`; hostile shots always
    /// fire. Returns whether the projectile is now in flight.
    pub fn launch(
        &mut self,
        x: f32,
        y: f32,
        upward: bool,
        min_interval_ms: u64,
        gate: &mut LaunchGate,
        now_ms: u64,
    ) -> bool {
        match self.owner {
            Owner::Player => {
                if !gate.try_open(now_ms, min_interval_ms) {
                    return false;
                }
                let (w, h) = PLAYER_ARROW_SIZE;
                self.place_arrow(x, y - 10.0, w, h);
            }
            Owner::Boss => {
                self.body
                    .set_hitbox_modifier(HOSTILE_HITBOX_MOD, HOSTILE_HITBOX_MOD);
            }
            Owner::Enemy => {
                let (w, h) = ENEMY_ARROW_SIZE;
                self.place_arrow(x, y + 10.0, w, h);
                if let Some(t) = self.body.transform_mut() {
                    t.rotation = 180.0;
                }
            }
        }
        self.upward = upward;
        self.start();
        self.body.refresh_hitbox();
        true
    }

    fn place_arrow(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let offset = self.owner_width / 2.0 - w / 2.0;
        if let Some(t) = self.body.transform_mut() {
            t.set_size(w, h);
            t.move_to(x + offset, y);
        }
    }

    pub fn launch_with_angle(&mut self, x: f32, y: f32, degrees: f32) {
        self.launch_along(x, y, degrees);
    }

    /// Same trajectory as an angled launch; the sprite spins in flight.
    pub fn launch_with_tracking(&mut self, x: f32, y: f32, degrees: f32) {
        self.launch_along(x, y, degrees);
    }

    fn launch_along(&mut self, x: f32, y: f32, degrees: f32) {
        if self.body.transform().is_none() {
            return;
        }
        self.body.move_to(x, y);
        self.body
            .set_hitbox_modifier(HOSTILE_HITBOX_MOD, HOSTILE_HITBOX_MOD);
        let radians = degrees.to_radians();
        self.velocity = (radians.cos() * self.body.speed, radians.sin() * self.body.speed);
        self.start();
        self.body.refresh_hitbox();
    }

    pub fn update(&mut self, dt: f32, screen: Screen) {
        if !self.firing {
            return;
        }
        let speed = self.body.speed;
        let Some(t) = self.body.transform_mut() else {
            return;
        };

        match self.motion {
            MotionKind::Oscillating => {
                let dy = if self.upward { -speed * dt } else { speed * dt };
                t.translate(0.0, dy);
            }
            MotionKind::Angled => {
                t.translate(self.velocity.0 * dt, self.velocity.1 * dt);
            }
            MotionKind::Tracking => {
                t.rotation += TRACKING_SPIN * dt;
                t.translate(self.velocity.0 * dt, self.velocity.1 * dt);
            }
        }

        let y = t.y();
        let rebounds = self.owner == Owner::Boss
            && self.motion == MotionKind::Oscillating
            && self.upward
            && y <= 0.0;
        if rebounds {
            self.upward = false;
            t.rotation = 0.0;
            self.body.speed *= REBOUND_SPEED_FACTOR;
        } else if y < 0.0 || y > screen.height {
            self.deactivate();
        }

        self.body.dispatch_update(dt);
    }

    /// Stop and hide; the holder drops it on its next cleanup.
    pub fn deactivate(&mut self) {
        self.firing = false;
        self.body.renderable = false;
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, textures: &TextureCache) {
        if self.firing {
            self.body.dispatch_render(surface, textures);
        }
    }
}

impl Actor for Projectile {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

/// Drop every projectile that is no longer in flight.
pub fn prune(projectiles: &mut Vec<Projectile>) {
    projectiles.retain(|p| p.is_alive());
}
