//! The archer the player controls.

use crate::assets::{SpriteSet, TextureCache, TextureHandle};
use crate::clock::Frame;
use crate::component::{Actor, Component, Entity, InputControl, InputState};
use crate::entities::{MotionKind, Owner};
use crate::projectile::{self, LaunchGate, Projectile, PLAYER_MIN_INTERVAL_MS};
use crate::render::RenderSurface;
use crate::transform::{Hitbox, Screen, Transform};

pub const PLAYER_SIZE: (f32, f32) = (100.0, 160.0);
pub const PLAYER_SPEED: f32 = 400.0;
pub const PLAYER_HITBOX_MOD: f32 = 0.5;
pub const ARROW_SPEED: f32 = 1000.0;

#[derive(Debug, PartialEq)]
pub struct Player {
    body: Entity,
    projectiles: Vec<Projectile>,
    arrow: Option<TextureHandle>,
    pub min_launch_interval_ms: u64,
}

impl Player {
    /// Horizontally centred, sunk slightly below the bottom edge of the
    /// safe area so only the upper body shows.
    pub fn new(screen: Screen, sprites: &SpriteSet) -> Self {
        let (w, h) = PLAYER_SIZE;
        let mut transform = Transform::new(0.0, 0.0, w, h);
        transform.pin_to(screen);
        transform.move_to(
            screen.width / 2.0 - w / 2.0,
            screen.height - h - screen.height * 0.1 + 100.0,
        );

        let mut body = Entity::with_body(
            transform,
            Hitbox::with_modifier(PLAYER_HITBOX_MOD, PLAYER_HITBOX_MOD),
            sprites.player,
            PLAYER_SPEED,
        );
        body.attach(Component::Input(InputControl::new(PLAYER_SPEED)));

        Self {
            body,
            projectiles: Vec::new(),
            arrow: sprites.player_arrow,
            min_launch_interval_ms: PLAYER_MIN_INTERVAL_MS,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }

    /// Move with the held keys and loose an arrow on a fresh fire press,
    /// if `gate` allows it.
    pub fn input(&mut self, input: &InputState, frame: Frame, gate: &mut LaunchGate) {
        if !self.body.dispatch_input(input, frame.dt) {
            return;
        }
        let rect = self.body.rect();
        let mut arrow = Projectile::new(Owner::Player, MotionKind::Oscillating, self.arrow)
            .with_speed(ARROW_SPEED)
            .with_owner_width(rect.w);
        if arrow.launch(rect.x, rect.y, true, self.min_launch_interval_ms, gate, frame.now_ms) {
            self.projectiles.push(arrow);
        }
    }

    pub fn update(&mut self, dt: f32, screen: Screen) {
        self.body.dispatch_update(dt);
        for p in &mut self.projectiles {
            p.update(dt, screen);
        }
        projectile::prune(&mut self.projectiles);
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, textures: &TextureCache) {
        self.body.dispatch_render(surface, textures);
        for p in &self.projectiles {
            p.render(surface, textures);
        }
    }
}

impl Actor for Player {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}
