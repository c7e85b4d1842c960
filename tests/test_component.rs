use std::path::{Path, PathBuf};

use bow_shooter::assets::{Texture, TextureCache, TextureLoader};
use bow_shooter::component::*;
use bow_shooter::error::GameError;
use bow_shooter::render::RenderSurface;
use bow_shooter::transform::{Hitbox, Rect, Screen, Transform};

struct StubLoader;

impl TextureLoader for StubLoader {
    fn load(&mut self, path: &Path) -> Result<Texture, GameError> {
        Ok(Texture {
            path: path.to_path_buf(),
            width: 1,
            height: 1,
        })
    }
}

#[derive(Default)]
struct Recorder {
    draws: Vec<(PathBuf, Rect, f32)>,
}

impl RenderSurface for Recorder {
    fn draw(&mut self, texture: &Texture, rect: Rect, rotation: f32) -> Result<(), GameError> {
        self.draws.push((texture.path.clone(), rect, rotation));
        Ok(())
    }
}

fn body_at(x: f32, y: f32, w: f32, h: f32) -> Entity {
    Entity::with_body(Transform::new(x, y, w, h), Hitbox::default(), None, 0.0)
}

// ── Collision ─────────────────────────────────────────────────────────────────

#[test]
fn collision_is_symmetric() {
    let a = body_at(0.0, 0.0, 50.0, 50.0);
    let b = body_at(40.0, 40.0, 50.0, 50.0);
    let c = body_at(200.0, 0.0, 50.0, 50.0);
    assert!(a.collides(&b));
    assert!(b.collides(&a));
    assert!(!a.collides(&c));
    assert!(!c.collides(&a));
}

#[test]
fn touching_entities_do_not_collide() {
    let a = body_at(0.0, 0.0, 50.0, 50.0);
    let right = body_at(50.0, 0.0, 50.0, 50.0);
    let below = body_at(0.0, 50.0, 50.0, 50.0);
    assert!(!a.collides(&right));
    assert!(!a.collides(&below));
}

#[test]
fn entity_without_hitbox_never_collides() {
    let mut ghost = Entity::new(0.0);
    ghost.attach(Component::Transform(Transform::new(0.0, 0.0, 50.0, 50.0)));
    let solid = body_at(0.0, 0.0, 50.0, 50.0);
    assert!(!ghost.collides(&solid));
    assert!(!solid.collides(&ghost));
}

#[test]
fn hitbox_follows_after_refresh() {
    let mut a = body_at(0.0, 0.0, 50.0, 50.0);
    let b = body_at(300.0, 0.0, 50.0, 50.0);
    a.move_to(290.0, 0.0);
    assert!(!a.collides(&b)); // hitbox still at the old spot
    a.refresh_hitbox();
    assert!(a.collides(&b));
}

#[test]
fn shrunken_hitbox_lets_grazes_through() {
    let mut a = body_at(0.0, 0.0, 100.0, 100.0);
    let b = body_at(90.0, 0.0, 50.0, 50.0);
    assert!(a.collides(&b));
    a.set_hitbox_modifier(0.5, 0.5);
    a.dispatch_update(0.016);
    assert_eq!(a.hitbox().map(|h| h.rect), Some(Rect::new(25.0, 25.0, 50.0, 50.0)));
    assert!(!a.collides(&b));
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn typed_lookup_by_kind() {
    let e = body_at(1.0, 2.0, 3.0, 4.0);
    assert_eq!(e.component_count(), 3);
    assert!(matches!(e.get(ComponentKind::Collision), Some(Component::Collision(_))));
    assert!(e.get(ComponentKind::Input).is_none());
    assert!(e.input().is_none());
    assert_eq!(e.transform().map(|t| t.rect), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
    assert_eq!(e.owner_of(ComponentKind::Texture), Some(e.id()));
}

#[test]
fn entity_ids_are_unique() {
    let a = Entity::new(0.0);
    let b = Entity::new(0.0);
    assert_ne!(a.id(), b.id());
}

#[test]
fn input_moves_and_stays_pinned() {
    let mut transform = Transform::new(10.0, 0.0, 100.0, 100.0);
    transform.pin_to(Screen::default());
    let mut e = Entity::with_body(transform, Hitbox::default(), None, 400.0);
    e.attach(Component::Input(InputControl::new(400.0)));

    let left = InputState {
        left: true,
        ..InputState::default()
    };
    e.dispatch_input(&left, 0.5);
    assert_eq!(e.rect().x, 0.0);

    let right = InputState {
        right: true,
        ..InputState::default()
    };
    e.dispatch_input(&right, 0.5);
    assert_eq!(e.rect().x, 200.0);

    let both = InputState {
        left: true,
        right: true,
        fire: false,
    };
    e.dispatch_input(&both, 0.5);
    assert_eq!(e.rect().x, 200.0);
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn render_draws_live_textured_entities_only() {
    let mut cache = TextureCache::new(StubLoader);
    let handle = cache.load("knight.bmp");
    let mut textured = Entity::with_body(
        Transform::new(5.0, 6.0, 7.0, 8.0),
        Hitbox::default(),
        handle,
        0.0,
    );
    let untextured = body_at(0.0, 0.0, 10.0, 10.0);

    let mut surface = Recorder::default();
    textured.dispatch_render(&mut surface, &cache);
    untextured.dispatch_render(&mut surface, &cache);
    assert_eq!(
        surface.draws,
        vec![(PathBuf::from("knight.bmp"), Rect::new(5.0, 6.0, 7.0, 8.0), 0.0)]
    );

    textured.renderable = false;
    textured.dispatch_render(&mut surface, &cache);
    assert_eq!(surface.draws.len(), 1);
}
