//! Entity/component model.
//!
//! Every game object is an `Entity` carrying at most one component per
//! `ComponentKind`. Lookup goes through the kind-keyed registry and the typed
//! accessors below; there is no downcasting. Each slot remembers which entity
//! it was attached to as a plain `EntityId`, never as an owning pointer.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::{TextureCache, TextureHandle};
use crate::render::RenderSurface;
use crate::transform::{Hitbox, Rect, Transform};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ── Components ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Transform,
    Collision,
    Texture,
    Input,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sprite {
    /// `None` when the texture failed to load: the entity is simply not drawn.
    pub texture: Option<TextureHandle>,
}

/// Keyboard state for one frame, already debounced by the front-end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Keyboard-driven horizontal movement plus a fire-button edge detector.
#[derive(Clone, Debug, PartialEq)]
pub struct InputControl {
    pub speed: f32,
    fire_held: bool,
}

impl InputControl {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            fire_held: false,
        }
    }

    /// Returns the horizontal displacement for this frame and whether fire
    /// was pressed since the previous frame.
    fn read(&mut self, input: &InputState, dt: f32) -> (f32, bool) {
        let mut dx = 0.0;
        if input.left {
            dx -= self.speed * dt;
        }
        if input.right {
            dx += self.speed * dt;
        }
        let fire_edge = input.fire && !self.fire_held;
        self.fire_held = input.fire;
        (dx, fire_edge)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Transform(Transform),
    Collision(Hitbox),
    Texture(Sprite),
    Input(InputControl),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::Collision(_) => ComponentKind::Collision,
            Component::Texture(_) => ComponentKind::Texture,
            Component::Input(_) => ComponentKind::Input,
        }
    }
}

#[derive(Debug, PartialEq)]
struct Slot {
    owner: EntityId,
    component: Component,
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// Not `Clone`: every entity keeps the id it was born with.
#[derive(Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    slots: BTreeMap<ComponentKind, Slot>,
    /// Cleared when the entity dies; the next cleanup pass removes it.
    pub renderable: bool,
    /// Base speed in pixels per second.
    pub speed: f32,
}

impl Entity {
    pub fn new(speed: f32) -> Self {
        Self {
            id: EntityId::next(),
            slots: BTreeMap::new(),
            renderable: true,
            speed,
        }
    }

    /// Transform, hitbox and sprite in one go; the hitbox is synced
    /// immediately so a freshly built entity can already collide.
    pub fn with_body(
        transform: Transform,
        hitbox: Hitbox,
        texture: Option<TextureHandle>,
        speed: f32,
    ) -> Self {
        let mut entity = Self::new(speed);
        entity.attach(Component::Transform(transform));
        entity.attach(Component::Collision(hitbox));
        entity.attach(Component::Texture(Sprite { texture }));
        entity.refresh_hitbox();
        entity
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Index `component` by its kind, replacing and returning any component
    /// of the same kind that was already attached.
    pub fn attach(&mut self, component: Component) -> Option<Component> {
        let slot = Slot {
            owner: self.id,
            component,
        };
        self.slots
            .insert(slot.component.kind(), slot)
            .map(|old| old.component)
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.slots.get(&kind).map(|slot| &slot.component)
    }

    pub fn get_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.slots.get_mut(&kind).map(|slot| &mut slot.component)
    }

    /// The entity a component was attached through.
    pub fn owner_of(&self, kind: ComponentKind) -> Option<EntityId> {
        self.slots.get(&kind).map(|slot| slot.owner)
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    // ── Typed accessors ──

    pub fn transform(&self) -> Option<&Transform> {
        match self.get(ComponentKind::Transform) {
            Some(Component::Transform(t)) => Some(t),
            _ => None,
        }
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        match self.get_mut(ComponentKind::Transform) {
            Some(Component::Transform(t)) => Some(t),
            _ => None,
        }
    }

    pub fn hitbox(&self) -> Option<&Hitbox> {
        match self.get(ComponentKind::Collision) {
            Some(Component::Collision(h)) => Some(h),
            _ => None,
        }
    }

    pub fn hitbox_mut(&mut self) -> Option<&mut Hitbox> {
        match self.get_mut(ComponentKind::Collision) {
            Some(Component::Collision(h)) => Some(h),
            _ => None,
        }
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        match self.get(ComponentKind::Texture) {
            Some(Component::Texture(s)) => Some(s),
            _ => None,
        }
    }

    pub fn input(&self) -> Option<&InputControl> {
        match self.get(ComponentKind::Input) {
            Some(Component::Input(i)) => Some(i),
            _ => None,
        }
    }

    pub fn input_mut(&mut self) -> Option<&mut InputControl> {
        match self.get_mut(ComponentKind::Input) {
            Some(Component::Input(i)) => Some(i),
            _ => None,
        }
    }

    /// Transform rectangle, or an empty rect at the origin without one.
    pub fn rect(&self) -> Rect {
        self.transform().map(|t| t.rect).unwrap_or_default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if let Some(t) = self.transform_mut() {
            t.move_to(x, y);
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(t) = self.transform_mut() {
            t.translate(dx, dy);
        }
    }

    pub fn set_hitbox_modifier(&mut self, w_mod: f32, h_mod: f32) {
        if let Some(h) = self.hitbox_mut() {
            h.set_modifier(w_mod, h_mod);
        }
    }

    /// Re-derive the hitbox from the current transform.
    pub fn refresh_hitbox(&mut self) {
        let Some(transform) = self.transform().cloned() else {
            return;
        };
        if let Some(hitbox) = self.hitbox_mut() {
            hitbox.update(&transform);
        }
    }

    // ── Dispatch ──

    /// Feed the frame's input to the input component, if any. Returns true
    /// when the fire button went down this frame.
    pub fn dispatch_input(&mut self, input: &InputState, dt: f32) -> bool {
        let Some(control) = self.input_mut() else {
            return false;
        };
        let (dx, fire_edge) = control.read(input, dt);
        if dx != 0.0 {
            self.translate(dx, 0.0);
        }
        fire_edge
    }

    /// Per-frame component update. Transforms and sprites are passive; the
    /// hitbox follows the transform.
    pub fn dispatch_update(&mut self, _dt: f32) {
        self.refresh_hitbox();
    }

    /// Draw the sprite at the transform. Silent when the entity is dead or
    /// lacks a transform or texture.
    pub fn dispatch_render(&self, surface: &mut dyn RenderSurface, textures: &TextureCache) {
        if !self.renderable {
            return;
        }
        let (Some(transform), Some(handle)) =
            (self.transform(), self.sprite().and_then(|s| s.texture))
        else {
            return;
        };
        let Some(texture) = textures.get(handle) else {
            return;
        };
        if let Err(err) = surface.draw(texture, transform.rect, transform.rotation) {
            tracing::warn!("{err}");
        }
    }

    /// Hitbox overlap on both axes. Touching edges do not count and an
    /// entity without a hitbox never collides.
    pub fn collides(&self, other: &Entity) -> bool {
        match (self.hitbox(), other.hitbox()) {
            (Some(a), Some(b)) => a.rect.overlaps(&b.rect),
            _ => false,
        }
    }
}

/// Anything that wraps an `Entity`: player, enemy, boss, projectile.
pub trait Actor {
    fn body(&self) -> &Entity;
    fn body_mut(&mut self) -> &mut Entity;

    fn is_alive(&self) -> bool {
        self.body().renderable
    }

    fn rect(&self) -> Rect {
        self.body().rect()
    }

    fn collides_with<A: Actor + ?Sized>(&self, other: &A) -> bool
    where
        Self: Sized,
    {
        self.body().collides(other.body())
    }
}
