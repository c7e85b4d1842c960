//! Movement & collision primitives.
//!
//! A `Transform` is the visual rectangle of an entity; a `Hitbox` is a
//! smaller rectangle derived from it every frame so that grazing shots feel
//! fair.

/// Playfield size in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, origin at the top-left, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Separating-axis test. Rectangles that merely touch do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(other.right() <= self.x
            || self.right() <= other.x
            || other.bottom() <= self.y
            || self.bottom() <= other.y)
    }

    /// True when `inner` lies entirely within `self` (edges inclusive).
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }
}

// ── Transform ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub rect: Rect,
    /// Rotation in degrees, clockwise on screen.
    pub rotation: f32,
    /// Set only on the player's transform: moves are clamped to these bounds.
    pub bounds: Option<Screen>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rect: Rect::new(40.0, 40.0, 40.0, 40.0),
            rotation: 0.0,
            bounds: None,
        }
    }
}

impl Transform {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            ..Self::default()
        }
    }

    pub fn x(&self) -> f32 {
        self.rect.x
    }

    pub fn y(&self) -> f32 {
        self.rect.y
    }

    pub fn set_size(&mut self, w: f32, h: f32) {
        self.rect.w = w;
        self.rect.h = h;
    }

    /// Mark this transform as the player's: every later move is clamped.
    pub fn pin_to(&mut self, screen: Screen) {
        self.bounds = Some(screen);
    }

    pub fn move_to(&mut self, mut x: f32, mut y: f32) {
        if let Some(screen) = self.bounds {
            x = x.max(0.0);
            if x + self.rect.w > screen.width {
                x = screen.width - self.rect.w;
            }
            y = y.max(0.0);
            if y + self.rect.h > screen.height {
                y = screen.height - self.rect.h;
            }
        }
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.move_to(self.rect.x + dx, self.rect.y + dy);
    }
}

// ── Hitbox ────────────────────────────────────────────────────────────────────

/// Collision rectangle centred inside the owner's transform.
#[derive(Clone, Debug, PartialEq)]
pub struct Hitbox {
    pub rect: Rect,
    pub width_mod: f32,
    pub height_mod: f32,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            width_mod: 1.0,
            height_mod: 1.0,
        }
    }
}

impl Hitbox {
    pub fn with_modifier(width_mod: f32, height_mod: f32) -> Self {
        Self {
            width_mod,
            height_mod,
            ..Self::default()
        }
    }

    /// Takes effect on the next `update`.
    pub fn set_modifier(&mut self, width_mod: f32, height_mod: f32) {
        self.width_mod = width_mod;
        self.height_mod = height_mod;
    }

    /// Recompute from the transform. Must run after the transform moved this
    /// frame, otherwise collisions lag one frame behind the sprite.
    pub fn update(&mut self, transform: &Transform) {
        // Modifiers above 1.0 would grow the hitbox past the sprite.
        let w_mod = self.width_mod.clamp(0.0, 1.0);
        let h_mod = self.height_mod.clamp(0.0, 1.0);

        let full = transform.rect;
        let w = full.w * w_mod;
        let h = full.h * h_mod;
        self.rect = Rect::new(
            full.x + (full.w - w) / 2.0,
            full.y + (full.h - h) / 2.0,
            w,
            h,
        );
    }
}
