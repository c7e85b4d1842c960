//! Scene orchestrator.
//!
//! A `Scene` owns everything alive in one stage: the player, the bosses, the
//! minions, the orphan pool of projectiles whose shooter died, and the shared
//! formation and fire gate. `update` runs the per-frame pipeline in a fixed
//! order; see the numbered steps in its body.

use rand::Rng;

use crate::assets::{SpriteSet, TextureCache, TextureHandle};
use crate::boss::Boss;
use crate::clock::Frame;
use crate::component::{Actor, InputState};
use crate::config::AssetPaths;
use crate::enemy::{Enemy, Formation, ENEMY_SIZE, ENEMY_SPEED};
use crate::entities::{DeathCause, GameStatus, Stage};
use crate::player::Player;
use crate::projectile::{self, LaunchGate, Projectile};
use crate::render::RenderSurface;
use crate::script::{ScriptCompletion, ScriptDirector};
use crate::transform::{Rect, Screen};

/// Longest time step the simulation accepts, in seconds.
pub const MAX_DT: f32 = 0.1;

pub const GRID_ROWS: usize = 2;
pub const GRID_COLS: usize = 18;
pub const PHASE_TWO_ENEMIES: usize = 36;

const BOSS_TOP: f32 = 50.0;
const BOSS_SPACING: f32 = 250.0;

pub struct Scene {
    pub stage: Stage,
    pub status: GameStatus,
    /// Cleared once the stage's closing script has been read through.
    active: bool,
    pub player: Player,
    pub bosses: Vec<Boss>,
    pub enemies: Vec<Enemy>,
    /// Projectiles that outlived their shooter.
    pub orphans: Vec<Projectile>,
    pub formation: Formation,
    pub fire_gate: LaunchGate,
    pub score: u32,
    phase_spawned: bool,
    end_scheduled: bool,
    defeat: Option<DeathCause>,
    screen: Screen,
    sprites: SpriteSet,
    background: Option<TextureHandle>,
}

impl Scene {
    pub fn new(stage: Stage, screen: Screen) -> Self {
        let sprites = SpriteSet::default();
        Self {
            stage,
            status: GameStatus::Dialogue,
            active: true,
            player: Player::new(screen, &sprites),
            bosses: Vec::new(),
            enemies: Vec::new(),
            orphans: Vec::new(),
            formation: Formation::default(),
            fire_gate: LaunchGate::new(),
            score: 0,
            phase_spawned: false,
            end_scheduled: false,
            defeat: None,
            screen,
            sprites,
            background: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn defeat_cause(&self) -> Option<DeathCause> {
        self.defeat
    }

    pub fn phase_spawned(&self) -> bool {
        self.phase_spawned
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Build the stage: opening script, textures, player, bosses and, on
    /// stage 2, the opening formation. The battle starts frozen until the
    /// opening script completes.
    pub fn start_up<R: Rng + ?Sized>(
        &mut self,
        paths: &AssetPaths,
        textures: &mut TextureCache,
        director: &mut dyn ScriptDirector,
        now_ms: u64,
        rng: &mut R,
    ) {
        self.formation.reset();
        self.status = GameStatus::Dialogue;
        self.active = true;
        self.end_scheduled = false;
        self.phase_spawned = false;
        self.defeat = None;
        self.orphans.clear();
        self.enemies.clear();

        director.load_script(&self.stage.start_script(), ScriptCompletion::BeginBattle);
        self.background = textures.load(self.stage.background());
        self.sprites = SpriteSet::load(textures);
        self.player = Player::new(self.screen, &self.sprites);
        self.spawn_bosses(paths, textures);

        let opening = self.stage.opening_enemies();
        if opening > 0 {
            self.spawn_enemies(opening, now_ms, rng);
        }
        tracing::info!(
            "stage {} ready: {} boss(es), {} enemies",
            self.stage.number(),
            self.bosses.len(),
            self.enemies.len()
        );
    }

    fn spawn_bosses(&mut self, paths: &AssetPaths, textures: &mut TextureCache) {
        let count = self.stage.boss_count();
        let centre = self.screen.width / 2.0;
        let (start_x, spacing) = if count > 1 {
            (centre - BOSS_SPACING, BOSS_SPACING)
        } else {
            (centre, 0.0)
        };

        let config = paths.boss_config(self.stage);
        self.bosses.clear();
        for i in 0..count {
            let mut boss = Boss::new(&self.sprites);
            if let Err(err) = boss.load_from_file(&config) {
                tracing::error!("{err}");
            }
            let texture = boss.texture_path.clone().and_then(|p| textures.load(p));
            boss.set_texture(texture);
            boss.body_mut().move_to(start_x + i as f32 * spacing, BOSS_TOP);
            boss.body_mut().refresh_hitbox();
            boss.track(Some(self.player.rect()));
            self.bosses.push(boss);
        }
    }

    /// Lay out up to `count` enemies on the 2x18 grid, row by row, and size
    /// the formation sweep to fit between neighbouring cells.
    pub fn spawn_enemies<R: Rng + ?Sized>(&mut self, count: usize, now_ms: u64, rng: &mut R) {
        let cell_w = self.screen.width / (GRID_COLS + 2) as f32;
        let row_h = self.screen.height / 6.0;

        'grid: for row in 1..=GRID_ROWS {
            for col in 1..=GRID_COLS {
                if self.enemies.len() >= count {
                    break 'grid;
                }
                let (x, y) = (col as f32 * cell_w, row as f32 * row_h);
                self.enemies
                    .push(Enemy::new(x, y, now_ms, &self.sprites, &mut *rng));
            }
        }
        if !self.enemies.is_empty() {
            self.formation.threshold = (cell_w - ENEMY_SIZE).max(0.0);
        }
    }

    /// Route a finished script back into the scene.
    pub fn on_script_finished(&mut self, completion: ScriptCompletion) {
        match completion {
            ScriptCompletion::BeginBattle => {
                if self.status == GameStatus::Dialogue {
                    self.status = GameStatus::Playing;
                    tracing::info!("stage {} battle begins", self.stage.number());
                }
            }
            ScriptCompletion::EndStage => {
                self.active = false;
                tracing::info!("stage {} finished, score {}", self.stage.number(), self.score);
            }
            ScriptCompletion::ExitGame => {}
        }
    }

    pub fn input(&mut self, input: &InputState, dt: f32, now_ms: u64) {
        if self.status != GameStatus::Playing {
            return;
        }
        let frame = Frame::new(dt.min(MAX_DT), now_ms);
        self.player.input(input, frame, &mut self.fire_gate);
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        now_ms: u64,
        director: &mut dyn ScriptDirector,
        rng: &mut R,
    ) {
        // 1. Dead bosses leave; with none left the stage is won.
        self.prune_fallen();
        if self.bosses.is_empty() && self.status != GameStatus::Defeat {
            self.status = GameStatus::Dialogue;
            if !self.end_scheduled {
                self.end_scheduled = true;
                tracing::info!("stage {} cleared", self.stage.number());
                director.load_script(&self.stage.end_script(), ScriptCompletion::EndStage);
            }
        }

        // 2.
        if self.status != GameStatus::Playing {
            return;
        }

        // 3.
        let dt = dt.min(MAX_DT);
        let frame = Frame::new(dt, now_ms);

        // 4.
        self.player.update(dt, self.screen);
        let target = self.player.rect();
        for boss in &mut self.bosses {
            boss.track(Some(target));
            boss.update(frame, &mut *rng, &mut self.fire_gate, self.screen);
        }
        for enemy in &mut self.enemies {
            enemy.update(frame, &mut self.formation, &mut self.fire_gate, self.screen);
        }

        // 5. Player arrows against bosses, then advance the formation.
        for boss in self.bosses.iter_mut().filter(|b| b.is_alive()) {
            for arrow in self.player.projectiles_mut().iter_mut() {
                if arrow.is_alive() && boss.collides_with(&*arrow) {
                    boss.on_hit();
                    arrow.deactivate();
                    self.score += 1;
                    break;
                }
            }
        }
        self.formation.accumulate(ENEMY_SPEED, dt);

        // 6.
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            for arrow in self.player.projectiles_mut().iter_mut() {
                if arrow.is_alive() && enemy.collides_with(&*arrow) {
                    enemy.on_hit();
                    arrow.deactivate();
                    self.score += 1;
                    break;
                }
            }
        }

        // 7.
        self.prune_fallen();

        // 8. Last stage: the boss calls in minions once it is at half health.
        if self.stage == Stage::Three && !self.phase_spawned {
            let wounded = self
                .bosses
                .first()
                .is_some_and(|boss| boss.hp <= boss.max_hp / 2);
            if wounded {
                self.formation.reset();
                self.spawn_enemies(PHASE_TWO_ENEMIES, now_ms, rng);
                self.phase_spawned = true;
                tracing::info!("stage 3 second phase: {} enemies", self.enemies.len());
            }
        }

        // 9.
        if let Some(cause) = self.fatal_source() {
            self.status = GameStatus::Defeat;
            self.defeat = Some(cause);
            tracing::info!("player defeated ({cause:?}) with score {}", self.score);
            director.load_script(&cause.script(), ScriptCompletion::ExitGame);
        }

        // 10.
        for p in &mut self.orphans {
            p.update(dt, self.screen);
        }
        projectile::prune(&mut self.orphans);
    }

    /// Remove dead enemies and bosses; whatever they still had in flight
    /// moves to the orphan pool.
    fn prune_fallen(&mut self) {
        let orphans = &mut self.orphans;
        self.enemies.retain_mut(|enemy| {
            if enemy.is_alive() {
                return true;
            }
            orphans.extend(enemy.take_projectiles());
            false
        });
        self.bosses.retain_mut(|boss| {
            if boss.is_alive() {
                return true;
            }
            orphans.extend(boss.take_projectiles());
            false
        });
    }

    /// First hostile projectile touching the player, checked bosses first,
    /// then minions, then orphans.
    fn fatal_source(&self) -> Option<DeathCause> {
        let hits = |p: &Projectile| p.is_alive() && p.collides_with(&self.player);

        if self.bosses.iter().flat_map(|b| b.projectiles()).any(hits) {
            return Some(DeathCause::Boss);
        }
        if self.enemies.iter().flat_map(|e| e.projectiles()).any(hits) {
            return Some(DeathCause::Minion);
        }
        if self.orphans.iter().any(hits) {
            return Some(DeathCause::Lingering);
        }
        None
    }

    /// Draws nothing outside of battle; the front-end shows the script then.
    pub fn render(&self, surface: &mut dyn RenderSurface, textures: &TextureCache) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Some(texture) = self.background.and_then(|h| textures.get(h)) {
            let full = Rect::new(0.0, 0.0, self.screen.width, self.screen.height);
            if let Err(err) = surface.draw(texture, full, 0.0) {
                tracing::warn!("{err}");
            }
        }

        self.player.render(surface, textures);
        for enemy in self.enemies.iter().filter(|e| e.is_alive()) {
            enemy.render(surface, textures);
        }
        for boss in &self.bosses {
            boss.render(surface, textures);
        }
        for p in &self.orphans {
            p.render(surface, textures);
        }
    }
}
