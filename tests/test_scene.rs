use std::fs;
use std::path::{Path, PathBuf};

use bow_shooter::assets::{Texture, TextureCache, TextureLoader};
use bow_shooter::component::{Actor, InputState};
use bow_shooter::config::AssetPaths;
use bow_shooter::entities::{DeathCause, GameStatus, MotionKind, Owner, Stage};
use bow_shooter::error::GameError;
use bow_shooter::projectile::{Flight, Projectile};
use bow_shooter::render::RenderSurface;
use bow_shooter::scene::*;
use bow_shooter::script::{ScriptCompletion, ScriptDirector};
use bow_shooter::transform::{Rect, Screen};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

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
struct RecordingDirector {
    loaded: Vec<(PathBuf, ScriptCompletion)>,
}

impl ScriptDirector for RecordingDirector {
    fn load_script(&mut self, path: &Path, on_finish: ScriptCompletion) {
        self.loaded.push((path.to_path_buf(), on_finish));
    }

    fn next_line(&mut self) -> Option<ScriptCompletion> {
        None
    }
}

#[derive(Default)]
struct Recorder {
    paths: Vec<PathBuf>,
}

impl RenderSurface for Recorder {
    fn draw(&mut self, texture: &Texture, _rect: Rect, _rotation: f32) -> Result<(), GameError> {
        self.paths.push(texture.path.clone());
        Ok(())
    }
}

struct Fixture {
    _dir: TempDir,
    scene: Scene,
    director: RecordingDirector,
    textures: TextureCache,
    rng: StdRng,
}

impl Fixture {
    /// Stage built and waiting on its opening script.
    fn start(stage: Stage) -> Self {
        Self::start_on(stage, Screen::default())
    }

    fn start_on(stage: Stage, screen: Screen) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=3 {
            fs::write(
                dir.path().join(format!("Boss{n}.txt")),
                format!("ID: Boss{n}\nName: Boss {n}\nHP: 10\nTexture: boss{n}.bmp\n"),
            )
            .unwrap();
        }
        let mut fixture = Self {
            scene: Scene::new(stage, screen),
            director: RecordingDirector::default(),
            textures: TextureCache::new(StubLoader),
            rng: seeded_rng(),
            _dir: dir,
        };
        let paths = AssetPaths::new(fixture._dir.path());
        fixture.scene.start_up(
            &paths,
            &mut fixture.textures,
            &mut fixture.director,
            0,
            &mut fixture.rng,
        );
        fixture
    }

    /// Stage with the opening script already read through.
    fn battle(stage: Stage) -> Self {
        let mut fixture = Self::start(stage);
        fixture.scene.on_script_finished(ScriptCompletion::BeginBattle);
        fixture
    }

    fn update(&mut self, dt: f32, now_ms: u64) {
        self.scene.update(dt, now_ms, &mut self.director, &mut self.rng);
    }

    fn kill_bosses(&mut self) {
        for boss in &mut self.scene.bosses {
            while boss.is_alive() {
                boss.on_hit();
            }
        }
    }

    fn scripts(&self) -> Vec<PathBuf> {
        self.director.loaded.iter().map(|(p, _)| p.clone()).collect()
    }
}

/// Nearly motionless hostile shot sitting at (x, y).
fn hostile_shot(owner: Owner, x: f32, y: f32) -> Projectile {
    let mut shot = Projectile::new(owner, MotionKind::Angled, None).with_speed(1.0);
    shot.launch_with_angle(x, y, 90.0);
    shot
}

/// Nearly motionless player arrow sitting at (x, y).
fn player_shot(x: f32, y: f32) -> Projectile {
    let mut shot = Projectile::new(Owner::Player, MotionKind::Angled, None).with_speed(1.0);
    shot.launch_with_angle(x, y, -90.0);
    shot
}

// ── Start-up ──────────────────────────────────────────────────────────────────

#[test]
fn stage_one_lines_up_three_bosses() {
    let f = Fixture::start(Stage::One);
    assert_eq!(f.scene.status, GameStatus::Dialogue);
    assert!(f.scene.is_active());
    assert_eq!(
        f.director.loaded,
        vec![(
            PathBuf::from("SceneDialogue/Scene1Start.txt"),
            ScriptCompletion::BeginBattle
        )]
    );
    let xs: Vec<f32> = f.scene.bosses.iter().map(|b| b.rect().x).collect();
    assert_eq!(xs, vec![710.0, 960.0, 1210.0]);
    assert!(f.scene.bosses.iter().all(|b| b.rect().y == 50.0));
    assert!(f.scene.enemies.is_empty());
}

#[test]
fn stage_two_opens_with_a_full_formation() {
    let f = Fixture::start(Stage::Two);
    assert_eq!(f.scene.bosses.len(), 1);
    assert_eq!(f.scene.enemies.len(), 36);
    assert_eq!(f.scene.formation.threshold, 96.0 - 70.0);
    assert_eq!(f.scene.enemies[0].rect(), Rect::new(96.0, 180.0, 70.0, 70.0));
    assert_eq!(f.scene.enemies[35].rect().y, 360.0);
}

#[test]
fn every_actor_has_its_own_id() {
    let f = Fixture::start(Stage::Two);
    let mut ids: Vec<_> = f.scene.enemies.iter().map(|e| e.body().id()).collect();
    ids.extend(f.scene.bosses.iter().map(|b| b.body().id()));
    ids.push(f.scene.player.body().id());
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 38);
}

#[test]
fn boss_config_is_applied_at_start_up() {
    let f = Fixture::start(Stage::Three);
    let boss = &f.scene.bosses[0];
    assert_eq!(boss.name, "Boss 3");
    assert_eq!(boss.max_hp, 10);
    assert_eq!(boss.texture_path, Some(PathBuf::from("boss3.bmp")));
}

// ── Freeze ────────────────────────────────────────────────────────────────────

#[test]
fn nothing_moves_before_the_battle_begins() {
    let mut f = Fixture::start(Stage::Three);
    let boss_before = f.scene.bosses[0].rect();
    let player_before = f.scene.player.rect();

    let left = InputState {
        left: true,
        ..InputState::default()
    };
    f.scene.input(&left, 0.05, 50);
    f.update(0.05, 50);

    assert_eq!(f.scene.bosses[0].rect(), boss_before);
    assert_eq!(f.scene.player.rect(), player_before);
    assert_eq!(f.director.loaded.len(), 1);
}

#[test]
fn begin_battle_starts_play() {
    let mut f = Fixture::start(Stage::One);
    f.scene.on_script_finished(ScriptCompletion::BeginBattle);
    assert_eq!(f.scene.status, GameStatus::Playing);
    f.scene.on_script_finished(ScriptCompletion::EndStage);
    assert!(!f.scene.is_active());
}

#[test]
fn long_frames_are_clamped() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.bosses[0].direction = (1.0, 1.0);
    f.scene.bosses[0].direction_timer = 100.0;
    let x = f.scene.bosses[0].rect().x;

    f.update(5.0, 5000);
    assert_eq!(f.scene.bosses[0].rect().x, x + 100.0 * MAX_DT);
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[test]
fn player_arrow_wounds_boss() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.player.projectiles_mut().push(player_shot(1100.0, 200.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.bosses[0].hp, 9);
    assert_eq!(f.scene.score, 1);
    assert!(f.scene.player.projectiles().iter().all(|p| !p.is_alive()));
}

#[test]
fn one_arrow_scores_once_against_overlapping_bosses() {
    let mut f = Fixture::battle(Stage::One);
    // Inside both the first and second boss.
    f.scene.player.projectiles_mut().push(player_shot(980.0, 200.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.score, 1);
    let hp: i32 = f.scene.bosses.iter().map(|b| b.hp).sum();
    assert_eq!(hp, 29);
}

#[test]
fn player_arrow_kills_minion() {
    let mut f = Fixture::battle(Stage::Two);
    f.scene.player.projectiles_mut().push(player_shot(110.0, 200.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.score, 1);
    assert_eq!(f.scene.enemies.len(), 35);
    assert_eq!(f.scene.bosses[0].hp, 10);
}

#[test]
fn narrow_screen_formation_holds_still() {
    let mut f = Fixture::start_on(Stage::Two, Screen::new(1280.0, 1080.0));
    f.scene.on_script_finished(ScriptCompletion::BeginBattle);
    assert_eq!(f.scene.formation.threshold, 0.0);
    let x = f.scene.enemies[0].rect().x;
    assert_eq!(x, 64.0);

    for frame in 1..=120 {
        f.update(0.016, frame * 16);
    }
    assert_eq!(f.scene.enemies[0].rect().x, x);
    assert_eq!(f.scene.formation.cumulative, 0.0);
}

// ── Orphans ───────────────────────────────────────────────────────────────────

/// Shot in flight, its shooter dying this frame: the shot moves once with its
/// shooter (step 4) and once more in the orphan pool.
fn assert_migrated(orphan: &Projectile, before: Rect, velocity: (f32, f32), owner: Owner, dt: f32) {
    assert_eq!(orphan.owner, owner);
    assert_eq!(orphan.velocity, velocity);
    assert_eq!(orphan.state(), Flight::Firing);
    assert!(orphan.is_alive());
    assert!(orphan.body().renderable);
    let rect = orphan.rect();
    assert!(approx(rect.x, before.x + 2.0 * velocity.0 * dt));
    assert!(approx(rect.y, before.y + 2.0 * velocity.1 * dt));
    assert_eq!((rect.w, rect.h), (before.w, before.h));
}

#[test]
fn dead_enemy_arrows_become_orphans() {
    let mut f = Fixture::battle(Stage::Two);
    let shot = hostile_shot(Owner::Enemy, 300.0, 600.0);
    let (before, velocity) = (shot.rect(), shot.velocity);
    f.scene.enemies[0].projectiles_mut().push(shot);
    // Kills enemies[0] in step 6.
    f.scene.player.projectiles_mut().push(player_shot(110.0, 200.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.enemies.len(), 35);
    assert!(f.scene.enemies.iter().all(|e| e.projectiles().is_empty()));
    assert_eq!(f.scene.orphans.len(), 1);
    assert_migrated(&f.scene.orphans[0], before, velocity, Owner::Enemy, 0.016);
}

#[test]
fn dead_boss_shots_become_orphans() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.bosses[0].hp = 1;
    let shot = hostile_shot(Owner::Boss, 300.0, 600.0);
    let (before, velocity) = (shot.rect(), shot.velocity);
    f.scene.bosses[0].projectiles_mut().push(shot);
    f.scene.player.projectiles_mut().push(player_shot(1100.0, 200.0));

    f.update(0.016, 16);
    assert!(f.scene.bosses.is_empty());
    assert_eq!(f.scene.status, GameStatus::Playing);
    assert_eq!(f.scene.orphans.len(), 1);
    assert_migrated(&f.scene.orphans[0], before, velocity, Owner::Boss, 0.016);
}

#[test]
fn enemy_killed_before_the_battle_hands_over_untouched_shots() {
    let mut f = Fixture::start(Stage::Two);
    let shot = hostile_shot(Owner::Enemy, 300.0, 600.0);
    let (before, velocity) = (shot.rect(), shot.velocity);
    f.scene.enemies[0].projectiles_mut().push(shot);
    f.scene.enemies[0].on_hit();

    f.update(0.016, 16);
    assert_eq!(f.scene.orphans.len(), 1);
    let orphan = &f.scene.orphans[0];
    assert_eq!(orphan.rect(), before);
    assert_eq!(orphan.velocity, velocity);
    assert_eq!(orphan.owner, Owner::Enemy);
    assert_eq!(orphan.state(), Flight::Firing);
}

#[test]
fn orphans_expire_off_screen() {
    let mut f = Fixture::battle(Stage::Three);
    let mut shot = Projectile::new(Owner::Enemy, MotionKind::Angled, None).with_speed(1000.0);
    shot.launch_with_angle(100.0, 1000.0, 90.0);
    f.scene.orphans.push(shot);

    f.update(0.1, 100);
    assert!(f.scene.orphans.is_empty());
}

// ── Stage end ─────────────────────────────────────────────────────────────────

#[test]
fn stage_clears_once_all_bosses_fall() {
    let mut f = Fixture::battle(Stage::Two);
    f.kill_bosses();

    f.update(0.016, 16);
    assert_eq!(f.scene.status, GameStatus::Dialogue);
    assert!(f.scene.bosses.is_empty());
    assert_eq!(f.scene.enemies.len(), 36);
    assert_eq!(
        f.director.loaded.last(),
        Some(&(
            PathBuf::from("SceneDialogue/Scene2End.txt"),
            ScriptCompletion::EndStage
        ))
    );

    f.update(0.016, 32);
    f.update(0.016, 48);
    let end_scripts = f
        .scripts()
        .iter()
        .filter(|p| p.ends_with("Scene2End.txt"))
        .count();
    assert_eq!(end_scripts, 1);
}

// ── Defeat ────────────────────────────────────────────────────────────────────

#[test]
fn boss_shot_defeats_player() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.bosses[0]
        .projectiles_mut()
        .push(hostile_shot(Owner::Boss, 940.0, 960.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.status, GameStatus::Defeat);
    assert_eq!(f.scene.defeat_cause(), Some(DeathCause::Boss));
    assert_eq!(
        f.director.loaded.last(),
        Some(&(
            PathBuf::from("SceneDialogue/Death_byBosses.txt"),
            ScriptCompletion::ExitGame
        ))
    );
}

#[test]
fn minion_shot_defeats_player() {
    let mut f = Fixture::battle(Stage::Two);
    f.scene.enemies[0]
        .projectiles_mut()
        .push(hostile_shot(Owner::Enemy, 940.0, 960.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.defeat_cause(), Some(DeathCause::Minion));
    assert_eq!(
        f.scripts().last(),
        Some(&PathBuf::from("SceneDialogue/Death_byMinion.txt"))
    );
}

#[test]
fn lingering_shot_defeats_player() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.orphans.push(hostile_shot(Owner::Enemy, 940.0, 960.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.defeat_cause(), Some(DeathCause::Lingering));
}

#[test]
fn boss_shot_takes_priority_over_orphans() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.orphans.push(hostile_shot(Owner::Enemy, 940.0, 960.0));
    f.scene.bosses[0]
        .projectiles_mut()
        .push(hostile_shot(Owner::Boss, 940.0, 960.0));

    f.update(0.016, 16);
    assert_eq!(f.scene.defeat_cause(), Some(DeathCause::Boss));
    let deaths = f
        .scripts()
        .iter()
        .filter(|p| p.to_string_lossy().contains("Death_"))
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn defeat_is_not_overridden_by_stage_clear() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.orphans.push(hostile_shot(Owner::Enemy, 940.0, 960.0));
    f.update(0.016, 16);
    assert_eq!(f.scene.status, GameStatus::Defeat);

    f.kill_bosses();
    f.update(0.016, 32);
    assert_eq!(f.scene.status, GameStatus::Defeat);
    assert!(!f.scripts().iter().any(|p| p.ends_with("Scene3End.txt")));
}

// ── Phase two ─────────────────────────────────────────────────────────────────

#[test]
fn wounded_final_boss_calls_minions_once() {
    let mut f = Fixture::battle(Stage::Three);
    f.scene.bosses[0].hp = 6;
    f.update(0.016, 16);
    assert!(f.scene.enemies.is_empty());
    assert!(!f.scene.phase_spawned());

    f.scene.bosses[0].hp = 5;
    f.update(0.016, 32);
    assert_eq!(f.scene.enemies.len(), PHASE_TWO_ENEMIES);
    assert!(f.scene.phase_spawned());

    f.scene.bosses[0].hp = 2;
    f.update(0.016, 48);
    assert_eq!(f.scene.enemies.len(), PHASE_TWO_ENEMIES);
}

#[test]
fn other_stages_never_call_minions() {
    let mut f = Fixture::battle(Stage::One);
    f.scene.bosses[0].hp = 1;
    f.update(0.016, 16);
    assert!(f.scene.enemies.is_empty());
}

// ── Render ────────────────────────────────────────────────────────────────────

#[test]
fn render_only_while_playing() {
    let f = Fixture::start(Stage::Three);
    let mut surface = Recorder::default();
    f.scene.render(&mut surface, &f.textures);
    assert!(surface.paths.is_empty());

    let f = Fixture::battle(Stage::Three);
    f.scene.render(&mut surface, &f.textures);
    assert_eq!(surface.paths.first(), Some(&PathBuf::from("background3.bmp")));
    assert!(surface.paths.contains(&PathBuf::from("boss3.bmp")));
    assert!(surface.paths.contains(&PathBuf::from("MainCharacter.bmp")));
}
