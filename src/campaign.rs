//! Stage sequencing: stage 1 through 3, then victory.
//!
//! The campaign is the only place that hears about finished scripts; it
//! forwards them to the scene and swaps scenes when a stage ends.

use rand::rngs::StdRng;

use crate::assets::TextureCache;
use crate::clock::FrameClock;
use crate::component::InputState;
use crate::config::{AssetPaths, GameConfig};
use crate::entities::{GameStatus, Stage};
use crate::render::RenderSurface;
use crate::scene::Scene;
use crate::script::{ScriptCompletion, ScriptDirector};
use crate::transform::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Running,
    /// All three stages cleared.
    Won,
    /// A death script was read through; the program should quit.
    Exited,
}

pub struct Campaign<D, C> {
    pub scene: Scene,
    pub textures: TextureCache,
    pub director: D,
    pub clock: C,
    rng: StdRng,
    paths: AssetPaths,
    screen: Screen,
    progress: Progress,
}

impl<D: ScriptDirector, C: FrameClock> Campaign<D, C> {
    pub fn new(config: &GameConfig, textures: TextureCache, director: D, clock: C, rng: StdRng) -> Self {
        let screen = config.screen();
        let mut campaign = Self {
            scene: Scene::new(Stage::One, screen),
            textures,
            director,
            clock,
            rng,
            paths: config.asset_paths(),
            screen,
            progress: Progress::Running,
        };
        campaign.start_stage(Stage::One);
        campaign
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn status(&self) -> GameStatus {
        self.scene.status
    }

    fn start_stage(&mut self, stage: Stage) {
        self.scene = Scene::new(stage, self.screen);
        let now = self.clock.now_ms();
        self.scene.start_up(
            &self.paths,
            &mut self.textures,
            &mut self.director,
            now,
            &mut self.rng,
        );
        self.clock.reset();
    }

    /// Player clicked through a dialogue line.
    pub fn advance_script(&mut self) {
        if let Some(completion) = self.director.next_line() {
            self.handle_completion(completion);
        }
    }

    pub fn handle_completion(&mut self, completion: ScriptCompletion) {
        self.scene.on_script_finished(completion);
        match completion {
            ScriptCompletion::BeginBattle => self.clock.reset(),
            ScriptCompletion::EndStage => match self.scene.stage.next() {
                Some(next) => self.start_stage(next),
                None => {
                    self.scene.status = GameStatus::Victory;
                    self.progress = Progress::Won;
                    tracing::info!("campaign won with score {}", self.scene.score);
                }
            },
            ScriptCompletion::ExitGame => self.progress = Progress::Exited,
        }
    }

    /// One simulation step: input, then update unless a script is up.
    pub fn step(&mut self, input: &InputState) {
        if self.progress != Progress::Running {
            return;
        }
        let dt = self.clock.delta();
        let now = self.clock.now_ms();
        self.scene.input(input, dt, now);
        if self.scene.status != GameStatus::Dialogue {
            self.scene.update(dt, now, &mut self.director, &mut self.rng);
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        self.scene.render(surface, &self.textures);
    }
}
