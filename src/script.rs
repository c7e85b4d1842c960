//! Dialogue scripts.
//!
//! The battle core only ever asks a `ScriptDirector` to load a script with a
//! completion and to advance it. `DialogueDirector` is the stock
//! implementation used by the terminal front-end.

use std::path::{Path, PathBuf};

use crate::error::GameError;

/// What happens once the last line of a script has been read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptCompletion {
    /// Stage intro finished; the battle starts.
    BeginBattle,
    /// Stage outro finished; move on to the next stage.
    EndStage,
    /// Death script finished; leave the game.
    ExitGame,
}

pub trait ScriptDirector {
    /// Replace whatever script was running.
    fn load_script(&mut self, path: &Path, on_finish: ScriptCompletion);

    /// Move to the next line. Returns the completion once the script ran out,
    /// exactly once per loaded script.
    fn next_line(&mut self) -> Option<ScriptCompletion>;
}

/// Parsed `background:` / `line:` file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogueScript {
    pub background: Option<PathBuf>,
    pub lines: Vec<String>,
}

impl DialogueScript {
    pub fn parse(text: &str) -> Self {
        let mut script = Self::default();
        for raw in text.lines() {
            let Some((key, value)) = raw.split_once(':') else {
                continue;
            };
            let value = value.trim_start_matches([' ', '\t']).trim_end_matches('\r');
            match key {
                "background" if !value.is_empty() => script.background = Some(PathBuf::from(value)),
                "line" => script.lines.push(value.to_string()),
                _ => {}
            }
        }
        script
    }

    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::script_io(path, e))?;
        Ok(Self::parse(&text))
    }
}

/// Script directory plus the script currently on screen.
#[derive(Clone, Debug, Default)]
pub struct DialogueDirector {
    root: PathBuf,
    script: DialogueScript,
    index: usize,
    active: bool,
    on_finish: Option<ScriptCompletion>,
}

impl DialogueDirector {
    /// Relative script paths are resolved against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.active
    }

    /// Empty once the script finished or when it had no lines.
    pub fn current_line(&self) -> &str {
        if !self.active {
            return "";
        }
        self.script.lines.get(self.index).map_or("", String::as_str)
    }

    pub fn background(&self) -> Option<&Path> {
        self.script.background.as_deref()
    }

    pub fn line_count(&self) -> usize {
        self.script.lines.len()
    }
}

impl ScriptDirector for DialogueDirector {
    fn load_script(&mut self, path: &Path, on_finish: ScriptCompletion) {
        self.index = 0;
        self.active = true;
        self.on_finish = Some(on_finish);
        self.script = match DialogueScript::load(&self.root.join(path)) {
            Ok(script) => script,
            Err(err) => {
                tracing::error!("{err}");
                DialogueScript::default()
            }
        };
        tracing::debug!("script {} loaded, {} lines", path.display(), self.script.lines.len());
    }

    fn next_line(&mut self) -> Option<ScriptCompletion> {
        if !self.active {
            return None;
        }
        self.index += 1;
        if self.index >= self.script.lines.len() {
            self.active = false;
            return self.on_finish.take();
        }
        None
    }
}
