//! Shared tags: ownership, motion, game status, stages and boss identities.

use std::path::PathBuf;

// ── Projectile tags ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Player,
    Enemy,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionKind {
    /// Straight up or down along y.
    Oscillating,
    /// Fixed velocity vector from the launch angle.
    Angled,
    /// Fixed velocity vector, sprite spins while in flight.
    Tracking,
}

// ── Game flow ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// A script is on screen; the battle is frozen.
    Dialogue,
    Playing,
    Defeat,
    Victory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    One,
    Two,
    Three,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::One, Stage::Two, Stage::Three];

    pub fn number(self) -> u8 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
            Stage::Three => 3,
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::One => Some(Stage::Two),
            Stage::Two => Some(Stage::Three),
            Stage::Three => None,
        }
    }

    /// Boss count at stage start.
    pub fn boss_count(self) -> usize {
        match self {
            Stage::One => 3,
            Stage::Two | Stage::Three => 1,
        }
    }

    /// Enemies laid out at stage start (stage 3 spawns its own mid-battle).
    pub fn opening_enemies(self) -> usize {
        match self {
            Stage::Two => 36,
            Stage::One | Stage::Three => 0,
        }
    }

    /// Relative to the asset directory.
    pub fn boss_config(self) -> PathBuf {
        PathBuf::from(format!("Boss{}.txt", self.number()))
    }

    pub fn start_script(self) -> PathBuf {
        PathBuf::from(format!("SceneDialogue/Scene{}Start.txt", self.number()))
    }

    pub fn end_script(self) -> PathBuf {
        PathBuf::from(format!("SceneDialogue/Scene{}End.txt", self.number()))
    }

    pub fn background(self) -> PathBuf {
        PathBuf::from(format!("background{}.bmp", self.number()))
    }
}

/// Which hostile object landed the fatal hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Boss,
    Minion,
    /// A projectile whose shooter was already dead.
    Lingering,
}

impl DeathCause {
    pub fn script(self) -> PathBuf {
        let name = match self {
            DeathCause::Boss => "Death_byBosses",
            DeathCause::Minion => "Death_byMinion",
            DeathCause::Lingering => "Death_LingeringShot",
        };
        PathBuf::from(format!("SceneDialogue/{name}.txt"))
    }
}

// ── Boss identity ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossId {
    Boss1,
    Boss2,
    Boss3,
}

impl BossId {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Boss1" => Some(BossId::Boss1),
            "Boss2" => Some(BossId::Boss2),
            "Boss3" => Some(BossId::Boss3),
            _ => None,
        }
    }

    /// Only the first boss wanders vertically.
    pub fn roams_vertically(self) -> bool {
        self == BossId::Boss1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Rain,
    Spread,
    Ultimate,
    GhostFire,
    Slash,
}

impl Pattern {
    /// Config-file spelling. Note `Ghost`, not `GhostFire`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Rain" => Some(Pattern::Rain),
            "Spread" => Some(Pattern::Spread),
            "Ultimate" => Some(Pattern::Ultimate),
            "Ghost" => Some(Pattern::GhostFire),
            "Slash" => Some(Pattern::Slash),
            _ => None,
        }
    }
}
