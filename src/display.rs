//! Terminal front-end: a `RenderSurface` that maps the 1920x1080 world onto
//! terminal cells, plus the HUD, dialogue box and end-of-game overlays.
//!
//! Textures are drawn as coloured glyph blocks picked from the texture's file
//! name, so the game plays without any image assets on disk.

use std::io::Write;
use std::path::Path;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use bow_shooter::assets::{ImageFileLoader, Texture, TextureLoader};
use bow_shooter::campaign::Campaign;
use bow_shooter::clock::FrameClock;
use bow_shooter::component::Actor;
use bow_shooter::entities::GameStatus;
use bow_shooter::error::GameError;
use bow_shooter::render::RenderSurface;
use bow_shooter::script::DialogueDirector;
use bow_shooter::transform::{Rect, Screen};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_STAGE: Color = Color::Cyan;
const C_HUD_BOSS: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_DIALOGUE: Color = Color::White;

/// Glyph and colour for a texture, keyed on its file name.
fn glyph_for(path: &Path) -> Option<(&'static str, Color)> {
    let name = path.file_name()?.to_str()?;
    let glyph = match name {
        "MainCharacter.bmp" => ("A", Color::White),
        "arrow.bmp" => ("║", Color::Cyan),
        "UndeadArchers.bmp" => ("☠", Color::Green),
        "Arrow.bmp" => ("↓", Color::Magenta),
        "EvilSpikes.bmp" => ("▼", Color::Red),
        "SoulReaper.bmp" => ("◎", Color::Magenta),
        "fireball.bmp" => ("●", Color::Yellow),
        "CursedFire.bmp" => ("✧", Color::Cyan),
        "Slash.bmp" => ("✕", Color::Yellow),
        // Backgrounds stay black in the terminal.
        n if n.starts_with("background") => return None,
        _ => ("█", Color::DarkRed),
    };
    Some(glyph)
}

// ── Texture loading ───────────────────────────────────────────────────────────

/// Reads real image headers when the file exists; otherwise hands back a
/// zero-sized texture that the terminal still draws as a glyph.
pub struct GlyphFallbackLoader {
    images: ImageFileLoader,
}

impl GlyphFallbackLoader {
    pub fn new(root: &Path) -> Self {
        Self {
            images: ImageFileLoader::new(root),
        }
    }
}

impl TextureLoader for GlyphFallbackLoader {
    fn load(&mut self, path: &Path) -> Result<Texture, GameError> {
        match self.images.load(path) {
            Ok(texture) => Ok(texture),
            Err(err) if glyph_for(path).is_some() => {
                tracing::debug!("{err}; drawing glyph only");
                Ok(Texture {
                    path: path.to_path_buf(),
                    width: 0,
                    height: 0,
                })
            }
            Err(err) => Err(err),
        }
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

/// Play area is rows 2..rows-2 and columns 1..cols-1, inside the border.
pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    cols: u16,
    rows: u16,
    world: Screen,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    pub fn new(out: &'a mut W, cols: u16, rows: u16, world: Screen) -> Self {
        Self {
            out,
            cols,
            rows,
            world,
        }
    }

    fn play_width(&self) -> f32 {
        f32::from(self.cols.saturating_sub(2).max(1))
    }

    fn play_height(&self) -> f32 {
        f32::from(self.rows.saturating_sub(4).max(1))
    }

    /// World rect → (col, row, width, height) in cells, at least 1x1.
    fn to_cells(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let sx = self.play_width() / self.world.width;
        let sy = self.play_height() / self.world.height;
        let col = (rect.x * sx).floor() as i32 + 1;
        let row = (rect.y * sy).floor() as i32 + 2;
        let w = ((rect.w * sx).round() as i32).max(1);
        let h = ((rect.h * sy).round() as i32).max(1);
        (col, row, w, h)
    }
}

impl<W: Write> RenderSurface for TerminalSurface<'_, W> {
    fn draw(&mut self, texture: &Texture, rect: Rect, _rotation: f32) -> Result<(), GameError> {
        let Some((glyph, color)) = glyph_for(&texture.path) else {
            return Ok(());
        };
        let (col, row, w, h) = self.to_cells(rect);
        let (min_col, max_col) = (1, i32::from(self.cols) - 2);
        let (min_row, max_row) = (2, i32::from(self.rows) - 3);

        let queue = |out: &mut W| -> std::io::Result<()> {
            out.queue(style::SetForegroundColor(color))?;
            for r in row.max(min_row)..(row + h).min(max_row + 1) {
                let start = col.max(min_col);
                let end = (col + w).min(max_col + 1);
                if start >= end {
                    continue;
                }
                out.queue(cursor::MoveTo(start as u16, r as u16))?;
                out.queue(Print(glyph.repeat((end - start) as usize)))?;
            }
            Ok(())
        };
        queue(&mut *self.out).map_err(|e| GameError::Render(e.to_string()))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, C: FrameClock>(
    out: &mut W,
    campaign: &Campaign<DialogueDirector, C>,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, campaign, cols)?;

    match campaign.status() {
        GameStatus::Playing => {
            let mut surface = TerminalSurface::new(out, cols, rows, campaign.scene.screen());
            campaign.render(&mut surface);
        }
        GameStatus::Dialogue | GameStatus::Defeat => {
            draw_dialogue(out, &campaign.director, cols, rows)?;
        }
        GameStatus::Victory => draw_victory(out, campaign.scene.score, cols, rows)?,
    }

    draw_controls_hint(out, campaign.status(), rows)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write, C: FrameClock>(
    out: &mut W,
    campaign: &Campaign<DialogueDirector, C>,
    cols: u16,
) -> std::io::Result<()> {
    let scene = &campaign.scene;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", scene.score)))?;

    let stage = format!("[ STAGE {} ]", scene.stage.number());
    out.queue(cursor::MoveTo((cols / 2).saturating_sub(stage.len() as u16 / 2), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STAGE))?;
    out.queue(Print(&stage))?;

    let bosses: Vec<String> = scene
        .bosses
        .iter()
        .filter(|b| b.is_alive())
        .map(|b| format!("{} {}/{}", b.name, b.hp.max(0), b.max_hp))
        .collect();
    if !bosses.is_empty() {
        let right = bosses.join("  ");
        let rx = cols.saturating_sub(right.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_BOSS))?;
        out.queue(Print(&right))?;
    }
    Ok(())
}

// ── Dialogue box ──────────────────────────────────────────────────────────────

fn draw_dialogue<W: Write>(
    out: &mut W,
    director: &DialogueDirector,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    if director.is_finished() {
        return Ok(());
    }
    let inner = cols.saturating_sub(6) as usize;
    let top = rows.saturating_sub(8);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(2, top))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    for r in 1..=3 {
        out.queue(cursor::MoveTo(2, top + r))?;
        out.queue(Print(format!("║{}║", " ".repeat(inner))))?;
    }
    out.queue(cursor::MoveTo(2, top + 4))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;

    let line: String = director.current_line().chars().take(inner.saturating_sub(2)).collect();
    out.queue(cursor::MoveTo(4, top + 2))?;
    out.queue(style::SetForegroundColor(C_DIALOGUE))?;
    out.queue(Print(line))?;
    Ok(())
}

// ── Victory overlay ───────────────────────────────────────────────────────────

fn draw_victory<W: Write>(out: &mut W, score: u32, cols: u16, rows: u16) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", score);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Yellow),
        ("║      VICTORY       ║", Color::Yellow),
        ("╚════════════════════╝", Color::Yellow),
        (score_line.as_str(), Color::White),
        ("Thank you for playing.", Color::DarkGrey),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, status: GameStatus, rows: u16) -> std::io::Result<()> {
    let hint = match status {
        GameStatus::Playing => "← → / A D : Move   SPACE : Shoot   Q : Quit",
        GameStatus::Victory => "Any key : Exit",
        GameStatus::Dialogue | GameStatus::Defeat => "SPACE / Click : Continue   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
