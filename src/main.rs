mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::process::ExitCode;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton, MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use bow_shooter::assets::TextureCache;
use bow_shooter::campaign::{Campaign, Progress};
use bow_shooter::clock::SystemClock;
use bow_shooter::component::InputState;
use bow_shooter::config::GameConfig;
use bow_shooter::entities::GameStatus;
use bow_shooter::script::DialogueDirector;

use display::GlyphFallbackLoader;

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    let any = |keys: &[KeyCode]| keys.iter().any(|k| is_held(key_frame, k, frame));
    InputState {
        left: any(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        right: any(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        fire: any(&[KeyCode::Char(' ')]),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw alternate-screen mode, so log lines go to a file.
fn init_logging(config: &GameConfig) {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    match File::create(&config.log_file) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

type Game = Campaign<DialogueDirector, SystemClock>;

/// Runs until the player quits, reads through a death script, or clears
/// the last stage and presses a key.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    budget: Duration,
) -> std::io::Result<()> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ if game.progress() == Progress::Won => return Ok(()),
                            KeyCode::Char(' ') | KeyCode::Enter
                                if game.status() != GameStatus::Playing =>
                            {
                                game.advance_script();
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(mouse)
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                        && game.status() != GameStatus::Playing =>
                {
                    game.advance_script();
                }
                _ => {}
            }
        }

        if game.progress() == Progress::Exited {
            return Ok(());
        }

        let input = if game.status() == GameStatus::Playing {
            held_input(&key_frame, frame)
        } else {
            InputState::default()
        };
        game.step(&input);

        display::render(out, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let config = GameConfig::from_env();
    init_logging(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(config: &GameConfig) -> anyhow::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("could not switch the terminal to raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("could not enter the alternate screen")?;
    out.execute(cursor::Hide)?;
    let _ = out.execute(event::EnableMouseCapture);

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let textures = TextureCache::new(GlyphFallbackLoader::new(&config.asset_dir));
    let director = DialogueDirector::new(&config.asset_dir);
    let mut game = Campaign::new(
        config,
        textures,
        director,
        SystemClock::new(),
        StdRng::from_entropy(),
    );
    let budget = Duration::from_millis(config.frame_budget_ms());
    let result = game_loop(&mut out, &mut game, &rx, budget);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(event::DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    tracing::info!("exiting with score {}", game.scene.score);
    result.context("terminal I/O failed")
}
