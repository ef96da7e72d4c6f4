mod display;
mod frontend;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use archery_range::config::SimConfig;
use archery_range::entities::{GameStatus, Level};
use archery_range::session::{Session, TICK_MS};
use archery_range::stage::Stage;

use display::View;
use frontend::TerminalFrontend;

const FRAME: Duration = Duration::from_millis(TICK_MS);

/// Space counts as held if its last press/repeat arrived within this many
/// frames.  Classic terminals wait ≈500 ms before the first key repeat, so
/// the window must outlast that gap or the bow would be released early.
const HOLD_WINDOW: u64 = 25;

#[derive(Parser, Debug)]
#[command(name = "archery-range", about = "Bow-and-arrow arcade range in the terminal")]
struct Args {
    /// Skip the menu and start straight away on this difficulty
    #[arg(short, long, value_enum)]
    difficulty: Option<CliLevel>,

    /// Seed for a reproducible match
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding surface, ammunition and layout
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs here; the terminal belongs to the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliLevel {
    Easy,
    Medium,
    Hard,
}

impl From<CliLevel> for Level {
    fn from(level: CliLevel) -> Self {
        match level {
            CliLevel::Easy => Level::Easy,
            CliLevel::Medium => Level::Medium,
            CliLevel::Hard => Level::Hard,
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Level),
    Quit,
}

/// Print coloured spans one after another, starting at `(col, row)`.
fn spans<W: Write>(out: &mut W, col: u16, row: u16, parts: &[(Color, &str)]) -> Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    for (color, text) in parts {
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let left = (width / 2).saturating_sub(18);
    let mut row = (height / 2).saturating_sub(7);

    let lines: &[&[(Color, &str)]] = &[
        &[(Color::Cyan, "      ➶  ARCHERY  RANGE  ◎")],
        &[],
        &[(Color::White, "Select difficulty:")],
        &[(Color::DarkGrey, "[1] "), (Color::Green, "Easy    "), (Color::DarkGrey, "no wind")],
        &[(Color::DarkGrey, "[2] "), (Color::Yellow, "Medium  "), (Color::DarkGrey, "light wind")],
        &[(Color::DarkGrey, "[3] "), (Color::Red, "Hard    "), (Color::DarkGrey, "strong wind")],
        &[],
        &[(Color::DarkGrey, "Points per arrow:")],
        &[(Color::Red, "  ◎    "), (Color::DarkGrey, "target   2 to 10, closer is better")],
        &[(Color::Cyan, "  ✈    "), (Color::DarkGrey, "plane    25 flying, 10 going down")],
        &[(Color::White, "  (__) "), (Color::DarkGrey, "cow      15")],
        &[],
        &[(Color::DarkGrey, "Hold SPACE to draw, release to shoot   Q : Quit")],
    ];
    for parts in lines {
        spans(out, left, row, parts)?;
        row += 1;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Level::Easy)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Level::Medium)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Level::Hard)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: Space-held draws the bow, letting go shoots.  Terminals with
/// keyboard enhancement report the release directly; elsewhere Space counts
/// as released once no press or repeat has arrived for `HOLD_WINDOW` frames.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    stage: &mut Stage,
    front: &mut TerminalFrontend,
    rx: &mpsc::Receiver<Event>,
) -> Result<bool> {
    let (mut width, mut height) = terminal::size()?;
    let mut last_space: Option<u64> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        front.frame = frame;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match (code, kind) {
                    (KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc, KeyEventKind::Press) => {
                        return Ok(true);
                    }
                    (KeyCode::Char('c'), KeyEventKind::Press)
                        if modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        return Ok(true);
                    }
                    (KeyCode::Char('r') | KeyCode::Char('R'), KeyEventKind::Press)
                        if session.status() == GameStatus::GameOver =>
                    {
                        session.reset(front);
                        return Ok(false);
                    }
                    (KeyCode::Char(' '), KeyEventKind::Press | KeyEventKind::Repeat) => {
                        last_space = Some(frame);
                    }
                    (KeyCode::Char(' '), KeyEventKind::Release) => {
                        last_space = None;
                    }
                    _ => {}
                },
                Event::Resize(w, h) => {
                    width = w;
                    height = h;
                }
                _ => {}
            }
        }

        // ── Bow ───────────────────────────────────────────────────────────────
        let held = last_space.is_some_and(|seen| frame.saturating_sub(seen) <= HOLD_WINDOW);
        if held {
            if session.pull_power().is_none() {
                session.begin_pull();
            }
        } else if session.pull_power().is_some() {
            session.release(front);
        }

        session.advance(TICK_MS, &*stage, front);
        stage.advance(TICK_MS, session.plane());

        let view = View {
            session: &*session,
            stage: &*stage,
            front: &*front,
            width,
            height,
        };
        display::render(out, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimConfig::default(),
    };
    info!(
        surface = ?config.surface,
        arrows = config.arrows_per_match,
        seed = ?args.seed,
        "configuration ready"
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("no key-release events; bow release is timed");
    }

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

    let result = run(&mut out, &rx, &args, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
    config: SimConfig,
) -> Result<()> {
    let mut stage = Stage::new(&config);
    let mut session = match args.seed {
        Some(seed) => Session::new(config, seed),
        None => Session::from_entropy(config),
    };
    let mut front = TerminalFrontend::new();
    let mut preset = args.difficulty.map(Level::from);

    loop {
        let level = match preset.take() {
            Some(level) => level,
            None => match show_menu(out, rx)? {
                MenuResult::Quit => break,
                MenuResult::Start(level) => level,
            },
        };

        session.set_difficulty(level);
        session.start(&mut front);
        let quit = game_loop(out, &mut session, &mut stage, &mut front, rx)?;

        if quit {
            break;
        }
        // Otherwise loop back to the menu
    }
    Ok(())
}
