//! Rendering layer: all terminal I/O lives here.
//!
//! The play surface is laid out in surface units (1000×600 by default) and
//! scaled onto whatever terminal grid is available.  No game logic is
//! performed; this module only translates session and stage state into
//! terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use archery_range::entities::{
    ActorId, EffectKind, GameStatus, Level, PlaneState, Point, ProjectileKind, Rect, Size,
    WeaponKind,
};
use archery_range::plane;
use archery_range::ports::ActorBoxes;
use archery_range::session::Session;
use archery_range::stage::Stage;

use crate::frontend::TerminalFrontend;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_ARROWS: Color = Color::Cyan;
const C_TARGET: Color = Color::Red;
const C_BULLSEYE: Color = Color::Yellow;
const C_COW: Color = Color::White;
const C_PLANE: Color = Color::Cyan;
const C_TANK: Color = Color::DarkGreen;
const C_LAUNCHER: Color = Color::DarkYellow;
const C_ARROW: Color = Color::White;
const C_SHELL: Color = Color::Grey;
const C_ROCKET: Color = Color::Red;
const C_PREVIEW: Color = Color::DarkRed;
const C_EXPLOSION: Color = Color::Yellow;
const C_SMOKE: Color = Color::DarkGrey;
const C_POINTS: Color = Color::Yellow;
const C_CALLOUT: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Everything one frame needs.
pub struct View<'a> {
    pub session: &'a Session,
    pub stage: &'a Stage,
    pub front: &'a TerminalFrontend,
    pub width: u16,
    pub height: u16,
}

impl View<'_> {
    /// Map a surface point to a terminal cell inside the border.
    fn cell(&self, p: Point) -> Option<(u16, u16)> {
        let surface = self.session.config().surface;
        let cols = f64::from(self.width.saturating_sub(2));
        let rows = f64::from(self.height.saturating_sub(4));
        let col = (p.x / surface.width * cols).floor();
        let row = (p.y / surface.height * rows).floor();
        if col < 0.0 || row < 0.0 || col >= cols || row >= rows {
            return None;
        }
        Some((col as u16 + 1, row as u16 + 2))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view)?;

    draw_preview(out, view)?;
    draw_scenery(out, view)?;
    draw_plane(out, view)?;
    draw_projectiles(out, view)?;
    draw_effects(out, view)?;
    draw_controls_hint(out, view)?;

    if view.session.status() == GameStatus::GameOver {
        draw_game_over(out, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar (the ground)
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    let session = view.session;

    // Score and arrows, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>4}", view.front.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_ARROWS))?;
    out.queue(Print(format!("  Arrows:{:>3}", view.front.arrows)))?;

    // Level, centre
    let level = session.match_state().difficulty;
    let (level_str, level_color) = match level {
        Level::Easy => ("[ EASY ]", Color::Green),
        Level::Medium => ("[ MEDIUM ]", Color::Yellow),
        Level::Hard => ("[ HARD ]", Color::Red),
    };
    let lx = (view.width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(level_color))?;
    out.queue(Print(level_str))?;

    // Wind, pull power and sound, right
    let wind = session.wind();
    let mut right = format!("Wind: {} {}", wind.strength.label(), heading_glyph(wind.direction));
    if let Some(power) = session.pull_power() {
        let filled = (power / 10.0).round() as usize;
        right = format!("Pull [{:<10}] {}", "█".repeat(filled), right);
    }
    if let Some(hz) = view.front.tone_playing() {
        right = format!("♪{hz:.0}Hz  {right}");
    }
    let rx = view.width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&right))?;

    Ok(())
}

/// Screen heading (y down) to an arrow glyph.
fn heading_glyph(direction: f64) -> &'static str {
    const GLYPHS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
    GLYPHS[octant(direction)]
}

/// Nearest of the eight compass octants for a heading in degrees.
fn octant(degrees: f64) -> usize {
    (((degrees.rem_euclid(360.0) + 22.5) / 45.0) as usize) % 8
}

// ── Actors ────────────────────────────────────────────────────────────────────

fn draw_label<W: Write>(
    out: &mut W,
    view: &View<'_>,
    rect: &Rect,
    label: &str,
    color: Color,
) -> std::io::Result<()> {
    let half = label.chars().count() as f64 / 2.0;
    let Some((col, row)) = view.cell(rect.center()) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col.saturating_sub(half as u16).max(1), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(label))?;
    Ok(())
}

fn draw_scenery<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    let stage = view.stage;

    if let Some(target) = stage.bounding_box(ActorId::Target) {
        // Outer ring as a box, bullseye at the centre.
        for (corner, glyph) in [
            (Point::new(target.left, target.top), "╭"),
            (Point::new(target.right - 1.0, target.top), "╮"),
            (Point::new(target.left, target.bottom - 1.0), "╰"),
            (Point::new(target.right - 1.0, target.bottom - 1.0), "╯"),
        ] {
            if let Some((col, row)) = view.cell(corner) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_TARGET))?;
                out.queue(Print(glyph))?;
            }
        }
        let on_fire = view
            .front
            .effects
            .values()
            .any(|e| e.kind == EffectKind::TargetFire);
        let bullseye = if on_fire { "^◎^" } else { "(◎)" };
        draw_label(out, view, &target, bullseye, C_BULLSEYE)?;
    }

    for cow in [ActorId::CowA, ActorId::CowB] {
        if let Some(rect) = stage.bounding_box(cow) {
            draw_label(out, view, &rect, "(__)>", C_COW)?;
        }
    }

    let session = view.session;
    if let Some(rect) = stage.bounding_box(ActorId::Tank) {
        let barrel = heading_glyph(-session.weapon(WeaponKind::Tank).barrel_angle);
        draw_label(out, view, &rect, &format!("[TANK{barrel}]"), C_TANK)?;
    }
    if let Some(rect) = stage.bounding_box(ActorId::Launcher) {
        let tube = heading_glyph(-session.weapon(WeaponKind::Launcher).barrel_angle);
        draw_label(out, view, &rect, &format!("[RL{tube}]"), C_LAUNCHER)?;
    }

    // The archer
    let bow = session.config().bow_anchor;
    if let Some((col, row)) = view.cell(bow) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(if session.pull_power().is_some() { "o}>" } else { "o)" }))?;
    }

    Ok(())
}

fn draw_plane<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    match view.session.plane() {
        PlaneState::Flying { .. } => {
            if let Some(rect) = view.stage.bounding_box(ActorId::Plane) {
                draw_label(out, view, &rect, "=<✈>=", C_PLANE)?;
            }
        }
        PlaneState::Stunned { .. } => {
            if let Some(rect) = view.stage.bounding_box(ActorId::Plane) {
                draw_label(out, view, &rect, "~<✈>~", C_PLANE)?;
            }
        }
        PlaneState::Falling(fall) => {
            let rect = plane::fall_bounds(fall);
            let color = if fall.opacity > 0.5 { Color::Red } else { Color::DarkRed };
            draw_label(out, view, &rect, "*✈*", color)?;
        }
        PlaneState::Respawning => {}
    }
    Ok(())
}

fn draw_projectiles<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    let session = view.session;

    if let Some(arrow) = session.arrow() {
        let size = session.projectile_size(ProjectileKind::Arrow);
        draw_at(out, view, centre_of(arrow.position, size), heading_glyph(arrow.rotation), C_ARROW)?;
    }

    for shot in session.homing_shots() {
        let size = session.projectile_size(shot.body.kind);
        let (glyph, color) = match shot.body.kind {
            ProjectileKind::Rocket => (heading_glyph(shot.body.rotation), C_ROCKET),
            _ => ("●", C_SHELL),
        };
        draw_at(out, view, centre_of(shot.body.position, size), glyph, color)?;
    }
    Ok(())
}

fn centre_of(top_left: Point, size: Size) -> Point {
    Point::new(top_left.x + size.width / 2.0, top_left.y + size.height / 2.0)
}

fn draw_at<W: Write>(
    out: &mut W,
    view: &View<'_>,
    at: Point,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(at) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_preview<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    for (i, p) in view.session.trajectory_preview().into_iter().enumerate() {
        // Dashed, like the aiming line it replaces.
        if i % 2 == 0 {
            draw_at(out, view, p, "·", C_PREVIEW)?;
        }
    }
    Ok(())
}

fn draw_effects<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    for effect in view.front.effects.values() {
        match effect.kind {
            EffectKind::Explosion { large } => {
                draw_at(out, view, effect.at, if large { "✸BOOM✸" } else { "✸" }, C_EXPLOSION)?;
            }
            EffectKind::Smoke if effect.opacity > 0.3 => draw_at(out, view, effect.at, "▒", C_SMOKE)?,
            EffectKind::Smoke if effect.opacity > 0.0 => draw_at(out, view, effect.at, "░", C_SMOKE)?,
            EffectKind::Smoke => {}
            EffectKind::Points(points) => {
                draw_at(out, view, effect.at, &format!("+{points}"), C_POINTS)?;
            }
            EffectKind::Callout(callout) => draw_at(out, view, effect.at, callout.text(), C_CALLOUT)?,
            EffectKind::StuckArrow { rotation } => {
                draw_at(out, view, effect.at, heading_glyph(rotation), C_ARROW)?;
            }
            // Drawn as part of the target.
            EffectKind::TargetFire => {}
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE (hold) : Draw bow   release : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    let Some(summary) = view.session.summary() else {
        return Ok(());
    };
    let max_score = view.session.config().arrows_per_match * 10;
    let score_line = format!("Final Score: {} / {}", summary.score, max_score);
    let average_line = format!("Average per arrow: {:.1}", summary.average);

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&average_line, Color::Yellow),
        (summary.rating.message(), Color::White),
        ("R - Play Again  Q - Quit", Color::DarkGrey),
    ];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
