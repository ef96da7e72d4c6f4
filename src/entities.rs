//! All simulation entity types: pure data, no game rules.
//!
//! Coordinates are play-surface units with the origin at the top-left
//! corner and y growing downward.

use serde::{Deserialize, Serialize};

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Box of `size` centred on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

// ── Difficulty & wind ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// The three wind strengths a difficulty can select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindStrength {
    #[default]
    None,
    Light,
    Strong,
}

impl WindStrength {
    pub fn value(self) -> f64 {
        match self {
            WindStrength::None => 0.0,
            WindStrength::Light => 0.3,
            WindStrength::Strong => 0.6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindStrength::None => "None",
            WindStrength::Light => "Light",
            WindStrength::Strong => "Strong",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindState {
    pub strength: WindStrength,
    /// Degrees, purely presentational.
    pub direction: f64,
}

// ── Actors ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorId {
    Target,
    CowA,
    CowB,
    Plane,
    Tank,
    Launcher,
}

/// Plane flight altitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Low,
    High,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Arrow,
    TankShell,
    Rocket,
    FallingPlane,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Tank,
    Launcher,
    Plane,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    pub owner: Owner,
    /// Top-left corner of the projectile's box.
    pub position: Point,
    /// Units per tick.
    pub velocity: Point,
    /// Heading in degrees (visual only).
    pub rotation: f64,
    /// Ticks since launch.
    pub frame: u32,
}

/// Re-aiming state carried by a tank shell or rocket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomingGuide {
    pub start: Point,
    pub total_frames: u32,
    /// Last sampled plane centre.
    pub aim: Point,
}

// ── Plane ─────────────────────────────────────────────────────────────────────

/// Ballistic fall after a tank hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Fall {
    pub body: Projectile,
    /// Box size at the moment of the hit; `scale` grows it.
    pub base_size: Size,
    pub scale: f64,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlaneState {
    Flying { lane: Lane },
    /// Rocket wobble; the plane stays a valid target.
    Stunned { lane: Lane },
    Falling(Fall),
    Respawning,
}

// ── Weapons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Tank,
    Launcher,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub cooling_down: bool,
    /// Barrel heading in degrees, counter-clockwise from the +x axis.
    pub barrel_angle: f64,
    pub shots_fired: u32,
    pub last_fired_ms: Option<u64>,
}

impl WeaponState {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            cooling_down: false,
            barrel_angle: 0.0,
            shots_fired: 0,
            last_fired_ms: None,
        }
    }
}

// ── Match ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Ready,
    Playing,
    GameOver,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchState {
    pub score: u32,
    pub arrows_remaining: u32,
    pub status: GameStatus,
    pub difficulty: Level,
}

impl MatchState {
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Master,
    Great,
    Good,
    KeepPracticing,
}

impl Rating {
    pub fn message(self) -> &'static str {
        match self {
            Rating::Master => "Amazing! You are a master archer!",
            Rating::Great => "Great shooting! Keep practicing!",
            Rating::Good => "Good try! You are getting better!",
            Rating::KeepPracticing => "Keep practicing! You will improve!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameOverSummary {
    pub score: u32,
    pub average: f64,
    pub rating: Rating,
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Callout {
    Whoosh,
    Smash,
    Moo,
}

impl Callout {
    pub fn text(self) -> &'static str {
        match self {
            Callout::Whoosh => "WHOOSH!",
            Callout::Smash => "SMASH!",
            Callout::Moo => "MOO!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    /// `large` for tank hits, small for rocket hits.
    Explosion { large: bool },
    Smoke,
    Points(u32),
    Callout(Callout),
    TargetFire,
    StuckArrow { rotation: f64 },
}
