//! Pure simulation functions: kinematics, collision and scoring.
//!
//! Every public function takes its inputs by value or shared reference
//! (and, where needed, an RNG handle) and returns fresh values.  Side
//! effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    ActorId, Owner, Point, Projectile, ProjectileId, ProjectileKind, Rating, Rect, Size,
    WindStrength,
};

// ── Physics constants ────────────────────────────────────────────────────────

/// Downward acceleration applied to arrows, units per tick².
pub const GRAVITY: f64 = 0.5;
/// Launch speed at full pull, units per tick.
pub const ARROW_SPEED: f64 = 15.0;
/// Launch angle at zero pull, degrees (negative = upward).
pub const BASE_ANGLE_DEG: f64 = -45.0;
/// Pulls at or below this power are discarded.
pub const MIN_PULL: f64 = 10.0;
pub const MAX_PULL: f64 = 100.0;
/// Scale applied to the random wind gust each tick.
pub const WIND_GUST_SCALE: f64 = 0.2;
/// Integration steps drawn by the trajectory preview.
pub const PREVIEW_STEPS: usize = 100;

// ── Launch ───────────────────────────────────────────────────────────────────

/// Launch angle in degrees.  Flatter as power increases.
pub fn launch_angle(power: f64) -> f64 {
    BASE_ANGLE_DEG + power / 10.0
}

pub fn launch_speed(power: f64) -> f64 {
    (power / MAX_PULL) * ARROW_SPEED
}

/// Initial `(vx, vy)` for a shot of the given pull power.
pub fn launch_velocity(power: f64) -> Point {
    let angle = launch_angle(power).to_radians();
    let speed = launch_speed(power);
    Point::new(angle.cos() * speed, angle.sin() * speed)
}

pub fn is_valid_pull(power: f64) -> bool {
    power > MIN_PULL
}

/// Build a player arrow, or `None` when the pull is too weak to fire.
pub fn spawn_arrow(id: ProjectileId, origin: Point, power: f64) -> Option<Projectile> {
    if !is_valid_pull(power) {
        return None;
    }
    let power = power.min(MAX_PULL);
    Some(Projectile {
        id,
        kind: ProjectileKind::Arrow,
        owner: Owner::Player,
        position: origin,
        velocity: launch_velocity(power),
        rotation: launch_angle(power),
        frame: 0,
    })
}

// ── Kinematics ───────────────────────────────────────────────────────────────

/// Heading in degrees of a displacement.
pub fn heading_deg(dx: f64, dy: f64) -> f64 {
    dy.atan2(dx).to_degrees()
}

/// Random horizontal gust for one tick.  No RNG draw when there is no wind.
pub fn wind_gust(strength: WindStrength, rng: &mut impl Rng) -> f64 {
    match strength {
        WindStrength::None => 0.0,
        s => s.value() * (rng.gen::<f64>() - 0.5) * WIND_GUST_SCALE,
    }
}

/// One Euler step under `gravity`: accelerate first, then move.
pub fn integrate(p: &Projectile, gravity: f64) -> Projectile {
    let velocity = Point::new(p.velocity.x, p.velocity.y + gravity);
    Projectile {
        position: Point::new(p.position.x + velocity.x, p.position.y + velocity.y),
        velocity,
        rotation: heading_deg(velocity.x, velocity.y),
        frame: p.frame + 1,
        ..p.clone()
    }
}

/// Advance a player arrow by one tick under gravity and wind.
pub fn advance(p: &Projectile, wind: WindStrength, rng: &mut impl Rng) -> Projectile {
    let gust = wind_gust(wind, rng);
    let pushed = Projectile {
        velocity: Point::new(p.velocity.x + gust, p.velocity.y),
        ..p.clone()
    };
    integrate(&pushed, GRAVITY)
}

/// Arrows may leave through the top and fall back in; every other edge
/// discards them.
pub fn out_of_bounds(position: Point, surface: Size) -> bool {
    position.x > surface.width || position.y > surface.height || position.x < 0.0
}

/// Wind-free path an arrow of `power` would follow from `origin`.
pub fn preview_trajectory(origin: Point, power: f64, surface: Size) -> Vec<Point> {
    let mut velocity = launch_velocity(power.clamp(0.0, MAX_PULL));
    let mut at = origin;
    let mut path = vec![at];
    for _ in 0..PREVIEW_STEPS {
        velocity.y += GRAVITY;
        at = Point::new(at.x + velocity.x, at.y + velocity.y);
        path.push(at);
        if at.x > surface.width || at.y > surface.height || at.x < 0.0 {
            break;
        }
    }
    path
}

pub fn projectile_box(p: &Projectile, size: Size) -> Rect {
    Rect::new(p.position.x, p.position.y, size.width, size.height)
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Actors an arrow is tested against, in priority order.
pub const ARROW_TARGETS: [ActorId; 4] = [ActorId::Target, ActorId::CowA, ActorId::CowB, ActorId::Plane];

pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left < b.right && a.right > b.left && a.top < b.bottom && a.bottom > b.top
}

/// First actor in `ARROW_TARGETS` order whose current box overlaps `shot`.
/// `box_of` is queried fresh for every candidate.
pub fn first_hit(shot: &Rect, mut box_of: impl FnMut(ActorId) -> Option<Rect>) -> Option<(ActorId, Rect)> {
    ARROW_TARGETS
        .iter()
        .find_map(|&actor| box_of(actor).filter(|b| intersects(shot, b)).map(|b| (actor, b)))
}

// ── Scoring ──────────────────────────────────────────────────────────────────

pub const PLANE_FLYING_POINTS: u32 = 25;
pub const PLANE_FALLING_POINTS: u32 = 10;
pub const COW_POINTS: u32 = 15;

/// What an arrow struck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArrowHit {
    Target { distance: f64, radius: f64 },
    Cow,
    Plane { falling: bool },
}

/// Ring score from the distance to the bullseye.
pub fn target_points(distance: f64, radius: f64) -> u32 {
    if distance < radius * 0.2 {
        10
    } else if distance < radius * 0.4 {
        8
    } else if distance < radius * 0.6 {
        6
    } else if distance < radius * 0.8 {
        4
    } else {
        2
    }
}

/// Describe a target hit from the arrow and target boxes.
pub fn target_hit(shot: &Rect, target: &Rect) -> ArrowHit {
    ArrowHit::Target {
        distance: shot.center().distance_to(target.center()),
        radius: target.width() / 2.0,
    }
}

pub fn points_for(hit: ArrowHit) -> u32 {
    match hit {
        ArrowHit::Target { distance, radius } => target_points(distance, radius),
        ArrowHit::Cow => COW_POINTS,
        ArrowHit::Plane { falling: false } => PLANE_FLYING_POINTS,
        ArrowHit::Plane { falling: true } => PLANE_FALLING_POINTS,
    }
}

/// Rating for a finished match, from the average points per arrow.
pub fn rating_for(average: f64) -> Rating {
    if average >= 8.0 {
        Rating::Master
    } else if average >= 6.0 {
        Rating::Great
    } else if average >= 4.0 {
        Rating::Good
    } else {
        Rating::KeepPracticing
    }
}
