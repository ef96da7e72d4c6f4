//! Plane state machine.
//!
//! ```text
//! Flying(lane) ──rocket──▶ Stunned(lane) ──800ms──▶ Flying(lane)
//!      │                        │
//!      └──────────tank──────────┴──▶ Falling ──off-screen / 100 ticks──▶ Respawning ──1000ms──▶ Flying(High)
//! ```
//!
//! Only a tank hit takes the plane out of play.

use rand::Rng;

use crate::compute::integrate;
use crate::entities::{
    Fall, Lane, Owner, PlaneState, Point, Projectile, ProjectileId, ProjectileKind, Rect, Size,
};

pub const STUN_MS: u64 = 800;
pub const RESPAWN_MS: u64 = 1_000;
pub const LANE_REROLL_MS: u64 = 20_000;
pub const LOW_LANE_CHANCE: f64 = 0.4;

pub const FALL_GRAVITY: f64 = 0.2;
/// Initial kick from the explosion: drift right, pop up.
pub const FALL_KICK: Point = Point::new(1.5, -1.0);
pub const FALL_SPIN_DEG: f64 = 5.0;
pub const FALL_MAX_TICKS: u32 = 100;
pub const FALL_MAX_SCALE: f64 = 2.5;
pub const FALL_SCALE_RATE: f64 = 0.015;
pub const FALL_FADE_RATE: f64 = 0.005;
pub const FALL_MIN_OPACITY: f64 = 0.2;
/// How far below the surface the plane may drop before the fall ends.
pub const FALL_EXIT_MARGIN: f64 = 100.0;

pub fn roll_lane(rng: &mut impl Rng) -> Lane {
    if rng.gen_bool(LOW_LANE_CHANCE) {
        Lane::Low
    } else {
        Lane::High
    }
}

pub fn lane_of(state: &PlaneState) -> Option<Lane> {
    match state {
        PlaneState::Flying { lane } | PlaneState::Stunned { lane } => Some(*lane),
        PlaneState::Falling(_) | PlaneState::Respawning => None,
    }
}

/// Whether the weapons may target the plane and arrows score the flying bonus.
pub fn is_eligible(state: &PlaneState) -> bool {
    lane_of(state).is_some()
}

/// Periodic lane change.  Ignored while the plane is out of play.
pub fn reroll_lane(state: &PlaneState, rng: &mut impl Rng) -> PlaneState {
    match state {
        PlaneState::Flying { .. } => PlaneState::Flying { lane: roll_lane(rng) },
        PlaneState::Stunned { .. } => PlaneState::Stunned { lane: roll_lane(rng) },
        other => other.clone(),
    }
}

pub fn on_rocket_hit(state: &PlaneState) -> PlaneState {
    match state {
        PlaneState::Flying { lane } => PlaneState::Stunned { lane: *lane },
        other => other.clone(),
    }
}

pub fn on_stun_elapsed(state: &PlaneState) -> PlaneState {
    match state {
        PlaneState::Stunned { lane } => PlaneState::Flying { lane: *lane },
        other => other.clone(),
    }
}

/// Start the ballistic fall from the plane's box at the moment of impact.
pub fn on_tank_hit(state: &PlaneState, id: ProjectileId, at: Rect) -> PlaneState {
    if !is_eligible(state) {
        return state.clone();
    }
    PlaneState::Falling(Fall {
        body: Projectile {
            id,
            kind: ProjectileKind::FallingPlane,
            owner: Owner::Plane,
            position: at.top_left(),
            velocity: FALL_KICK,
            rotation: 0.0,
            frame: 0,
        },
        base_size: at.size(),
        scale: 1.0,
        opacity: 1.0,
    })
}

/// One tick of the fall.  The plane spins at a fixed rate instead of
/// following its velocity.
pub fn step_fall(fall: &Fall) -> Fall {
    let moved = integrate(&fall.body, FALL_GRAVITY);
    let frame = f64::from(moved.frame);
    Fall {
        body: Projectile {
            rotation: fall.body.rotation + FALL_SPIN_DEG,
            ..moved
        },
        base_size: fall.base_size,
        scale: (1.0 + frame * FALL_SCALE_RATE).min(FALL_MAX_SCALE),
        opacity: (1.0 - frame * FALL_FADE_RATE).max(FALL_MIN_OPACITY),
    }
}

pub fn fall_finished(fall: &Fall, surface_height: f64) -> bool {
    fall.body.position.y > surface_height + FALL_EXIT_MARGIN || fall.body.frame > FALL_MAX_TICKS
}

/// Current hitbox of the falling plane, grown around its centre by `scale`.
pub fn fall_bounds(fall: &Fall) -> Rect {
    let unscaled = Rect::new(
        fall.body.position.x,
        fall.body.position.y,
        fall.base_size.width,
        fall.base_size.height,
    );
    Rect::centered(
        unscaled.center(),
        Size::new(fall.base_size.width * fall.scale, fall.base_size.height * fall.scale),
    )
}

pub fn on_fall_finished(state: &PlaneState) -> PlaneState {
    match state {
        PlaneState::Falling(_) => PlaneState::Respawning,
        other => other.clone(),
    }
}

/// A respawned plane always re-enters on the high lane.
pub fn on_respawn(state: &PlaneState) -> PlaneState {
    match state {
        PlaneState::Respawning => PlaneState::Flying { lane: Lane::High },
        other => other.clone(),
    }
}
