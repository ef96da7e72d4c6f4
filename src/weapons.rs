//! Encounter schedulers: when the tank or the rocket launcher opens fire.
//!
//! Each weapon polls on its own period.  A poll fires only when the match
//! is running, the plane is in play, the weapon is off cooldown and the
//! plane's left edge is strictly inside the weapon's band of the play
//! width.  The bands overlap between 50% and 65%, where both may fire.

use crate::compute::heading_deg;
use crate::entities::{Point, Rect, WeaponKind, WeaponState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub poll_ms: u64,
    pub cooldown_ms: u64,
    /// Delay between the aim decision and the actual launch.
    pub aim_delay_ms: u64,
    /// Fractions of the play width, exclusive on both ends.
    pub band: (f64, f64),
}

pub const TANK: WeaponSpec = WeaponSpec {
    kind: WeaponKind::Tank,
    poll_ms: 500,
    cooldown_ms: 5_000,
    aim_delay_ms: 300,
    band: (0.35, 0.65),
};

pub const LAUNCHER: WeaponSpec = WeaponSpec {
    kind: WeaponKind::Launcher,
    poll_ms: 600,
    cooldown_ms: 6_000,
    aim_delay_ms: 400,
    band: (0.5, 0.9),
};

pub fn spec_for(kind: WeaponKind) -> &'static WeaponSpec {
    match kind {
        WeaponKind::Tank => &TANK,
        WeaponKind::Launcher => &LAUNCHER,
    }
}

/// Why a poll held fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldReason {
    MatchInactive,
    PlaneOutOfPlay,
    CoolingDown,
    OutOfRange,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PollDecision {
    Hold(HoldReason),
    Fire {
        barrel_angle: f64,
        /// Plane centre at decision time; the shot's first aim point.
        aim: Point,
    },
}

/// What a poll sees of the world.
#[derive(Clone, Copy, Debug)]
pub struct PollView<'a> {
    pub match_active: bool,
    pub plane_in_play: bool,
    pub plane: Option<&'a Rect>,
    pub weapon_box: &'a Rect,
    pub surface_width: f64,
}

pub fn in_band(plane_left: f64, surface_width: f64, band: (f64, f64)) -> bool {
    plane_left > surface_width * band.0 && plane_left < surface_width * band.1
}

/// Barrel heading toward the plane, in screen-up degrees.
pub fn barrel_angle(weapon_box: &Rect, plane: &Rect) -> f64 {
    heading_deg(plane.left - weapon_box.left, weapon_box.top - plane.top)
}

/// Launch point of a weapon: the top centre of its box.
pub fn muzzle(weapon_box: &Rect) -> Point {
    Point::new(weapon_box.center().x, weapon_box.top)
}

pub fn decide(spec: &WeaponSpec, weapon: &WeaponState, view: PollView<'_>) -> PollDecision {
    if !view.match_active {
        return PollDecision::Hold(HoldReason::MatchInactive);
    }
    let plane = match view.plane {
        Some(plane) if view.plane_in_play => plane,
        _ => return PollDecision::Hold(HoldReason::PlaneOutOfPlay),
    };
    if weapon.cooling_down {
        return PollDecision::Hold(HoldReason::CoolingDown);
    }
    if !in_band(plane.left, view.surface_width, spec.band) {
        return PollDecision::Hold(HoldReason::OutOfRange);
    }
    PollDecision::Fire {
        barrel_angle: barrel_angle(view.weapon_box, plane),
        aim: plane.center(),
    }
}

/// Weapon state after a decision to fire at `now_ms`.
pub fn fired(weapon: &WeaponState, barrel_angle: f64, now_ms: u64) -> WeaponState {
    WeaponState {
        cooling_down: true,
        barrel_angle,
        shots_fired: weapon.shots_fired + 1,
        last_fired_ms: Some(now_ms),
        ..weapon.clone()
    }
}

pub fn cooled(weapon: &WeaponState) -> WeaponState {
    WeaponState {
        cooling_down: false,
        ..weapon.clone()
    }
}
