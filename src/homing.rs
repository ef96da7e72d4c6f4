//! Guaranteed-intercept guidance for tank shells and rockets.
//!
//! A homing shot never keeps a fixed aim point.  Every tick it re-samples
//! the plane's centre and places itself `frame / total_frames` of the way
//! from its launch point toward that fresh sample, so it converges on the
//! plane whatever the plane does.  Two frames before the budget runs out
//! the shot counts as a hit even without literal overlap.

use crate::compute::{heading_deg, intersects, projectile_box};
use crate::entities::{HomingGuide, Owner, Point, Projectile, ProjectileId, ProjectileKind, Rect, Size, WeaponKind};

pub const TANK_SHELL_FRAMES: u32 = 40;
pub const ROCKET_FRAMES: u32 = 50;

/// Outcome of one guidance tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomingStep {
    EnRoute,
    /// Frame budget reached; hit forced.
    Arrived,
    /// Literal box overlap before the budget ran out.
    Contact,
}

pub fn frames_for(weapon: WeaponKind) -> u32 {
    match weapon {
        WeaponKind::Tank => TANK_SHELL_FRAMES,
        WeaponKind::Launcher => ROCKET_FRAMES,
    }
}

/// Spawn a shot at `muzzle`, initially aimed at `aim`.
pub fn launch(id: ProjectileId, weapon: WeaponKind, muzzle: Point, aim: Point) -> (Projectile, HomingGuide) {
    let (kind, owner) = match weapon {
        WeaponKind::Tank => (ProjectileKind::TankShell, Owner::Tank),
        WeaponKind::Launcher => (ProjectileKind::Rocket, Owner::Launcher),
    };
    let projectile = Projectile {
        id,
        kind,
        owner,
        position: muzzle,
        velocity: Point::default(),
        rotation: heading_deg(aim.x - muzzle.x, aim.y - muzzle.y),
        frame: 0,
    };
    let guide = HomingGuide {
        start: muzzle,
        total_frames: frames_for(weapon),
        aim,
    };
    (projectile, guide)
}

/// Linear interpolation from `start` toward `aim` at `progress` ∈ [0, 1].
pub fn lerp(start: Point, aim: Point, progress: f64) -> Point {
    Point::new(
        start.x + (aim.x - start.x) * progress,
        start.y + (aim.y - start.y) * progress,
    )
}

/// True once the shot is inside its forced-hit window.
pub fn reached(frame: u32, total_frames: u32) -> bool {
    frame >= total_frames.saturating_sub(2)
}

/// Move the shot one tick toward the plane's live centre.  `plane_center`
/// is `None` while the plane has no box; the last sample is kept.
pub fn steer(p: &Projectile, guide: &HomingGuide, plane_center: Option<Point>) -> (Projectile, HomingGuide) {
    let frame = p.frame + 1;
    let aim = plane_center.unwrap_or(guide.aim);
    let progress = f64::from(frame) / f64::from(guide.total_frames);
    let position = lerp(guide.start, aim, progress);
    let velocity = Point::new(position.x - p.position.x, position.y - p.position.y);

    let next = Projectile {
        position,
        velocity,
        rotation: heading_deg(velocity.x, velocity.y),
        frame,
        ..p.clone()
    };
    (next, HomingGuide { aim, ..*guide })
}

/// Classify a steered shot against the plane's current box.
pub fn resolve(p: &Projectile, guide: &HomingGuide, size: Size, plane: Option<&Rect>) -> HomingStep {
    if reached(p.frame, guide.total_frames) {
        return HomingStep::Arrived;
    }
    match plane {
        Some(plane) if intersects(&projectile_box(p, size), plane) => HomingStep::Contact,
        _ => HomingStep::EnRoute,
    }
}
