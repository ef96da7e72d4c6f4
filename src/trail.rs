//! Smoke trails behind rockets and the falling plane.  Cosmetic only: the
//! puffs live in the effect sink and are moved every tick.

use crate::entities::{EffectHandle, EffectKind, Point};
use crate::ports::EffectSink;

/// Shape of a trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSpec {
    pub puffs: usize,
    /// Puff `i` starts moving at frame `i * stagger`.
    pub stagger: u32,
    /// Horizontal offset added per puff index.
    pub spread: f64,
    /// Per-frame drift of a puff relative to its origin.
    pub drift: Point,
    pub start_opacity: f64,
    pub fade: f64,
}

pub const ROCKET_TRAIL: TrailSpec = TrailSpec {
    puffs: 5,
    stagger: 2,
    spread: 0.0,
    drift: Point::new(-3.0, 0.3),
    start_opacity: 0.6,
    fade: 0.015,
};

pub const FALL_TRAIL: TrailSpec = TrailSpec {
    puffs: 3,
    stagger: 5,
    spread: 10.0,
    drift: Point::new(-2.0, 0.5),
    start_opacity: 0.7,
    fade: 0.02,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SmokeTrail {
    spec: TrailSpec,
    puffs: Vec<EffectHandle>,
}

/// Position and opacity of puff `index` at `frame`, or `None` before it starts.
pub fn puff_at(spec: &TrailSpec, index: usize, frame: u32, origin: Point) -> Option<(Point, f64)> {
    let delay = index as u32 * spec.stagger;
    if frame <= delay {
        return None;
    }
    let age = f64::from(frame - delay);
    let at = Point::new(
        origin.x + spec.drift.x * age + spec.spread * index as f64,
        origin.y + spec.drift.y * age,
    );
    Some((at, (spec.start_opacity - age * spec.fade).max(0.0)))
}

impl SmokeTrail {
    /// Spawn every puff up front; they stay invisible until their turn.
    pub fn spawn(spec: TrailSpec, origin: Point, fx: &mut impl EffectSink) -> Self {
        let puffs = (0..spec.puffs)
            .map(|_| {
                let handle = fx.spawn_effect(EffectKind::Smoke, origin);
                fx.move_effect(handle, origin, 0.0);
                handle
            })
            .collect();
        Self { spec, puffs }
    }

    pub fn update(&self, frame: u32, origin: Point, fx: &mut impl EffectSink) {
        for (index, &handle) in self.puffs.iter().enumerate() {
            if let Some((at, opacity)) = puff_at(&self.spec, index, frame, origin) {
                fx.move_effect(handle, at, opacity);
            }
        }
    }

    pub fn handles(&self) -> &[EffectHandle] {
        &self.puffs
    }

    pub fn clear(self, fx: &mut impl EffectSink) {
        for handle in self.puffs {
            fx.remove_effect(handle);
        }
    }
}
