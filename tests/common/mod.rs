//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use archery_range::entities::{ActorId, EffectHandle, EffectKind, Point, Rect};
use archery_range::ports::{ActorBoxes, AudioSink, EffectSink, ScoreDisplay};
use archery_range::session::{Session, TICK_MS};

/// Records every call the session makes.
#[derive(Debug, Default)]
pub struct Recorder {
    next: u64,
    pub live: HashMap<EffectHandle, (EffectKind, Point, f64)>,
    pub spawned: Vec<EffectKind>,
    pub tones: Vec<(f64, f64)>,
    pub score: Option<u32>,
    pub arrows: Option<u32>,
}

impl Recorder {
    pub fn live_kinds(&self) -> Vec<EffectKind> {
        self.live.values().map(|(kind, _, _)| *kind).collect()
    }
}

impl EffectSink for Recorder {
    fn spawn_effect(&mut self, kind: EffectKind, at: Point) -> EffectHandle {
        self.next += 1;
        let handle = EffectHandle(self.next);
        self.live.insert(handle, (kind, at, 1.0));
        self.spawned.push(kind);
        handle
    }

    fn move_effect(&mut self, handle: EffectHandle, at: Point, opacity: f64) {
        if let Some(entry) = self.live.get_mut(&handle) {
            entry.1 = at;
            entry.2 = opacity;
        }
    }

    fn remove_effect(&mut self, handle: EffectHandle) {
        self.live.remove(&handle);
    }
}

impl AudioSink for Recorder {
    fn play_tone(&mut self, frequency_hz: f64, duration_secs: f64) {
        self.tones.push((frequency_hz, duration_secs));
    }
}

impl ScoreDisplay for Recorder {
    fn set_score(&mut self, score: u32) {
        self.score = Some(score);
    }

    fn set_arrows_remaining(&mut self, arrows: u32) {
        self.arrows = Some(arrows);
    }
}

/// Actors frozen in place.  Missing actors report no box.
#[derive(Clone, Debug, Default)]
pub struct FixedBoxes(pub HashMap<ActorId, Rect>);

impl FixedBoxes {
    /// Tank and launcher at their default spots, nothing else on screen.
    pub fn weapons_only() -> Self {
        let layout = archery_range::config::Layout::default();
        Self::default()
            .with(ActorId::Tank, layout.tank)
            .with(ActorId::Launcher, layout.launcher)
    }

    pub fn with(mut self, actor: ActorId, rect: Rect) -> Self {
        self.0.insert(actor, rect);
        self
    }
}

impl ActorBoxes for FixedBoxes {
    fn bounding_box(&self, actor: ActorId) -> Option<Rect> {
        self.0.get(&actor).copied()
    }
}

/// Tick the session until `done` holds or `limit_ms` elapses.  Returns the
/// elapsed time when `done` first held.
pub fn run_until(
    session: &mut Session,
    boxes: &impl ActorBoxes,
    fx: &mut Recorder,
    limit_ms: u64,
    mut done: impl FnMut(&Session) -> bool,
) -> Option<u64> {
    let mut elapsed = 0;
    while elapsed <= limit_ms {
        if done(session) {
            return Some(elapsed);
        }
        session.advance(TICK_MS, boxes, fx);
        elapsed += TICK_MS;
    }
    None
}
