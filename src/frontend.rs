//! Terminal-side collaborators: keeps the effects the session spawns so
//! the renderer can draw them, and mirrors the score and arrow counters.

use std::collections::BTreeMap;

use archery_range::entities::{EffectHandle, EffectKind, Point};
use archery_range::ports::{AudioSink, EffectSink, ScoreDisplay};
use tracing::trace;

#[derive(Clone, Debug)]
pub struct LiveEffect {
    pub kind: EffectKind,
    pub at: Point,
    pub opacity: f64,
}

#[derive(Debug, Default)]
pub struct TerminalFrontend {
    next_handle: u64,
    pub effects: BTreeMap<EffectHandle, LiveEffect>,
    pub score: u32,
    pub arrows: u32,
    /// Most recent tone and the frame it was requested on.
    pub last_tone: Option<(f64, u64)>,
    pub frame: u64,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tone was played within the last few frames.
    pub fn tone_playing(&self) -> Option<f64> {
        self.last_tone
            .filter(|&(_, at)| self.frame.saturating_sub(at) < 10)
            .map(|(hz, _)| hz)
    }
}

impl EffectSink for TerminalFrontend {
    fn spawn_effect(&mut self, kind: EffectKind, at: Point) -> EffectHandle {
        self.next_handle += 1;
        let handle = EffectHandle(self.next_handle);
        self.effects.insert(handle, LiveEffect { kind, at, opacity: 1.0 });
        handle
    }

    fn move_effect(&mut self, handle: EffectHandle, at: Point, opacity: f64) {
        if let Some(effect) = self.effects.get_mut(&handle) {
            effect.at = at;
            effect.opacity = opacity;
        }
    }

    fn remove_effect(&mut self, handle: EffectHandle) {
        self.effects.remove(&handle);
    }
}

impl AudioSink for TerminalFrontend {
    fn play_tone(&mut self, frequency_hz: f64, duration_secs: f64) {
        trace!(frequency_hz, duration_secs, "tone");
        self.last_tone = Some((frequency_hz, self.frame));
    }
}

impl ScoreDisplay for TerminalFrontend {
    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn set_arrows_remaining(&mut self, arrows: u32) {
        self.arrows = arrows;
    }
}
