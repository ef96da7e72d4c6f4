//! Collaborator contracts between the simulation and whatever presents it.

use crate::entities::{ActorId, EffectHandle, EffectKind, Point, Rect};

/// Visual effects: explosions, smoke, popups, decorations.
pub trait EffectSink {
    fn spawn_effect(&mut self, kind: EffectKind, at: Point) -> EffectHandle;

    fn move_effect(&mut self, _handle: EffectHandle, _at: Point, _opacity: f64) {}

    fn remove_effect(&mut self, handle: EffectHandle);
}

pub trait AudioSink {
    fn play_tone(&mut self, frequency_hz: f64, duration_secs: f64);
}

pub trait ScoreDisplay {
    fn set_score(&mut self, score: u32);
    fn set_arrows_remaining(&mut self, arrows: u32);
}

/// Current box of an actor, relative to the play surface.  Queried fresh on
/// every tick; `None` when the actor is not on screen.
pub trait ActorBoxes {
    fn bounding_box(&self, actor: ActorId) -> Option<Rect>;
}

/// Everything the session calls out to.
pub trait Frontend: EffectSink + AudioSink + ScoreDisplay {}

impl<T: EffectSink + AudioSink + ScoreDisplay + ?Sized> Frontend for T {}
