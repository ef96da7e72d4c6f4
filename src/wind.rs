//! Environment model: difficulty-to-wind mapping and periodic rerolls.

use rand::Rng;

use crate::entities::{Level, WindState, WindStrength};

/// Interval between wind direction rerolls while a match is running.
pub const WIND_REROLL_MS: u64 = 5_000;

pub fn strength_for(level: Level) -> WindStrength {
    match level {
        Level::Easy => WindStrength::None,
        Level::Medium => WindStrength::Light,
        Level::Hard => WindStrength::Strong,
    }
}

/// Calm wind for `level`, pointing nowhere in particular.
pub fn initial(level: Level) -> WindState {
    WindState {
        strength: strength_for(level),
        direction: 0.0,
    }
}

/// Pick a new direction.  A calm wind keeps its direction.
pub fn reroll(wind: &WindState, rng: &mut impl Rng) -> WindState {
    if wind.strength == WindStrength::None {
        return *wind;
    }
    WindState {
        direction: rng.gen_range(0.0..360.0),
        ..*wind
    }
}
