mod common;

use archery_range::entities::*;
use archery_range::ports::EffectSink;
use archery_range::trail::*;
use archery_range::wind::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

use common::Recorder;

// ── Wind ──────────────────────────────────────────────────────────────────────

#[test]
fn difficulty_picks_strength() {
    assert_eq!(strength_for(Level::Easy), WindStrength::None);
    assert_eq!(strength_for(Level::Medium), WindStrength::Light);
    assert_eq!(strength_for(Level::Hard), WindStrength::Strong);
}

#[test]
fn reroll_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut wind = initial(Level::Hard);
    for _ in 0..500 {
        wind = reroll(&wind, &mut rng);
        assert!((0.0..360.0).contains(&wind.direction));
        assert_eq!(wind.strength, WindStrength::Strong);
    }
}

#[test]
fn calm_reroll_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(42);
    let wind = WindState { strength: WindStrength::None, direction: 90.0 };
    assert_eq!(reroll(&wind, &mut rng), wind);
}

// ── Smoke trails ──────────────────────────────────────────────────────────────

#[test]
fn puffs_start_in_turn() {
    let origin = Point::new(100.0, 100.0);
    assert!(puff_at(&ROCKET_TRAIL, 0, 0, origin).is_none());
    assert!(puff_at(&ROCKET_TRAIL, 0, 1, origin).is_some());
    assert!(puff_at(&ROCKET_TRAIL, 2, 4, origin).is_none());
    assert!(puff_at(&ROCKET_TRAIL, 2, 5, origin).is_some());
}

#[test]
fn puffs_drift_and_fade() {
    let origin = Point::new(100.0, 100.0);
    let (at, opacity) = puff_at(&ROCKET_TRAIL, 0, 10, origin).unwrap();
    assert_eq!(at, Point::new(70.0, 103.0));
    assert!((opacity - 0.45).abs() < 1e-9);
    let (_, faded) = puff_at(&ROCKET_TRAIL, 0, 1_000, origin).unwrap();
    assert_eq!(faded, 0.0);
}

#[test]
fn fall_trail_spreads_puffs() {
    let origin = Point::new(0.0, 0.0);
    let (first, _) = puff_at(&FALL_TRAIL, 0, 20, origin).unwrap();
    let (third, _) = puff_at(&FALL_TRAIL, 2, 20, origin).unwrap();
    assert_eq!(third.x - first.x, 2.0 * FALL_TRAIL.spread - FALL_TRAIL.drift.x * 10.0);
}

#[test]
fn trail_spawns_hidden_and_clears() {
    let mut fx = Recorder::default();
    let trail = SmokeTrail::spawn(ROCKET_TRAIL, Point::new(10.0, 10.0), &mut fx);
    assert_eq!(trail.handles().len(), ROCKET_TRAIL.puffs);
    assert!(fx.live.values().all(|(kind, _, opacity)| *kind == EffectKind::Smoke && *opacity == 0.0));

    trail.update(3, Point::new(50.0, 50.0), &mut fx);
    let visible = fx.live.values().filter(|(_, _, opacity)| *opacity > 0.0).count();
    assert_eq!(visible, 2);

    let extra = fx.spawn_effect(EffectKind::Points(2), Point::default());
    trail.clear(&mut fx);
    assert_eq!(fx.live.len(), 1);
    assert!(fx.live.contains_key(&extra));
}
