use archery_range::entities::*;
use archery_range::plane::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn falling() -> PlaneState {
    on_tank_hit(
        &PlaneState::Flying { lane: Lane::Low },
        ProjectileId(9),
        Rect::new(500.0, 220.0, 100.0, 50.0),
    )
}

#[test]
fn low_lane_about_forty_percent() {
    let mut rng = seeded_rng();
    let low = (0..1000).filter(|_| roll_lane(&mut rng) == Lane::Low).count();
    let fraction = low as f64 / 1000.0;
    assert!((0.35..=0.45).contains(&fraction), "low lane fraction {fraction}");
}

#[test]
fn rocket_stuns_then_recovers_same_lane() {
    let flying = PlaneState::Flying { lane: Lane::Low };
    let stunned = on_rocket_hit(&flying);
    assert_eq!(stunned, PlaneState::Stunned { lane: Lane::Low });
    assert!(is_eligible(&stunned));
    assert_eq!(on_rocket_hit(&stunned), stunned);
    assert_eq!(on_stun_elapsed(&stunned), flying);
}

#[test]
fn tank_hit_starts_fall_from_impact_box() {
    let PlaneState::Falling(fall) = falling() else {
        panic!("plane should be falling");
    };
    assert_eq!(fall.body.position, Point::new(500.0, 220.0));
    assert_eq!(fall.body.velocity, FALL_KICK);
    assert_eq!(fall.body.kind, ProjectileKind::FallingPlane);
    assert_eq!(fall.scale, 1.0);
    assert_eq!(fall.opacity, 1.0);
}

#[test]
fn out_of_play_states_ignore_hits_and_rerolls() {
    let mut rng = seeded_rng();
    let down = falling();
    assert!(!is_eligible(&down));
    assert_eq!(on_tank_hit(&down, ProjectileId(10), Rect::new(0.0, 0.0, 1.0, 1.0)), down);
    assert_eq!(on_rocket_hit(&down), down);
    assert_eq!(reroll_lane(&down, &mut rng), down);
    assert_eq!(reroll_lane(&PlaneState::Respawning, &mut rng), PlaneState::Respawning);
}

#[test]
fn fall_spins_grows_and_fades() {
    let PlaneState::Falling(mut fall) = falling() else {
        panic!("plane should be falling");
    };
    for _ in 0..10 {
        let next = step_fall(&fall);
        assert_eq!(next.body.rotation, fall.body.rotation + FALL_SPIN_DEG);
        assert!(next.scale >= fall.scale);
        assert!(next.opacity <= fall.opacity);
        fall = next;
    }
    assert_eq!(fall.body.frame, 10);
    assert!((fall.scale - 1.15).abs() < 1e-9);
    assert!((fall.opacity - 0.95).abs() < 1e-9);
}

#[test]
fn fall_scale_and_opacity_are_clamped() {
    let PlaneState::Falling(mut fall) = falling() else {
        panic!("plane should be falling");
    };
    for _ in 0..200 {
        fall = step_fall(&fall);
    }
    assert_eq!(fall.scale, FALL_MAX_SCALE);
    assert_eq!(fall.opacity, FALL_MIN_OPACITY);
}

#[test]
fn fall_ends_within_tick_limit() {
    let PlaneState::Falling(mut fall) = falling() else {
        panic!("plane should be falling");
    };
    let mut ticks = 0;
    while !fall_finished(&fall, 600.0) {
        fall = step_fall(&fall);
        ticks += 1;
    }
    assert!(ticks <= FALL_MAX_TICKS + 1);
}

#[test]
fn fall_bounds_grow_around_centre() {
    let PlaneState::Falling(fall) = falling() else {
        panic!("plane should be falling");
    };
    let grown = Fall { scale: 2.0, ..fall.clone() };
    let base = fall_bounds(&fall);
    let big = fall_bounds(&grown);
    assert_eq!(base.center(), big.center());
    assert_eq!(big.width(), 200.0);
    assert_eq!(big.height(), 100.0);
}

#[test]
fn respawn_returns_on_high_lane() {
    let gone = on_fall_finished(&falling());
    assert_eq!(gone, PlaneState::Respawning);
    assert_eq!(on_respawn(&gone), PlaneState::Flying { lane: Lane::High });
}
