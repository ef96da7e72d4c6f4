use archery_range::compute::*;
use archery_range::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn arrow(power: f64) -> Projectile {
    spawn_arrow(ProjectileId(1), Point::new(80.0, 300.0), power).expect("valid pull")
}

// ── Launch ────────────────────────────────────────────────────────────────────

#[test]
fn launch_angle_flattens_with_power() {
    assert_eq!(launch_angle(0.0), -45.0);
    assert_eq!(launch_angle(100.0), -35.0);
    let mut last = f64::MIN;
    for power in (11..=100).map(f64::from) {
        let angle = launch_angle(power);
        assert!(angle > last);
        last = angle;
    }
}

#[test]
fn launch_speed_grows_with_power() {
    assert_eq!(launch_speed(100.0), ARROW_SPEED);
    let mut last = 0.0;
    for power in (11..=100).map(f64::from) {
        let speed = launch_speed(power);
        assert!(speed > last);
        last = speed;
    }
}

#[test]
fn launch_velocity_points_up_and_right() {
    let v = launch_velocity(60.0);
    assert!(v.x > 0.0);
    assert!(v.y < 0.0);
    let speed = (v.x * v.x + v.y * v.y).sqrt();
    assert!((speed - launch_speed(60.0)).abs() < 1e-9);
}

#[test]
fn weak_pulls_are_discarded() {
    assert!(spawn_arrow(ProjectileId(1), Point::default(), 0.0).is_none());
    assert!(spawn_arrow(ProjectileId(1), Point::default(), MIN_PULL).is_none());
    assert!(spawn_arrow(ProjectileId(1), Point::default(), MIN_PULL + 0.5).is_some());
}

#[test]
fn spawned_arrow_starts_at_origin() {
    let a = arrow(50.0);
    assert_eq!(a.kind, ProjectileKind::Arrow);
    assert_eq!(a.owner, Owner::Player);
    assert_eq!(a.position, Point::new(80.0, 300.0));
    assert_eq!(a.frame, 0);
    assert_eq!(a.rotation, launch_angle(50.0));
}

// ── Kinematics ────────────────────────────────────────────────────────────────

#[test]
fn integrate_accelerates_before_moving() {
    let a = arrow(50.0);
    let next = integrate(&a, GRAVITY);
    assert_eq!(next.velocity.y, a.velocity.y + GRAVITY);
    assert_eq!(next.position.x, a.position.x + a.velocity.x);
    assert_eq!(next.position.y, a.position.y + a.velocity.y + GRAVITY);
    assert_eq!(next.frame, 1);
}

#[test]
fn integrate_does_not_mutate_original() {
    let a = arrow(50.0);
    let _ = integrate(&a, GRAVITY);
    assert_eq!(a.position, Point::new(80.0, 300.0));
    assert_eq!(a.frame, 0);
}

#[test]
fn rotation_follows_velocity() {
    let mut a = arrow(70.0);
    let mut rng = seeded_rng();
    for _ in 0..30 {
        a = advance(&a, WindStrength::None, &mut rng);
        let expected = a.velocity.y.atan2(a.velocity.x).to_degrees();
        assert!((a.rotation - expected).abs() < 1e-9);
    }
    // Well past the apex the arrow points downward.
    assert!(a.rotation > 0.0);
}

#[test]
fn calm_wind_leaves_horizontal_speed_alone() {
    let mut a = arrow(80.0);
    let vx = a.velocity.x;
    let mut rng = seeded_rng();
    for _ in 0..50 {
        a = advance(&a, WindStrength::None, &mut rng);
        assert_eq!(a.velocity.x, vx);
    }
}

#[test]
fn wind_gust_is_bounded_by_strength() {
    let mut rng = seeded_rng();
    for strength in [WindStrength::Light, WindStrength::Strong] {
        let bound = strength.value() * 0.5 * WIND_GUST_SCALE;
        for _ in 0..1000 {
            let gust = wind_gust(strength, &mut rng);
            assert!(gust.abs() <= bound + 1e-12, "{gust} exceeds {bound}");
        }
    }
}

#[test]
fn calm_wind_consumes_no_randomness() {
    let mut a = seeded_rng();
    let mut b = seeded_rng();
    for _ in 0..10 {
        assert_eq!(wind_gust(WindStrength::None, &mut a), 0.0);
    }
    assert_eq!(wind_gust(WindStrength::Light, &mut a), wind_gust(WindStrength::Light, &mut b));
}

#[test]
fn arrows_may_leave_through_the_top() {
    let surface = Size::new(1000.0, 600.0);
    assert!(!out_of_bounds(Point::new(500.0, -250.0), surface));
    assert!(out_of_bounds(Point::new(-0.1, 300.0), surface));
    assert!(out_of_bounds(Point::new(1000.1, 300.0), surface));
    assert!(out_of_bounds(Point::new(500.0, 600.1), surface));
    assert!(!out_of_bounds(Point::new(1000.0, 600.0), surface));
}

#[test]
fn preview_starts_at_origin_and_stops_off_surface() {
    let surface = Size::new(1000.0, 600.0);
    let origin = Point::new(80.0, 300.0);
    let path = preview_trajectory(origin, 40.0, surface);
    assert_eq!(path[0], origin);
    assert!(path.len() <= PREVIEW_STEPS + 1);
    let last = path[path.len() - 1];
    assert!(out_of_bounds(last, surface));
    assert!(path[..path.len() - 1].iter().all(|p| !out_of_bounds(*p, surface)));
}

#[test]
fn preview_matches_a_calm_flight() {
    let origin = Point::new(80.0, 300.0);
    let path = preview_trajectory(origin, 60.0, Size::new(1000.0, 600.0));
    let mut a = spawn_arrow(ProjectileId(1), origin, 60.0).expect("valid pull");
    let mut rng = seeded_rng();
    for expected in path.iter().skip(1).take(10) {
        a = advance(&a, WindStrength::None, &mut rng);
        assert!((a.position.x - expected.x).abs() < 1e-9);
        assert!((a.position.y - expected.y).abs() < 1e-9);
    }
}

// ── Collision ─────────────────────────────────────────────────────────────────

#[test]
fn touching_edges_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(intersects(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!intersects(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!intersects(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
}

#[test]
fn first_hit_follows_priority_order() {
    let shot = Rect::new(100.0, 100.0, 30.0, 4.0);
    let overlapping = Rect::new(90.0, 90.0, 50.0, 50.0);
    let hit = first_hit(&shot, |actor| match actor {
        ActorId::CowB | ActorId::Plane => Some(overlapping),
        _ => None,
    });
    assert_eq!(hit.map(|(actor, _)| actor), Some(ActorId::CowB));
}

#[test]
fn first_hit_never_reports_weapons() {
    let shot = Rect::new(100.0, 100.0, 30.0, 4.0);
    let everywhere = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let hit = first_hit(&shot, |actor| match actor {
        ActorId::Tank | ActorId::Launcher => Some(everywhere),
        _ => None,
    });
    assert!(hit.is_none());
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[test]
fn target_rings_score_by_distance() {
    let r = 60.0;
    assert_eq!(target_points(0.1 * r, r), 10);
    assert_eq!(target_points(0.35 * r, r), 8);
    assert_eq!(target_points(0.55 * r, r), 6);
    assert_eq!(target_points(0.75 * r, r), 4);
    assert_eq!(target_points(0.95 * r, r), 2);
    assert_eq!(target_points(3.0 * r, r), 2);
}

#[test]
fn ring_boundaries_belong_to_the_outer_ring() {
    let r = 50.0;
    assert_eq!(target_points(0.2 * r, r), 8);
    assert_eq!(target_points(0.4 * r, r), 6);
    assert_eq!(target_points(0.6 * r, r), 4);
    assert_eq!(target_points(0.8 * r, r), 2);
}

#[test]
fn target_hit_measures_between_box_centres() {
    let target = Rect::new(400.0, 280.0, 120.0, 120.0);
    let shot = Rect::centered(target.center(), Size::new(30.0, 4.0));
    let hit = target_hit(&shot, &target);
    assert_eq!(hit, ArrowHit::Target { distance: 0.0, radius: 60.0 });
    assert_eq!(points_for(hit), 10);
}

#[test]
fn actor_points() {
    assert_eq!(points_for(ArrowHit::Cow), 15);
    assert_eq!(points_for(ArrowHit::Plane { falling: false }), 25);
    assert_eq!(points_for(ArrowHit::Plane { falling: true }), 10);
}

#[test]
fn rating_thresholds() {
    assert_eq!(rating_for(10.0), Rating::Master);
    assert_eq!(rating_for(8.0), Rating::Master);
    assert_eq!(rating_for(7.9), Rating::Great);
    assert_eq!(rating_for(6.0), Rating::Great);
    assert_eq!(rating_for(4.0), Rating::Good);
    assert_eq!(rating_for(3.9), Rating::KeepPracticing);
    assert_eq!(rating_for(0.0), Rating::KeepPracticing);
}
