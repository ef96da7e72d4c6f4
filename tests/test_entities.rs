use archery_range::entities::*;

#[test]
fn rect_geometry() {
    let r = Rect::new(10.0, 20.0, 40.0, 30.0);
    assert_eq!(r.right, 50.0);
    assert_eq!(r.bottom, 50.0);
    assert_eq!(r.width(), 40.0);
    assert_eq!(r.height(), 30.0);
    assert_eq!(r.center(), Point::new(30.0, 35.0));
    assert_eq!(r.top_left(), Point::new(10.0, 20.0));
    assert_eq!(r.size(), Size::new(40.0, 30.0));
}

#[test]
fn centered_rect_round_trips_its_centre() {
    let c = Point::new(100.0, 50.0);
    let r = Rect::centered(c, Size::new(20.0, 10.0));
    assert_eq!(r.center(), c);
    assert_eq!(r.left, 90.0);
    assert_eq!(r.top, 45.0);
}

#[test]
fn translated_keeps_size() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0).translated(5.0, -3.0);
    assert_eq!(r, Rect::new(5.0, -3.0, 10.0, 10.0));
}

#[test]
fn distance_is_euclidean() {
    assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
}

#[test]
fn wind_strength_values() {
    assert_eq!(WindStrength::None.value(), 0.0);
    assert_eq!(WindStrength::Light.value(), 0.3);
    assert_eq!(WindStrength::Strong.value(), 0.6);
    assert_eq!(WindStrength::Strong.label(), "Strong");
}

#[test]
fn level_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Level::Medium).unwrap(), "\"medium\"");
    let level: Level = serde_json::from_str("\"hard\"").unwrap();
    assert_eq!(level, Level::Hard);
    assert_eq!(Level::default(), Level::Easy);
}

#[test]
fn match_is_active_only_while_playing() {
    let mut state = MatchState::default();
    assert_eq!(state.status, GameStatus::Ready);
    assert!(!state.is_active());
    state.status = GameStatus::Playing;
    assert!(state.is_active());
    state.status = GameStatus::GameOver;
    assert!(!state.is_active());
}

#[test]
fn rating_messages() {
    assert_eq!(Rating::Master.message(), "Amazing! You are a master archer!");
    assert_eq!(Rating::KeepPracticing.message(), "Keep practicing! You will improve!");
}

#[test]
fn callout_text() {
    assert_eq!(Callout::Whoosh.text(), "WHOOSH!");
    assert_eq!(Callout::Smash.text(), "SMASH!");
    assert_eq!(Callout::Moo.text(), "MOO!");
}

#[test]
fn fresh_weapon_is_ready() {
    let w = WeaponState::new(WeaponKind::Launcher);
    assert!(!w.cooling_down);
    assert_eq!(w.shots_fired, 0);
    assert_eq!(w.last_fired_ms, None);
}
