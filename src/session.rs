//! Match controller.
//!
//! A `Session` owns every piece of mutable game state and every pending
//! task.  Nothing runs on its own: the front end calls [`Session::advance`]
//! with elapsed time, and the session runs whatever tasks fell due, in due
//! order, on its virtual clock.  `start` and `reset` cancel all pending
//! tasks before anything new is scheduled, so work from a previous match
//! can never fire into the next one.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::compute::{self, ArrowHit};
use crate::config::SimConfig;
use crate::entities::{
    ActorId, Callout, EffectHandle, EffectKind, GameOverSummary, GameStatus, HomingGuide, Lane,
    Level, MatchState, Owner, PlaneState, Point, Projectile, ProjectileId, ProjectileKind, Rect, Size,
    WeaponKind, WeaponState, WindState,
};
use crate::homing::{self, HomingStep};
use crate::plane;
use crate::ports::{ActorBoxes, Frontend};
use crate::timers::{TaskHandle, TaskQueue};
use crate::trail::{SmokeTrail, FALL_TRAIL, ROCKET_TRAIL};
use crate::weapons::{self, PollDecision, PollView};
use crate::wind;

/// Fixed simulation step for every projectile.
pub const TICK_MS: u64 = 20;
pub const PULL_CHARGE_MS: u64 = 50;
pub const PULL_STEP: f64 = 2.0;
/// Delay before a match with no arrows left ends.
pub const END_GRACE_MS: u64 = 1_000;

pub const POPUP_MS: u64 = 1_000;
pub const CALLOUT_MS: u64 = 1_500;
pub const TARGET_FIRE_MS: u64 = 1_000;
pub const TANK_EXPLOSION_MS: u64 = 1_000;
pub const ROCKET_EXPLOSION_MS: u64 = 800;
/// Callouts float this far above the struck actor.
const CALLOUT_RISE: f64 = 50.0;
const POPUP_DROP: f64 = 20.0;

/// `(frequency_hz, duration_secs)`
pub const RELEASE_TONE: (f64, f64) = (300.0, 0.3);
pub const RELEASE_ECHO_TONE: (f64, f64) = (200.0, 0.2);
pub const RELEASE_ECHO_DELAY_MS: u64 = 100;
pub const HIT_TONE: (f64, f64) = (500.0, 0.1);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Task {
    WindReroll,
    LaneReroll,
    Poll(WeaponKind),
    CooldownOver(WeaponKind),
    Launch { weapon: WeaponKind, aim: Point },
    ArrowTick,
    ShotTick(ProjectileId),
    FallTick,
    StunOver,
    Respawn,
    PullCharge,
    Tone { frequency_hz: f64, duration_secs: f64 },
    RemoveEffect(EffectHandle),
    EndMatch,
}

impl Task {
    /// Recurring work that only exists while a match is running.
    fn drives_match(&self) -> bool {
        matches!(
            self,
            Task::WindReroll | Task::LaneReroll | Task::Poll(_) | Task::CooldownOver(_) | Task::Launch { .. }
        )
    }
}

/// A tank shell or rocket in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct HomingShot {
    pub body: Projectile,
    pub guide: HomingGuide,
    trail: Option<SmokeTrail>,
}

pub struct Session {
    config: SimConfig,
    rng: StdRng,
    timers: TaskQueue<Task>,
    state: MatchState,
    wind: WindState,
    plane: PlaneState,
    tank: WeaponState,
    launcher: WeaponState,
    /// At most one player arrow is airborne.
    arrow: Option<Projectile>,
    shots: Vec<HomingShot>,
    fall_trail: Option<SmokeTrail>,
    /// Current pull power and the charging task.
    pull: Option<(f64, TaskHandle)>,
    /// Effects this session spawned and has not removed yet.
    effects: Vec<EffectHandle>,
    summary: Option<GameOverSummary>,
    next_projectile: u64,
}

impl Session {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: SimConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: SimConfig, rng: StdRng) -> Self {
        let level = Level::default();
        Self {
            config,
            rng,
            timers: TaskQueue::new(),
            state: MatchState {
                difficulty: level,
                ..MatchState::default()
            },
            wind: wind::initial(level),
            plane: PlaneState::Flying { lane: Lane::High },
            tank: WeaponState::new(WeaponKind::Tank),
            launcher: WeaponState::new(WeaponKind::Launcher),
            arrow: None,
            shots: Vec::new(),
            fall_trail: None,
            pull: None,
            effects: Vec::new(),
            summary: None,
            next_projectile: 0,
        }
    }

    // ── Views ────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn match_state(&self) -> &MatchState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn arrows_remaining(&self) -> u32 {
        self.state.arrows_remaining
    }

    pub fn wind(&self) -> &WindState {
        &self.wind
    }

    pub fn plane(&self) -> &PlaneState {
        &self.plane
    }

    pub fn weapon(&self, kind: WeaponKind) -> &WeaponState {
        match kind {
            WeaponKind::Tank => &self.tank,
            WeaponKind::Launcher => &self.launcher,
        }
    }

    pub fn arrow(&self) -> Option<&Projectile> {
        self.arrow.as_ref()
    }

    pub fn homing_shots(&self) -> &[HomingShot] {
        &self.shots
    }

    pub fn pull_power(&self) -> Option<f64> {
        self.pull.map(|(power, _)| power)
    }

    pub fn summary(&self) -> Option<&GameOverSummary> {
        self.summary.as_ref()
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Size of the box a projectile of `kind` occupies.
    pub fn projectile_size(&self, kind: ProjectileKind) -> Size {
        match kind {
            ProjectileKind::Arrow => self.config.arrow_size,
            ProjectileKind::TankShell => self.config.shell_size,
            ProjectileKind::Rocket => self.config.rocket_size,
            ProjectileKind::FallingPlane => self.config.layout.plane_size,
        }
    }

    /// Wind-free preview of the shot being pulled, empty when not pulling.
    pub fn trajectory_preview(&self) -> Vec<Point> {
        match self.pull {
            Some((power, _)) => {
                compute::preview_trajectory(self.config.bow_anchor, power, self.config.surface)
            }
            None => Vec::new(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Select difficulty.  Wind strength follows immediately; a running
    /// match also gets a fresh wind direction.
    pub fn set_difficulty(&mut self, level: Level) {
        self.state.difficulty = level;
        self.wind.strength = wind::strength_for(level);
        if self.state.is_active() {
            self.wind = wind::reroll(&self.wind, &mut self.rng);
        }
    }

    pub fn start<F: Frontend>(&mut self, fx: &mut F) {
        self.teardown(fx);

        let level = self.state.difficulty;
        self.state = MatchState {
            score: 0,
            arrows_remaining: self.config.arrows_per_match,
            status: GameStatus::Playing,
            difficulty: level,
        };
        fx.set_score(0);
        fx.set_arrows_remaining(self.state.arrows_remaining);

        self.wind = wind::reroll(&wind::initial(level), &mut self.rng);
        self.plane = PlaneState::Flying {
            lane: plane::roll_lane(&mut self.rng),
        };
        self.tank = WeaponState::new(WeaponKind::Tank);
        self.launcher = WeaponState::new(WeaponKind::Launcher);

        self.timers.schedule(wind::WIND_REROLL_MS, Task::WindReroll);
        self.timers.schedule(plane::LANE_REROLL_MS, Task::LaneReroll);
        self.timers.schedule(0, Task::Poll(WeaponKind::Tank));
        self.timers.schedule(0, Task::Poll(WeaponKind::Launcher));

        info!(
            difficulty = ?level,
            arrows = self.state.arrows_remaining,
            wind = self.wind.strength.label(),
            "match started"
        );
    }

    /// Back to the pre-start state: decorations cleared, nothing scheduled.
    pub fn reset<F: Frontend>(&mut self, fx: &mut F) {
        self.teardown(fx);
        self.state.status = GameStatus::Ready;
        debug!("session reset");
    }

    /// Start drawing the bow.  Refused while an arrow is still airborne.
    pub fn begin_pull(&mut self) -> bool {
        if !self.state.is_active()
            || self.state.arrows_remaining == 0
            || self.arrow.is_some()
            || self.pull.is_some()
        {
            return false;
        }
        let charge = self.timers.schedule(PULL_CHARGE_MS, Task::PullCharge);
        self.pull = Some((0.0, charge));
        true
    }

    /// Let go of the bow, firing if the pull was strong enough.
    pub fn release<F: Frontend>(&mut self, fx: &mut F) -> Option<ProjectileId> {
        let (power, charge) = self.pull.take()?;
        self.timers.cancel(charge);
        self.shoot(power, fx)
    }

    /// Fire an arrow with the given pull power.
    pub fn shoot<F: Frontend>(&mut self, power: f64, fx: &mut F) -> Option<ProjectileId> {
        if let Some((_, charge)) = self.pull.take() {
            self.timers.cancel(charge);
        }
        if !self.state.is_active() || self.state.arrows_remaining == 0 || self.arrow.is_some() {
            return None;
        }
        if !compute::is_valid_pull(power) {
            debug!(power, "pull too weak, shot discarded");
            return None;
        }

        let id = self.next_projectile_id();
        let arrow = compute::spawn_arrow(id, self.config.bow_anchor, power)?;

        self.state.arrows_remaining -= 1;
        fx.set_arrows_remaining(self.state.arrows_remaining);

        fx.play_tone(RELEASE_TONE.0, RELEASE_TONE.1);
        self.timers.schedule(
            RELEASE_ECHO_DELAY_MS,
            Task::Tone {
                frequency_hz: RELEASE_ECHO_TONE.0,
                duration_secs: RELEASE_ECHO_TONE.1,
            },
        );

        debug!(?id, power, arrows = self.state.arrows_remaining, "arrow loosed");
        self.arrow = Some(arrow);
        self.timers.schedule(TICK_MS, Task::ArrowTick);
        Some(id)
    }

    /// Run every task due within the next `dt_ms`.
    pub fn advance<B: ActorBoxes, F: Frontend>(&mut self, dt_ms: u64, boxes: &B, fx: &mut F) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some((_, task)) = self.timers.pop_due(until) {
            self.run(task, boxes, fx);
        }
        self.timers.advance_to(until);
    }

    // ── Task dispatch ────────────────────────────────────────────────────────

    fn run<B: ActorBoxes, F: Frontend>(&mut self, task: Task, boxes: &B, fx: &mut F) {
        match task {
            Task::WindReroll => {
                if self.state.is_active() {
                    self.wind = wind::reroll(&self.wind, &mut self.rng);
                    trace!(direction = self.wind.direction, "wind shifted");
                    self.timers.schedule(wind::WIND_REROLL_MS, Task::WindReroll);
                }
            }
            Task::LaneReroll => {
                if self.state.is_active() {
                    self.plane = plane::reroll_lane(&self.plane, &mut self.rng);
                    trace!(lane = ?plane::lane_of(&self.plane), "plane lane rerolled");
                    self.timers.schedule(plane::LANE_REROLL_MS, Task::LaneReroll);
                }
            }
            Task::Poll(kind) => self.poll(kind, boxes),
            Task::CooldownOver(kind) => {
                let cooled = weapons::cooled(self.weapon(kind));
                *self.weapon_mut(kind) = cooled;
            }
            Task::Launch { weapon, aim } => self.launch(weapon, aim, boxes, fx),
            Task::ArrowTick => self.arrow_tick(boxes, fx),
            Task::ShotTick(id) => self.shot_tick(id, boxes, fx),
            Task::FallTick => self.fall_tick(fx),
            Task::StunOver => self.plane = plane::on_stun_elapsed(&self.plane),
            Task::Respawn => {
                self.plane = plane::on_respawn(&self.plane);
                debug!("plane back in the air");
            }
            Task::PullCharge => {
                if let Some((power, _)) = self.pull {
                    let charge = self.timers.schedule(PULL_CHARGE_MS, Task::PullCharge);
                    self.pull = Some(((power + PULL_STEP).min(compute::MAX_PULL), charge));
                }
            }
            Task::Tone {
                frequency_hz,
                duration_secs,
            } => fx.play_tone(frequency_hz, duration_secs),
            Task::RemoveEffect(handle) => {
                self.effects.retain(|&h| h != handle);
                fx.remove_effect(handle);
            }
            Task::EndMatch => self.end_match(),
        }
    }

    // ── Player arrow ─────────────────────────────────────────────────────────

    fn arrow_tick<B: ActorBoxes, F: Frontend>(&mut self, boxes: &B, fx: &mut F) {
        let Some(arrow) = self.arrow.take() else {
            return;
        };
        let arrow = compute::advance(&arrow, self.wind.strength, &mut self.rng);
        let shot = compute::projectile_box(&arrow, self.config.arrow_size);

        let plane_box = self.plane_box(boxes);
        let hit = compute::first_hit(&shot, |actor| match actor {
            ActorId::Plane => plane_box,
            other => boxes.bounding_box(other),
        });
        if let Some((actor, rect)) = hit {
            self.arrow_hit(&arrow, &shot, actor, &rect, fx);
            return;
        }

        if compute::out_of_bounds(arrow.position, self.config.surface) {
            trace!(id = ?arrow.id, frame = arrow.frame, "arrow left the field");
            self.check_last_arrow();
            return;
        }

        self.arrow = Some(arrow);
        self.timers.schedule(TICK_MS, Task::ArrowTick);
    }

    fn arrow_hit<F: Frontend>(&mut self, arrow: &Projectile, shot: &Rect, actor: ActorId, rect: &Rect, fx: &mut F) {
        let hit = match actor {
            ActorId::Target => compute::target_hit(shot, rect),
            ActorId::CowA | ActorId::CowB => ArrowHit::Cow,
            ActorId::Plane => ArrowHit::Plane {
                falling: matches!(self.plane, PlaneState::Falling(_)),
            },
            ActorId::Tank | ActorId::Launcher => return,
        };
        let points = compute::points_for(hit);

        fx.play_tone(HIT_TONE.0, HIT_TONE.1);
        self.state.score += points;
        fx.set_score(self.state.score);

        let above = Point::new(rect.left, rect.top - CALLOUT_RISE);
        let popup_at = match hit {
            ArrowHit::Target { .. } => {
                self.spawn_timed(EffectKind::TargetFire, rect.center(), TARGET_FIRE_MS, fx);
                let stuck = fx.spawn_effect(
                    EffectKind::StuckArrow {
                        rotation: arrow.rotation,
                    },
                    shot.top_left(),
                );
                self.effects.push(stuck);
                shot.center()
            }
            ArrowHit::Cow => {
                self.spawn_timed(EffectKind::Callout(Callout::Moo), above, CALLOUT_MS, fx);
                Point::new(rect.center().x, rect.top + POPUP_DROP)
            }
            ArrowHit::Plane { falling } => {
                let callout = if falling { Callout::Smash } else { Callout::Whoosh };
                self.spawn_timed(EffectKind::Callout(callout), above, CALLOUT_MS, fx);
                Point::new(rect.center().x, rect.top + POPUP_DROP)
            }
        };
        self.spawn_timed(EffectKind::Points(points), popup_at, POPUP_MS, fx);

        debug!(?actor, points, score = self.state.score, "arrow hit");
        self.check_last_arrow();
    }

    fn check_last_arrow(&mut self) {
        if self.state.is_active() && self.state.arrows_remaining == 0 {
            self.timers.schedule(END_GRACE_MS, Task::EndMatch);
        }
    }

    fn end_match(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.state.status = GameStatus::GameOver;
        let average = f64::from(self.state.score) / f64::from(self.config.arrows_per_match);
        let summary = GameOverSummary {
            score: self.state.score,
            average,
            rating: compute::rating_for(average),
        };
        self.summary = Some(summary);

        self.timers.retain(|task| !task.drives_match());
        if let Some((_, charge)) = self.pull.take() {
            self.timers.cancel(charge);
        }
        info!(score = summary.score, average, rating = ?summary.rating, "match over");
    }

    // ── Weapons ──────────────────────────────────────────────────────────────

    fn poll<B: ActorBoxes>(&mut self, kind: WeaponKind, boxes: &B) {
        let spec = weapons::spec_for(kind);
        let plane_box = self.plane_box(boxes);

        if let Some(weapon_box) = boxes.bounding_box(weapon_actor(kind)) {
            let view = PollView {
                match_active: self.state.is_active(),
                plane_in_play: plane::is_eligible(&self.plane),
                plane: plane_box.as_ref(),
                weapon_box: &weapon_box,
                surface_width: self.config.surface.width,
            };
            match weapons::decide(spec, self.weapon(kind), view) {
                PollDecision::Fire { barrel_angle, aim } => {
                    let now = self.timers.now_ms();
                    let fired = weapons::fired(self.weapon(kind), barrel_angle, now);
                    *self.weapon_mut(kind) = fired;
                    self.timers.schedule(spec.aim_delay_ms, Task::Launch { weapon: kind, aim });
                    self.timers.schedule(spec.cooldown_ms, Task::CooldownOver(kind));
                    debug!(weapon = ?kind, barrel_angle, "weapon aiming");
                }
                PollDecision::Hold(reason) => trace!(weapon = ?kind, ?reason, "weapon holding"),
            }
        }

        if self.state.is_active() {
            self.timers.schedule(spec.poll_ms, Task::Poll(kind));
        }
    }

    fn launch<B: ActorBoxes, F: Frontend>(&mut self, weapon: WeaponKind, aim: Point, boxes: &B, fx: &mut F) {
        let Some(weapon_box) = boxes.bounding_box(weapon_actor(weapon)) else {
            return;
        };
        let id = self.next_projectile_id();
        let (body, guide) = homing::launch(id, weapon, weapons::muzzle(&weapon_box), aim);
        let trail = match weapon {
            WeaponKind::Launcher => Some(SmokeTrail::spawn(ROCKET_TRAIL, body.position, fx)),
            WeaponKind::Tank => None,
        };
        debug!(?weapon, ?id, "homing shot launched");
        self.shots.push(HomingShot { body, guide, trail });
        self.timers.schedule(TICK_MS, Task::ShotTick(id));
    }

    fn shot_tick<B: ActorBoxes, F: Frontend>(&mut self, id: ProjectileId, boxes: &B, fx: &mut F) {
        let Some(index) = self.shots.iter().position(|s| s.body.id == id) else {
            return;
        };
        let plane_box = self.plane_box(boxes);
        let size = self.projectile_size(self.shots[index].body.kind);

        let shot = &mut self.shots[index];
        let previous = shot.body.position;
        let (body, guide) = homing::steer(&shot.body, &shot.guide, plane_box.map(|b| b.center()));
        shot.body = body;
        shot.guide = guide;
        if let Some(trail) = &shot.trail {
            trail.update(shot.body.frame, previous, fx);
        }

        match homing::resolve(&shot.body, &shot.guide, size, plane_box.as_ref()) {
            HomingStep::EnRoute => {
                self.timers.schedule(TICK_MS, Task::ShotTick(id));
            }
            step => {
                let shot = self.shots.remove(index);
                trace!(?id, frame = shot.body.frame, ?step, "homing shot struck");
                if let Some(trail) = shot.trail {
                    trail.clear(fx);
                }
                match shot.body.owner {
                    Owner::Tank => self.plane_hit_by_tank(boxes, fx),
                    _ => self.plane_hit_by_rocket(boxes, fx),
                }
            }
        }
    }

    // ── Plane ────────────────────────────────────────────────────────────────

    /// The plane's live box: from the stage while airborne, from the falling
    /// body while going down, none while respawning.
    fn plane_box<B: ActorBoxes>(&self, boxes: &B) -> Option<Rect> {
        match &self.plane {
            PlaneState::Falling(fall) => Some(plane::fall_bounds(fall)),
            PlaneState::Respawning => None,
            PlaneState::Flying { .. } | PlaneState::Stunned { .. } => boxes.bounding_box(ActorId::Plane),
        }
    }

    fn plane_hit_by_tank<B: ActorBoxes, F: Frontend>(&mut self, boxes: &B, fx: &mut F) {
        let Some(at) = self.plane_box(boxes) else {
            return;
        };
        self.spawn_timed(EffectKind::Explosion { large: true }, at.top_left(), TANK_EXPLOSION_MS, fx);
        if !plane::is_eligible(&self.plane) {
            return;
        }
        let id = self.next_projectile_id();
        self.plane = plane::on_tank_hit(&self.plane, id, at);
        self.fall_trail = Some(SmokeTrail::spawn(FALL_TRAIL, at.top_left(), fx));
        self.timers.schedule(TICK_MS, Task::FallTick);
        debug!("plane shot down by tank");
    }

    fn plane_hit_by_rocket<B: ActorBoxes, F: Frontend>(&mut self, boxes: &B, fx: &mut F) {
        let Some(at) = self.plane_box(boxes) else {
            return;
        };
        self.spawn_timed(EffectKind::Explosion { large: false }, at.top_left(), ROCKET_EXPLOSION_MS, fx);
        if let PlaneState::Flying { .. } = self.plane {
            self.plane = plane::on_rocket_hit(&self.plane);
            self.timers.schedule(plane::STUN_MS, Task::StunOver);
            debug!("plane stunned by rocket");
        }
    }

    fn fall_tick<F: Frontend>(&mut self, fx: &mut F) {
        let PlaneState::Falling(fall) = &self.plane else {
            return;
        };
        let next = plane::step_fall(fall);
        if let Some(trail) = &self.fall_trail {
            trail.update(next.body.frame, next.body.position, fx);
        }

        if plane::fall_finished(&next, self.config.surface.height) {
            if let Some(trail) = self.fall_trail.take() {
                trail.clear(fx);
            }
            self.plane = plane::on_fall_finished(&PlaneState::Falling(next));
            self.timers.schedule(plane::RESPAWN_MS, Task::Respawn);
        } else {
            self.plane = PlaneState::Falling(next);
            self.timers.schedule(TICK_MS, Task::FallTick);
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn weapon_mut(&mut self, kind: WeaponKind) -> &mut WeaponState {
        match kind {
            WeaponKind::Tank => &mut self.tank,
            WeaponKind::Launcher => &mut self.launcher,
        }
    }

    fn next_projectile_id(&mut self) -> ProjectileId {
        self.next_projectile += 1;
        ProjectileId(self.next_projectile)
    }

    fn spawn_timed<F: Frontend>(&mut self, kind: EffectKind, at: Point, lifetime_ms: u64, fx: &mut F) {
        let handle = fx.spawn_effect(kind, at);
        self.effects.push(handle);
        self.timers.schedule(lifetime_ms, Task::RemoveEffect(handle));
    }

    /// Cancel every pending task and take down everything on screen that
    /// the session put there.
    fn teardown<F: Frontend>(&mut self, fx: &mut F) {
        self.timers.cancel_all();
        for handle in self.effects.drain(..) {
            fx.remove_effect(handle);
        }
        if let Some(trail) = self.fall_trail.take() {
            trail.clear(fx);
        }
        for shot in self.shots.drain(..) {
            if let Some(trail) = shot.trail {
                trail.clear(fx);
            }
        }
        self.arrow = None;
        self.pull = None;
        self.summary = None;
    }
}

fn weapon_actor(kind: WeaponKind) -> ActorId {
    match kind {
        WeaponKind::Tank => ActorId::Tank,
        WeaponKind::Launcher => ActorId::Launcher,
    }
}
