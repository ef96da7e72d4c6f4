//! Stage: the presentation-side animation of the actors.
//!
//! The simulation never moves actors itself; it asks for their boxes every
//! tick.  `Stage` is the terminal front end's answer: cows graze on sine
//! paths, the plane crosses the sky on its lane, and the target, tank and
//! launcher stand still.

use std::f64::consts::TAU;

use crate::config::{Layout, SimConfig};
use crate::entities::{ActorId, Lane, PlaneState, Rect, Size};
use crate::ports::ActorBoxes;

pub const COW_A_PERIOD_MS: u64 = 10_000;
pub const COW_B_PERIOD_MS: u64 = 12_000;
/// Time for the plane to cross from off-screen left to off-screen right.
pub const PLANE_CROSSING_MS: u64 = 20_000;
/// How far off-screen the plane starts and ends a crossing.
pub const PLANE_OFFSCREEN: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct Stage {
    layout: Layout,
    surface: Size,
    clock_ms: u64,
    /// Progress along the current crossing; frozen while the plane is stunned.
    route_ms: u64,
    lane: Lane,
}

impl Stage {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            surface: config.surface,
            clock_ms: 0,
            route_ms: 0,
            lane: Lane::High,
        }
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Play `dt_ms` of animation, following the plane's behavioural state.
    pub fn advance(&mut self, dt_ms: u64, plane: &PlaneState) {
        self.clock_ms += dt_ms;
        match plane {
            PlaneState::Flying { lane } => {
                self.lane = *lane;
                self.route_ms = (self.route_ms + dt_ms) % PLANE_CROSSING_MS;
            }
            PlaneState::Stunned { lane } => self.lane = *lane,
            // The next crossing starts from the left edge.
            PlaneState::Falling(_) | PlaneState::Respawning => self.route_ms = 0,
        }
    }

    fn cow_box(&self, rest: &Rect, roam: f64, period_ms: u64) -> Rect {
        let phase = (self.clock_ms % period_ms) as f64 / period_ms as f64;
        rest.translated(roam * (phase * TAU).sin(), 0.0)
    }

    fn plane_box(&self) -> Rect {
        let progress = self.route_ms as f64 / PLANE_CROSSING_MS as f64;
        let span = self.surface.width + 2.0 * PLANE_OFFSCREEN;
        let left = -PLANE_OFFSCREEN + span * progress;
        let top = match self.lane {
            Lane::High => self.layout.high_lane_y,
            Lane::Low => self.layout.low_lane_y,
        };
        Rect::new(left, top, self.layout.plane_size.width, self.layout.plane_size.height)
    }
}

impl ActorBoxes for Stage {
    fn bounding_box(&self, actor: ActorId) -> Option<Rect> {
        let layout = &self.layout;
        Some(match actor {
            ActorId::Target => layout.target,
            ActorId::CowA => self.cow_box(&layout.cow_a, layout.cow_a_roam, COW_A_PERIOD_MS),
            ActorId::CowB => self.cow_box(&layout.cow_b, layout.cow_b_roam, COW_B_PERIOD_MS),
            ActorId::Plane => self.plane_box(),
            ActorId::Tank => layout.tank,
            ActorId::Launcher => layout.launcher,
        })
    }
}
