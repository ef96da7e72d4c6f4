//! Archery range: a bow-and-arrow arcade simulation.
//!
//! The player's arrow flies under gravity and wind toward a target and two
//! grazing cows, while a tank and a rocket launcher fire homing shots at a
//! passing plane.  [`session::Session`] runs the whole match on a virtual
//! clock; everything it shows or plays goes through the traits in
//! [`ports`].

pub mod compute;
pub mod config;
pub mod entities;
pub mod homing;
pub mod plane;
pub mod ports;
pub mod session;
pub mod stage;
pub mod timers;
pub mod trail;
pub mod weapons;
pub mod wind;
