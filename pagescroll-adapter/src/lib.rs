//! Adapter utilities for the `pagescroll` crate.
//!
//! The `pagescroll` crate routes deltas and decides snap targets but never animates. This
//! crate provides the frame-driven pieces an adapter needs on top of it:
//!
//! - Decay-then-settle flings routed through the nested-scroll chain ([`FlingRouter`])
//! - Release velocity estimation from drag samples ([`VelocityTracker1D`])
//! - A controller answering the host's nested-scroll callbacks ([`PagerController`])
//!
//! Time is passed in by the caller as milliseconds; nothing here reads a clock.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod decay;
mod fling;
mod spring;
mod velocity;


pub use controller::{EventOutcome, GestureState, NestedScrollEvent, PagerController};
pub use decay::{EXPONENTIAL_DECAY_FRICTION, ExponentialDecay};
pub use fling::{FlingConfig, FlingEnd, FlingReport, FlingRouter, FlingTick};
pub use spring::Spring;
pub use velocity::VelocityTracker1D;
