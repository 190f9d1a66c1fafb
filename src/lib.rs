//! metronome - slider controller for a Pure Data metronome patch
//!
//! The beat itself comes from a Pd patch. This crate maps slider steps to
//! tempo and volume, keeps the controller state, and sends the patch
//! named float messages.

pub mod config;
pub mod control;
pub mod mapping;
pub mod patch;
pub mod session;
pub mod ui;

pub use config::MetronomeConfig;
pub use mapping::{Curve, StepValueMapper, STEP_RANGE};
pub use session::Session;
