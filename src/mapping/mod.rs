//! Mapping between slider steps and parameter values
//!
//! A slider only knows integer positions; the patch wants seconds,
//! milliseconds or gain. These mappers translate in both directions.

mod curve;
mod slide;

pub use curve::Curve;
pub use slide::StepValueMapper;

/// Highest slider step; the lowest is always 0
pub const STEP_RANGE: i32 = 2048;
