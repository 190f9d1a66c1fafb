//! One slider-backed parameter of the patch
//!
//! A [`Control`] wraps a [`StepValueMapper`] with the caller-side policies
//! that differ between parameters: whether the bottom of the slider means
//! silence, whether typed values are held to the slider's range, and
//! whether the slider runs from the mapper's maximum down to its minimum.

use thiserror::Error;

use crate::mapping::{StepValueMapper, STEP_RANGE};
use crate::patch::PatchError;

/// Errors from user input handlers
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("tempo must be positive, got {0}")]
    NonPositiveTempo(f64),

    #[error("{0} does not fit in a patch float")]
    OutOfRange(f64),

    /// `number` counts from 1, as the preset buttons do
    #[error("no preset {number}, there are {count}")]
    UnknownPreset { number: usize, count: usize },

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Parse a number typed into a field
///
/// Only values the patch can hold as a 32-bit float are accepted.
pub fn parse_number(text: &str) -> Result<f64, ControlError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (*v as f32).is_finite())
        .ok_or_else(|| ControlError::InvalidNumber(text.to_string()))
}

/// `value` as the float the patch receives
pub fn patch_float(value: f64) -> Result<f32, ControlError> {
    let float = value as f32;
    if float.is_finite() {
        Ok(float)
    } else {
        Err(ControlError::OutOfRange(value))
    }
}

/// Caller-side rules layered over the mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlPolicy {
    /// Step 0 produces exactly 0 rather than the curve's minimum
    pub silent_at_zero: bool,
    /// Typed values are clamped into the range before being stored
    pub clamp_on_set: bool,
}

/// A mapped parameter and the patch receive name it feeds
#[derive(Debug, Clone)]
pub struct Control {
    mapper: StepValueMapper,
    policy: ControlPolicy,
    dest: String,
    reversed: bool,
}

impl Control {
    pub fn new(mapper: StepValueMapper, policy: ControlPolicy, dest: impl Into<String>) -> Self {
        Self {
            mapper,
            policy,
            dest: dest.into(),
            reversed: false,
        }
    }

    /// Put the mapper's maximum at the bottom of the slider
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Slider moved to `step`; returns the new value
    ///
    /// A value the patch cannot hold is rejected and the control keeps its
    /// previous value.
    pub fn slide_to(&mut self, step: i32) -> Result<f64, ControlError> {
        let value = if self.policy.silent_at_zero && step == 0 {
            0.0
        } else {
            self.mapper.value_from_step(self.mapper_step(step))
        };
        patch_float(value)?;
        self.mapper.set_value(value);
        Ok(value)
    }

    /// A value was typed in; returns what was stored
    pub fn enter(&mut self, value: f64) -> Result<f64, ControlError> {
        let value = if self.policy.clamp_on_set {
            self.mapper.clamp(value)
        } else {
            value
        };
        patch_float(value)?;
        self.mapper.set_value(value);
        Ok(value)
    }

    /// Where a bounded slider should sit for the current value
    pub fn slider_position(&self) -> i32 {
        let step = self.mapper.step_from_value().clamp(0, STEP_RANGE);
        self.mapper_step(step)
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Convert between slider and mapper steps; its own inverse
    fn mapper_step(&self, step: i32) -> i32 {
        if self.reversed {
            STEP_RANGE.saturating_sub(step)
        } else {
            step
        }
    }

    pub fn value(&self) -> f64 {
        self.mapper.value()
    }

    pub fn destination(&self) -> &str {
        &self.dest
    }

    pub fn policy(&self) -> ControlPolicy {
        self.policy
    }

    pub fn mapper(&self) -> &StepValueMapper {
        &self.mapper
    }
}
