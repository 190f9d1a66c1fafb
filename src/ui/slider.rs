//! Slider model with a silent setter

use crate::mapping::STEP_RANGE;

/// A bounded integer slider
///
/// User moves report the new position so the caller can forward it.
/// Programmatic moves through [`set_silently`](Self::set_silently) report
/// nothing, which keeps a value typed elsewhere from bouncing back
/// through the slider's curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    step: i32,
}

impl Slider {
    pub fn new(step: i32) -> Self {
        Self {
            step: step.clamp(0, STEP_RANGE),
        }
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Move to `step`; returns the new position if it changed
    pub fn set(&mut self, step: i32) -> Option<i32> {
        let step = step.clamp(0, STEP_RANGE);
        if step == self.step {
            return None;
        }
        self.step = step;
        Some(step)
    }

    /// Move by `delta` steps; returns the new position if it changed
    pub fn nudge(&mut self, delta: i32) -> Option<i32> {
        self.set(self.step.saturating_add(delta))
    }

    /// Move to `step` without reporting a change
    pub fn set_silently(&mut self, step: i32) {
        self.step = step.clamp(0, STEP_RANGE);
    }

    /// Position as a fraction of the track, 0.0 to 1.0
    pub fn fraction(&self) -> f64 {
        self.step as f64 / STEP_RANGE as f64
    }
}
