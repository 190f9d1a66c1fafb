//! Step curves
//!
//! Both curves are anchored at the lower bound: step 0 is `minimum`,
//! step [`STEP_RANGE`] is `maximum`.

use serde::{Deserialize, Serialize};

use super::STEP_RANGE;

/// Shape of the step-to-value mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    /// `value = minimum * e^(k * step)`
    ///
    /// Equal step distances give equal value ratios, which is what
    /// loudness and tempo feel like to a listener.
    #[default]
    Logarithmic,
    /// `value = minimum + k * step`
    Linear,
}

impl Curve {
    /// Coefficient `k` taking step 0 to `minimum` and the last step to `maximum`
    pub fn slope(self, minimum: f64, maximum: f64) -> f64 {
        let run = STEP_RANGE as f64;
        match self {
            Curve::Logarithmic => (maximum / minimum).ln() / run,
            Curve::Linear => (maximum - minimum) / run,
        }
    }

    /// Evaluate the curve at `step`
    pub fn value(self, slope: f64, minimum: f64, step: i32) -> f64 {
        let step = step as f64;
        match self {
            Curve::Logarithmic => minimum * (slope * step).exp(),
            Curve::Linear => minimum + slope * step,
        }
    }

    /// Continuous step position of `value`, before rounding
    pub fn position(self, slope: f64, minimum: f64, value: f64) -> f64 {
        match self {
            Curve::Logarithmic => (value / minimum).ln() / slope,
            Curve::Linear => (value - minimum) / slope,
        }
    }
}
