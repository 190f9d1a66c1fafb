//! Step/value mapper backing each slider

use super::Curve;

/// Bidirectional mapping between a slider step and a parameter value
///
/// Step 0 corresponds to [`minimum`](Self::minimum) and step
/// [`STEP_RANGE`](super::STEP_RANGE) to [`maximum`](Self::maximum). The mapper also holds the
/// parameter's current value, which is what
/// [`step_from_value`](Self::step_from_value) reads back.
#[derive(Debug, Clone, PartialEq)]
pub struct StepValueMapper {
    minimum: f64,
    maximum: f64,
    value: f64,
    curve: Curve,
    slope: f64,
}

impl StepValueMapper {
    /// Create a mapper over `minimum..=maximum`, given in either order
    ///
    /// A logarithmic curve cannot reach zero or cross it, so bounds that
    /// do are repaired instead of rejected:
    /// - both zero: `maximum` becomes 1
    /// - `maximum > 0` and `minimum <= 0`: `minimum` becomes 1% of `maximum`
    /// - `maximum <= 0` and `minimum > 0`: `maximum` becomes 1% of `minimum`
    /// - one bound zero, the other negative: the zero bound becomes 1% of
    ///   the other
    ///
    /// `initial` is clamped into the final range.
    pub fn new(minimum: f64, maximum: f64, initial: f64, curve: Curve) -> Self {
        let (mut minimum, mut maximum) = match curve {
            Curve::Logarithmic => repair_log_bounds(minimum, maximum),
            Curve::Linear => (minimum, maximum),
        };
        if minimum > maximum {
            std::mem::swap(&mut minimum, &mut maximum);
        }

        Self {
            minimum,
            maximum,
            value: clamp_between(initial, minimum, maximum),
            curve,
            slope: curve.slope(minimum, maximum),
        }
    }

    /// Logarithmic mapper, the usual choice for loudness and tempo
    pub fn logarithmic(minimum: f64, maximum: f64, initial: f64) -> Self {
        Self::new(minimum, maximum, initial, Curve::Logarithmic)
    }

    /// Linear mapper
    pub fn linear(minimum: f64, maximum: f64, initial: f64) -> Self {
        Self::new(minimum, maximum, initial, Curve::Linear)
    }

    /// Value at `step`; not clamped, so steps outside the slider extrapolate
    pub fn value_from_step(&self, step: i32) -> f64 {
        self.curve.value(self.slope, self.minimum, step)
    }

    /// Step nearest to the current value
    ///
    /// Not clamped to `0..=STEP_RANGE`: a value stored outside the range
    /// lands outside it. Values without a logarithm (zero, or the wrong
    /// sign) saturate, and a zero-width range always reports step 0.
    pub fn step_from_value(&self) -> i32 {
        if self.slope == 0.0 {
            return 0;
        }
        // float -> int casts saturate and take NaN to 0
        self.curve
            .position(self.slope, self.minimum, self.value)
            .round() as i32
    }

    /// Store `value` as is, even outside the range
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Store `value` clamped into the range, returning what was stored
    pub fn set_value_clamped(&mut self, value: f64) -> f64 {
        self.value = self.clamp(value);
        self.value
    }

    /// Clamp `value` into `minimum..=maximum`
    pub fn clamp(&self, value: f64) -> f64 {
        clamp_between(value, self.minimum, self.maximum)
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Current parameter value
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn is_logarithmic(&self) -> bool {
        self.curve == Curve::Logarithmic
    }

    /// Curve coefficient `k`
    pub fn slope(&self) -> f64 {
        self.slope
    }
}

/// `f64::clamp` without the panic on NaN bounds
fn clamp_between(value: f64, minimum: f64, maximum: f64) -> f64 {
    value.max(minimum).min(maximum)
}

/// Move bounds that touch or straddle zero onto one side of it
fn repair_log_bounds(mut minimum: f64, mut maximum: f64) -> (f64, f64) {
    if minimum == 0.0 && maximum == 0.0 {
        maximum = 1.0;
    }
    if maximum > 0.0 {
        if minimum <= 0.0 {
            minimum = 0.01 * maximum;
        }
    } else if minimum > 0.0 {
        maximum = 0.01 * minimum;
    } else if minimum == 0.0 {
        minimum = 0.01 * maximum;
    } else if maximum == 0.0 {
        maximum = 0.01 * minimum;
    }
    (minimum, maximum)
}
