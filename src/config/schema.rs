//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::control::ControlPolicy;
use crate::mapping::{Curve, StepValueMapper};

/// Accent counts the patch accepts
pub const ACCENT_RANGE: std::ops::RangeInclusive<u32> = 1..=128;

/// Presets reachable from the number keys
pub const MAX_PRESETS: usize = 9;

/// Main configuration for the metronome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetronomeConfig {
    /// Volume slider (gain, 0..1)
    #[serde(default)]
    pub volume: ControlConfig,

    /// Tempo slider (milliseconds per beat, slow at the bottom)
    #[serde(default)]
    pub tempo: ControlConfig,

    /// Beats between accented beats (default: 12)
    #[serde(default = "default_accent")]
    pub accent: u32,

    /// Beats between sub-accented beats (default: 4)
    #[serde(default = "default_sub_accent")]
    pub sub_accent: u32,

    /// Tempo presets in milliseconds per beat
    #[serde(default = "default_presets")]
    pub presets: Vec<f64>,

    /// Where the patch is and how its receivers are named
    #[serde(default)]
    pub patch: PatchConfig,
}

fn default_accent() -> u32 { 12 }
fn default_sub_accent() -> u32 { 4 }
fn default_presets() -> Vec<f64> { vec![1000.0, 875.0, 750.0] }

impl Default for MetronomeConfig {
    fn default() -> Self {
        Self {
            volume: ControlConfig::default(),
            tempo: ControlConfig::default(),
            accent: default_accent(),
            sub_accent: default_sub_accent(),
            presets: default_presets(),
            patch: PatchConfig::default(),
        }
    }
}

impl MetronomeConfig {
    /// Volume settings with defaults filled in
    pub fn volume(&self) -> ControlSettings {
        self.volume.resolve(ControlSettings {
            minimum: 0.001,
            maximum: 1.0,
            value: 0.35,
            curve: Curve::Logarithmic,
            policy: ControlPolicy {
                silent_at_zero: true,
                clamp_on_set: false,
            },
        })
    }

    /// Tempo settings with defaults filled in
    pub fn tempo(&self) -> ControlSettings {
        self.tempo.resolve(ControlSettings {
            minimum: 2000.0,
            maximum: 20.0,
            value: 1000.0,
            curve: Curve::Logarithmic,
            policy: ControlPolicy::default(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !ACCENT_RANGE.contains(&self.accent) {
            bail!("Accent must be between 1 and 128");
        }
        if !ACCENT_RANGE.contains(&self.sub_accent) {
            bail!("Sub-accent must be between 1 and 128");
        }

        if self.presets.is_empty() {
            bail!("At least one tempo preset is required");
        }
        if self.presets.len() > MAX_PRESETS {
            bail!("At most {} tempo presets are supported", MAX_PRESETS);
        }
        if let Some(bad) = self.presets.iter().find(|p| !p.is_finite() || **p <= 0.0) {
            bail!("Tempo presets must be positive, got {}", bad);
        }

        let volume = self.volume();
        if !volume.is_finite() {
            bail!("Volume settings must be finite numbers");
        }

        // BPM is 60000 / ms, so the tempo range must stay off zero
        let tempo = self.tempo();
        if !tempo.is_finite() {
            bail!("Tempo settings must be finite numbers");
        }
        if tempo.minimum <= 0.0 || tempo.maximum <= 0.0 {
            bail!("Tempo bounds must be positive");
        }

        if self.patch.prefix.chars().any(char::is_whitespace) {
            bail!("Patch prefix must not contain whitespace");
        }

        Ok(())
    }
}

/// One slider as written in the file; absent keys take the parameter's defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Value at the bottom of the slider
    pub minimum: Option<f64>,

    /// Value at the top of the slider
    pub maximum: Option<f64>,

    /// Starting value, clamped into range
    pub value: Option<f64>,

    /// Slider curve
    pub curve: Option<Curve>,

    /// Bottom of the slider sends exactly 0
    pub silent_at_zero: Option<bool>,

    /// Typed values are clamped into range
    pub clamp_on_set: Option<bool>,
}

impl ControlConfig {
    /// Fill absent keys from `defaults`
    pub fn resolve(&self, defaults: ControlSettings) -> ControlSettings {
        ControlSettings {
            minimum: self.minimum.unwrap_or(defaults.minimum),
            maximum: self.maximum.unwrap_or(defaults.maximum),
            value: self.value.unwrap_or(defaults.value),
            curve: self.curve.unwrap_or(defaults.curve),
            policy: ControlPolicy {
                silent_at_zero: self.silent_at_zero.unwrap_or(defaults.policy.silent_at_zero),
                clamp_on_set: self.clamp_on_set.unwrap_or(defaults.policy.clamp_on_set),
            },
        }
    }
}

/// Fully specified slider settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSettings {
    pub minimum: f64,
    pub maximum: f64,
    pub value: f64,
    pub curve: Curve,
    pub policy: ControlPolicy,
}

impl ControlSettings {
    /// Build the mapper these settings describe
    pub fn mapper(&self) -> StepValueMapper {
        StepValueMapper::new(self.minimum, self.maximum, self.value, self.curve)
    }

    /// Bounds were given top first, so the slider runs from `minimum` down
    pub fn is_reversed(&self) -> bool {
        self.minimum > self.maximum
    }

    fn is_finite(&self) -> bool {
        self.minimum.is_finite() && self.maximum.is_finite() && self.value.is_finite()
    }
}

/// Patch connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Prepended to every receive name, e.g. `"1003-"` for a `$0-vol` receiver
    #[serde(default)]
    pub prefix: String,

    /// `host:port` of the patch's `[netreceive]` (None = dry run)
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: MetronomeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.accent, 12);
        assert_eq!(config.sub_accent, 4);
        assert_eq!(config.presets, vec![1000.0, 875.0, 750.0]);
        assert!(config.patch.address.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_control_settings() {
        let config = MetronomeConfig::default();

        let volume = config.volume();
        assert_eq!(volume.minimum, 0.001);
        assert_eq!(volume.value, 0.35);
        assert!(volume.policy.silent_at_zero);
        assert!(!volume.policy.clamp_on_set);

        let tempo = config.tempo();
        assert_eq!((tempo.minimum, tempo.maximum), (2000.0, 20.0));
        assert!(!tempo.policy.silent_at_zero);

        assert!(tempo.is_reversed());
        assert!(!volume.is_reversed());

        let mapper = tempo.mapper();
        assert_eq!(mapper.minimum(), 20.0);
        assert_eq!(mapper.maximum(), 2000.0);
    }

    #[test]
    fn test_partial_control_keeps_parameter_defaults() {
        let json = r#"{ "volume": { "maximum": 2.0, "curve": "linear" } }"#;
        let config: MetronomeConfig = serde_json::from_str(json).unwrap();

        let volume = config.volume();
        assert_eq!(volume.minimum, 0.001);
        assert_eq!(volume.maximum, 2.0);
        assert_eq!(volume.curve, Curve::Linear);
        assert!(volume.policy.silent_at_zero);
    }

    #[test]
    fn test_accent_out_of_range() {
        let config = MetronomeConfig {
            accent: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MetronomeConfig {
            sub_accent: 129,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets_validated() {
        let none = MetronomeConfig {
            presets: vec![],
            ..Default::default()
        };
        assert!(none.validate().is_err());

        let negative = MetronomeConfig {
            presets: vec![500.0, -1.0],
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let too_many = MetronomeConfig {
            presets: vec![500.0; MAX_PRESETS + 1],
            ..Default::default()
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_tempo_must_stay_positive() {
        let mut config = MetronomeConfig::default();
        config.tempo.minimum = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prefix_without_whitespace() {
        let mut config = MetronomeConfig::default();
        config.patch.prefix = "bad prefix-".to_string();
        assert!(config.validate().is_err());

        config.patch.prefix = "1003-".to_string();
        assert!(config.validate().is_ok());
    }
}
