//! Controller state for one running patch
//!
//! A [`Session`] owns every control and the connection to the patch. The
//! hosts (terminal UI, script mode) translate their input into calls on
//! it and redraw from what it reports back.

mod command;
mod display;

pub use command::Command;
pub use display::{bpm_from_ms, format_reading, ms_from_bpm, MS_PER_MINUTE};

use tracing::{debug, info};

use crate::config::{MetronomeConfig, ACCENT_RANGE};
use crate::control::{parse_number, patch_float, Control, ControlError};
use crate::patch::PatchSink;

/// Receive names inside the patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub vol: String,
    pub play: String,
    pub met: String,
    pub set: String,
    pub accent: String,
    pub sub: String,
}

impl Destinations {
    /// Receive names with `prefix` prepended, as in `$0-vol`
    pub fn new(prefix: &str) -> Self {
        let name = |suffix: &str| format!("{prefix}{suffix}");
        Self {
            vol: name("vol"),
            play: name("play"),
            met: name("met"),
            set: name("set"),
            accent: name("accent"),
            sub: name("sub"),
        }
    }
}

/// Formatted values for the numeric fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub volume: String,
    pub tempo: String,
    pub bpm: String,
}

/// All controls of the metronome plus the patch they drive
pub struct Session<S: PatchSink> {
    volume: Control,
    tempo: Control,
    accent: u32,
    sub_accent: u32,
    presets: Vec<f64>,
    paused: bool,
    dest: Destinations,
    sink: S,
}

impl<S: PatchSink> Session<S> {
    /// Build the controls from `config`; nothing is sent until [`start`](Self::start)
    pub fn new(config: &MetronomeConfig, sink: S) -> Self {
        let dest = Destinations::new(&config.patch.prefix);
        let volume = config.volume();
        let tempo = config.tempo();

        Self {
            volume: Control::new(volume.mapper(), volume.policy, dest.vol.clone())
                .reversed(volume.is_reversed()),
            tempo: Control::new(tempo.mapper(), tempo.policy, dest.met.clone())
                .reversed(tempo.is_reversed()),
            accent: config.accent,
            sub_accent: config.sub_accent,
            presets: config.presets.clone(),
            paused: false,
            dest,
            sink,
        }
    }

    /// Push the initial settings and start the beat
    pub fn start(&mut self) -> Result<(), ControlError> {
        self.sink.send_float(&self.dest.accent, self.accent as f32)?;
        self.sink.send_float(&self.dest.sub, self.sub_accent as f32)?;
        self.sink.send_float(&self.dest.vol, self.volume.value() as f32)?;
        self.sink.send_bang(&self.dest.play)?;
        self.sink.set_dsp(true)?;
        info!(
            volume = self.volume.value(),
            tempo = self.tempo.value(),
            accent = self.accent,
            sub_accent = self.sub_accent,
            "session started"
        );
        Ok(())
    }

    /// Volume slider moved; returns the value sent
    pub fn volume_step(&mut self, step: i32) -> Result<f64, ControlError> {
        let value = self.volume.slide_to(step)?;
        send_control(&mut self.sink, &self.volume)?;
        Ok(value)
    }

    /// Volume typed in; returns the slider step to show without notifying
    pub fn volume_entered(&mut self, text: &str) -> Result<i32, ControlError> {
        let value = parse_number(text)?;
        self.volume.enter(value)?;
        send_control(&mut self.sink, &self.volume)?;
        Ok(self.volume.slider_position())
    }

    /// Tempo slider moved; returns the milliseconds per beat sent
    pub fn tempo_step(&mut self, step: i32) -> Result<f64, ControlError> {
        let value = self.tempo.slide_to(step)?;
        send_control(&mut self.sink, &self.tempo)?;
        Ok(value)
    }

    /// Milliseconds per beat typed in; returns the silent slider step
    pub fn tempo_entered(&mut self, text: &str) -> Result<i32, ControlError> {
        let ms = parse_number(text)?;
        self.push_tempo(ms)
    }

    /// BPM typed in; returns the silent slider step
    pub fn bpm_entered(&mut self, text: &str) -> Result<i32, ControlError> {
        let bpm = parse_number(text)?;
        if bpm <= 0.0 {
            return Err(ControlError::NonPositiveTempo(bpm));
        }
        self.push_tempo(ms_from_bpm(bpm))
    }

    /// Preset button `index` (from 0) pressed; returns the silent slider step
    pub fn preset(&mut self, index: usize) -> Result<i32, ControlError> {
        let ms = *self.presets.get(index).ok_or(ControlError::UnknownPreset {
            number: index + 1,
            count: self.presets.len(),
        })?;
        self.push_tempo(ms)
    }

    /// Set the tempo directly; returns the slider step to show without notifying
    pub fn push_tempo(&mut self, ms: f64) -> Result<i32, ControlError> {
        if ms.is_nan() || ms <= 0.0 {
            return Err(ControlError::NonPositiveTempo(ms));
        }
        self.tempo.enter(ms)?;
        send_control(&mut self.sink, &self.tempo)?;
        Ok(self.tempo.slider_position())
    }

    /// Beats between accents, kept within 1..=128; returns what was sent
    pub fn set_accent(&mut self, beats: i64) -> Result<u32, ControlError> {
        self.accent = clamp_beats(beats);
        self.sink.send_float(&self.dest.accent, self.accent as f32)?;
        Ok(self.accent)
    }

    /// Beats between sub-accents, kept within 1..=128; returns what was sent
    pub fn set_sub_accent(&mut self, beats: i64) -> Result<u32, ControlError> {
        self.sub_accent = clamp_beats(beats);
        self.sink.send_float(&self.dest.sub, self.sub_accent as f32)?;
        Ok(self.sub_accent)
    }

    /// Restart the beat count so the next beat is accented
    pub fn reset(&mut self) -> Result<(), ControlError> {
        self.sink.send_float(&self.dest.set, 0.0)?;
        Ok(())
    }

    /// Stop or resume audio; repeating the current state does nothing
    pub fn set_paused(&mut self, paused: bool) -> Result<(), ControlError> {
        if paused == self.paused {
            return Ok(());
        }
        self.sink.set_dsp(!paused)?;
        self.paused = paused;
        info!(paused, "audio toggled");
        Ok(())
    }

    /// Text for the volume, tempo and BPM fields
    pub fn readout(&self) -> Readout {
        let ms = self.tempo.value();
        Readout {
            volume: format_reading(self.volume.value()),
            tempo: format_reading(ms),
            bpm: format_reading(bpm_from_ms(ms)),
        }
    }

    pub fn volume(&self) -> &Control {
        &self.volume
    }

    pub fn tempo(&self) -> &Control {
        &self.tempo
    }

    pub fn accent(&self) -> u32 {
        self.accent
    }

    pub fn sub_accent(&self) -> u32 {
        self.sub_accent
    }

    pub fn presets(&self) -> &[f64] {
        &self.presets
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn destinations(&self) -> &Destinations {
        &self.dest
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

fn send_control<S: PatchSink>(sink: &mut S, control: &Control) -> Result<(), ControlError> {
    debug!(dest = control.destination(), value = control.value(), "control changed");
    sink.send_float(control.destination(), patch_float(control.value())?)?;
    Ok(())
}

fn clamp_beats(beats: i64) -> u32 {
    beats.clamp(*ACCENT_RANGE.start() as i64, *ACCENT_RANGE.end() as i64) as u32
}
