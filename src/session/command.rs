//! Text commands for driving a session without a terminal UI
//!
//! One command per line, e.g. `tempo 1024`, `bpm= 96`, `preset 2`.
//! Slider commands take a step, `=` commands take a typed value.

use std::str::FromStr;

use thiserror::Error;

use super::Session;
use crate::control::ControlError;
use crate::patch::PatchSink;

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move the volume slider to a step
    VolumeStep(i32),
    /// Move the tempo slider to a step
    TempoStep(i32),
    /// Type a volume
    Volume(String),
    /// Type a tempo in ms per beat
    Tempo(String),
    /// Type a tempo in BPM
    Bpm(String),
    /// Press a preset button, numbered from 1
    Preset(usize),
    Accent(i64),
    SubAccent(i64),
    Reset,
    Pause,
    Resume,
}

/// Error for a line that is not a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseCommandError(String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| ParseCommandError("empty command".to_string()))?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(ParseCommandError(format!("too many arguments: {line:?}")));
        }

        fn required<'a>(name: &str, arg: Option<&'a str>) -> Result<&'a str, ParseCommandError> {
            arg.ok_or_else(|| ParseCommandError(format!("{name} needs an argument")))
        }

        fn integer<T: FromStr>(name: &str, arg: Option<&str>) -> Result<T, ParseCommandError> {
            let arg = required(name, arg)?;
            arg.parse()
                .map_err(|_| ParseCommandError(format!("{name}: not an integer: {arg:?}")))
        }

        let command = match name {
            "volume" => Command::VolumeStep(integer(name, arg)?),
            "tempo" => Command::TempoStep(integer(name, arg)?),
            "volume=" => Command::Volume(required(name, arg)?.to_string()),
            "tempo=" => Command::Tempo(required(name, arg)?.to_string()),
            "bpm=" => Command::Bpm(required(name, arg)?.to_string()),
            "preset" => Command::Preset(integer(name, arg)?),
            "accent" => Command::Accent(integer(name, arg)?),
            "sub" => Command::SubAccent(integer(name, arg)?),
            "reset" | "pause" | "resume" if arg.is_some() => {
                return Err(ParseCommandError(format!("{name} takes no argument")));
            }
            "reset" => Command::Reset,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            other => return Err(ParseCommandError(format!("unknown command {other:?}"))),
        };
        Ok(command)
    }
}

impl Command {
    /// Apply the command to `session`
    pub fn apply<S: PatchSink>(&self, session: &mut Session<S>) -> Result<(), ControlError> {
        match self {
            Command::VolumeStep(step) => session.volume_step(*step).map(drop),
            Command::TempoStep(step) => session.tempo_step(*step).map(drop),
            Command::Volume(text) => session.volume_entered(text).map(drop),
            Command::Tempo(text) => session.tempo_entered(text).map(drop),
            Command::Bpm(text) => session.bpm_entered(text).map(drop),
            Command::Preset(number) => {
                let index = number.checked_sub(1).ok_or(ControlError::UnknownPreset {
                    number: 0,
                    count: session.presets().len(),
                })?;
                session.preset(index).map(drop)
            }
            Command::Accent(beats) => session.set_accent(*beats).map(drop),
            Command::SubAccent(beats) => session.set_sub_accent(*beats).map(drop),
            Command::Reset => session.reset(),
            Command::Pause => session.set_paused(true),
            Command::Resume => session.set_paused(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetronomeConfig;
    use crate::patch::RecordingSink;

    #[test]
    fn test_parse_commands() {
        assert_eq!("volume 1024".parse::<Command>(), Ok(Command::VolumeStep(1024)));
        assert_eq!("  tempo   0 ".parse::<Command>(), Ok(Command::TempoStep(0)));
        assert_eq!("bpm= 96.5".parse::<Command>(), Ok(Command::Bpm("96.5".to_string())));
        assert_eq!("preset 2".parse::<Command>(), Ok(Command::Preset(2)));
        assert_eq!("sub 3".parse::<Command>(), Ok(Command::SubAccent(3)));
        assert_eq!("pause".parse::<Command>(), Ok(Command::Pause));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Command>().is_err());
        assert!("volume".parse::<Command>().is_err());
        assert!("volume loud".parse::<Command>().is_err());
        assert!("tempo 1 2".parse::<Command>().is_err());
        assert!("reset now".parse::<Command>().is_err());
        assert_eq!(
            "louder".parse::<Command>().unwrap_err().to_string(),
            "unknown command \"louder\""
        );
    }

    #[test]
    fn test_apply_sequence() {
        let mut session = Session::new(&MetronomeConfig::default(), RecordingSink::new());
        for line in ["preset 3", "accent 6", "volume 0", "pause"] {
            let command: Command = line.parse().unwrap();
            command.apply(&mut session).unwrap();
        }

        assert_eq!(session.tempo().value(), 750.0);
        assert_eq!(session.accent(), 6);
        assert_eq!(session.volume().value(), 0.0);
        assert!(session.is_paused());
    }

    #[test]
    fn test_preset_numbering_starts_at_one() {
        let mut session = Session::new(&MetronomeConfig::default(), RecordingSink::new());
        let err = Command::Preset(0).apply(&mut session).unwrap_err();
        assert_eq!(err.to_string(), "no preset 0, there are 3");
        Command::Preset(1).apply(&mut session).unwrap();
        assert_eq!(session.tempo().value(), 1000.0);

        let err = Command::Preset(9).apply(&mut session).unwrap_err();
        assert_eq!(err.to_string(), "no preset 9, there are 3");
    }
}
