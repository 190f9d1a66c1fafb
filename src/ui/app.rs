//! Terminal UI state and key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use super::Slider;
use crate::control::ControlError;
use crate::patch::PatchSink;
use crate::session::Session;

/// Steps per arrow key press; Shift moves a single step
const NUDGE: i32 = 16;
/// Steps per page key press
const PAGE: i32 = 256;

/// Which slider the arrow keys move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tempo,
    Volume,
}

/// Numeric field being typed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Volume,
    Tempo,
    Bpm,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Volume => "Volume",
            Field::Tempo => "Tempo (ms)",
            Field::Bpm => "BPM",
        }
    }
}

/// Text being typed into a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub field: Field,
    pub text: String,
}

/// Everything the terminal UI shows
pub struct App<S: PatchSink> {
    pub session: Session<S>,
    pub tempo: Slider,
    pub volume: Slider,
    pub focus: Focus,
    pub entry: Option<Entry>,
    pub status: Option<String>,
    quit: bool,
}

impl<S: PatchSink> App<S> {
    pub fn new(session: Session<S>) -> Self {
        let tempo = Slider::new(session.tempo().slider_position());
        let volume = Slider::new(session.volume().slider_position());
        Self {
            session,
            tempo,
            volume,
            focus: Focus::Tempo,
            entry: None,
            status: None,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// React to one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        let result = if self.entry.is_some() {
            self.handle_entry_key(key)
        } else {
            self.handle_control_key(key)
        };
        if let Err(e) = result {
            warn!("{}", e);
            self.status = Some(e.to_string());
        }
    }

    fn handle_control_key(&mut self, key: KeyEvent) -> Result<(), ControlError> {
        let fine = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,

            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Tempo => Focus::Volume,
                    Focus::Volume => Focus::Tempo,
                };
            }
            KeyCode::Up => self.nudge(if fine { 1 } else { NUDGE })?,
            KeyCode::Down => self.nudge(if fine { -1 } else { -NUDGE })?,
            KeyCode::PageUp => self.nudge(PAGE)?,
            KeyCode::PageDown => self.nudge(-PAGE)?,
            KeyCode::Home => self.nudge(i32::MIN)?,
            KeyCode::End => self.nudge(i32::MAX)?,

            KeyCode::Char('v') => self.begin_entry(Field::Volume),
            KeyCode::Char('t') => self.begin_entry(Field::Tempo),
            KeyCode::Char('b') => self.begin_entry(Field::Bpm),

            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let step = self.session.preset(index)?;
                self.tempo.set_silently(step);
            }

            KeyCode::Char('a') => {
                let beats = self.session.accent() as i64 - 1;
                self.session.set_accent(beats)?;
            }
            KeyCode::Char('A') => {
                let beats = self.session.accent() as i64 + 1;
                self.session.set_accent(beats)?;
            }
            KeyCode::Char('s') => {
                let beats = self.session.sub_accent() as i64 - 1;
                self.session.set_sub_accent(beats)?;
            }
            KeyCode::Char('S') => {
                let beats = self.session.sub_accent() as i64 + 1;
                self.session.set_sub_accent(beats)?;
            }

            KeyCode::Char('r') => self.session.reset()?,
            KeyCode::Char(' ') => {
                let paused = !self.session.is_paused();
                self.session.set_paused(paused)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_entry_key(&mut self, key: KeyEvent) -> Result<(), ControlError> {
        let Some(entry) = self.entry.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.entry = None,
            KeyCode::Backspace => {
                entry.text.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E') => {
                entry.text.push(c);
            }
            KeyCode::Enter => {
                // take the entry first so a rejected value closes the field too
                if let Some(entry) = self.entry.take() {
                    self.commit(entry)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn begin_entry(&mut self, field: Field) {
        let readout = self.session.readout();
        let text = match field {
            Field::Volume => readout.volume,
            Field::Tempo => readout.tempo,
            Field::Bpm => readout.bpm,
        };
        self.entry = Some(Entry { field, text });
    }

    /// Send a typed value and move its slider without a change notification
    fn commit(&mut self, entry: Entry) -> Result<(), ControlError> {
        match entry.field {
            Field::Volume => {
                let step = self.session.volume_entered(&entry.text)?;
                self.volume.set_silently(step);
            }
            Field::Tempo => {
                let step = self.session.tempo_entered(&entry.text)?;
                self.tempo.set_silently(step);
            }
            Field::Bpm => {
                let step = self.session.bpm_entered(&entry.text)?;
                self.tempo.set_silently(step);
            }
        }
        Ok(())
    }

    /// Move the focused slider; a changed position goes to the patch
    fn nudge(&mut self, delta: i32) -> Result<(), ControlError> {
        match self.focus {
            Focus::Tempo => {
                if let Some(step) = self.tempo.nudge(delta) {
                    self.session.tempo_step(step)?;
                }
            }
            Focus::Volume => {
                if let Some(step) = self.volume.nudge(delta) {
                    self.session.volume_step(step)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetronomeConfig;
    use crate::mapping::STEP_RANGE;
    use crate::patch::{Message, RecordingSink};
    use approx::assert_relative_eq;

    fn app() -> App<RecordingSink> {
        App::new(Session::new(&MetronomeConfig::default(), RecordingSink::new()))
    }

    fn press(app: &mut App<RecordingSink>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App<RecordingSink>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_sliders_start_at_configured_values() {
        let app = app();
        assert_eq!(app.tempo.step(), app.session.tempo().slider_position());
        assert_eq!(app.volume.step(), app.session.volume().slider_position());
    }

    #[test]
    fn test_arrow_moves_focused_slider() {
        let mut app = app();
        let start = app.tempo.step();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.tempo.step(), start + NUDGE);
        assert_eq!(app.session.tempo().slider_position(), start + NUDGE);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.volume.step(), 0);
        assert_eq!(app.session.volume().value(), 0.0);
    }

    #[test]
    fn test_up_speeds_up_the_beat() {
        let mut app = app();
        let before = app.session.tempo().value();
        press(&mut app, KeyCode::Up);
        assert!(app.session.tempo().value() < before);

        press(&mut app, KeyCode::Home);
        assert_eq!(app.tempo.step(), 0);
        assert_relative_eq!(app.session.tempo().value(), 2000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_shift_moves_one_step() {
        let mut app = app();
        let start = app.tempo.step();
        app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT));
        assert_eq!(app.tempo.step(), start - 1);
    }

    #[test]
    fn test_slider_at_end_sends_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::End);
        let sent = app.session.sink().messages().len();
        press(&mut app, KeyCode::End);
        assert_eq!(app.session.sink().messages().len(), sent);
        assert_eq!(app.tempo.step(), STEP_RANGE);
    }

    #[test]
    fn test_typed_tempo_repositions_silently() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        for _ in 0..10 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "500");
        press(&mut app, KeyCode::Enter);

        assert!(app.entry.is_none());
        assert_eq!(app.session.tempo().value(), 500.0);
        assert_eq!(app.tempo.step(), app.session.tempo().slider_position());
        // exactly one message: the typed value, not a re-sent slider value
        assert_eq!(
            app.session.sink().messages(),
            &[Message::Float {
                dest: "met".to_string(),
                value: 500.0
            }]
        );
    }

    #[test]
    fn test_entry_starts_from_current_reading() {
        let mut app = app();
        press(&mut app, KeyCode::Char('b'));
        let entry = app.entry.clone().unwrap();
        assert_eq!(entry.field, Field::Bpm);
        assert_eq!(entry.text, "60.000");

        press(&mut app, KeyCode::Esc);
        assert!(app.entry.is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_rejected_entry_sets_status() {
        let mut app = app();
        press(&mut app, KeyCode::Char('b'));
        for _ in 0..10 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "0");
        press(&mut app, KeyCode::Enter);

        assert!(app.entry.is_none());
        assert!(app.status.is_some());
        assert_eq!(app.session.tempo().value(), 1000.0);
    }

    #[test]
    fn test_preset_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.session.tempo().value(), 750.0);
        assert_eq!(app.tempo.step(), app.session.tempo().slider_position());

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.status.as_deref(), Some("no preset 9, there are 3"));
    }

    #[test]
    fn test_accent_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('A'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.session.accent(), 13);
        assert_eq!(app.session.sub_accent(), 3);
    }

    #[test]
    fn test_pause_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.is_paused());
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session.is_paused());

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
