//! Terminal front end
//!
//! Shows the metronome controls:
//! - Tempo and volume sliders
//! - Tempo in ms per beat and BPM, volume
//! - Accent, sub-accent and pause state
//! - Preset buttons

mod app;
mod slider;
mod widget;

pub use app::{App, Entry, Field, Focus};
pub use slider::Slider;
pub use widget::VerticalSlider;

use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::patch::PatchSink;

/// Run the terminal UI until the user quits
pub fn run<S: PatchSink>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    // Cleanup, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<S: PatchSink>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}

fn draw_ui<S: PatchSink>(f: &mut Frame, app: &App<S>) {
    let area = f.area();

    // Layout: controls on top, presets, then status
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Sliders and readouts
            Constraint::Length(3), // Presets
            Constraint::Length(3), // Status
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    let readout = app.session.readout();
    draw_slider(f, columns[0], " Tempo ", &readout.tempo, app.tempo, app.focus == Focus::Tempo);
    draw_center(f, columns[1], app, &readout.bpm);
    draw_slider(f, columns[2], " Volume ", &readout.volume, app.volume, app.focus == Focus::Volume);

    draw_presets(f, rows[1], app);
    draw_status(f, rows[2], app);
}

fn draw_slider(f: &mut Frame, area: Rect, title: &str, reading: &str, slider: Slider, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title.to_string());

    // reading sits under the boxed track
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let widget = VerticalSlider::new(slider.fraction())
        .style(Style::default().fg(Color::Green))
        .track_style(Style::default().fg(Color::DarkGray))
        .block(block);
    f.render_widget(widget, parts[0]);

    let label = Paragraph::new(reading.to_string()).alignment(Alignment::Center);
    f.render_widget(label, parts[1]);
}

fn draw_center<S: PatchSink>(f: &mut Frame, area: Rect, app: &App<S>, bpm: &str) {
    let session = &app.session;
    let (state, state_color) = if session.is_paused() {
        ("PAUSED", Color::Yellow)
    } else {
        ("PLAYING", Color::Green)
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled("BPM", bold)),
        Line::from(bpm.to_string()),
        Line::from(""),
        Line::from(Span::styled(state, Style::default().fg(state_color))),
        Line::from(""),
        Line::from(Span::styled("Accent", bold)),
        Line::from(session.accent().to_string()),
        Line::from(""),
        Line::from(Span::styled("Sub-Accent", bold)),
        Line::from(session.sub_accent().to_string()),
    ];

    if let Some(entry) = &app.entry {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", entry.field.label()), bold),
            Span::styled(format!("{}_", entry.text), Style::default().fg(Color::Cyan)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_presets<S: PatchSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut spans = vec![Span::raw("  ")];
    for (i, ms) in app.session.presets().iter().enumerate() {
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, ms),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Presets (ms) "));
    f.render_widget(paragraph, area);
}

fn draw_status<S: PatchSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let text = match &app.status {
        Some(message) => Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(
            "  ←→: slider  ↑↓: move  t/b/v: type  a/A s/S: accents  r: reset  Space: pause  q: quit",
        ),
    };

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
