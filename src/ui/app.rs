use std::mem;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::{DatabaseStore, RecordIndex, StoreError};

use super::forms::NameEditor;
use super::helpers::{centered_rect, describe_load_error, describe_save_error};
use super::input::{Buttons, Directions, InputRepeater, InputSnapshot};
use super::screens::ListNavigator;

const TITLE: &str = "Profile Name Editor";
const BROWSE_HELP: &str = "D-Pad to select, A to rename, + to save, HOME to exit";
const RENAME_HELP: &str =
    "Left/Right to move cursor, Up/Down to change letter,\nA to confirm, B to cancel, HOME to exit";
const KEY_LEGEND: &str = "Arrows=D-Pad  Enter=A  Backspace=B  +=Save  Esc=HOME  Ctrl-C=Reset";

/// What the app is doing this frame.
enum Mode {
    Browsing,
    Renaming(NameEditor),
    /// "Saving..." is on screen; the write happens on the next frame.
    Saving,
    /// A message waiting for any button before returning to the list.
    Notice(StatusMessage),
    /// The database could not be loaded; only exit is accepted.
    Fatal(String),
}

/// Notice text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state, advanced one frame at a time by `step`.
pub struct App {
    store: Option<DatabaseStore>,
    navigator: ListNavigator,
    repeater: InputRepeater,
    mode: Mode,
    /// Names inside the list window, rebuilt only when the window changes.
    rows: Vec<String>,
    window_rebuilds: usize,
    /// Directions held on the previous frame, for edge detection.
    last_held: Directions,
    quit: bool,
}

impl App {
    pub fn new(store: DatabaseStore) -> Self {
        let index = RecordIndex::build(store.image());
        tracing::info!(profiles = index.len(), "profile list ready");
        let mut app = Self {
            store: Some(store),
            navigator: ListNavigator::new(index),
            repeater: InputRepeater::new(),
            mode: Mode::Browsing,
            rows: Vec::new(),
            window_rebuilds: 0,
            last_held: Directions::empty(),
            quit: false,
        };
        app.refresh_rows();
        app
    }

    /// An app that only reports why the database could not be loaded.
    pub fn failed(err: &StoreError) -> Self {
        tracing::error!(error = %err, "could not load profile database");
        Self {
            store: None,
            navigator: ListNavigator::new(RecordIndex::default()),
            repeater: InputRepeater::new(),
            mode: Mode::Fatal(describe_load_error(err)),
            rows: Vec::new(),
            window_rebuilds: 0,
            last_held: Directions::empty(),
            quit: false,
        }
    }

    pub fn store(&self) -> Option<&DatabaseStore> {
        self.store.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Process one frame of input. A quit request is honoured after the
    /// frame completes, in every mode.
    pub fn step(&mut self, input: InputSnapshot) {
        if input.quit_requested() {
            tracing::info!(reset = input.reset, "exit requested");
            self.quit = true;
        }
        let tapped = input.held.newly_pressed(self.last_held);
        self.last_held = input.held;

        let mode = mem::replace(&mut self.mode, Mode::Browsing);
        self.mode = match mode {
            Mode::Browsing => self.step_browsing(input),
            Mode::Renaming(editor) => self.step_renaming(input, editor),
            Mode::Saving => self.perform_save(),
            Mode::Notice(message) => {
                if input.pressed.any() || !tapped.is_empty() {
                    self.refresh_rows();
                    Mode::Browsing
                } else {
                    Mode::Notice(message)
                }
            }
            Mode::Fatal(text) => Mode::Fatal(text),
        };

        // No frame follows an exit, so a pending save is written now.
        if self.quit && matches!(self.mode, Mode::Saving) {
            self.mode = self.perform_save();
        }
    }

    fn step_browsing(&mut self, input: InputSnapshot) -> Mode {
        if input.pressed.contains(Buttons::SAVE) {
            return Mode::Saving;
        }
        if input.pressed.contains(Buttons::CONFIRM) {
            if let Some(mode) = self.open_editor() {
                return mode;
            }
        }

        let fired = self.repeater.step(input.held);
        if self.navigator.move_by(fired.vertical()) {
            self.refresh_rows();
        }
        Mode::Browsing
    }

    fn open_editor(&self) -> Option<Mode> {
        let slot = self.navigator.selected()?;
        let name = self.store.as_ref()?.image().name(slot);
        let mode = match NameEditor::open(slot, &name) {
            Ok(editor) => Mode::Renaming(editor),
            Err(err) => Mode::Notice(StatusMessage {
                text: err.to_string(),
                kind: StatusKind::Error,
            }),
        };
        Some(mode)
    }

    fn step_renaming(&mut self, input: InputSnapshot, mut editor: NameEditor) -> Mode {
        if input.pressed.contains(Buttons::CONFIRM) {
            let (slot, name) = editor.confirm();
            if let Some(store) = self.store.as_mut() {
                store.commit_name(slot, &name);
            }
            self.refresh_rows();
            return Mode::Browsing;
        }
        if input.pressed.contains(Buttons::CANCEL) {
            editor.cancel();
            self.refresh_rows();
            return Mode::Browsing;
        }

        let fired = self.repeater.step(input.held);
        editor.apply(fired);
        Mode::Renaming(editor)
    }

    fn perform_save(&mut self) -> Mode {
        let Some(store) = self.store.as_mut() else {
            return Mode::Browsing;
        };
        let message = match store.save() {
            Ok(()) => StatusMessage {
                text: "Done!".to_string(),
                kind: StatusKind::Info,
            },
            Err(err) => {
                tracing::error!(error = %err, "save failed");
                StatusMessage {
                    text: describe_save_error(&err),
                    kind: StatusKind::Error,
                }
            }
        };
        Mode::Notice(message)
    }

    fn refresh_rows(&mut self) {
        let Some(store) = self.store.as_ref() else {
            self.rows.clear();
            return;
        };
        self.rows = self
            .navigator
            .visible()
            .iter()
            .map(|&slot| store.image().name(slot).to_string())
            .collect();
        self.window_rebuilds += 1;
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.draw_header(frame, layout[0]);
        let help = match self.mode {
            Mode::Browsing => BROWSE_HELP,
            Mode::Renaming(_) => RENAME_HELP,
            _ => "",
        };
        frame.render_widget(Paragraph::new(help), layout[1]);

        match &self.mode {
            Mode::Browsing => self.draw_list(frame, layout[2]),
            Mode::Renaming(editor) => self.draw_editor(frame, layout[2], editor),
            Mode::Saving => frame.render_widget(Paragraph::new("Saving... "), layout[2]),
            Mode::Notice(message) => self.draw_notice(frame, layout[2], message),
            Mode::Fatal(text) => self.draw_fatal(frame, area, text),
        }

        frame.render_widget(
            Paragraph::new(KEY_LEGEND).style(Style::default().fg(Color::DarkGray)),
            layout[3],
        );
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(store) = &self.store {
            lines.push(Line::from(Span::styled(
                store.path().display().to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new("No profiles found in this database.")
                    .style(Style::default().fg(Color::DarkGray)),
                area,
            );
            return;
        }

        let marker_row = self.navigator.marker_row();
        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, name)| {
                if row == marker_row {
                    Line::from(vec![
                        Span::raw(">"),
                        Span::styled(name.as_str(), Style::default().fg(Color::Yellow)),
                    ])
                } else {
                    Line::from(format!(" {name}"))
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect, editor: &NameEditor) {
        let [field, caret] = editor.build_lines();
        let mut lines = vec![field, caret, Line::from("")];
        if let Some(store) = &self.store {
            let creator = store.image().creator_name(editor.slot());
            lines.push(Line::from(Span::styled(
                format!(
                    "Slot {}, created by {creator}, {} of 10 characters",
                    editor.slot(),
                    editor.len()
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, message: &StatusMessage) {
        let mut lines: Vec<Line> = message
            .text
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), message.kind.style())))
            .collect();
        lines.push(Line::from("Press any key to return."));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn draw_fatal(&self, frame: &mut Frame, area: Rect, text: &str) {
        let popup = centered_rect(80, 50, area);
        let mut lines: Vec<Line> = text
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Yellow))))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from("Press HOME or RESET to exit."));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .title(" ERROR ")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Blue).fg(Color::White)),
                ),
            popup,
        );
    }
}
