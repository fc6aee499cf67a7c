use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::db::StoreError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the fatal error panel.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Operator-facing text for a load failure, with the raw code appended.
pub(crate) fn describe_load_error(err: &StoreError) -> String {
    let headline = match err {
        StoreError::Io { .. } => "Could not open the profile database.",
        _ => "Error reading the profile database.",
    };
    format!("{headline}\n{err}{}", code_suffix(err))
}

/// Operator-facing text for a save failure, with the raw code appended.
pub(crate) fn describe_save_error(err: &StoreError) -> String {
    let headline = match err {
        StoreError::ShortWrite { .. } => "Failed to write the database, it may have been corrupted!",
        _ => "Could not open the database, save aborted!",
    };
    format!("{headline}\n{err}{}", code_suffix(err))
}

fn code_suffix(err: &StoreError) -> String {
    err.code()
        .map(|code| format!("\nError code: {code}"))
        .unwrap_or_default()
}
