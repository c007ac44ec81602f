use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let w = area.width as usize;
        let status = theme::current().status;

        let mode_str = match app.input_mode {
            InputMode::Normal => "[Calendar]",
            InputMode::Editor => "[Editing]",
        };

        // Show status message if present, otherwise show context-aware hints
        let (right_text, right_style) = match app.status_message {
            Some(ref msg) if app.save_failed => (format!(" {} ", msg), theme::ERROR_STYLE),
            Some(ref msg) => (format!(" {} ", msg), status),
            None => (hints(app, w).to_string(), status),
        };

        let left = format!(" {} {} ", mode_str, app.selected_date.format("%Y-%m-%d"));
        let padding_len = w.saturating_sub(left.len() + right_text.chars().count());

        let line = Line::from(vec![
            Span::styled(left, status),
            Span::styled(" ".repeat(padding_len), status),
            Span::styled(right_text, right_style),
        ]);

        frame.render_widget(Paragraph::new(line).style(status), area);
    }
}

fn hints(app: &App, w: usize) -> &'static str {
    match app.input_mode {
        InputMode::Editor => " Tab:Field Enter:Save Alt+Enter:Line Esc:Cancel",
        InputMode::Normal if w >= 80 => {
            if app.selected_record().is_some() {
                " hjkl:Nav [/]:Month t:Today Enter:Edit d:Delete c:Uncolor ?:Help q:Quit"
            } else {
                " hjkl:Nav [/]:Month t:Today Enter:Add note ?:Help q:Quit"
            }
        }
        InputMode::Normal if w >= 50 => " arrows:Nav [/]:Month Enter:Edit q:Quit",
        InputMode::Normal => " ?:Help q:Quit",
    }
}
