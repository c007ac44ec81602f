use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::calendar::EventRecord;
use crate::theme::{self, PALETTE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Text,
    Color,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Text => FormField::Color,
            FormField::Color => FormField::Text,
        }
    }
}

/// Editor state for the note of one date.
#[derive(Debug, Clone)]
pub struct EventFormState {
    pub date: NaiveDate,
    pub text: String,
    pub color: String,
    pub active_field: FormField,
    pub error: Option<String>,
    pub is_new: bool,
}

impl EventFormState {
    pub fn new(date: NaiveDate, existing: Option<&EventRecord>) -> Self {
        Self {
            date,
            text: existing.map(|r| r.text.clone()).unwrap_or_default(),
            color: existing
                .and_then(|r| r.color.clone())
                .unwrap_or_default(),
            active_field: FormField::Text,
            error: None,
            is_new: existing.is_none(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.error = None;
        match self.active_field {
            FormField::Text => self.text.push(c),
            FormField::Color => self.color.push(c),
        }
    }

    /// Line break in the note. The colour field is a single token, so it
    /// ignores this.
    pub fn newline(&mut self) {
        if self.active_field == FormField::Text {
            self.input_char('\n');
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        match self.active_field {
            FormField::Text => {
                self.text.pop();
            }
            FormField::Color => {
                self.color.pop();
            }
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
    }

    /// Steps through [`PALETTE`]. A colour not in the palette restarts the
    /// cycle from "no colour".
    pub fn cycle_color(&mut self, forward: bool) {
        self.error = None;
        let current = self.color.trim().to_lowercase();
        let len = PALETTE.len();
        let next = match PALETTE.iter().position(|c| *c == current) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 1,
            None => len - 1,
        };
        self.color = PALETTE[next].to_string();
    }

    /// The colour to store: `None` for an empty field, an error for text that
    /// is neither `#rrggbb` nor a known colour name.
    pub fn color_value(&self) -> Result<Option<String>, String> {
        let color = self.color.trim();
        if color.is_empty() {
            return Ok(None);
        }
        match theme::parse_color(color) {
            Some(_) => Ok(Some(color.to_string())),
            None => Err(format!("Unknown color '{}'", color)),
        }
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        // Center the form popup
        let form_w = area.width.min(56).max(30);
        let form_h = area.height.min(9).max(7);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let verb = if state.is_new { "New note" } else { "Edit note" };
        let block = Block::default()
            .title(format!(" {} \u{2013} {} ", verb, state.date.format("%a %b %d, %Y")))
            .title_style(Style::default().fg(ratatui::style::Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ratatui::style::Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // text
            Constraint::Length(1), // color
            Constraint::Length(1), // error
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let note = state.text.replace('\n', " \u{21b5} ");
        render_field(frame, rows[0], "Note:", &note, state.active_field == FormField::Text, None);

        let swatch = state
            .color_value()
            .ok()
            .flatten()
            .and_then(|c| theme::current().note_style(Some(c.as_str())));
        let color_label = if state.color.is_empty() && state.active_field != FormField::Color {
            "none"
        } else {
            state.color.as_str()
        };
        render_field(frame, rows[1], "Color:", color_label, state.active_field == FormField::Color, swatch);

        if let Some(ref err) = state.error {
            frame.render_widget(Paragraph::new(err.as_str()).style(theme::ERROR_STYLE), rows[2]);
        }

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Field ", theme::current().dim),
            Span::styled("\u{2190}/\u{2192}", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Color ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme::current().dim),
            Span::styled("Alt+Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Line ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[4]);
    }
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    swatch: Option<Style>,
) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(format!("{:<7}", label), theme::current().dim)];
    if let Some(swatch) = swatch {
        spans.push(Span::styled("  ", swatch));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(format!("{}{}", value, cursor), style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
