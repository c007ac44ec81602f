use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::calendar::EventRecord;
use crate::theme;

/// Side panel listing the displayed month's notes.
pub struct NoteList;

impl NoteList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        entries: &[(NaiveDate, EventRecord)],
        selected_date: NaiveDate,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 20 {
            format!(" Notes ({}) ", entries.len())
        } else {
            " Notes ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if entries.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No notes this month").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = entries
            .iter()
            .map(|(date, record)| {
                let swatch = theme
                    .note_style(record.color.as_deref())
                    .unwrap_or_default();
                let is_selected = *date == selected_date;

                let date_style = if is_selected {
                    theme.selected
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let (text, text_style) = match placeholder(record) {
                    Some(label) => (label.to_string(), theme.dim),
                    None => {
                        let first = record.text.trim_start().lines().next().unwrap_or("");
                        (truncate(first, inner_w.saturating_sub(11)), Style::default())
                    }
                };

                ListItem::new(Line::from(vec![
                    Span::styled(" ", swatch),
                    Span::styled(format!(" {} ", date.format("%a %d")), date_style),
                    Span::raw(" "),
                    Span::styled(text, text_style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

/// Stand-in text for notes with nothing to summarize.
fn placeholder(record: &EventRecord) -> Option<&'static str> {
    if record.is_blank() {
        Some("(empty)")
    } else if record.text.trim().is_empty() {
        Some("(color tag)")
    } else {
        None
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}
