use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{EventRecord, MonthLayout};
use crate::theme;

const CELL_WIDTH: usize = 5;

pub struct MonthView;

impl MonthView {
    /// Draws `layout` with `entries` (the month's notes, ascending by date)
    /// as cell decorations.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        layout: &MonthLayout,
        selected_date: NaiveDate,
        today: NaiveDate,
        entries: &[(NaiveDate, EventRecord)],
    ) {
        let theme = theme::current();
        let title = format!(" {} {} ", month_name(layout.month), layout.year);

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Header row
        let header_cells: Vec<Span> = layout
            .week_start
            .day_labels()
            .iter()
            .enumerate()
            .map(|(col, d)| {
                let style = if layout.week_start.is_weekend_column(col as u32) {
                    theme.header.patch(theme.weekend)
                } else {
                    theme.header
                };
                Span::styled(format!("{:^width$}", d, width = CELL_WIDTH), style)
            })
            .collect();
        let header = Line::from(header_cells);

        let weeks: Vec<Line> = layout
            .weeks()
            .iter()
            .map(|week| {
                let cells: Vec<Span> = week
                    .iter()
                    .enumerate()
                    .map(|(col, day)| match day.and_then(|d| layout.date(d)) {
                        Some(date) => day_cell(layout, col as u32, date, selected_date, today, entries),
                        None => Span::raw(" ".repeat(CELL_WIDTH)),
                    })
                    .collect();
                Line::from(cells)
            })
            .collect();

        // Day rows sit one row below the weekday labels.
        let mut constraints = vec![Constraint::Length(1)];
        for _ in &weeks {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0)); // fill remaining

        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

impl MonthView {
    /// Day of the month drawn at terminal position `(x, y)` when the view
    /// occupies `area`.
    pub fn day_at(area: Rect, layout: &MonthLayout, x: u16, y: u16) -> Option<u32> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if x < inner.x || y <= inner.y || x >= inner.x + inner.width {
            return None;
        }
        let column = usize::from(x - inner.x) / CELL_WIDTH;
        let row = usize::from(y - inner.y - 1);
        layout.weeks().get(row)?.get(column).copied().flatten()
    }
}

fn day_cell(
    layout: &MonthLayout,
    column: u32,
    date: NaiveDate,
    selected_date: NaiveDate,
    today: NaiveDate,
    entries: &[(NaiveDate, EventRecord)],
) -> Span<'static> {
    let theme = theme::current();
    let record = entries
        .binary_search_by_key(&date, |(d, _)| *d)
        .ok()
        .map(|i| &entries[i].1);

    let marker = if record.is_some() { '*' } else { ' ' };
    let text = format!(" {:>2}{} ", date.day(), marker);

    let base = if layout.week_start.is_weekend_column(column) {
        theme.weekend
    } else {
        Style::default()
    };
    let base = match record.and_then(|r| theme.note_style(r.color.as_deref())) {
        Some(tag) => base.patch(tag),
        None => base,
    };

    let style = if date == today && date == selected_date {
        theme.selected.patch(theme.today).add_modifier(Modifier::BOLD)
    } else if date == selected_date {
        theme.selected
    } else if date == today {
        base.patch(theme.today)
    } else {
        base
    };

    Span::styled(text, style)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
