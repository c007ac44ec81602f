mod app;
mod components;
mod config;
mod input;
mod logging;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, InputMode};
use calendar_notes::calendar::{self, EventStore};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use config::{Config, EVENTS_FILE_ENV};
use crossterm::event::{KeyCode, KeyModifiers};
use input::InputEvent;
use ratatui::layout::{Constraint, Layout, Rect};

/// Month grid: 7 cells of 5 columns plus borders.
const MONTH_WIDTH: u16 = 37;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;

    let level = config
        .log
        .level
        .clone()
        .unwrap_or_else(|| logging::default_level().to_string());
    match config.log_dir() {
        Some(dir) => {
            if let Err(e) = logging::init(&level, &dir) {
                eprintln!("Logging disabled: {e}");
            }
        }
        None => eprintln!("Logging disabled: no data directory"),
    }

    theme::init(&config.theme);

    let events_path = config.events_path(std::env::var_os(EVENTS_FILE_ENV).map(PathBuf::from));
    // A document that exists but cannot be read stops startup here, before
    // anything could overwrite it.
    let store = match EventStore::load(&events_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!(
                "event=app_exit status=error load_failure={} error=\"{}\"",
                e.is_load_failure(),
                e
            );
            logging::flush();
            return Err(e).wrap_err_with(|| {
                format!(
                    "failed to load notes from {}; fix or move the file and restart",
                    events_path.display()
                )
            });
        }
    };

    let mut app = App::new(store, config.week_start);

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    let restored = tui::restore();
    log::info!("event=app_exit status={}", if result.is_ok() { "ok" } else { "error" });
    logging::flush();
    restored?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut month_area = Rect::default();

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: content + status bar
            let layout = Layout::vertical([
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

            month_area = render_main(frame, layout[0], app);

            // Render editor overlay
            if let Some(ref form) = app.form_state {
                components::EventForm::render(frame, area, form);
            }

            // Render help overlay
            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(frame, layout[1], app);
        })?;

        let Some(input) = input::next_input(Duration::from_millis(100))? else {
            continue;
        };

        match input {
            InputEvent::Key(key) => {
                // Clear status message on any key, unless a save is still pending
                if !app.save_failed {
                    app.status_message = None;
                }

                // Help overlay takes priority
                if app.show_help {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                        app.show_help = false;
                    }
                    continue;
                }

                match app.input_mode {
                    InputMode::Editor => handle_editor_input(app, key.code, key.modifiers),
                    InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
                }
            }
            InputEvent::Click { x, y } => {
                if app.input_mode == InputMode::Normal && !app.show_help {
                    if let Some(day) = components::MonthView::day_at(month_area, &app.layout, x, y) {
                        app.select_day(day);
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) => app.request_quit(),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.running = false,
        (KeyCode::Char('r'), _) => app.reload_notes(),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Enter, _) | (KeyCode::Char('e'), _) | (KeyCode::Char('n'), _) => {
            app.open_editor()
        }
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => app.delete_selected(),
        (KeyCode::Char('c'), _) => app.clear_color(),
        (KeyCode::Char('s'), _) => app.retry_save(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.prev_week(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.next_week(),
        (KeyCode::Char('['), _) | (KeyCode::Char('<'), _) | (KeyCode::PageUp, _) => {
            app.prev_month()
        }
        (KeyCode::Char(']'), _) | (KeyCode::Char('>'), _) | (KeyCode::PageDown, _) => {
            app.next_month()
        }
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_editor_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let on_color = app
        .form_state
        .as_ref()
        .is_some_and(|f| f.active_field == components::event_form::FormField::Color);

    match code {
        KeyCode::Esc => app.close_editor(),
        KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => app.form_newline(),
        KeyCode::Char('j') if modifiers.contains(KeyModifiers::CONTROL) => app.form_newline(),
        KeyCode::Enter => app.submit_editor(),
        KeyCode::Tab | KeyCode::BackTab => app.form_next_field(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Left if on_color => app.form_cycle_color(false),
        KeyCode::Right if on_color => app.form_cycle_color(true),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

/// Draws the month grid and, when there is room, the notes panel. Returns
/// the area of the month grid for click handling.
fn render_main(frame: &mut ratatui::Frame, area: Rect, app: &App) -> Rect {
    let (month, notes) = if area.width < MONTH_WIDTH + 20 {
        (area, None)
    } else {
        let content = Layout::horizontal([
            Constraint::Length(MONTH_WIDTH),
            Constraint::Min(20),
        ])
        .split(area);
        (content[0], Some(content[1]))
    };

    components::MonthView::render(
        frame,
        month,
        &app.layout,
        app.selected_date,
        app.today,
        &app.month_entries,
    );

    if let Some(notes) = notes {
        components::NoteList::render(frame, notes, &app.month_entries, app.selected_date);
    }

    month
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.min(52).max(30);
    let popup_h = area.height.min(22).max(12);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let dim = theme::current().dim;
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<11}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        Line::from(vec![
            Span::styled("  h/l ", key_style),
            Span::styled("or ", dim),
            Span::styled("\u{2190}/\u{2192}  ", key_style),
            Span::raw("Previous/next day"),
        ]),
        Line::from(vec![
            Span::styled("  k/j ", key_style),
            Span::styled("or ", dim),
            Span::styled("\u{2191}/\u{2193}  ", key_style),
            Span::raw("Previous/next week"),
        ]),
        entry("[/] <</>>", "Previous/next month"),
        entry("t", "Jump to today"),
        entry("click", "Select a day"),
        Line::from(""),
        Line::from(Span::styled("Notes", section_style)),
        entry("Enter/e", "Add or edit note"),
        entry("d", "Delete note"),
        entry("c", "Remove color tag"),
        entry("Alt+Enter", "New line in note"),
        entry("s", "Retry saving"),
        entry("r", "Reload notes from disk"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", dim),
            Span::styled("Esc      ", key_style),
            Span::raw("Quit / close popup"),
        ]),
        Line::from(Span::styled("  q twice quits with an unsaved change", dim)),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
