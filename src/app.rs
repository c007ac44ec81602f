use chrono::{Duration, Local, NaiveDate};
use log::{error, warn};

use crate::calendar::grid::{first_of_month, shift_month};
use crate::calendar::{EventRecord, EventStore, MonthLayout, StoreError, WeekStart};
use crate::components::event_form::EventFormState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Editor,
}

/// Everything the UI shows, and the store it edits.
pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub today: NaiveDate,
    /// Always day 1 of the displayed month.
    pub current_month: NaiveDate,
    pub selected_date: NaiveDate,
    pub layout: MonthLayout,
    /// Notes of the displayed month, ascending by date.
    pub month_entries: Vec<(NaiveDate, EventRecord)>,
    pub form_state: Option<EventFormState>,
    pub status_message: Option<String>,
    pub show_help: bool,
    /// Set while the document lags behind the in-memory notes.
    pub save_failed: bool,
    /// A `q` was refused because of `save_failed`; the next one quits.
    quit_pending: bool,
    week_start: WeekStart,
    store: EventStore,
}

impl App {
    pub fn new(store: EventStore, week_start: WeekStart) -> Self {
        Self::with_today(store, week_start, Local::now().date_naive())
    }

    pub fn with_today(store: EventStore, week_start: WeekStart, today: NaiveDate) -> Self {
        let current_month = first_of_month(today);
        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            today,
            current_month,
            selected_date: today,
            layout: MonthLayout::for_date(current_month, week_start),
            month_entries: Vec::new(),
            form_state: None,
            status_message: None,
            show_help: false,
            save_failed: false,
            quit_pending: false,
            week_start,
            store,
        };
        app.refresh_month();
        app
    }

    pub fn selected_record(&self) -> Option<&EventRecord> {
        self.store.get(self.selected_date)
    }

    /// Recomputes the layout and the month listing. Called after every month
    /// change and every store mutation.
    pub fn refresh_month(&mut self) {
        self.layout = MonthLayout::for_date(self.current_month, self.week_start);
        self.month_entries = self
            .store
            .list_for_month(self.layout.year, self.layout.month)
            .into_iter()
            .map(|(date, record)| (date, record.clone()))
            .collect();
    }

    // ── Navigation ──

    pub fn next_month(&mut self) {
        self.move_month(1);
    }

    pub fn prev_month(&mut self) {
        self.move_month(-1);
    }

    fn move_month(&mut self, delta: i32) {
        if let Some(first) = shift_month(self.current_month, delta) {
            self.current_month = first;
            self.selected_date = first;
            self.refresh_month();
        }
    }

    pub fn next_day(&mut self) {
        self.select(self.selected_date.succ_opt());
    }

    pub fn prev_day(&mut self) {
        self.select(self.selected_date.pred_opt());
    }

    pub fn next_week(&mut self) {
        self.select(self.selected_date.checked_add_signed(Duration::weeks(1)));
    }

    pub fn prev_week(&mut self) {
        self.select(self.selected_date.checked_sub_signed(Duration::weeks(1)));
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.select(Some(self.today));
    }

    /// Selects a day of the displayed month, as when clicking its cell.
    pub fn select_day(&mut self, day: u32) {
        self.select(self.layout.date(day));
    }

    fn select(&mut self, date: Option<NaiveDate>) {
        let Some(date) = date else {
            return;
        };
        self.selected_date = date;
        if !self.layout.contains(date) {
            self.current_month = first_of_month(date);
            self.refresh_month();
        }
    }

    // ── Editing ──

    pub fn open_editor(&mut self) {
        self.form_state = Some(EventFormState::new(
            self.selected_date,
            self.store.get(self.selected_date),
        ));
        self.input_mode = InputMode::Editor;
    }

    pub fn close_editor(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    /// Stores the editor contents. An invalid colour keeps the editor open.
    pub fn submit_editor(&mut self) {
        let Some(form) = self.form_state.as_mut() else {
            return;
        };
        let color = match form.color_value() {
            Ok(color) => color,
            Err(msg) => {
                warn!("event=editor_submit status=rejected reason=\"{}\"", msg);
                form.error = Some(msg);
                return;
            }
        };
        let date = form.date;
        let text = form.text.clone();
        self.close_editor();

        let result = self.store.upsert(date, text, color);
        self.report_save(result, format!("Saved note for {}", date.format("%b %d")));
        self.refresh_month();
    }

    pub fn delete_selected(&mut self) {
        let date = self.selected_date;
        if self.store.get(date).is_none() {
            self.status_message = Some("No note on this day".to_string());
            return;
        }
        let result = self.store.delete(date).map(|_| ());
        self.report_save(result, format!("Deleted note for {}", date.format("%b %d")));
        self.refresh_month();
    }

    /// Removes the colour tag of the selected day, keeping its text.
    pub fn clear_color(&mut self) {
        let date = self.selected_date;
        let Some(text) = self.store.get(date).map(|r| r.text.clone()) else {
            return;
        };
        let result = self.store.upsert(date, text, None);
        self.report_save(result, "Color cleared".to_string());
        self.refresh_month();
    }

    /// Rewrites the document after an earlier save failed.
    pub fn retry_save(&mut self) {
        let result = self.store.save();
        let ok_msg = format!("Saved {}", self.store.path().display());
        self.report_save(result, ok_msg);
    }

    /// Re-reads the document, dropping in-memory notes. Refused while a save
    /// is pending since that would lose the unsaved change.
    pub fn reload_notes(&mut self) {
        if self.save_failed {
            self.status_message = Some("Unsaved changes: s to retry before reloading".to_string());
            return;
        }
        self.status_message = Some(match self.store.reload() {
            Ok(()) => format!("Reloaded {} notes", self.store.len()),
            Err(e) => {
                warn!("event=reload_failed load_failure={} error=\"{}\"", e.is_load_failure(), e);
                format!("Reload failed: {}", e)
            }
        });
        self.refresh_month();
    }

    /// Stops the loop, unless a save is pending: then the first request only
    /// warns and a second one quits.
    pub fn request_quit(&mut self) {
        if self.save_failed && !self.quit_pending {
            warn!("event=quit_refused reason=save_failed");
            self.quit_pending = true;
            self.status_message = Some("Unsaved changes: s to retry, q again to quit".to_string());
            return;
        }
        self.running = false;
    }

    fn report_save(&mut self, result: Result<(), StoreError>, ok_msg: String) {
        self.save_failed = result.is_err();
        self.quit_pending = false;
        self.status_message = Some(match result {
            Ok(()) => ok_msg,
            Err(e) => {
                error!("event=save_failed error=\"{}\"", e);
                format!("Not saved: {} (s to retry)", e)
            }
        });
    }

    // ── Editor input passthrough ──

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.form_state {
            form.input_char(c);
        }
    }

    pub fn form_newline(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.newline();
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.backspace();
        }
    }

    pub fn form_next_field(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.next_field();
        }
    }

    pub fn form_cycle_color(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form_state {
            form.cycle_color(forward);
        }
    }
}
