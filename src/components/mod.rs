pub mod event_form;
pub mod month_view;
pub mod note_list;
pub mod status_bar;

pub use event_form::EventForm;
pub use month_view::MonthView;
pub use note_list::NoteList;
pub use status_bar::StatusBar;
