//! Month grid layout and per-date notes, shared by the terminal UI.

pub mod calendar;
