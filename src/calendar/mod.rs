pub mod error;
pub mod event;
pub mod grid;
pub mod store;

pub use error::StoreError;
pub use event::EventRecord;
pub use grid::{MonthLayout, WeekStart};
pub use store::EventStore;
