//! Delayed thread actions.

mod closure;

pub use closure::{CloseListener, ClosureSchedule, ClosureScheduler};
