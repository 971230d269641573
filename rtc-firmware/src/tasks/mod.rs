// Task-Modul: Enthält alle Embassy Tasks
//
// Der Dispatcher-Task pollt die Uhr, gefeuerte Timer gehen über einen
// Channel an den Log Task (Dispatcher → Log).

pub mod event_log;
pub mod timed_events;

// Re-export Tasks für einfachen Import
pub use event_log::event_log_task;
pub use timed_events::timed_events_task;
