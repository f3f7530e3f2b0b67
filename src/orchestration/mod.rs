pub mod dispatcher;

pub use dispatcher::{DispatchOutcome, ErrorContext, NotificationDispatcher};
