//! Pure decision and formatting logic: no I/O.

pub mod policy;
pub mod redact;
pub mod render;

pub use policy::{NotificationDecision, NotificationPolicy, SkipReason};
pub use redact::{SecretRedactor, REDACTED};
pub use render::{cap_content, render_error, render_report, RenderContext, CONTENT_LIMIT};
