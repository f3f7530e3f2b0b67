pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod transport;

pub use config::Config;
pub use domain::{
    Address, ChainId, ChainMeta, ChainRegistry, FixedPointAmount, Projection, Report, ReportId,
    ReportSummary, Settled, SettledOutcome, Severity,
};
pub use engine::{NotificationPolicy, SecretRedactor, SkipReason};
pub use error::NotifierError;
pub use orchestration::{DispatchOutcome, ErrorContext, NotificationDispatcher};
pub use transport::{DiscordWebhookTransport, MockTransport, Transport, TransportError};
