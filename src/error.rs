use crate::config::ConfigError;
use crate::domain::{AmountError, ReportLoadError};
use thiserror::Error;

/// Failures that indicate a defect or bad input rather than a delivery problem.
///
/// Transport failures are not represented here: they are reported through
/// `DispatchOutcome::Failed` and never abort the caller.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
    #[error("Report error: {0}")]
    Report(#[from] ReportLoadError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
