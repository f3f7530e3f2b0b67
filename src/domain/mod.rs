//! Domain types for batch-run notifications.
//!
//! This module provides:
//! - Exact fixed-point token amounts
//! - Settled outcomes of async sub-operations and safe projection over them
//! - Report summaries with severity classification
//! - Harvest and unwrap reports, and per-chain display metadata

pub mod amount;
pub mod chain;
pub mod outcome;
pub mod primitives;
pub mod report;
pub mod summary;

pub use amount::{
    format_raw, percentage_of, AmountError, FixedPointAmount, DEFAULT_PERCENT_PRECISION,
    DISPLAY_DIGITS, NATIVE_SCALE,
};
pub use chain::{ChainId, ChainMeta, ChainRegistry};
pub use outcome::{project, try_project, Projection, Settled, SettledOutcome, UNAVAILABLE};
pub use primitives::{Address, ReportId};
pub use report::{
    AttentionLine, Balances, HarvestItem, HarvestReport, Report, ReportLoadError, UnwrapReport,
    UnwrapStep,
};
pub use summary::{
    classify, HarvestSummary, ItemStatus, ReportSummary, Severity, StatusCounts, UnwrapSummary,
};
