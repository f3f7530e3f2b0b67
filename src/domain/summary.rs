//! Aggregated report counters and severity classification.

use crate::domain::amount::{AmountError, FixedPointAmount, NATIVE_SCALE};
use crate::domain::outcome::Settled;
use crate::domain::report::{Balances, HarvestItem, UnwrapStep};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification level. Ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single strategy harvest or unwrap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[serde(alias = "harvested")]
    Success,
    Skipped,
    Error,
    Warning,
    Notice,
}

impl ItemStatus {
    /// Statuses that get their own detail line in the notification.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            ItemStatus::Error | ItemStatus::Warning | ItemStatus::Notice
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Success => "success",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Error => "error",
            ItemStatus::Warning => "warning",
            ItemStatus::Notice => "notice",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default)]
    pub error: u32,
    #[serde(default)]
    pub warning: u32,
    #[serde(default)]
    pub notice: u32,
    #[serde(default)]
    pub info: u32,
}

impl StatusCounts {
    /// Count a terminal status. Success and skipped are tracked by the caller.
    pub fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Error => self.error += 1,
            ItemStatus::Warning => self.warning += 1,
            ItemStatus::Notice => self.notice += 1,
            ItemStatus::Success | ItemStatus::Skipped => {}
        }
    }

    pub fn terminal(&self) -> u32 {
        self.error + self.warning + self.notice
    }

    pub fn severity(&self) -> Severity {
        classify(self)
    }
}

/// Error dominates warning dominates info. No other counter matters.
pub fn classify(statuses: &StatusCounts) -> Severity {
    if statuses.error > 0 {
        Severity::Error
    } else if statuses.warning > 0 {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Counters and financial totals shared by every report kind.
///
/// Profit fields are `None` when either balance read is unavailable; they are never
/// defaulted to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub statuses: StatusCounts,
    pub gas_used: FixedPointAmount,
    #[serde(default)]
    pub profit_native: Option<FixedPointAmount>,
    #[serde(default)]
    pub profit_wrapped: Option<FixedPointAmount>,
    #[serde(default)]
    pub aggregated_profit: Option<FixedPointAmount>,
}

impl ReportSummary {
    pub fn new(
        statuses: StatusCounts,
        gas_used: FixedPointAmount,
        before: Option<&Settled<Balances>>,
        after: Option<&Settled<Balances>>,
    ) -> Result<Self, AmountError> {
        let mut summary = Self {
            statuses,
            gas_used,
            profit_native: None,
            profit_wrapped: None,
            aggregated_profit: None,
        };

        if let (Some(before), Some(after)) = (
            before.and_then(Settled::value),
            after.and_then(Settled::value),
        ) {
            let native = after.native.checked_sub(&before.native)?;
            let wrapped = after.wrapped.checked_sub(&before.wrapped)?;
            summary.aggregated_profit = Some(native.checked_add(&wrapped)?);
            summary.profit_native = Some(native);
            summary.profit_wrapped = Some(wrapped);
        }

        Ok(summary)
    }

    pub fn severity(&self) -> Severity {
        self.statuses.severity()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSummary {
    #[serde(flatten)]
    pub totals: ReportSummary,
    pub total_strategies: u32,
    pub harvested: u32,
    pub skipped: u32,
}

impl HarvestSummary {
    pub fn from_items(
        items: &[HarvestItem],
        before: Option<&Settled<Balances>>,
        after: Option<&Settled<Balances>>,
    ) -> Result<Self, AmountError> {
        let mut statuses = StatusCounts::default();
        let mut harvested = 0;
        let mut skipped = 0;
        let mut gas_used = FixedPointAmount::zero(NATIVE_SCALE);

        for item in items {
            match item.status {
                ItemStatus::Success => harvested += 1,
                ItemStatus::Skipped => skipped += 1,
                other => statuses.record(other),
            }
            if item.info.is_some() {
                statuses.info += 1;
            }
            if let Some(gas) = &item.gas_used {
                gas_used = gas_used.checked_add(gas)?;
            }
        }

        Ok(Self {
            totals: ReportSummary::new(statuses, gas_used, before, after)?,
            total_strategies: items.len() as u32,
            harvested,
            skipped,
        })
    }

    /// Nothing harvested and nothing worth flagging.
    pub fn is_uneventful(&self) -> bool {
        let s = &self.totals.statuses;
        self.harvested == 0 && s.error == 0 && s.warning == 0 && s.notice == 0
    }

    /// Every strategy is accounted for exactly once.
    pub fn is_consistent(&self) -> bool {
        self.total_strategies == self.harvested + self.skipped + self.totals.statuses.terminal()
    }

    pub fn severity(&self) -> Severity {
        self.totals.severity()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwrapSummary {
    #[serde(flatten)]
    pub totals: ReportSummary,
    pub success: bool,
    pub unwrapped: bool,
    #[serde(default)]
    pub unwrapped_amount: Option<FixedPointAmount>,
}

impl UnwrapSummary {
    pub fn from_steps(
        steps: &[UnwrapStep],
        unwrapped_amount: Option<FixedPointAmount>,
        gas_used: FixedPointAmount,
        before: Option<&Settled<Balances>>,
        after: Option<&Settled<Balances>>,
    ) -> Result<Self, AmountError> {
        let mut statuses = StatusCounts::default();
        for step in steps {
            statuses.record(step.status);
            if step.info.is_some() {
                statuses.info += 1;
            }
        }

        Ok(Self {
            success: statuses.error == 0,
            unwrapped: unwrapped_amount.map(|a| !a.is_zero()).unwrap_or(false),
            unwrapped_amount,
            totals: ReportSummary::new(statuses, gas_used, before, after)?,
        })
    }

    /// Ran cleanly but had nothing to unwrap.
    pub fn is_uneventful(&self) -> bool {
        self.success && !self.unwrapped
    }

    pub fn severity(&self) -> Severity {
        self.totals.severity()
    }
}
