//! Harvest and unwrap reports produced by the batch jobs.

use crate::domain::amount::FixedPointAmount;
use crate::domain::chain::ChainId;
use crate::domain::outcome::{Settled, SettledOutcome};
use crate::domain::primitives::Address;
use crate::domain::summary::{
    HarvestSummary, ItemStatus, ReportSummary, Severity, UnwrapSummary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Collector balances at one point in time, both at native scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub native: FixedPointAmount,
    pub wrapped: FixedPointAmount,
}

impl Balances {
    pub fn total(&self) -> Result<FixedPointAmount, crate::domain::AmountError> {
        self.native.checked_add(&self.wrapped)
    }
}

/// Result of harvesting one vault strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestItem {
    pub vault_id: String,
    pub strategy_address: Address,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Informational note; counted but never shown as a detail line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default)]
    pub gas_used: Option<FixedPointAmount>,
}

/// One step of a native-token unwrap run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwrapStep {
    pub name: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestReport {
    pub chain: ChainId,
    pub generated_at: DateTime<Utc>,
    pub summary: HarvestSummary,
    #[serde(default)]
    pub balance_before: SettledOutcome<Balances>,
    #[serde(default)]
    pub balance_after: SettledOutcome<Balances>,
    #[serde(default)]
    pub details: Vec<HarvestItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwrapReport {
    pub chain: ChainId,
    pub generated_at: DateTime<Utc>,
    pub summary: UnwrapSummary,
    #[serde(default)]
    pub balance_before: SettledOutcome<Balances>,
    #[serde(default)]
    pub balance_after: SettledOutcome<Balances>,
    #[serde(default)]
    pub details: Vec<UnwrapStep>,
}

/// A finished batch run, tagged by kind in JSON (`"type": "harvest" | "unwrap"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Report {
    Harvest(HarvestReport),
    Unwrap(UnwrapReport),
}

/// A per-item detail worth surfacing in the notification body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttentionLine {
    pub status: ItemStatus,
    pub subject: String,
    pub address: Option<Address>,
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum ReportLoadError {
    #[error("failed to read report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Report {
    pub fn from_json_str(json: &str) -> Result<Self, ReportLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReportLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ReportLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Report::Harvest(_) => "Harvest",
            Report::Unwrap(_) => "Unwrap",
        }
    }

    pub fn chain(&self) -> &ChainId {
        match self {
            Report::Harvest(r) => &r.chain,
            Report::Unwrap(r) => &r.chain,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        match self {
            Report::Harvest(r) => r.generated_at,
            Report::Unwrap(r) => r.generated_at,
        }
    }

    pub fn totals(&self) -> &ReportSummary {
        match self {
            Report::Harvest(r) => &r.summary.totals,
            Report::Unwrap(r) => &r.summary.totals,
        }
    }

    pub fn balance_before(&self) -> Option<&Settled<Balances>> {
        match self {
            Report::Harvest(r) => r.balance_before.as_ref(),
            Report::Unwrap(r) => r.balance_before.as_ref(),
        }
    }

    pub fn balance_after(&self) -> Option<&Settled<Balances>> {
        match self {
            Report::Harvest(r) => r.balance_after.as_ref(),
            Report::Unwrap(r) => r.balance_after.as_ref(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.totals().severity()
    }

    pub fn is_uneventful(&self) -> bool {
        match self {
            Report::Harvest(r) => r.summary.is_uneventful(),
            Report::Unwrap(r) => r.summary.is_uneventful(),
        }
    }

    /// Items and steps with an error, warning or notice, in report order.
    pub fn attention_lines(&self) -> Vec<AttentionLine> {
        match self {
            Report::Harvest(r) => r
                .details
                .iter()
                .filter(|item| item.status.needs_attention())
                .map(|item| AttentionLine {
                    status: item.status,
                    subject: item.vault_id.clone(),
                    address: Some(item.strategy_address.clone()),
                    message: item.message.clone(),
                })
                .collect(),
            Report::Unwrap(r) => r
                .details
                .iter()
                .filter(|step| step.status.needs_attention())
                .map(|step| AttentionLine {
                    status: step.status,
                    subject: step.name.clone(),
                    address: None,
                    message: step.message.clone(),
                })
                .collect(),
        }
    }

    /// Attachment file name, derived from the chain only.
    pub fn attachment_name(&self) -> String {
        format!("report_{}.json", self.chain().as_str())
    }
}
