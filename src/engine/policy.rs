//! Whether a report warrants a notification, and at which level.

use crate::config::Config;
use crate::domain::{Report, Severity};

/// Why a notification was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No destination endpoint configured.
    EndpointNotConfigured,
    /// Nothing happened and uneventful notifications are off.
    Uneventful,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationDecision {
    pub should_send: bool,
    pub level: Severity,
    pub skip_reason: Option<SkipReason>,
}

impl NotificationDecision {
    fn send(level: Severity) -> Self {
        Self {
            should_send: true,
            level,
            skip_reason: None,
        }
    }

    fn skip(level: Severity, reason: SkipReason) -> Self {
        Self {
            should_send: false,
            level,
            skip_reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPolicy {
    pub notify_uneventful: bool,
    /// Global switch for role mentions.
    pub ping_enabled: bool,
    pub ping_role_ids: Vec<String>,
}

impl NotificationPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            notify_uneventful: config.notify_uneventful,
            ping_enabled: config.ping_enabled,
            ping_role_ids: config.ping_role_ids.clone(),
        }
    }

    /// Evaluate both gates for `report`, logging why a notification is held back.
    pub fn decide(&self, report: &Report, endpoint_configured: bool) -> NotificationDecision {
        let uneventful = report.is_uneventful();
        let decision = self.decide_for(report.severity(), uneventful, endpoint_configured);

        match decision.skip_reason {
            Some(SkipReason::EndpointNotConfigured) => {
                tracing::warn!(
                    chain = %report.chain(),
                    kind = report.kind_label(),
                    "Report webhook not configured, skipping notification"
                );
            }
            Some(SkipReason::Uneventful) => {
                tracing::info!(
                    chain = %report.chain(),
                    kind = report.kind_label(),
                    summary = ?report.totals(),
                    "Uneventful report, not notifying"
                );
            }
            None => {}
        }

        decision
    }

    /// Pure gate evaluation: endpoint first, then eventfulness.
    ///
    /// Uneventful reports that do go out are always sent at `Info`.
    pub fn decide_for(
        &self,
        classified: Severity,
        uneventful: bool,
        endpoint_configured: bool,
    ) -> NotificationDecision {
        let level = if uneventful {
            Severity::Info
        } else {
            classified
        };

        if !endpoint_configured {
            return NotificationDecision::skip(level, SkipReason::EndpointNotConfigured);
        }
        if uneventful && !self.notify_uneventful {
            return NotificationDecision::skip(level, SkipReason::Uneventful);
        }
        NotificationDecision::send(level)
    }

    /// Role mentions to append, if any should fire at `level`.
    pub fn mention(&self, level: Severity) -> Option<String> {
        let wants_ping = level >= Severity::Warning || self.notify_uneventful;
        if !wants_ping || !self.ping_enabled || self.ping_role_ids.is_empty() {
            return None;
        }
        Some(
            self.ping_role_ids
                .iter()
                .map(|id| format!("<@&{}>", id))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(notify_uneventful: bool) -> NotificationPolicy {
        NotificationPolicy {
            notify_uneventful,
            ping_enabled: true,
            ping_role_ids: vec!["111".to_string(), "222".to_string()],
        }
    }

    #[test]
    fn test_missing_endpoint_wins_over_everything() {
        let decision = policy(true).decide_for(Severity::Error, false, false);
        assert!(!decision.should_send);
        assert_eq!(decision.skip_reason, Some(SkipReason::EndpointNotConfigured));
    }

    #[test]
    fn test_uneventful_suppressed_by_default() {
        let decision = policy(false).decide_for(Severity::Info, true, true);
        assert!(!decision.should_send);
        assert_eq!(decision.skip_reason, Some(SkipReason::Uneventful));
    }

    #[test]
    fn test_uneventful_sent_at_info_when_enabled() {
        let decision = policy(true).decide_for(Severity::Warning, true, true);
        assert!(decision.should_send);
        assert_eq!(decision.level, Severity::Info);
    }

    #[test]
    fn test_eventful_keeps_classified_level() {
        let decision = policy(false).decide_for(Severity::Error, false, true);
        assert!(decision.should_send);
        assert_eq!(decision.level, Severity::Error);
        assert!(decision.skip_reason.is_none());
    }

    #[test]
    fn test_mention_on_warning() {
        assert_eq!(
            policy(false).mention(Severity::Warning).as_deref(),
            Some("<@&111> <@&222>")
        );
        assert!(policy(false).mention(Severity::Info).is_none());
    }

    #[test]
    fn test_mention_on_info_when_notifying_uneventful() {
        assert!(policy(true).mention(Severity::Info).is_some());
    }

    #[test]
    fn test_mention_respects_global_switch_and_empty_roles() {
        let mut p = policy(false);
        p.ping_enabled = false;
        assert!(p.mention(Severity::Error).is_none());

        let mut p = policy(false);
        p.ping_role_ids.clear();
        assert!(p.mention(Severity::Error).is_none());
    }
}
