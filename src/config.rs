use crate::domain::{ChainRegistry, ReportId};
use std::collections::HashMap;
use thiserror::Error;

const REPORT_ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone)]
pub struct Config {
    pub report_webhook_url: Option<String>,
    pub alert_webhook_url: Option<String>,
    pub ping_role_ids: Vec<String>,
    pub notify_uneventful: bool,
    pub ping_enabled: bool,
    pub report_url_template: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub chains: ChainRegistry,
    pub extra_secrets: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let report_webhook_url = non_empty(&env_map, "REPORT_WEBHOOK_URL");
        let alert_webhook_url = non_empty(&env_map, "ALERT_WEBHOOK_URL");
        let ping_role_ids = parse_list(&env_map, "PING_ROLE_IDS");
        let notify_uneventful = parse_bool(&env_map, "NOTIFY_UNEVENTFUL", false)?;
        let ping_enabled = parse_bool(&env_map, "PING_ENABLED", false)?;

        let report_url_template = non_empty(&env_map, "REPORT_URL_TEMPLATE");
        if let Some(template) = &report_url_template {
            if !template.contains(REPORT_ID_PLACEHOLDER) {
                return Err(ConfigError::InvalidValue(
                    "REPORT_URL_TEMPLATE".to_string(),
                    format!("must contain {}", REPORT_ID_PLACEHOLDER),
                ));
            }
        }

        let username = non_empty(&env_map, "NOTIFY_USERNAME");
        let avatar_url = non_empty(&env_map, "NOTIFY_AVATAR_URL");
        let chains = load_chains_from_map(&env_map)?;
        let extra_secrets = parse_list(&env_map, "REDACT_SECRETS");

        Ok(Config {
            report_webhook_url,
            alert_webhook_url,
            ping_role_ids,
            notify_uneventful,
            ping_enabled,
            report_url_template,
            username,
            avatar_url,
            chains,
            extra_secrets,
        })
    }

    /// Every configured value that must never leave the process.
    pub fn secrets(&self) -> Vec<String> {
        self.report_webhook_url
            .iter()
            .chain(self.alert_webhook_url.iter())
            .chain(self.extra_secrets.iter())
            .cloned()
            .collect()
    }

    pub fn report_url(&self, id: ReportId) -> Option<String> {
        self.report_url_template
            .as_ref()
            .map(|template| template.replace(REPORT_ID_PLACEHOLDER, &id.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_webhook_url: None,
            alert_webhook_url: None,
            ping_role_ids: Vec::new(),
            notify_uneventful: false,
            ping_enabled: false,
            report_url_template: None,
            username: None,
            avatar_url: None,
            chains: ChainRegistry::with_defaults(),
            extra_secrets: Vec::new(),
        }
    }
}

fn non_empty(env_map: &HashMap<String, String>, key: &str) -> Option<String> {
    env_map
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_list(env_map: &HashMap<String, String>, key: &str) -> Vec<String> {
    env_map
        .get(key)
        .map(|s| {
            s.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_bool(
    env_map: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = env_map.get(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be a boolean, got {}", other),
        )),
    }
}

fn load_chains_from_map(env_map: &HashMap<String, String>) -> Result<ChainRegistry, ConfigError> {
    let mut chains = ChainRegistry::with_defaults();
    if let Some(file_path) = non_empty(env_map, "CHAIN_METADATA_FILE") {
        let content = std::fs::read_to_string(&file_path).map_err(|_| {
            ConfigError::InvalidValue(
                "CHAIN_METADATA_FILE".to_string(),
                "file not found or unreadable".to_string(),
            )
        })?;
        let count = chains.merge_json(&content).map_err(|e| {
            ConfigError::InvalidValue("CHAIN_METADATA_FILE".to_string(), e.to_string())
        })?;
        tracing::debug!("Loaded {} chain metadata entries from {}", count, file_path);
    }
    Ok(chains)
}
