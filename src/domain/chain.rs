//! Per-chain display metadata.

use crate::domain::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lower-case chain identifier, e.g. `"bsc"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct ChainId(pub String);

impl ChainId {
    /// Create a ChainId, trimmed and lower-cased.
    pub fn new(id: impl Into<String>) -> Self {
        ChainId(id.into().trim().to_ascii_lowercase())
    }

    /// Get the chain id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ChainId {
    fn from(value: String) -> Self {
        ChainId::new(value)
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display names, token symbols and explorer link for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMeta {
    pub display_name: String,
    pub native_symbol: String,
    pub wrapped_symbol: String,
    /// Explorer link template containing `{address}`.
    #[serde(default)]
    pub explorer_address_url: Option<String>,
}

impl ChainMeta {
    fn builtin(display_name: &str, native: &str, wrapped: &str, explorer: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            native_symbol: native.to_string(),
            wrapped_symbol: wrapped.to_string(),
            explorer_address_url: Some(format!("{}/address/{{address}}", explorer)),
        }
    }

    /// Metadata for a chain nobody configured.
    pub fn fallback(chain: &ChainId) -> Self {
        Self {
            display_name: chain.as_str().to_ascii_uppercase(),
            native_symbol: "NATIVE".to_string(),
            wrapped_symbol: "WNATIVE".to_string(),
            explorer_address_url: None,
        }
    }

    /// Explorer link for `address`, if the chain has an explorer.
    pub fn address_link(&self, address: &Address) -> Option<String> {
        self.explorer_address_url
            .as_ref()
            .map(|template| template.replace("{address}", address.as_str()))
    }
}

/// Chain metadata lookup with built-in defaults and configured overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: HashMap<ChainId, ChainMeta>,
}

impl ChainRegistry {
    /// Create a registry with no entries.
    pub fn empty() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in chains.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for (id, meta) in [
            ("bsc", ChainMeta::builtin("BSC", "BNB", "WBNB", "https://bscscan.com")),
            (
                "polygon",
                ChainMeta::builtin("POLYGON", "MATIC", "WMATIC", "https://polygonscan.com"),
            ),
            (
                "fantom",
                ChainMeta::builtin("FANTOM", "FTM", "WFTM", "https://ftmscan.com"),
            ),
            (
                "avax",
                ChainMeta::builtin("AVAX", "AVAX", "WAVAX", "https://snowtrace.io"),
            ),
            (
                "arbitrum",
                ChainMeta::builtin("ARBITRUM", "ETH", "WETH", "https://arbiscan.io"),
            ),
            (
                "optimism",
                ChainMeta::builtin(
                    "OPTIMISM",
                    "ETH",
                    "WETH",
                    "https://optimistic.etherscan.io",
                ),
            ),
            (
                "ethereum",
                ChainMeta::builtin("ETHEREUM", "ETH", "WETH", "https://etherscan.io"),
            ),
        ] {
            registry.insert(ChainId::new(id), meta);
        }
        registry
    }

    /// Add or replace the entry for `chain`.
    pub fn insert(&mut self, chain: ChainId, meta: ChainMeta) {
        self.chains.insert(chain, meta);
    }

    /// Overlay entries parsed from a JSON object keyed by chain id.
    pub fn merge_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let entries: HashMap<String, ChainMeta> = serde_json::from_str(json)?;
        let count = entries.len();
        for (id, meta) in entries {
            self.insert(ChainId::new(id), meta);
        }
        Ok(count)
    }

    /// Metadata for `chain`, or the fallback when it is unknown.
    pub fn get(&self, chain: &ChainId) -> ChainMeta {
        self.chains
            .get(chain)
            .cloned()
            .unwrap_or_else(|| ChainMeta::fallback(chain))
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_is_normalized() {
        assert_eq!(ChainId::new(" BSC "), ChainId::new("bsc"));
    }

    #[test]
    fn test_builtin_bsc() {
        let meta = ChainRegistry::with_defaults().get(&ChainId::new("bsc"));
        assert_eq!(meta.display_name, "BSC");
        assert_eq!(meta.wrapped_symbol, "WBNB");
        assert_eq!(
            meta.address_link(&Address::new("0xabc")).as_deref(),
            Some("https://bscscan.com/address/0xabc")
        );
    }

    #[test]
    fn test_unknown_chain_falls_back() {
        let meta = ChainRegistry::with_defaults().get(&ChainId::new("celo"));
        assert_eq!(meta.display_name, "CELO");
        assert_eq!(meta.native_symbol, "NATIVE");
        assert!(meta.address_link(&Address::new("0xabc")).is_none());
    }

    #[test]
    fn test_merge_json_overrides() {
        let mut registry = ChainRegistry::with_defaults();
        let count = registry
            .merge_json(
                r#"{"BSC": {"display_name": "BNB Chain", "native_symbol": "BNB", "wrapped_symbol": "WBNB"}}"#,
            )
            .unwrap();
        assert_eq!(count, 1);
        let meta = registry.get(&ChainId::new("bsc"));
        assert_eq!(meta.display_name, "BNB Chain");
        assert!(meta.explorer_address_url.is_none());
    }
}
