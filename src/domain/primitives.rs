//! Domain primitives: Address, ReportId.

use serde::{Deserialize, Serialize};

/// On-chain address (hex string), kept as given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234…abcd` form for compact display.
    pub fn short(&self) -> String {
        let s = self.0.as_str();
        if s.len() <= 12 || !s.is_ascii() {
            return s.to_string();
        }
        format!("{}…{}", &s[..6], &s[s.len() - 4..])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a report stored elsewhere, used to link to the full report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportId(pub u64);

impl ReportId {
    /// Create a ReportId from its numeric value.
    pub fn new(id: u64) -> Self {
        ReportId(id)
    }

    /// Get the underlying numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
