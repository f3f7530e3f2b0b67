//! Strips configured secrets from outbound text.

use std::fmt;

/// Replacement for every redacted secret.
pub const REDACTED: &str = "[redacted]";

/// Replaces exact occurrences of known secrets.
///
/// Longer secrets are replaced first so a secret that contains another is removed whole.
#[derive(Clone, Default)]
pub struct SecretRedactor {
    secrets: Vec<String>,
}

impl SecretRedactor {
    /// Create a redactor for `secrets`, skipping empty ones and ones that overlap the placeholder.
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut secrets: Vec<String> = secrets
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .filter(|s| {
                let overlaps = overlaps_placeholder(s);
                if overlaps {
                    tracing::warn!("Ignoring redaction secret that overlaps the placeholder");
                }
                !overlaps
            })
            .collect();
        secrets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        secrets.dedup();
        Self { secrets }
    }

    /// Whether no secret is configured.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Number of secrets in use.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Replace every occurrence of every secret with the placeholder.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for secret in &self.secrets {
            if out.contains(secret.as_str()) {
                out = out.replace(secret.as_str(), REDACTED);
            }
        }
        out
    }
}

/// Whether `secret` could match text that includes part of a written placeholder.
///
/// Such a secret would make a second pass change already redacted text.
fn overlaps_placeholder(secret: &str) -> bool {
    if REDACTED.contains(secret) || secret.contains(REDACTED) {
        return true;
    }
    (1..REDACTED.len()).any(|n| {
        // placeholder tail followed by the secret, or secret followed by placeholder head
        secret.starts_with(&REDACTED[REDACTED.len() - n..]) || secret.ends_with(&REDACTED[..n])
    })
}

impl fmt::Debug for SecretRedactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRedactor")
            .field("secrets", &self.secrets.len())
            .finish()
    }
}
