//! The operator-supplied API credential.
//!
//! A credential lives only in process memory. It has no `Serialize` impl and
//! its `Debug`/`Display` output is redacted, so it cannot leak through
//! `tracing` fields or config dumps by accident.

use std::fmt;

/// Opaque secret used to authenticate against the reasoning service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret. Surrounding whitespace is trimmed; blank input yields `None`.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Read the first non-blank variable from `names`, in order.
    pub fn from_env(names: &[&str]) -> Option<Self> {
        names
            .iter()
            .find_map(|name| std::env::var(name).ok().and_then(Self::new))
    }

    /// The raw secret, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
