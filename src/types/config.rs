//! Configuration Types
//!
//! B2C client configuration.

use secrecy::SecretString;
use std::time::Duration;

/// B2C token client configuration.
///
/// Built once at startup (see [`crate::builders::b2c_config`]) and shared by
/// reference with request handlers; there is no static singleton.
#[derive(Clone)]
pub struct B2cConfig {
    /// Token issuing authority, e.g.
    /// `https://login.microsoftonline.com/tfp/{tenant}/{policy}`.
    pub authority: String,
    /// Client credentials.
    pub credentials: ClientCredentials,
    /// Downstream API scopes acquired at sign-in, one token record each.
    pub api_scopes: Vec<String>,
    /// HTTP timeout for token endpoint calls.
    pub timeout: Duration,
    /// Treat tokens expiring within this window as already expired.
    pub refresh_skew: Duration,
    /// How a requested scope is matched against stored records.
    pub scope_matching: ScopeMatching,
}

impl B2cConfig {
    /// Token endpoint URL for this authority.
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for B2cConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("B2cConfig")
            .field("authority", &self.authority)
            .field("credentials", &self.credentials)
            .field("api_scopes", &self.api_scopes)
            .field("timeout", &self.timeout)
            .field("refresh_skew", &self.refresh_skew)
            .field("scope_matching", &self.scope_matching)
            .finish()
    }
}

/// Client credentials for the confidential web client.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Client identifier.
    pub client_id: String,
    /// Client secret, sent in the form body (client_secret_post).
    pub client_secret: SecretString,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Scope matching policy for cache lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeMatching {
    /// Whitespace-split token membership. Default.
    Exact,
    /// Substring containment, compatible with the legacy behavior where a
    /// request for "api" matches a stored "myapi.read".
    Contains,
}

impl Default for ScopeMatching {
    fn default() -> Self {
        Self::Exact
    }
}

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
