//! Token Types
//!
//! Token set returned by the B2C token endpoint, stored verbatim in the
//! per-user cache.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::ScopeMatching;

/// One issued token set, with field names matching the token endpoint's
/// JSON response so records round-trip through the session store unchanged.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRecord {
    /// Bearer credential for one scope set.
    pub access_token: String,
    /// Token type (normally "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Unix epoch seconds before which the access token is not valid.
    #[serde(default)]
    pub not_before: i64,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// Unix epoch seconds at which the access token becomes invalid.
    #[serde(default)]
    pub expires_on: i64,
    /// Resource identifier, carried through from the provider.
    #[serde(default)]
    pub resource: Option<String>,
    /// Profile info blob, carried through from the provider.
    #[serde(default)]
    pub profile_info: Option<String>,
    /// Space-delimited scope list this record authorizes.
    #[serde(default)]
    pub scope: String,
    /// Credential used to mint a new record without re-authentication.
    /// Absent when offline_access was not granted.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_token_expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenRecord {
    /// Check whether the access token has expired, treating anything within
    /// `skew` of the expiry instant as already expired.
    pub fn is_expired(&self, skew: Duration) -> bool {
        Utc::now().timestamp() + skew.as_secs() as i64 >= self.expires_on
    }

    /// Check whether this record authorizes the requested scope.
    pub fn grants_scope(&self, scope: &str, matching: ScopeMatching) -> bool {
        match matching {
            ScopeMatching::Exact => self.scope.split_whitespace().any(|s| s == scope),
            ScopeMatching::Contains => self.scope.contains(scope),
        }
    }

    /// Check if a refresh token is present.
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_on", &self.expires_on)
            .field("scope", &self.scope)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(scope: &str, expires_on: i64) -> TokenRecord {
        TokenRecord {
            access_token: "at".to_string(),
            token_type: "Bearer".to_string(),
            not_before: 0,
            expires_in: 3600,
            expires_on,
            resource: None,
            profile_info: None,
            scope: scope.to_string(),
            refresh_token: Some("rt".to_string()),
            refresh_token_expires_in: 0,
        }
    }

    #[test]
    fn test_wire_parsing() {
        let json = r#"{
            "access_token": "test-token",
            "token_type": "Bearer",
            "not_before": 1700000000,
            "expires_in": 3600,
            "expires_on": 1700003600,
            "resource": "https://api.example.com",
            "profile_info": "eyJ...",
            "scope": "https://tenant.example.com/api/read offline_access",
            "refresh_token": "test-refresh",
            "refresh_token_expires_in": 1209600
        }"#;

        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.access_token, "test-token");
        assert_eq!(record.expires_on, 1700003600);
        assert_eq!(record.refresh_token, Some("test-refresh".to_string()));
        assert!(record.scope.contains("offline_access"));
    }

    #[test]
    fn test_defaults_for_sparse_response() {
        let json = r#"{"access_token": "t"}"#;
        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.token_type, "Bearer");
        assert_eq!(record.expires_on, 0);
        assert!(record.refresh_token.is_none());
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now().timestamp();
        assert!(record("apiA", now - 10).is_expired(Duration::ZERO));
        assert!(!record("apiA", now + 3600).is_expired(Duration::ZERO));
        // Within the skew window counts as expired.
        assert!(record("apiA", now + 60).is_expired(Duration::from_secs(300)));
    }

    #[test]
    fn test_grants_scope_exact() {
        let r = record("offline_access myapi.read", 0);
        assert!(r.grants_scope("myapi.read", ScopeMatching::Exact));
        assert!(!r.grants_scope("api", ScopeMatching::Exact));
    }

    #[test]
    fn test_grants_scope_contains_matches_substrings() {
        let r = record("offline_access myapi.read", 0);
        // Substring matching reproduces the legacy false positive.
        assert!(r.grants_scope("api", ScopeMatching::Contains));
        assert!(r.grants_scope("myapi.read", ScopeMatching::Contains));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let mut r = record("apiA", 0);
        r.access_token = "super-secret-access".to_string();
        r.refresh_token = Some("super-secret-refresh".to_string());

        let formatted = format!("{:?}", r);
        assert!(!formatted.contains("super-secret-access"));
        assert!(!formatted.contains("super-secret-refresh"));
        assert!(formatted.contains("[REDACTED]"));
    }
}
