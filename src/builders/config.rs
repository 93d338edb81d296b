//! Configuration Builder
//!
//! Fluent builder for B2C client configuration.

use std::time::Duration;
use url::Url;

use crate::error::{AuthError, ConfigurationError};
use crate::types::{B2cConfig, ClientCredentials, ScopeMatching, DEFAULT_TIMEOUT_SECS};
use secrecy::SecretString;

/// B2C configuration builder.
#[derive(Default)]
pub struct B2cConfigBuilder {
    authority: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    api_scopes: Vec<String>,
    timeout: Option<Duration>,
    refresh_skew: Duration,
    scope_matching: ScopeMatching,
}

impl B2cConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token issuing authority, e.g.
    /// `https://login.microsoftonline.com/tfp/{tenant}/{policy}`.
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set the downstream API scopes acquired at sign-in.
    pub fn api_scopes(mut self, scopes: Vec<String>) -> Self {
        self.api_scopes = scopes;
        self
    }

    /// Add a downstream API scope.
    pub fn add_api_scope(mut self, scope: impl Into<String>) -> Self {
        self.api_scopes.push(scope.into());
        self
    }

    /// Set token endpoint request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Treat tokens expiring within this window as already expired.
    pub fn refresh_skew(mut self, skew: Duration) -> Self {
        self.refresh_skew = skew;
        self
    }

    /// Set scope matching policy.
    pub fn scope_matching(mut self, matching: ScopeMatching) -> Self {
        self.scope_matching = matching;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<B2cConfig, AuthError> {
        let authority = self.authority.ok_or_else(|| {
            AuthError::Configuration(ConfigurationError::MissingField {
                field: "authority".to_string(),
            })
        })?;

        if Url::parse(&authority).is_err() {
            return Err(AuthError::Configuration(
                ConfigurationError::InvalidAuthority { url: authority },
            ));
        }

        let client_id = self.client_id.ok_or_else(|| {
            AuthError::Configuration(ConfigurationError::MissingField {
                field: "client_id".to_string(),
            })
        })?;

        let client_secret = self.client_secret.ok_or_else(|| {
            AuthError::Configuration(ConfigurationError::MissingField {
                field: "client_secret".to_string(),
            })
        })?;

        Ok(B2cConfig {
            authority,
            credentials: ClientCredentials {
                client_id,
                client_secret,
            },
            api_scopes: self.api_scopes,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            refresh_skew: self.refresh_skew,
            scope_matching: self.scope_matching,
        })
    }
}

/// Create a new B2C configuration builder.
pub fn b2c_config() -> B2cConfigBuilder {
    B2cConfigBuilder::new()
}
