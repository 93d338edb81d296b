//! Token Refresher
//!
//! Stateless protocol client for the B2C token endpoint. Exchanges an
//! authorization code or a refresh token for a new token record. One POST
//! per call, no retry.

use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::core::HttpTransport;
use crate::error::{create_error_from_response, AuthError, ProtocolError};
use crate::types::{B2cConfig, TokenRecord};

/// Token endpoint client.
pub struct TokenRefresher<T: HttpTransport> {
    config: B2cConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> TokenRefresher<T> {
    /// Create a new refresher for the configured authority.
    pub fn new(config: B2cConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// Redeem an authorization code for a token record. The code is
    /// single-use; a multi-scope sign-in redeems it once and covers the
    /// remaining scopes with refresh-token grants.
    pub async fn by_authorization_code(
        &self,
        code: &str,
        redirect_uri: &str,
        scope: &str,
    ) -> Result<TokenRecord, AuthError> {
        let params = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            (
                "client_id".to_string(),
                self.config.credentials.client_id.clone(),
            ),
            ("scope".to_string(), Self::with_offline_access(scope)),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
            (
                "client_secret".to_string(),
                self.config.credentials.client_secret.expose_secret().to_string(),
            ),
        ];

        tracing::debug!(scope, "redeeming authorization code");
        self.exchange(params).await
    }

    /// Mint a new token record from a refresh token.
    pub async fn by_refresh_token(
        &self,
        refresh_token: &str,
        scope: &str,
    ) -> Result<TokenRecord, AuthError> {
        let params = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            (
                "client_id".to_string(),
                self.config.credentials.client_id.clone(),
            ),
            ("refresh_token".to_string(), refresh_token.to_string()),
            ("scope".to_string(), Self::with_offline_access(scope)),
            (
                "client_secret".to_string(),
                self.config.credentials.client_secret.expose_secret().to_string(),
            ),
        ];

        tracing::debug!(scope, "refreshing access token");
        self.exchange(params).await
    }

    // offline_access is always requested so the response carries a refresh token.
    fn with_offline_access(scope: &str) -> String {
        format!("offline_access {}", scope)
    }

    async fn exchange(&self, params: Vec<(String, String)>) -> Result<TokenRecord, AuthError> {
        let response = self
            .transport
            .post_form(&self.config.token_endpoint(), &params, self.config.timeout)
            .await?;

        if !response.is_success() {
            return Err(create_error_from_response(response.status, &response.body));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            AuthError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })
    }
}
