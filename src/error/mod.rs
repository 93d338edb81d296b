//! Error Types
//!
//! Error hierarchy for token cache, refresh, and session store operations.

use std::time::Duration;
use thiserror::Error;

/// Root error type for token acquisition and caching.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl AuthError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "B2C_CONFIG",
            Self::Token(_) => "B2C_TOKEN",
            Self::Network(_) => "B2C_NETWORK",
            Self::Storage(_) => "B2C_STORAGE",
            Self::Protocol(_) => "B2C_PROTOCOL",
            Self::Provider(_) => "B2C_PROVIDER",
        }
    }

    /// Check if error is retryable. Provider rejections are never retryable;
    /// transport-level failures may be.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Check if error requires the user to sign in interactively again.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            Self::Token(TokenError::NoCachedToken { .. })
                | Self::Token(TokenError::NoRefreshToken { .. })
                | Self::Provider(_)
        )
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid authority URL: {url}")]
    InvalidAuthority { url: String },
}

/// Token cache error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("No cached token for scope: {scope}")]
    NoCachedToken { scope: String },

    #[error("Cached record for scope {scope} has no refresh token")]
    NoRefreshToken { scope: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl NetworkError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// Session store error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Corrupted cache blob: {message}")]
    Corrupted { message: String },
}

/// Response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// Provider (token endpoint) error.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid client credentials")]
    InvalidClient { error_description: Option<String> },

    #[error("Invalid grant: {message}")]
    InvalidGrant { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

/// Result type for token cache operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// OAuth2 error response from the token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuth2ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

/// Map token endpoint error response to error type.
pub fn map_token_error(response: &OAuth2ErrorResponse) -> ProviderError {
    match response.error.as_str() {
        "invalid_client" => ProviderError::InvalidClient {
            error_description: response.error_description.clone(),
        },
        "invalid_grant" => ProviderError::InvalidGrant {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| "Invalid grant".to_string()),
        },
        "invalid_scope" => ProviderError::InvalidScope {
            scope: response.error_description.clone().unwrap_or_default(),
        },
        "server_error" => ProviderError::ServerError {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| "Server error".to_string()),
        },
        _ => ProviderError::InvalidRequest {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| response.error.clone()),
        },
    }
}

/// Parse error response from HTTP body.
pub fn parse_error_response(body: &str) -> Option<OAuth2ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Create error from a non-success token endpoint response.
pub fn create_error_from_response(status: u16, body: &str) -> AuthError {
    if let Some(response) = parse_error_response(body) {
        return AuthError::Provider(map_token_error(&response));
    }

    let error = match status {
        400 => ProviderError::InvalidRequest {
            message: "Bad request".to_string(),
        },
        401 => ProviderError::InvalidClient {
            error_description: Some("Unauthorized".to_string()),
        },
        _ => ProviderError::ServerError {
            message: format!("HTTP {}", status),
        },
    };

    AuthError::Provider(error)
}
