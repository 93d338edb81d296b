//! Azure AD B2C Session Token Cache
//!
//! Per-user OAuth2/OIDC token cache for web apps that call downstream APIs
//! with delegated B2C access tokens. The hosting framework supplies an
//! authenticated user identity and a session-scoped byte store; this crate
//! supplies token lookup, transparent refresh, and sign-in cache population.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use b2c_token_cache::{b2c_config, AccessTokenResolver, InMemorySessionStore, ReqwestHttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Built once at startup and shared with request handlers.
//!     let config = b2c_config()
//!         .authority("https://login.microsoftonline.com/tfp/contoso.onmicrosoft.com/b2c_1_susi")
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .add_api_scope("https://contoso.onmicrosoft.com/api1/read")
//!         .add_api_scope("https://contoso.onmicrosoft.com/api2/read")
//!         .build()?;
//!
//!     let resolver = AccessTokenResolver::new(
//!         config,
//!         Arc::new(ReqwestHttpTransport::new()?),
//!         Arc::new(InMemorySessionStore::new()),
//!     );
//!
//!     // In the post-login callback:
//!     // resolver.acquire_configured_scopes(user_id, code, redirect_uri).await?;
//!
//!     // In a protected request handler:
//!     match resolver.get_access_token("user-sub", "https://contoso.onmicrosoft.com/api1/read").await {
//!         Ok(token) => { /* call the API with a Bearer header */ }
//!         Err(e) if e.needs_reauth() => { /* redirect to the login flow */ }
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: token record and configuration types
//! - `error`: error hierarchy with provider error mapping
//! - `core`: HTTP transport seam for the token endpoint
//! - `token`: session store, per-user cache, refresher, and resolver
//! - `builders`: fluent configuration builder

pub mod builders;
pub mod core;
pub mod error;
pub mod token;
pub mod types;

// Re-export builders
pub use builders::{b2c_config, B2cConfigBuilder};

// Re-export errors
pub use error::{
    create_error_from_response, map_token_error, parse_error_response, AuthError, AuthResult,
    ConfigurationError, NetworkError, OAuth2ErrorResponse, ProtocolError, ProviderError,
    StorageError, TokenError,
};

// Re-export types
pub use types::{B2cConfig, ClientCredentials, ScopeMatching, TokenRecord};

// Re-export core components
pub use core::{
    FormRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export the token subsystem
pub use token::{
    AccessTokenResolver, InMemorySessionStore, MockSessionStore, SessionStore, TokenCache,
    TokenRefresher,
};
