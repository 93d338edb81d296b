//! Access Token Resolver
//!
//! Request-facing orchestration over the cache and the refresher: returns a
//! currently valid access token for a scope, refreshing transparently, and
//! forces a sign-out when the user must re-authenticate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::HttpTransport;
use crate::error::{AuthError, ConfigurationError, TokenError};
use crate::token::cache::TokenCache;
use crate::token::refresher::TokenRefresher;
use crate::token::store::SessionStore;
use crate::types::B2cConfig;

/// Lazily created per-user async locks. Serializes the whole
/// load → inspect → refresh → persist sequence for one user without
/// blocking unrelated users.
#[derive(Default)]
struct UserLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    fn for_user(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.inner.lock().unwrap();
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Per-user access token resolver.
pub struct AccessTokenResolver<T: HttpTransport, S: SessionStore> {
    config: B2cConfig,
    refresher: TokenRefresher<T>,
    store: Arc<S>,
    locks: UserLocks,
}

impl<T: HttpTransport, S: SessionStore> AccessTokenResolver<T, S> {
    /// Create a new resolver over the given transport and session store.
    pub fn new(config: B2cConfig, transport: Arc<T>, store: Arc<S>) -> Self {
        let refresher = TokenRefresher::new(config.clone(), transport);
        Self {
            config,
            refresher,
            store,
            locks: UserLocks::default(),
        }
    }

    /// Return a currently valid access token for `scope`, refreshing an
    /// expired record transparently.
    ///
    /// On a cache miss or a failed refresh the user is signed out (their
    /// cache blob is deleted) and an error with `needs_reauth() == true` is
    /// returned; the request handler should redirect to the login flow.
    pub async fn get_access_token(&self, user_id: &str, scope: &str) -> Result<String, AuthError> {
        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut cache = TokenCache::load_or_empty(user_id, self.store.as_ref()).await?;

        let index = match cache.find(scope, self.config.scope_matching) {
            Some(index) => index,
            None => {
                tracing::warn!(user_id, scope, "no cached token, forcing sign-out");
                self.sign_out(user_id).await?;
                return Err(AuthError::Token(TokenError::NoCachedToken {
                    scope: scope.to_string(),
                }));
            }
        };

        let record = &cache.records()[index];
        if !record.is_expired(self.config.refresh_skew) {
            return Ok(record.access_token.clone());
        }

        let refresh_token = match &record.refresh_token {
            Some(token) => token.clone(),
            None => {
                self.sign_out(user_id).await?;
                return Err(AuthError::Token(TokenError::NoRefreshToken {
                    scope: scope.to_string(),
                }));
            }
        };

        match self.refresher.by_refresh_token(&refresh_token, scope).await {
            Ok(mut new_record) => {
                // Carry the old refresh token forward if the provider
                // rotated nothing.
                if new_record.refresh_token.is_none() {
                    new_record.refresh_token = Some(refresh_token);
                }
                let access_token = new_record.access_token.clone();
                cache.replace(index, new_record);
                cache.persist(self.store.as_ref()).await?;
                Ok(access_token)
            }
            Err(error) => {
                // Cache is left untouched; only the session blob is removed.
                tracing::warn!(
                    user_id,
                    scope,
                    error_code = error.error_code(),
                    "token refresh failed, forcing sign-out"
                );
                self.sign_out(user_id).await?;
                Err(error)
            }
        }
    }

    /// Redeem the post-login authorization code and populate the cache with
    /// one record per configured scope: the first via the code grant, the
    /// rest via refresh-token grants (the code is single-use). Returns the
    /// first access token. Nothing is persisted unless every exchange
    /// succeeds.
    pub async fn acquire_all_scopes(
        &self,
        user_id: &str,
        code: &str,
        redirect_uri: &str,
        scopes: &[String],
    ) -> Result<String, AuthError> {
        let (first_scope, rest) = scopes.split_first().ok_or_else(|| {
            AuthError::Configuration(ConfigurationError::MissingField {
                field: "api_scopes".to_string(),
            })
        })?;

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut cache = TokenCache::load_or_empty(user_id, self.store.as_ref()).await?;

        let first = self
            .refresher
            .by_authorization_code(code, redirect_uri, first_scope)
            .await?;
        let access_token = first.access_token.clone();
        let refresh_token = first.refresh_token.clone().ok_or_else(|| {
            AuthError::Token(TokenError::NoRefreshToken {
                scope: first_scope.clone(),
            })
        })?;
        cache.push(first);

        for scope in rest {
            let record = self.refresher.by_refresh_token(&refresh_token, scope).await?;
            cache.push(record);
        }

        cache.persist(self.store.as_ref()).await?;
        tracing::debug!(user_id, count = scopes.len(), "token cache populated at sign-in");

        Ok(access_token)
    }

    /// Redeem the authorization code for every scope in the configuration.
    pub async fn acquire_configured_scopes(
        &self,
        user_id: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AuthError> {
        let scopes = self.config.api_scopes.clone();
        self.acquire_all_scopes(user_id, code, redirect_uri, &scopes)
            .await
    }

    /// Delete the user's cached tokens so their next protected request
    /// forces interactive re-authentication.
    pub async fn sign_out(&self, user_id: &str) -> Result<(), AuthError> {
        self.store
            .delete(&TokenCache::cache_key(user_id))
            .await
            .map(|_| ())
    }
}
