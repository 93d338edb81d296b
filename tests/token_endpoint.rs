//! Token endpoint integration tests over real HTTP.

use std::sync::Arc;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use b2c_token_cache::{
    b2c_config, AccessTokenResolver, AuthError, B2cConfig, InMemorySessionStore, ProviderError,
    ReqwestHttpTransport, TokenRefresher,
};

fn config(authority: &str) -> B2cConfig {
    b2c_config()
        .authority(authority)
        .client_id("client-id")
        .client_secret("client-secret")
        .add_api_scope("apiA")
        .add_api_scope("apiB")
        .build()
        .unwrap()
}

fn token_body(access_token: &str, scope: &str, refresh_token: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "not_before": 1700000000,
        "expires_in": 3600,
        "expires_on": chrono_now() + 3600,
        "scope": scope,
        "refresh_token": refresh_token,
        "refresh_token_expires_in": 1209600
    })
}

fn chrono_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[tokio::test]
async fn refresh_grant_posts_urlencoded_form_with_offline_access() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=rt-old"))
        .and(body_string_contains("scope=offline_access+apiA"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("at-new", "offline_access apiA", "rt-new")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let refresher = TokenRefresher::new(
        config(&server.uri()),
        Arc::new(ReqwestHttpTransport::new().unwrap()),
    );

    let record = refresher.by_refresh_token("rt-old", "apiA").await.unwrap();
    assert_eq!(record.access_token, "at-new");
    assert_eq!(record.refresh_token, Some("rt-new".to_string()));
}

#[tokio::test]
async fn authorization_code_grant_posts_code_and_redirect_uri() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("scope=offline_access+apiA"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("at-1", "offline_access apiA", "rt-1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let refresher = TokenRefresher::new(
        config(&server.uri()),
        Arc::new(ReqwestHttpTransport::new().unwrap()),
    );

    let record = refresher
        .by_authorization_code("the-code", "https://app.example.com/signin-oidc", "apiA")
        .await
        .unwrap();
    assert_eq!(record.access_token, "at-1");
}

#[tokio::test]
async fn provider_rejection_maps_to_invalid_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "AADB2C90080: The provided grant has expired."
        })))
        .mount(&server)
        .await;

    let refresher = TokenRefresher::new(
        config(&server.uri()),
        Arc::new(ReqwestHttpTransport::new().unwrap()),
    );

    let error = refresher.by_refresh_token("rt-old", "apiA").await.unwrap_err();
    assert!(matches!(
        error,
        AuthError::Provider(ProviderError::InvalidGrant { .. })
    ));
    assert!(error.needs_reauth());
}

#[tokio::test]
async fn sign_in_then_resolve_both_scopes_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("atA", "offline_access apiA", "rA")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("atB", "offline_access apiB", "rB")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = AccessTokenResolver::new(
        config(&server.uri()),
        Arc::new(ReqwestHttpTransport::new().unwrap()),
        Arc::new(InMemorySessionStore::new()),
    );

    let first = resolver
        .acquire_configured_scopes("sub-1", "the-code", "https://app.example.com/signin-oidc")
        .await
        .unwrap();
    assert_eq!(first, "atA");

    // Both records are cached and unexpired: no further endpoint calls.
    assert_eq!(resolver.get_access_token("sub-1", "apiA").await.unwrap(), "atA");
    assert_eq!(resolver.get_access_token("sub-1", "apiB").await.unwrap(), "atB");
}
