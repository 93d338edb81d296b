//! HTTP Transport
//!
//! Form-POST transport interface for token endpoint requests, with a reqwest
//! implementation and a scriptable mock for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{AuthError, NetworkError, ProtocolError};

/// A recorded form POST, as seen by the transport.
#[derive(Clone, Debug)]
pub struct FormRequest {
    /// Request URL.
    pub url: String,
    /// Form fields in submission order.
    pub params: Vec<(String, String)>,
}

impl FormRequest {
    /// Value of a form field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from the token endpoint.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Check for a success status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST an `application/x-www-form-urlencoded` body and return the
    /// response, bounded by `timeout`.
    async fn post_form(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, AuthError>;
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
}

impl ReqwestHttpTransport {
    /// Create a new transport.
    pub fn new() -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            // Token endpoint responses must never be redirects.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                AuthError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn post_form(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, AuthError> {
        let response = self
            .client
            .post(url)
            .header("accept", "application/json")
            .form(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::Network(NetworkError::Timeout { timeout })
                } else {
                    AuthError::Network(NetworkError::ConnectionFailed {
                        message: e.to_string(),
                    })
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            AuthError::Protocol(ProtocolError::InvalidResponse {
                message: e.to_string(),
            })
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Mock HTTP transport for testing.
#[derive(Default)]
pub struct MockHttpTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, AuthError>>>,
    request_history: Mutex<Vec<FormRequest>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        self.queue_response(HttpResponse {
            status,
            body: serde_json::to_string(body).unwrap(),
        })
    }

    /// Queue a transport-level error.
    pub fn queue_error(&self, error: AuthError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<FormRequest> {
        self.request_history.lock().unwrap().clone()
    }

    /// Get last request.
    pub fn get_last_request(&self) -> Option<FormRequest> {
        self.request_history.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn post_form(
        &self,
        url: &str,
        params: &[(String, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse, AuthError> {
        self.request_history.lock().unwrap().push(FormRequest {
            url: url.to_string(),
            params: params.to_vec(),
        });

        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(AuthError::Network(NetworkError::ConnectionFailed {
                message: "No mock response queued".to_string(),
            }))
        })
    }
}

/// Create mock HTTP transport for testing.
pub fn create_mock_transport() -> MockHttpTransport {
    MockHttpTransport::new()
}
