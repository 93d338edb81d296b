//! Token Subsystem
//!
//! Per-user token cache, refresh protocol client, and the request-facing
//! access token resolver.

pub mod cache;
pub mod refresher;
pub mod resolver;
pub mod store;

pub use cache::TokenCache;
pub use refresher::TokenRefresher;
pub use resolver::AccessTokenResolver;
pub use store::{InMemorySessionStore, MockSessionStore, SessionStore};
