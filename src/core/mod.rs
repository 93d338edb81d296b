//! Core Infrastructure
//!
//! HTTP transport seam for token endpoint calls.

pub mod transport;

pub use transport::{
    create_mock_transport, FormRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
};
