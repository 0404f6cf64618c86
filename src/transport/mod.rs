//! HTTP transport seam
//!
//! [`PaymentClient`](crate::client::PaymentClient) never talks to `reqwest`
//! directly. It hands a [`TransportRequest`] to a [`Transport`] and gets the
//! raw status and body back, which keeps the client testable without a network.

pub mod http;

pub use http::HttpTransport;

use crate::types::PaymentResult;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body: Some(body.into()),
        }
    }
}

/// Raw vendor reply. The status is carried for logging only.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and read the full body.
    ///
    /// Fails only when the exchange itself cannot complete; any HTTP status is a success here.
    async fn execute(&self, request: TransportRequest) -> PaymentResult<TransportResponse>;
}
