// reqwest-backed transport

use crate::config::{redact_url, ClientConfig};
use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::types::{PaymentError, PaymentResult};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error};

pub struct HttpTransport {
    timeout: Duration,
    // Built once, on construction or on first use
    client: OnceLock<Result<Client, String>>,
}

impl HttpTransport {
    /// Build a transport with the configured timeout.
    ///
    /// Idle connections are not kept, so each call dials a fresh connection.
    pub fn new(config: &ClientConfig) -> PaymentResult<Self> {
        let transport = Self::lazy(config);
        transport.client()?;
        Ok(transport)
    }

    /// Like [`HttpTransport::new`], but the `reqwest::Client` is built on the first request.
    ///
    /// A build failure is then reported as [`PaymentError::Config`] by [`Transport::execute`].
    pub fn lazy(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout,
            client: OnceLock::new(),
        }
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(client: Client) -> Self {
        Self {
            timeout: Duration::ZERO,
            client: OnceLock::from(Ok(client)),
        }
    }

    fn client(&self) -> PaymentResult<&Client> {
        self.client
            .get_or_init(|| {
                Client::builder()
                    .timeout(self.timeout)
                    .pool_max_idle_per_host(0)
                    .build()
                    .map_err(|e| format!("Failed to build HTTP client: {}", e))
            })
            .as_ref()
            .map_err(|e| PaymentError::Config(e.clone()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> PaymentResult<TransportResponse> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        // The creation URL embeds the merchant key, so only the host is logged
        let target = redact_url(&url);
        let client = self.client().map_err(|e| {
            error!(error = %e, "Money Fusion HTTP client unavailable");
            e
        })?;

        let mut builder = client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            error!(%method, %target, error = %e, "Money Fusion request failed");
            PaymentError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            error!(%method, %target, status, error = %e, "Failed to read Money Fusion response body");
            PaymentError::Transport(e.to_string())
        })?;

        debug!(%method, %target, status, bytes = body.len(), "Raw Money Fusion response received");
        Ok(TransportResponse { status, body })
    }
}
