//! Money Fusion Pay client
//!
//! Two calls are exposed:
//! - [`PaymentClient::create_payment`]: POST the order to the endpoint issued
//!   with the merchant's credentials, get back a token and a redirect URL
//! - [`PaymentClient::get_payment`]: GET the status of a payment by token
//!
//! Vendor responses are handed back untouched. An HTTP 4xx/5xx with a JSON
//! body is returned as `Ok`; callers inspect the payload (usually `statut`)
//! to tell success from failure.

use crate::config::{redact_url, ClientConfig, PAYMENT_STATUS_BASE_URL};
use crate::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
use crate::types::{decode_response, PaymentError, PaymentRequest, PaymentResponse, PaymentResult};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct PaymentClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl PaymentClient {
    /// Create a client for the given payment creation endpoint.
    ///
    /// No I/O happens here and the URL is not checked; a bad URL fails on the first call.
    /// The HTTP client is built on first use, so a broken TLS backend surfaces as
    /// [`PaymentError::Config`] from that call. Use [`PaymentClient::from_config`] to fail early.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        let config = ClientConfig::new(endpoint_url);
        let transport = HttpTransport::lazy(&config);

        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn from_config(config: ClientConfig) -> PaymentResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.config.endpoint_url
    }

    /// Status URL for a payment token. The token is appended verbatim.
    pub fn payment_status_url(&self, payment_id: &str) -> String {
        format!("{}{}", PAYMENT_STATUS_BASE_URL, payment_id)
    }

    /// Open a new payment.
    pub async fn create_payment(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse> {
        let payload = request.to_payload()?;
        let body = serde_json::to_vec(&payload).map_err(|e| PaymentError::Encode(e.to_string()))?;

        info!(
            order_id = request.order_id,
            user_id = request.user_id,
            articles = request.articles.len(),
            "Creating Money Fusion payment"
        );

        let transport_request =
            TransportRequest::post(&self.config.endpoint_url, self.config.headers.clone(), body);
        let response = self.transport.execute(transport_request).await?;

        let decoded = Self::decode(&response, "create_payment")?;
        info!(order_id = request.order_id, status = response.status, "Money Fusion payment created");
        Ok(decoded)
    }

    /// Fetch the current state of a payment by its token.
    pub async fn get_payment(&self, payment_id: &str) -> PaymentResult<PaymentResponse> {
        let url = self.payment_status_url(payment_id);
        info!(payment_id = %payment_id, "Fetching Money Fusion payment status");

        let transport_request = TransportRequest::get(url, self.config.headers.clone());
        let response = self.transport.execute(transport_request).await?;

        Self::decode(&response, "get_payment")
    }

    fn decode(response: &TransportResponse, operation: &str) -> PaymentResult<PaymentResponse> {
        if !response.is_success() {
            warn!(
                operation,
                status = response.status,
                "Money Fusion returned a non-success status, passing body through"
            );
        }

        decode_response(&response.body).map_err(|e| {
            warn!(operation, status = response.status, error = %e, "Failed to decode Money Fusion response");
            e
        })
    }
}

impl std::fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentClient")
            .field("endpoint_url", &redact_url(&self.config.endpoint_url))
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;
    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Method;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Replies with whatever body it was sent.
    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn execute(&self, request: TransportRequest) -> PaymentResult<TransportResponse> {
            Ok(TransportResponse {
                status: 200,
                body: request.body.unwrap_or_default(),
            })
        }
    }

    /// Records every request and replies with a fixed status and body.
    struct FixedTransport {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl FixedTransport {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn execute(&self, request: TransportRequest) -> PaymentResult<TransportResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(TransportResponse {
                status: self.status,
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn execute(&self, _request: TransportRequest) -> PaymentResult<TransportResponse> {
            Err(PaymentError::Transport("connection refused".to_string()))
        }
    }

    const ENDPOINT: &str = "https://www.pay.moneyfusion.net/api/merchant-key";

    fn sample_request() -> PaymentRequest {
        PaymentRequest::new(
            "10000",
            "0101010101",
            "assemienDev",
            1,
            123,
            "https://example.com/callback",
            "https://example.com/webhook",
        )
        .with_article(Article::new("Article 1", "5000", 1))
    }

    fn client_with(transport: Arc<dyn Transport>) -> PaymentClient {
        PaymentClient::with_transport(ClientConfig::new(ENDPOINT), transport)
    }

    #[tokio::test]
    async fn test_create_payment_returns_vendor_mapping() {
        let transport = FixedTransport::new(200, r#"{"statut": true, "token": "abc"}"#);
        let client = client_with(transport.clone());

        let response = client.create_payment(&sample_request()).await.unwrap();

        assert_eq!(Value::Object(response), json!({"statut": true, "token": "abc"}));
    }

    #[tokio::test]
    async fn test_create_payment_posts_payload_to_endpoint() {
        let transport = FixedTransport::new(200, "{}");
        let client = client_with(transport.clone());

        client.create_payment(&sample_request()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url, ENDPOINT);
        assert_eq!(sent.headers[CONTENT_TYPE], "application/json");

        let body: Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, sample_request().to_payload().unwrap());
        assert_eq!(body["personal_Info"], json!([{"userId": 1, "orderId": 123}]));
    }

    #[tokio::test]
    async fn test_create_payment_echo_round_trip() {
        let client = client_with(Arc::new(EchoTransport));
        let request = sample_request();

        let response = client.create_payment(&request).await.unwrap();

        assert_eq!(Value::Object(response), request.to_payload().unwrap());
    }

    #[tokio::test]
    async fn test_get_payment_url() {
        let transport = FixedTransport::new(200, r#"{"statut": true}"#);
        let client = client_with(transport.clone());

        client.get_payment("abc123").await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url, "https://www.pay.moneyfusion.net/paiementNotif/abc123");
        assert!(sent.body.is_none());
        assert_eq!(sent.headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_status_url_ignores_configured_endpoint() {
        let client = PaymentClient::new("https://sandbox.example.com/pay");
        assert_eq!(
            client.payment_status_url("tok/with?chars"),
            "https://www.pay.moneyfusion.net/paiementNotif/tok/with?chars"
        );
        assert_eq!(client.endpoint_url(), "https://sandbox.example.com/pay");
    }

    #[tokio::test]
    async fn test_error_status_passes_through() {
        let transport = FixedTransport::new(400, r#"{"statut": false, "message": "Montant invalide"}"#);
        let client = client_with(transport);

        let response = client.create_payment(&sample_request()).await.unwrap();

        assert_eq!(response.get("statut"), Some(&json!(false)));
        assert_eq!(response.get("message"), Some(&json!("Montant invalide")));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let client = client_with(Arc::new(FailingTransport));

        let create = client.create_payment(&sample_request()).await;
        let status = client.get_payment("abc123").await;

        assert!(matches!(create, Err(PaymentError::Transport(_))));
        assert!(matches!(status, Err(PaymentError::Transport(_))));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let client = client_with(FixedTransport::new(502, "<html>Bad Gateway</html>"));

        let create = client.create_payment(&sample_request()).await;
        let status = client.get_payment("abc123").await;

        assert!(matches!(create, Err(PaymentError::Decode(_))));
        assert!(matches!(status, Err(PaymentError::Decode(_))));
    }

    #[test]
    fn test_identical_clients_give_identical_results() {
        tokio_test::block_on(async {
            let body = r#"{"statut": true, "token": "abc", "url": "https://pay/abc"}"#;
            let first = client_with(FixedTransport::new(200, body));
            let second = client_with(FixedTransport::new(200, body));

            let a = first.create_payment(&sample_request()).await.unwrap();
            let b = second.create_payment(&sample_request()).await.unwrap();
            assert_eq!(a, b);

            let a = first.get_payment("abc").await.unwrap();
            let b = second.get_payment("abc").await.unwrap();
            assert_eq!(a, b);
        });
    }

    #[tokio::test]
    async fn test_client_is_shareable_across_tasks() {
        let transport = FixedTransport::new(200, r#"{"statut": true}"#);
        let client = client_with(transport.clone());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move { client.get_payment(&format!("tok{i}")).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_create_payment_against_http_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/merchant-key")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(sample_request().to_payload().unwrap()))
            .with_status(200)
            .with_body(r#"{"statut": true, "token": "abc", "message": "paiement en cours"}"#)
            .create_async()
            .await;

        let client =
            PaymentClient::from_config(ClientConfig::new(format!("{}/api/merchant-key", server.url())))
                .unwrap();
        let response = client.create_payment(&sample_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.get("token"), Some(&json!("abc")));
    }

    #[tokio::test]
    async fn test_create_payment_connection_refused() {
        let client = PaymentClient::new("http://127.0.0.1:1/api");
        let err = client.create_payment(&sample_request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Transport(_)));
    }

    #[test]
    fn test_debug_hides_merchant_key() {
        let client = PaymentClient::new(ENDPOINT);
        let debug = format!("{client:?}");

        assert!(!debug.contains(ENDPOINT));
        assert!(!debug.contains("merchant-key"));
        assert!(debug.contains("https://www.pay.moneyfusion.net/…"));
    }

    #[tokio::test]
    async fn test_new_builds_http_client_on_first_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/merchant-key")
            .with_status(200)
            .with_body(r#"{"statut": true, "token": "abc"}"#)
            .create_async()
            .await;

        let client = PaymentClient::new(format!("{}/api/merchant-key", server.url()));
        let response = client.create_payment(&sample_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.get("token"), Some(&json!("abc")));
    }
}
