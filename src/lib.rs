// MoneyFusion Pay - async client for the Money Fusion Pay payment API

pub mod client;
pub mod config;
pub mod transport;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use client::PaymentClient;
pub use config::{ClientConfig, PAYMENT_STATUS_BASE_URL};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use types::{Article, PaymentError, PaymentRequest, PaymentResponse, PaymentResult};
