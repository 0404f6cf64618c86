use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;

/// Base URL for payment status lookups. The payment token is appended as-is.
pub const PAYMENT_STATUS_BASE_URL: &str = "https://www.pay.moneyfusion.net/paiementNotif/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ClientConfig {
    /// Payment creation endpoint issued by Money Fusion Pay.
    ///
    /// The path carries the merchant key, so treat the whole URL as a secret.
    pub endpoint_url: String,
    pub timeout: Duration,
    pub headers: HeaderMap,
}

impl ClientConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout: DEFAULT_TIMEOUT,
            headers: default_headers(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `MONEYFUSION_API_URL` and `MONEYFUSION_TIMEOUT_SECS`, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_url = lookup("MONEYFUSION_API_URL").context("MONEYFUSION_API_URL must be set")?;
        let timeout_secs: u64 = lookup("MONEYFUSION_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT.as_secs().to_string())
            .parse()
            .context("MONEYFUSION_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self::new(endpoint_url).with_timeout(Duration::from_secs(timeout_secs)))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint_url", &redact_url(&self.endpoint_url))
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .finish()
    }
}

/// Keep only scheme and host of a URL, e.g. `https://www.pay.moneyfusion.net/…`.
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}/…", parsed.scheme(), host),
            None => format!("{}:…", parsed.scheme()),
        },
        Err(_) => "<unparsable url>".to_string(),
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
