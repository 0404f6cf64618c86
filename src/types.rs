// Request/response types and errors for the Money Fusion Pay API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single line item shown on the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub name: String,
    pub price: String,
    pub quantity: i64,
}

impl Article {
    pub fn new(name: impl Into<String>, price: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            quantity,
        }
    }
}

/// Everything needed to open a payment with the vendor.
///
/// Nothing here is validated locally. Phone format, price numeric-ness, URL
/// scheme and an empty article list are all left for the API to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Decimal amount encoded as a string, e.g. `"10000"`
    pub total_price: String,
    pub articles: Vec<Article>,
    /// Phone number of the paying customer (`numeroSend` on the wire)
    pub sender_phone: String,
    /// `nomclient` on the wire
    pub customer_name: String,
    pub user_id: i64,
    pub order_id: i64,
    /// Where the customer is redirected after paying (https)
    pub return_url: String,
    /// Where the vendor POSTs the payment notification (https)
    pub webhook_url: String,
}

impl PaymentRequest {
    pub fn new(
        total_price: impl Into<String>,
        sender_phone: impl Into<String>,
        customer_name: impl Into<String>,
        user_id: i64,
        order_id: i64,
        return_url: impl Into<String>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            total_price: total_price.into(),
            articles: Vec::new(),
            sender_phone: sender_phone.into(),
            customer_name: customer_name.into(),
            user_id,
            order_id,
            return_url: return_url.into(),
            webhook_url: webhook_url.into(),
        }
    }

    pub fn with_article(mut self, article: Article) -> Self {
        self.articles.push(article);
        self
    }

    pub fn with_articles(mut self, articles: impl IntoIterator<Item = Article>) -> Self {
        self.articles.extend(articles);
        self
    }

    /// Build the JSON body expected by the payment creation endpoint.
    pub fn to_payload(&self) -> PaymentResult<Value> {
        serde_json::to_value(CreatePaymentPayload::from(self))
            .map_err(|e| PaymentError::Encode(e.to_string()))
    }
}

// Wire format for payment creation. Field names and order are fixed by the API.
#[derive(Serialize)]
struct CreatePaymentPayload<'a> {
    #[serde(rename = "totalPrice")]
    total_price: &'a str,
    article: &'a [Article],
    #[serde(rename = "numeroSend")]
    sender_phone: &'a str,
    #[serde(rename = "nomclient")]
    customer_name: &'a str,
    // The API requires a one-element array here
    #[serde(rename = "personal_Info")]
    personal_info: [PersonalInfo; 1],
    return_url: &'a str,
    webhook_url: &'a str,
}

#[derive(Serialize)]
struct PersonalInfo {
    #[serde(rename = "userId")]
    user_id: i64,
    #[serde(rename = "orderId")]
    order_id: i64,
}

impl<'a> From<&'a PaymentRequest> for CreatePaymentPayload<'a> {
    fn from(request: &'a PaymentRequest) -> Self {
        Self {
            total_price: &request.total_price,
            article: &request.articles,
            sender_phone: &request.sender_phone,
            customer_name: &request.customer_name,
            personal_info: [PersonalInfo {
                user_id: request.user_id,
                order_id: request.order_id,
            }],
            return_url: &request.return_url,
            webhook_url: &request.webhook_url,
        }
    }
}

/// Vendor response, returned verbatim. Error-shaped payloads land here too.
pub type PaymentResponse = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

const BODY_PREVIEW_CHARS: usize = 200;

/// Decode a raw response body into a [`PaymentResponse`].
///
/// Anything other than a JSON object is rejected with [`PaymentError::Decode`],
/// including valid JSON arrays, scalars and `null`. The API always answers with
/// an object, so passthrough is narrowed to objects only.
pub fn decode_response(body: &[u8]) -> PaymentResult<PaymentResponse> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PaymentError::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(PaymentError::Decode(format!(
            "{} (body: {:?})",
            e,
            body_preview(body)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn body_preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}
