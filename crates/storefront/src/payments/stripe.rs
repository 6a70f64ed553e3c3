//! Stripe Checkout client.
//!
//! Creates one-off card payment sessions through the form-encoded
//! `POST /v1/checkout/sessions` endpoint.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};
use crate::config::StripeConfig;

/// Stripe Checkout API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.secret_key.expose_secret()))
                .map_err(|e| PaymentError::Parse(format!("Invalid API key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }
}

/// Flatten a session request into Stripe's bracketed form fields.
fn form_fields(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut fields = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    let currency = request.currency.as_lower();
    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        fields.extend([
            (
                format!("{prefix}[price_data][currency]"),
                currency.to_string(),
            ),
            (
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ),
            (
                format!("{prefix}[price_data][product_data][description]"),
                item.description.clone(),
            ),
            (
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ),
            (format!("{prefix}[quantity]"), item.quantity.to_string()),
        ]);
    }

    fields
}

/// Pull the human-readable message out of a Stripe error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl PaymentGateway for StripeClient {
    #[tracing::instrument(skip_all, fields(line_items = request.line_items.len()))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .post(self.sessions_url())
            .form(&form_fields(request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "Stripe rejected checkout session");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Parse(format!("session {} has no url", session.id)))?;

        tracing::debug!(session_id = %session.id, "Stripe checkout session created");
        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use domain_shop_core::CurrencyCode;
    use httpmock::prelude::*;
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::payments::LineItem;

    const KEY: &str = "sk_test_51Hq8ZkLr4Nw2Xb9TfVy3Cd7Mp0Qs6Ue1";

    fn client(api_base: &str) -> StripeClient {
        StripeClient::new(&StripeConfig {
            secret_key: SecretString::from(KEY),
            api_base: api_base.to_string(),
            currency: CurrencyCode::USD,
        })
        .unwrap()
    }

    fn request() -> CheckoutSessionRequest {
        CheckoutSessionRequest {
            currency: CurrencyCode::USD,
            line_items: vec![LineItem {
                name: "example.io".to_string(),
                description: "Domain: example.io".to_string(),
                unit_amount: 4999,
                quantity: 1,
            }],
            success_url: "https://shop.test/success.html?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://shop.test/?canceled=true".to_string(),
        }
    }

    fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_form_fields() {
        let fields = form_fields(&request());

        assert_eq!(field(&fields, "mode"), Some("payment"));
        assert_eq!(field(&fields, "payment_method_types[0]"), Some("card"));
        assert_eq!(
            field(&fields, "line_items[0][price_data][currency]"),
            Some("usd")
        );
        assert_eq!(
            field(&fields, "line_items[0][price_data][product_data][name]"),
            Some("example.io")
        );
        assert_eq!(
            field(&fields, "line_items[0][price_data][product_data][description]"),
            Some("Domain: example.io")
        );
        assert_eq!(
            field(&fields, "line_items[0][price_data][unit_amount]"),
            Some("4999")
        );
        assert_eq!(field(&fields, "line_items[0][quantity]"), Some("1"));
        assert_eq!(
            field(&fields, "cancel_url"),
            Some("https://shop.test/?canceled=true")
        );
        assert_eq!(field(&fields, "line_items[1][quantity]"), None);
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"message":"Invalid API Key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Invalid API Key provided");
        assert_eq!(error_message("upstream down"), "upstream down");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let debug_output = format!("{:?}", client("https://api.stripe.com"));
        assert!(!debug_output.contains(KEY));
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/checkout/sessions")
                    .header("authorization", format!("Bearer {KEY}"))
                    .body_contains("mode=payment")
                    .body_contains("unit_amount%5D=4999");
                then.status(200).json_body(json!({
                    "id": "cs_test_123",
                    "object": "checkout.session",
                    "url": "https://checkout.stripe.com/c/pay/cs_test_123"
                }));
            })
            .await;

        let session = client(&server.base_url())
            .create_checkout_session(&request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(session.id, "cs_test_123");
        assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_123");
    }

    #[tokio::test]
    async fn test_create_checkout_session_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/checkout/sessions");
                then.status(401).json_body(json!({
                    "error": {
                        "message": "Invalid API Key provided: sk_test_****",
                        "type": "invalid_request_error"
                    }
                }));
            })
            .await;

        let err = client(&server.base_url())
            .create_checkout_session(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Api { status: 401, .. }));
        assert_eq!(err.client_message(), "Invalid API Key provided: sk_test_****");
    }

    #[tokio::test]
    async fn test_session_without_url_is_a_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/checkout/sessions");
                then.status(200).json_body(json!({ "id": "cs_test_123", "url": null }));
            })
            .await;

        let err = client(&server.base_url())
            .create_checkout_session(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Parse(_)));
    }
}
