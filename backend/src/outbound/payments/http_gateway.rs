//! HTTP adapter for the external charge-intent provider.
//!
//! Speaks the provider's form-encoded REST dialect: a bearer-authenticated
//! POST to `/v1/payment_intents` returning the client secret the browser
//! needs to confirm the charge.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::ports::{ChargeIntent, PaymentGateway, PaymentGatewayError};

#[derive(Debug, Deserialize)]
struct IntentResponse {
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Charge-intent gateway backed by the provider's REST API.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    /// Build a gateway for the given API base URL and secret key.
    #[must_use]
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_charge_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<ChargeIntent, PaymentGatewayError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", currency.to_owned()),
            ("payment_method_types[]", "card".to_owned()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|err| PaymentGatewayError::connection(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| PaymentGatewayError::connection(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|payload| payload.error.message)
                .unwrap_or_else(|_| format!("gateway returned status {status}"));
            return Err(PaymentGatewayError::rejected(message));
        }

        let payload: IntentResponse = serde_json::from_slice(&body)
            .map_err(|err| PaymentGatewayError::protocol(err.to_string()))?;

        Ok(ChargeIntent {
            client_secret: payload.client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_response_parses_the_client_secret() {
        let payload: IntentResponse =
            serde_json::from_str(r#"{"client_secret":"pi_123_secret_456","id":"pi_123"}"#)
                .expect("valid payload");
        assert_eq!(payload.client_secret, "pi_123_secret_456");
    }

    #[test]
    fn error_response_parses_the_provider_message() {
        let payload: ErrorResponse = serde_json::from_str(
            r#"{"error":{"message":"Amount must be at least 50 cents","type":"invalid_request_error"}}"#,
        )
        .expect("valid payload");
        assert_eq!(payload.error.message, "Amount must be at least 50 cents");
    }
}
