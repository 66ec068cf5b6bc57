use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: String,
}

/// Thin client for the external payment gateway. Order creation is a
/// primary effect for the booking flow, so errors propagate to the caller;
/// the wire protocol itself belongs to the gateway.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl PaymentClient {
    pub fn new(base_url: String, key_id: String, key_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id,
            key_secret,
        }
    }

    /// Create a gateway order for `amount` minor units and return its id.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<String, String> {
        let url = format!("{}/orders", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderRequest {
                amount,
                currency,
                receipt,
            })
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("order creation failed with {status}: {text}"));
        }

        let body: CreateOrderResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.id)
    }

    /// Verify the client-supplied checkout signature: a keyed hash over
    /// `order_id|payment_id` with the shared secret, hex-encoded.
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(self.key_secret.as_bytes(), order_id, payment_id, signature)
    }
}

pub fn verify_payment_signature(
    secret: &[u8],
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_a_valid_signature() {
        let secret = b"test-secret";
        let signature = sign(secret, "order_123", "pay_456");
        assert!(verify_payment_signature(secret, "order_123", "pay_456", &signature));
    }

    #[test]
    fn rejects_a_tampered_payment_id() {
        let secret = b"test-secret";
        let signature = sign(secret, "order_123", "pay_456");
        assert!(!verify_payment_signature(secret, "order_123", "pay_999", &signature));
    }

    #[test]
    fn rejects_a_wrong_secret() {
        let signature = sign(b"other-secret", "order_123", "pay_456");
        assert!(!verify_payment_signature(b"test-secret", "order_123", "pay_456", &signature));
    }

    #[test]
    fn rejects_non_hex_signatures() {
        assert!(!verify_payment_signature(b"test-secret", "order_123", "pay_456", "zzzz"));
    }
}
