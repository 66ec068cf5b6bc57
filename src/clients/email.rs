use serde::Serialize;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Client for the transactional email provider.
///
/// Email is always a secondary effect here: failures are logged and never
/// propagated, so the caller's primary operation is unaffected.
#[derive(Clone)]
pub struct EmailClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    from_address: String,
}

impl EmailClient {
    pub fn new(base_url: String, api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            from_address,
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str, html: &str) {
        let url = format!("{}/messages", self.base_url);
        let result = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SendMessageRequest {
                from: &self.from_address,
                to,
                subject,
                text,
                html,
            })
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                log::warn!("Email to {to} rejected with status {}", response.status());
            }
            Err(err) => {
                log::warn!("Email to {to} failed: {err}");
            }
        }
    }

    /// Confirmation sent to a visitor after their enquiry is stored.
    pub async fn send_enquiry_confirmation(&self, to: &str, business_name: &str) {
        let subject = format!("Your enquiry to {business_name} was sent");
        let text = format!(
            "Hi,\n\nYour enquiry to {business_name} has been delivered. \
             The business will get back to you shortly.\n"
        );
        let html = format!(
            "<p>Hi,</p><p>Your enquiry to <strong>{business_name}</strong> has been \
             delivered. The business will get back to you shortly.</p>"
        );
        self.send(to, &subject, &text, &html).await;
    }
}
