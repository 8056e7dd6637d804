//! Email client — the single point of entry for all transactional email in
//! the service.
//!
//! Wraps an EmailJS-style REST endpoint: one POST carrying the service id,
//! template id, public key and a flat map of template parameters. Every send
//! in this codebase is fire-and-forget from the caller's perspective; use
//! `send_detached` so a mail outage can never block registration or the
//! contact form.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;
pub mod templates;

const SEND_PATH: &str = "/api/v1.0/email/send";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Subject, body and addressing for one outgoing message, flattened into the
/// parameter map the remote template expects.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateParams(pub BTreeMap<String, String>);

impl TemplateParams {
    pub fn new() -> Self {
        TemplateParams(BTreeMap::new())
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

#[derive(Debug, Clone)]
pub struct SendReceipt {
    /// Whatever the provider echoes back; EmailJS returns a bare "OK".
    pub message_id: String,
}

#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailClient {
    pub fn new(
        endpoint: String,
        service_id: String,
        template_id: String,
        public_key: String,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            service_id,
            template_id,
            public_key,
        }
    }

    pub async fn send(&self, params: &TemplateParams) -> Result<SendReceipt, EmailError> {
        let url = format!("{}{}", self.endpoint.trim_end_matches('/'), SEND_PATH);
        let body = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: params,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(EmailError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("email sent via {url}: {text}");
        Ok(SendReceipt { message_id: text })
    }

    /// Spawns the send and forgets about it. Failures are logged, never
    /// surfaced — no email outcome may block the calling request.
    pub fn send_detached(&self, params: TemplateParams) {
        let client = self.clone();
        tokio::spawn(async move {
            let recipient = params.get("to_email").unwrap_or("<unknown>").to_string();
            match client.send(&params).await {
                Ok(receipt) => {
                    debug!("email to {recipient} accepted ({})", receipt.message_id)
                }
                Err(e) => warn!("failed to send email to {recipient}: {e}"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_params_builder() {
        let params = TemplateParams::new()
            .set("to_email", "a@b.com")
            .set("subject", "Hi");
        assert_eq!(params.get("to_email"), Some("a@b.com"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_send_request_wire_shape() {
        let params = TemplateParams::new().set("to_email", "a@b.com");
        let request = SendRequest {
            service_id: "service_1",
            template_id: "template_1",
            user_id: "pk_1",
            template_params: &params,
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["service_id"], "service_1");
        assert_eq!(wire["template_params"]["to_email"], "a@b.com");
    }
}
