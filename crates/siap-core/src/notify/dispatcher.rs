//! Best-effort delivery to the owner-alert gateway and the email relay
//!
//! Both channels share one contract: a transport failure is reported as
//! `Delivery::NotDelivered`, never as an error, so callers continue their
//! primary operation. Payload validation is the one check that happens
//! before any I/O.

use crate::config::NotifierConfig;
use crate::error::{Result, SiapError};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;

pub const TITLE_MAX_LENGTH: usize = 1200;
pub const CONTENT_MAX_LENGTH: usize = 20000;

/// Outcome of a best-effort send. Deliberately not a bool so it cannot be
/// confused with a general success flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NotDelivered,
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Seam for the outbound channels so the workflow service can be tested
/// without a live gateway
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_owner(&self, title: &str, content: &str) -> Result<Delivery>;

    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<Delivery>;
}

pub struct HttpNotifier {
    config: NotifierConfig,
    http_client: HttpClient,
}

impl HttpNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn owner_endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/webdevtoken.v1.WebDevService/SendNotification", base)
    }

    fn email_endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/email/send", base)
    }
}

/// Trim and bound the owner-alert payload. Runs before any I/O.
pub fn validate_payload(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();

    if title.is_empty() {
        return Err(SiapError::Validation(
            "Notification title is required".to_string(),
        ));
    }
    if content.is_empty() {
        return Err(SiapError::Validation(
            "Notification content is required".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(SiapError::Validation(format!(
            "Notification title must be at most {} characters",
            TITLE_MAX_LENGTH
        )));
    }
    if content.chars().count() > CONTENT_MAX_LENGTH {
        return Err(SiapError::Validation(format!(
            "Notification content must be at most {} characters",
            CONTENT_MAX_LENGTH
        )));
    }

    Ok((title.to_string(), content.to_string()))
}

#[async_trait]
impl Notifier for HttpNotifier {
    /// Alert the project owner. Missing configuration is an error here;
    /// a reachable-but-failing gateway degrades to NotDelivered.
    async fn notify_owner(&self, title: &str, content: &str) -> Result<Delivery> {
        let (title, content) = validate_payload(title, content)?;

        if self.config.base_url.trim().is_empty() {
            return Err(SiapError::Config(
                "Notification service URL is not configured".to_string(),
            ));
        }
        if self.config.api_key.trim().is_empty() {
            return Err(SiapError::Config(
                "Notification service API key is not configured".to_string(),
            ));
        }

        let payload = json!({
            "title": title,
            "content": content,
        });

        let response = self
            .http_client
            .post(self.owner_endpoint())
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Connect-Protocol-Version", "1")
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => Ok(Delivery::Delivered),
            Ok(resp) => {
                let status = resp.status();
                let detail = resp.text().await.unwrap_or_default();
                log::warn!("Owner notification rejected ({}): {}", status, detail);
                Ok(Delivery::NotDelivered)
            }
            Err(e) => {
                log::warn!("Owner notification transport failed: {}", e);
                Ok(Delivery::NotDelivered)
            }
        }
    }

    /// Email is the optional channel: missing configuration also degrades
    /// to NotDelivered instead of raising.
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<Delivery> {
        if !self.config.is_configured() {
            log::warn!("Email gateway credentials missing, skipping send to {}", to);
            return Ok(Delivery::NotDelivered);
        }

        let payload = json!({
            "to": to,
            "subject": subject,
            "html": html,
        });

        let response = self
            .http_client
            .post(self.email_endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                log::info!("Email sent to {}", to);
                Ok(Delivery::Delivered)
            }
            Ok(resp) => {
                let status = resp.status();
                let detail = resp.text().await.unwrap_or_default();
                log::error!("Email gateway error ({}): {}", status, detail);
                Ok(Delivery::NotDelivered)
            }
            Err(e) => {
                log::error!("Email send failed: {}", e);
                Ok(Delivery::NotDelivered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> HttpNotifier {
        HttpNotifier::new(NotifierConfig::default())
    }

    fn unreachable() -> HttpNotifier {
        // Port 1 is never listening; the connection is refused immediately
        HttpNotifier::new(NotifierConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: "test-key".to_string(),
        })
    }

    #[test]
    fn test_title_boundary() {
        let at_limit = "a".repeat(TITLE_MAX_LENGTH);
        assert!(validate_payload(&at_limit, "content").is_ok());

        let over_limit = "a".repeat(TITLE_MAX_LENGTH + 1);
        let result = validate_payload(&over_limit, "content");
        assert!(matches!(result, Err(SiapError::Validation(_))));
    }

    #[test]
    fn test_content_boundary() {
        let at_limit = "b".repeat(CONTENT_MAX_LENGTH);
        assert!(validate_payload("title", &at_limit).is_ok());

        let over_limit = "b".repeat(CONTENT_MAX_LENGTH + 1);
        assert!(matches!(
            validate_payload("title", &over_limit),
            Err(SiapError::Validation(_))
        ));
    }

    #[test]
    fn test_whitespace_only_content_rejected() {
        assert!(matches!(
            validate_payload("title", "   \n\t  "),
            Err(SiapError::Validation(_))
        ));
        assert!(matches!(
            validate_payload("  ", "content"),
            Err(SiapError::Validation(_))
        ));
    }

    #[test]
    fn test_payload_is_trimmed() {
        let (title, content) = validate_payload("  hello  ", "  world  ").unwrap();
        assert_eq!(title, "hello");
        assert_eq!(content, "world");
    }

    #[tokio::test]
    async fn test_notify_owner_without_config_is_config_error() {
        let notifier = unconfigured();
        let result = notifier.notify_owner("title", "content").await;
        assert!(matches!(result, Err(SiapError::Config(_))));
    }

    #[tokio::test]
    async fn test_notify_owner_validates_before_config_check() {
        let notifier = unconfigured();
        let result = notifier.notify_owner("", "content").await;
        assert!(matches!(result, Err(SiapError::Validation(_))));
    }

    #[tokio::test]
    async fn test_send_email_without_config_degrades() {
        let notifier = unconfigured();
        let delivery = notifier
            .send_email("user@example.go.id", "subject", "<p>hi</p>")
            .await
            .unwrap();
        assert_eq!(delivery, Delivery::NotDelivered);
    }

    #[tokio::test]
    async fn test_unreachable_gateway_degrades_not_errors() {
        let notifier = unreachable();

        let owner = notifier.notify_owner("title", "content").await.unwrap();
        assert_eq!(owner, Delivery::NotDelivered);

        let email = notifier
            .send_email("user@example.go.id", "subject", "<p>hi</p>")
            .await
            .unwrap();
        assert_eq!(email, Delivery::NotDelivered);
    }
}
