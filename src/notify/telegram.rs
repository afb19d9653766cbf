//! Telegram bot delivery
//!
//! The chart goes out with `sendPhoto`, the summary text with
//! `sendMessage`.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use super::Notifier;
use crate::config::SecretString;
use crate::error::{BudgetError, BudgetResult};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram bot posting to one chat
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: SecretString,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        token: SecretString,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> BudgetResult<Self> {
        Self::with_api_url(TELEGRAM_API_URL, token, chat_id, timeout)
    }

    pub fn with_api_url(
        api_url: impl Into<String>,
        token: SecretString,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> BudgetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BudgetError::Notify(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
            chat_id: chat_id.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token.expose(), method)
    }

    fn send_photo(&self, png: &[u8]) -> BudgetResult<()> {
        let photo = Part::bytes(png.to_vec())
            .file_name("budget_chart.png")
            .mime_str("image/png")
            .map_err(|e| BudgetError::Notify(e.to_string()))?;
        let form = Form::new().text("chat_id", self.chat_id.clone()).part("photo", photo);

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .map_err(|e| self.transport_error("sendPhoto", e))?;

        check_response(response, "sendPhoto")
    }

    fn send_message(&self, text: &str) -> BudgetResult<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .map_err(|e| self.transport_error("sendMessage", e))?;

        check_response(response, "sendMessage")
    }

    /// Transport failure with the bot token scrubbed from the message
    fn transport_error(&self, method: &str, e: reqwest::Error) -> BudgetError {
        BudgetError::Notify(format!("{} failed: {}", method, redact(&e.to_string(), &self.token)))
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, message: &str, chart_png: Option<&[u8]>) -> BudgetResult<()> {
        if let Some(png) = chart_png {
            self.send_photo(png)?;
            tracing::info!("Sent chart to Telegram");
        }
        self.send_message(message)?;
        tracing::info!("Sent summary to Telegram");
        Ok(())
    }
}

fn check_response(response: Response, method: &str) -> BudgetResult<()> {
    let status = response.status();
    let body = response.text().unwrap_or_default();

    let parsed: Option<BotResponse> = serde_json::from_str(&body).ok();
    match parsed {
        Some(BotResponse { ok: true, .. }) if status.is_success() => Ok(()),
        Some(BotResponse {
            description: Some(description),
            ..
        }) => Err(BudgetError::Notify(format!(
            "{} rejected (status {}): {}",
            method,
            status.as_u16(),
            description
        ))),
        _ => Err(BudgetError::Notify(format!(
            "{} failed with status {}",
            method,
            status.as_u16()
        ))),
    }
}

/// Request errors include the URL, which carries the bot token
fn redact(text: &str, token: &SecretString) -> String {
    if token.is_empty() {
        text.to_string()
    } else {
        text.replace(token.expose(), "<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(api_url: &str) -> TelegramNotifier {
        TelegramNotifier::with_api_url(
            api_url,
            SecretString::new("123:abc"),
            "-100200300",
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            notifier("https://api.telegram.org/").method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_redact() {
        let token = SecretString::new("123:abc");
        assert_eq!(
            redact("error sending request for url (https://x/bot123:abc/sendMessage)", &token),
            "error sending request for url (https://x/bot<redacted>/sendMessage)"
        );
    }

    #[test]
    fn test_unreachable_api_is_notify_error() {
        let err = notifier("http://127.0.0.1:9").send("hello", None).unwrap_err();

        assert!(matches!(err, BudgetError::Notify(_)));
        assert!(!err.to_string().contains("123:abc"));
    }
}
