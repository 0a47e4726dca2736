//! Chat webhook channel (Feishu/Lark-style incoming bot hook).

use async_trait::async_trait;
use hookbell_core::{
    config::WebhookConfig, error::HookbellError, message::TaskMessage, traits::Channel,
};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SNIPPET_CHARS: usize = 200;

/// Posts each notification as a plain-text message to a webhook URL.
pub struct WebhookChannel {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// Create a new webhook channel from config.
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn payload(message: &TaskMessage) -> Value {
        serde_json::json!({
            "msg_type": "text",
            "content": { "text": format!("{}\n{}", message.title, message.body) },
        })
    }
}

/// Check a webhook reply: non-2xx or a non-zero `code`/`StatusCode` is a
/// failure. Non-JSON success bodies are accepted.
fn check_reply(status: reqwest::StatusCode, body: &str) -> Result<(), HookbellError> {
    let snippet: String = body.chars().take(SNIPPET_CHARS).collect();
    if !status.is_success() {
        return Err(HookbellError::Protocol(format!(
            "webhook returned {status}: {snippet}"
        )));
    }

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };
    let code = json
        .get("code")
        .or_else(|| json.get("StatusCode"))
        .and_then(Value::as_i64);
    match code {
        Some(code) if code != 0 => {
            let msg = json
                .get("msg")
                .or_else(|| json.get("StatusMessage"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            Err(HookbellError::Protocol(format!("webhook rejected message ({code}): {msg}")))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn deliver(&self, message: &TaskMessage) -> Result<(), HookbellError> {
        if !self.config.enabled {
            return Ok(());
        }
        if self.config.url.trim().is_empty() {
            return Err(HookbellError::ConfigIncomplete(
                "webhook is enabled but url is empty".to_string(),
            ));
        }

        let resp = self
            .client
            .post(self.config.url.trim())
            .timeout(REQUEST_TIMEOUT)
            .json(&Self::payload(message))
            .send()
            .await
            .map_err(|e| HookbellError::Transport(format!("webhook send failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| HookbellError::Transport(format!("webhook reply unreadable: {e}")))?;
        check_reply(status, &body)?;
        info!("webhook: notification sent");
        Ok(())
    }
}
