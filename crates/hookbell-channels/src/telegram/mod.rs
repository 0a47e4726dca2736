//! Telegram Bot API channel.
//!
//! Sends one `sendMessage` call per notification, either straight over TLS
//! or through an HTTP `CONNECT` tunnel when a proxy is configured.
//! Docs: <https://core.telegram.org/bots/api>

pub mod format;
mod http;
mod tls;
mod tunnel;
pub(crate) mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use hookbell_core::{
    config::{Readiness, TelegramConfig},
    error::HookbellError,
    message::TaskMessage,
    traits::Channel,
};
use tokio::net::TcpStream;
use tracing::{debug, info};

const HTTPS_PORT: u16 = 443;

/// Telegram channel using the Bot API.
pub struct TelegramChannel {
    config: TelegramConfig,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(mut config: TelegramConfig) -> Self {
        config.bot_token = config.bot_token.trim().to_string();
        config.chat_id = config.chat_id.trim().to_string();
        Self { config }
    }

    /// Build the `sendMessage` JSON body.
    fn message_body(&self, text: &str) -> serde_json::Value {
        // Numeric chat ids go out as numbers, `@channel` names as strings.
        let chat_id = match self.config.chat_id.parse::<i64>() {
            Ok(id) => serde_json::Value::from(id),
            Err(_) => serde_json::Value::from(self.config.chat_id.as_str()),
        };
        serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": false,
        })
    }

    /// Send already-formatted HTML text to the configured chat.
    pub(crate) async fn send_text(&self, text: &str) -> Result<(), HookbellError> {
        let proxy = self
            .config
            .proxy_descriptor()
            .map_err(|e| HookbellError::ConfigIncomplete(format!("telegram proxy: {e}")))?;
        let host = self.config.api_host.as_str();
        let extra_roots = match self.config.ca_file.as_deref() {
            Some(path) => tls::load_pem_roots(path)?,
            None => Vec::new(),
        };

        let body = serde_json::to_vec(&self.message_body(text))?;
        let path = format!("/bot{}/sendMessage", self.config.bot_token);

        let tcp = match &proxy {
            Some(proxy) => {
                debug!("telegram: tunnelling through {}:{}", proxy.host, proxy.port);
                tunnel::open_tunnel(proxy, host, HTTPS_PORT).await?
            }
            None => TcpStream::connect((host, HTTPS_PORT))
                .await
                .map_err(|e| HookbellError::Transport(format!("connect to {host} failed: {e}")))?,
        };

        let stream = tls::handshake(tcp, host, extra_roots).await?;
        let response = http::post_json(stream, host, &path, body).await?;
        debug!(
            "telegram answered HTTP {} ({})",
            response.status,
            response.content_type.as_deref().unwrap_or("no content type")
        );
        types::parse_api_response(&response.body)?;
        Ok(())
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn deliver(&self, message: &TaskMessage) -> Result<(), HookbellError> {
        if !self.config.enabled {
            return Ok(());
        }
        if let Readiness::Incomplete(reason) = self.config.readiness() {
            return Err(HookbellError::ConfigIncomplete(format!("telegram: {reason}")));
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let text = format::format_message(message, &timestamp, self.config.truncation_margin);
        self.send_text(&text).await?;
        info!("telegram: notification sent");
        Ok(())
    }
}
