//! Environment overrides layered on top of the config file.

use super::{Config, SoundConfig, TelegramConfig, WebhookConfig};

/// Apply environment overrides; environment values win over the file.
///
/// `lookup` abstracts `std::env::var` so callers decide where values come
/// from. Supplying a credential for a channel that has no section creates
/// the section, enabled. Values are trimmed. Returns one message per
/// ignored value, for the caller to log once logging is up.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut ignored = Vec::new();
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(level) = get("HOOKBELL_LOG_LEVEL") {
        config.hookbell.log_level = level;
    }

    // Telegram.
    let token = get("TELEGRAM_BOT_TOKEN");
    let chat_id = get("TELEGRAM_CHAT_ID");
    let proxy = get("TELEGRAM_PROXY")
        .or_else(|| get("HTTPS_PROXY"))
        .or_else(|| get("https_proxy"));
    let enabled = get("TELEGRAM_ENABLED")
        .and_then(|v| parse_bool("TELEGRAM_ENABLED", &v, &mut ignored));

    if token.is_some() || chat_id.is_some() || enabled.is_some() {
        let tg = config.channel.telegram.get_or_insert_with(|| TelegramConfig {
            enabled: true,
            ..Default::default()
        });
        if let Some(token) = token {
            tg.bot_token = token;
        }
        if let Some(chat_id) = chat_id {
            tg.chat_id = chat_id;
        }
        if let Some(enabled) = enabled {
            tg.enabled = enabled;
        }
    }
    if let (Some(proxy), Some(tg)) = (proxy, config.channel.telegram.as_mut()) {
        tg.proxy = Some(proxy);
    }

    // Webhook.
    let url = get("WEBHOOK_URL");
    let enabled = get("WEBHOOK_ENABLED")
        .and_then(|v| parse_bool("WEBHOOK_ENABLED", &v, &mut ignored));
    if url.is_some() || enabled.is_some() {
        let hook = config.channel.webhook.get_or_insert_with(|| WebhookConfig {
            enabled: true,
            ..Default::default()
        });
        if let Some(url) = url {
            hook.url = url;
        }
        if let Some(enabled) = enabled {
            hook.enabled = enabled;
        }
    }

    // Sound.
    let sound_enabled =
        get("SOUND_ENABLED").and_then(|v| parse_bool("SOUND_ENABLED", &v, &mut ignored));
    if let Some(enabled) = sound_enabled {
        config
            .channel
            .sound
            .get_or_insert_with(SoundConfig::default)
            .enabled = enabled;
    }

    ignored
}

fn parse_bool(key: &str, value: &str, ignored: &mut Vec<String>) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            ignored.push(format!("ignoring {key}={other}: expected a boolean"));
            None
        }
    }
}
