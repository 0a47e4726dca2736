//! Default value functions used by serde for config deserialization.

pub fn default_config_path() -> String {
    "~/.hookbell/config.toml".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_ingest_timeout_ms() -> u64 {
    1000
}

pub fn default_delivery_timeout_secs() -> u64 {
    10
}

pub fn default_grace_delay_ms() -> u64 {
    3000
}

pub fn default_api_host() -> String {
    "api.telegram.org".to_string()
}

pub fn default_truncation_margin() -> usize {
    10
}

pub fn default_sound_command() -> String {
    if cfg!(target_os = "macos") {
        "say".to_string()
    } else {
        "spd-say".to_string()
    }
}

pub fn default_sound_wait_ms() -> u64 {
    1500
}
