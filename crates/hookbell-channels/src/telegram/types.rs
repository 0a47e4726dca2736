//! Telegram Bot API response types.

use hookbell_core::error::HookbellError;
use serde::Deserialize;
use serde_json::Value;

/// Characters of an unparsable body kept for diagnostics.
const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse {
    #[serde(default)]
    pub ok: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// Check the application-level outcome of a Bot API call.
///
/// A successful HTTP exchange is not enough: the JSON body must carry a
/// truthy `ok`.
pub(crate) fn parse_api_response(body: &[u8]) -> Result<TgResponse, HookbellError> {
    let resp: TgResponse = serde_json::from_slice(body).map_err(|e| {
        let raw = String::from_utf8_lossy(body);
        let snippet: String = raw.chars().take(SNIPPET_CHARS).collect();
        HookbellError::Protocol(format!("unparsable telegram response ({e}): {snippet}"))
    })?;

    if !is_truthy(&resp.ok) {
        let reason = resp
            .description
            .clone()
            .unwrap_or_else(|| "response without ok=true".to_string());
        return Err(match resp.error_code {
            Some(code) => HookbellError::Protocol(format!("telegram rejected message ({code}): {reason}")),
            None => HookbellError::Protocol(format!("telegram rejected message: {reason}")),
        });
    }

    Ok(resp)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
