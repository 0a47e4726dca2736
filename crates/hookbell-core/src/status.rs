//! Classify notification text into a coarse task status.

use serde::{Deserialize, Serialize};

/// Coarse state of the monitored task, used to pick headers and tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    WaitingForInput,
    Failed,
    Completed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WaitingForInput => "Waiting for input",
            Self::Failed => "Failed",
            Self::Completed => "Completed",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::WaitingForInput => "⏳",
            Self::Failed => "❌",
            Self::Completed => "✅",
        }
    }
}

const WAITING_KEYWORDS: &[&str] = &[
    "permission",
    "approval",
    "approve",
    "confirm",
    "waiting for",
    "idle",
    "needs your input",
    "input required",
    "elicitation",
    "your input",
];

const FAILURE_KEYWORDS: &[&str] = &[
    "error",
    "exception",
    "failed",
    "failure",
    "fatal",
    "panic",
    "traceback",
];

/// Infer the task status from free text.
///
/// Waiting-for-input is checked before failure, so prompts such as
/// "permission denied" are never reported as failures.
pub fn infer_status(text: &str) -> TaskStatus {
    let lower = text.to_lowercase();

    if WAITING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return TaskStatus::WaitingForInput;
    }

    if FAILURE_KEYWORDS.iter().any(|k| lower.contains(k)) || has_server_error_code(&lower) {
        return TaskStatus::Failed;
    }

    TaskStatus::Completed
}

/// True when a 5xx code follows `http`, `status` or `code` (e.g. "HTTP 503").
fn has_server_error_code(lower: &str) -> bool {
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    words.windows(2).any(|pair| {
        matches!(pair[0], "http" | "status" | "code")
            && pair[1].len() == 3
            && pair[1].starts_with('5')
            && pair[1].bytes().all(|b| b.is_ascii_digit())
    })
}
