//! Hook event payload delivered on stdin by the coding assistant.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single lifecycle event emitted by a Claude Code hook.
///
/// Only the fields hookbell acts on are modelled; anything else in the
/// payload (session ids, tool inputs, ...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub hook_event_name: String,
    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Which lifecycle transition the event describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The main agent finished its turn (`Stop`).
    TaskComplete,
    /// A subagent finished (`SubagentStop`).
    SubtaskComplete,
    /// The assistant needs attention (`Notification`).
    Notification,
    Other(String),
}

/// Sub-kind of a `Notification` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    PermissionPrompt,
    IdlePrompt,
    Elicitation,
    Other(String),
}

impl HookEvent {
    pub fn kind(&self) -> EventKind {
        match self.hook_event_name.as_str() {
            "Stop" => EventKind::TaskComplete,
            "SubagentStop" => EventKind::SubtaskComplete,
            "Notification" => EventKind::Notification,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// `None` when the payload carries no `notification_type`.
    pub fn notification_kind(&self) -> Option<NotificationKind> {
        let kind = self.notification_type.as_deref()?;
        Some(match kind {
            "permission_prompt" => NotificationKind::PermissionPrompt,
            "idle_prompt" => NotificationKind::IdlePrompt,
            "elicitation_dialog" | "elicitation" => NotificationKind::Elicitation,
            other => NotificationKind::Other(other.to_string()),
        })
    }

    /// Last path component of `cwd`, used to tell projects apart in alerts.
    pub fn project_name(&self) -> Option<String> {
        let cwd = self.cwd.as_deref()?.trim_end_matches(['/', '\\']);
        if cwd.is_empty() {
            return None;
        }
        Path::new(cwd)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// The `message` field, if present and not blank.
    pub fn non_empty_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}
