//! Turn a hook event into the notification text sent to every channel.

use crate::event::{EventKind, HookEvent, NotificationKind};
use crate::message::TaskMessage;
use crate::transcript::extract_summary;

/// Title used when no event was received.
pub const DEFAULT_TITLE: &str = "Claude Code";

/// Build the message for this invocation.
///
/// Rules, first match wins:
/// 1. no event: `fallback`;
/// 2. `Notification` with a message: the message verbatim;
/// 3. task or subtask completion: summary of the latest assistant reply, or a
///    generic sentence when the transcript yields nothing;
/// 4. anything else: `fallback`.
pub async fn synthesize(event: Option<&HookEvent>, fallback: &str) -> TaskMessage {
    let Some(event) = event else {
        return TaskMessage::new(DEFAULT_TITLE, fallback);
    };

    let title = title_for(event);
    let kind = event.kind();

    if kind == EventKind::Notification {
        if let Some(message) = event.non_empty_message() {
            return TaskMessage::new(title, message);
        }
    }

    let (prefix, generic) = match kind {
        EventKind::TaskComplete => ("Completed: ", "Task completed"),
        EventKind::SubtaskComplete => ("Subtask completed: ", "Subtask completed"),
        _ => return TaskMessage::new(title, fallback),
    };

    let summary = match event.transcript_path.as_deref() {
        Some(path) if !path.is_empty() => extract_summary(path).await,
        _ => None,
    };

    let body = match summary {
        Some(summary) => format!("{prefix}{summary}"),
        None => generic.to_string(),
    };
    TaskMessage::new(title, body)
}

/// Headline for an event, suffixed with the project name when known.
pub fn title_for(event: &HookEvent) -> String {
    let base = match event.kind() {
        EventKind::TaskComplete => "Task completed",
        EventKind::SubtaskComplete => "Subtask completed",
        EventKind::Notification => match event.notification_kind() {
            Some(NotificationKind::PermissionPrompt) => "Permission required",
            Some(NotificationKind::IdlePrompt) => "Waiting for input",
            Some(NotificationKind::Elicitation) => "Input requested",
            _ => "Notification",
        },
        EventKind::Other(_) => DEFAULT_TITLE,
    };

    match event.project_name() {
        Some(project) => format!("{base} · {project}"),
        None => base.to_string(),
    }
}
