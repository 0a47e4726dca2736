//! Fan a message out to every enabled channel and collect the outcomes.

use hookbell_core::{
    error::HookbellError,
    message::{DeliveryResult, TaskMessage},
    traits::Channel,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Deliver `message` through every enabled channel concurrently.
///
/// Each channel runs in its own task, so a slow, failing, or panicking
/// channel never affects the others. Results come back in channel order.
pub async fn dispatch_all(
    message: Arc<TaskMessage>,
    channels: &[Arc<dyn Channel>],
    deadline: Duration,
) -> Vec<DeliveryResult> {
    let handles: Vec<(String, JoinHandle<Result<(), HookbellError>>)> = channels
        .iter()
        .filter(|channel| channel.is_enabled())
        .map(|channel| {
            let name = channel.name().to_string();
            let channel = Arc::clone(channel);
            let message = Arc::clone(&message);
            let handle = tokio::spawn(async move {
                match tokio::time::timeout(deadline, channel.deliver(&message)).await {
                    Ok(result) => result,
                    Err(_) => Err(HookbellError::Transport(format!(
                        "no response within {deadline:?}"
                    ))),
                }
            });
            (name, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let result = match handle.await {
            Ok(Ok(())) => {
                info!("{name}: delivered");
                DeliveryResult::ok(name)
            }
            Ok(Err(e)) => {
                error!("{name}: {e}");
                DeliveryResult::failed(name, e.to_string())
            }
            Err(join_err) => {
                let reason = join_failure(join_err);
                error!("{name}: {reason}");
                DeliveryResult::failed(name, reason)
            }
        };
        results.push(result);
    }
    results
}

fn join_failure(err: JoinError) -> String {
    if !err.is_panic() {
        return "delivery task was cancelled".to_string();
    }
    let payload = err.into_panic();
    let text = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("channel panicked: {text}")
}

/// One line per channel, in dispatch order.
pub fn summary_lines(results: &[DeliveryResult]) -> Vec<String> {
    if results.is_empty() {
        return vec!["no channels enabled".to_string()];
    }
    results
        .iter()
        .map(|r| match (&r.success, &r.error) {
            (true, _) => format!("✓ {}: sent", r.channel),
            (false, Some(error)) => format!("✗ {}: {error}", r.channel),
            (false, None) => format!("✗ {}: failed", r.channel),
        })
        .collect()
}

/// Print the delivery summary to stdout.
pub fn print_summary(results: &[DeliveryResult]) {
    for line in summary_lines(results) {
        println!("{line}");
    }
}
