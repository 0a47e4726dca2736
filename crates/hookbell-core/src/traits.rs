use crate::{error::HookbellError, message::TaskMessage};
use async_trait::async_trait;

/// Delivery channel trait.
///
/// Every backend (Telegram, webhook, local sound, ...) implements this
/// trait so the dispatcher can fan one message out to all of them.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Whether the channel is switched on in config.
    fn is_enabled(&self) -> bool;

    /// Deliver a message.
    ///
    /// A disabled channel returns `Ok(())` without doing any I/O. Failures
    /// are reported as errors, never as panics.
    async fn deliver(&self, message: &TaskMessage) -> Result<(), HookbellError>;
}
