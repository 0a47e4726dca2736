//! Local audio cue: speak the title, fall back to the terminal bell.

use async_trait::async_trait;
use hookbell_core::{
    config::SoundConfig, error::HookbellError, message::TaskMessage, status::TaskStatus,
    traits::Channel,
};
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// How a playback attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The speech program ran and exited cleanly.
    Finished,
    /// The speech program is still running; it is left to finish on its own.
    Detached,
    /// The speech program failed and the bell was rung instead.
    Fallback,
}

enum Attempt {
    Primary,
    Fallback { reason: String },
}

/// Plays an audible cue for each notification.
pub struct SoundChannel {
    config: SoundConfig,
}

impl SoundChannel {
    pub fn new(config: SoundConfig) -> Self {
        Self { config }
    }

    /// Speak `text`; on failure ring the bell for `tone`. At most one
    /// fallback per call.
    pub async fn play(&self, text: &str, tone: TaskStatus) -> Result<PlaybackOutcome, HookbellError> {
        let mut attempt = Attempt::Primary;
        loop {
            attempt = match attempt {
                Attempt::Primary => match self.play_primary(text).await {
                    Ok(outcome) => return Ok(outcome),
                    Err(reason) => {
                        debug!("sound: primary playback failed: {reason}");
                        Attempt::Fallback { reason }
                    }
                },
                Attempt::Fallback { reason } => {
                    return play_tone(tone).map(|()| PlaybackOutcome::Fallback).map_err(|e| {
                        HookbellError::Playback(format!("{reason}; bell fallback failed: {e}"))
                    });
                }
            };
        }
    }

    async fn play_primary(&self, text: &str) -> Result<PlaybackOutcome, String> {
        let program = self.config.command.trim();
        if program.is_empty() {
            return Err("no sound command configured".to_string());
        }

        let mut child = Command::new(program)
            .args(&self.config.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to start {program}: {e}"))?;

        let wait = Duration::from_millis(self.config.wait_ms);
        match tokio::time::timeout(wait, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(PlaybackOutcome::Finished),
            Ok(Ok(status)) => Err(format!("{program} exited with {status}")),
            Ok(Err(e)) => Err(format!("failed to wait for {program}: {e}")),
            Err(_) => {
                // Still speaking; reap it in the background.
                tokio::spawn(async move {
                    let _ = child.wait().await;
                });
                Ok(PlaybackOutcome::Detached)
            }
        }
    }
}

/// Number of bells rung for each status.
pub fn bell_count(tone: TaskStatus) -> usize {
    match tone {
        TaskStatus::Completed => 1,
        TaskStatus::WaitingForInput => 2,
        TaskStatus::Failed => 3,
    }
}

/// Ring the terminal bell on stderr.
fn play_tone(tone: TaskStatus) -> std::io::Result<()> {
    let bells = "\x07".repeat(bell_count(tone));
    let mut stderr = std::io::stderr();
    stderr.write_all(bells.as_bytes())?;
    stderr.flush()
}

#[async_trait]
impl Channel for SoundChannel {
    fn name(&self) -> &str {
        "sound"
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn deliver(&self, message: &TaskMessage) -> Result<(), HookbellError> {
        if !self.config.enabled {
            return Ok(());
        }
        match self.play(&message.title, message.status()).await? {
            PlaybackOutcome::Fallback => warn!("sound: speech unavailable, rang the bell instead"),
            outcome => debug!("sound: {outcome:?}"),
        }
        Ok(())
    }
}
