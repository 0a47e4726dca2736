//! One-shot, bounded read of the hook payload from stdin.

use hookbell_core::event::HookEvent;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

/// Read a single hook event.
///
/// Returns `None` immediately when `interactive` (stdin is a terminal).
/// Otherwise bytes are collected until EOF or `timeout`, whichever comes
/// first, and whatever was collected is parsed. Empty or malformed input
/// yields `None`.
pub async fn read_event<R>(mut reader: R, interactive: bool, timeout: Duration) -> Option<HookEvent>
where
    R: AsyncRead + Unpin,
{
    if interactive {
        debug!("stdin is a terminal, no hook payload");
        return None;
    }

    let mut collected = Vec::new();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match tokio::time::timeout_at(deadline, reader.read_buf(&mut collected)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!("failed to read hook payload: {e}");
                break;
            }
            Err(_) => {
                debug!("stdin still open after {timeout:?}, using what arrived");
                break;
            }
        }
    }

    parse_event(&String::from_utf8_lossy(&collected))
}

/// Parse a raw payload; logs and returns `None` on malformed JSON.
pub fn parse_event(raw: &str) -> Option<HookEvent> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<HookEvent>(raw) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("ignoring malformed hook payload: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    const TIMEOUT: Duration = Duration::from_millis(1000);

    #[tokio::test]
    async fn test_reads_piped_event() {
        let input: &[u8] = br#"{"hook_event_name":"Stop","cwd":"/w/app"}"#;
        let event = read_event(input, false, TIMEOUT).await.unwrap();
        assert_eq!(event.hook_event_name, "Stop");
        assert_eq!(event.cwd.as_deref(), Some("/w/app"));
    }

    #[tokio::test]
    async fn test_multiline_payload() {
        let input: &[u8] = b"{\n  \"hook_event_name\": \"Notification\",\n  \"message\": \"hi\"\n}\n";
        let event = read_event(input, false, TIMEOUT).await.unwrap();
        assert_eq!(event.message.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_interactive_returns_none_without_reading() {
        let input: &[u8] = br#"{"hook_event_name":"Stop"}"#;
        assert!(read_event(input, true, TIMEOUT).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_none() {
        let cases: [&[u8]; 4] = [b"{not json", b"[1,2,3]", b"null", b"\"Stop\""];
        for raw in cases {
            assert!(read_event(raw, false, TIMEOUT).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_empty_input_returns_none() {
        let input: &[u8] = b"  \n";
        assert!(read_event(input, false, TIMEOUT).await.is_none());
    }

    #[tokio::test]
    async fn test_times_out_on_silent_open_pipe() {
        let (_writer, reader) = tokio::io::duplex(64);
        let started = std::time::Instant::now();
        let event = read_event(reader, false, Duration::from_millis(50)).await;
        assert!(event.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_complete_payload_on_open_pipe_is_used_after_timeout() {
        let (mut writer, reader) = tokio::io::duplex(256);
        writer
            .write_all(b"{\"hook_event_name\":\"SubagentStop\"}\n")
            .await
            .unwrap();
        let event = read_event(reader, false, Duration::from_millis(50)).await;
        assert_eq!(event.unwrap().hook_event_name, "SubagentStop");
        drop(writer);
    }

    #[tokio::test]
    async fn test_unterminated_payload_on_open_pipe() {
        let (mut writer, reader) = tokio::io::duplex(256);
        writer
            .write_all(br#"{"hook_event_name":"Stop"}"#)
            .await
            .unwrap();
        let event = read_event(reader, false, Duration::from_millis(50)).await;
        assert_eq!(event.unwrap().hook_event_name, "Stop");
        drop(writer);
    }

    #[tokio::test]
    async fn test_payload_split_across_writes() {
        let (mut writer, reader) = tokio::io::duplex(256);
        let reading = tokio::spawn(read_event(reader, false, TIMEOUT));
        writer.write_all(b"{\"hook_event_name\":").await.unwrap();
        tokio::task::yield_now().await;
        writer.write_all(b"\"Notification\"}").await.unwrap();
        drop(writer);
        let event = reading.await.unwrap();
        assert_eq!(event.unwrap().hook_event_name, "Notification");
    }
}
