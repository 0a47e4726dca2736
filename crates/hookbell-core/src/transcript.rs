//! Summary extraction from the assistant's JSONL transcript.
//!
//! The transcript is append-only and can grow large, so it is read
//! backwards in fixed-size chunks and the scan stops at the first
//! (i.e. most recent) assistant record that carries text.

use serde::Deserialize;
use serde_json::Value;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

/// Maximum characters kept from the extracted summary.
pub const SUMMARY_MAX_CHARS: usize = 100;

const CHUNK_SIZE: u64 = 8 * 1024;

/// One line of the transcript.
///
/// Claude Code nests content under `message.content`; older or foreign logs
/// put it at the top level. Either may be a plain string or an array of
/// typed segments.
#[derive(Debug, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: Option<TranscriptMessage>,
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptMessage {
    #[serde(default)]
    pub content: Option<Value>,
}

impl TranscriptEntry {
    /// Whether the record was written by the model.
    pub fn is_assistant(&self) -> bool {
        self.kind == "assistant"
    }

    /// All text segments of the record, in order.
    pub fn text_segments(&self) -> Vec<&str> {
        let content = self
            .message
            .as_ref()
            .and_then(|m| m.content.as_ref())
            .or(self.content.as_ref());

        match content {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Extract a one-line summary of the latest assistant response.
///
/// Returns `None` if the file is missing, unreadable, empty, or holds no
/// assistant text. Unparsable lines are skipped.
pub async fn extract_summary(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    let mut lines = match ReverseLines::open(path).await {
        Ok(lines) => lines,
        Err(e) => {
            debug!("transcript {} not readable: {e}", path.display());
            return None;
        }
    };

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(e) => {
                debug!("transcript read failed: {e}");
                return None;
            }
        };

        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry: TranscriptEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.is_assistant() {
            continue;
        }

        let text = collapse_lines(&entry.text_segments().join("\n"));
        if !text.is_empty() {
            return Some(truncate_chars(&text, SUMMARY_MAX_CHARS));
        }
    }
}

/// Join all lines of `text` with single spaces, dropping blank lines.
fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the first `max` characters, appending `...` if anything was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Yields the lines of a file from last to first.
struct ReverseLines {
    file: File,
    /// Bytes before this offset have not been read yet.
    pos: u64,
    /// Pieces of a line whose start lies before `pos`, last piece first.
    carry: Vec<Vec<u8>>,
    /// Complete lines in file order; popped from the back.
    pending: Vec<Vec<u8>>,
}

impl ReverseLines {
    async fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        let pos = file.metadata().await?.len();
        Ok(Self {
            file,
            pos,
            carry: Vec::new(),
            pending: Vec::new(),
        })
    }

    async fn next_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        loop {
            if let Some(line) = self.pending.pop() {
                return Ok(Some(line));
            }
            if self.pos == 0 {
                let line: Vec<u8> = self.carry.drain(..).rev().flatten().collect();
                return Ok((!line.is_empty()).then_some(line));
            }

            let read_len = CHUNK_SIZE.min(self.pos);
            self.pos -= read_len;
            self.file.seek(SeekFrom::Start(self.pos)).await?;

            let mut buf = vec![0u8; read_len as usize];
            self.file.read_exact(&mut buf).await?;

            let Some(last_nl) = buf.iter().rposition(|b| *b == b'\n') else {
                self.carry.push(buf);
                continue;
            };

            let mut completed = buf[last_nl + 1..].to_vec();
            for piece in self.carry.drain(..).rev() {
                completed.extend_from_slice(&piece);
            }

            let mut parts = buf[..last_nl].split(|b| *b == b'\n');
            let head = parts.next().unwrap_or(&[]).to_vec();
            self.pending = parts.map(<[u8]>::to_vec).collect();
            self.pending.push(completed);
            self.carry.push(head);
        }
    }
}
