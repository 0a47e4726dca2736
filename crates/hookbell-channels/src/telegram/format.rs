//! Message shaping for the Bot API: header, length cap, HTML escaping.

use hookbell_core::{message::TaskMessage, status::TaskStatus};

/// Hard limit on a Telegram message, in characters.
pub const TELEGRAM_MAX_CHARS: usize = 4096;

const ELLIPSIS: &str = "...";

/// Fixed header: bold title, timestamp, and a status line for
/// anything other than plain completion.
pub fn build_header(title: &str, status: TaskStatus, timestamp: &str) -> String {
    let mut header = format!(
        "<b>{} {}</b>\n🕐 {timestamp}\n",
        status.emoji(),
        escape_html(title)
    );
    if status != TaskStatus::Completed {
        header.push_str(&format!("📌 Status: {}\n", status.label()));
    }
    header.push('\n');
    header
}

/// Render the full HTML text for `message`.
///
/// The body is escaped and cut so that header plus body stay within the
/// limit minus `margin`, counting the escaped text.
pub fn format_message(message: &TaskMessage, timestamp: &str, margin: usize) -> String {
    let header = build_header(&message.title, message.status(), timestamp);
    let budget = TELEGRAM_MAX_CHARS
        .saturating_sub(header.chars().count())
        .saturating_sub(margin);
    format!("{header}{}", fit_body(&message.body, budget))
}

/// Escape `body`, cutting it so the escaped result is at most `budget`
/// characters, ending with `...` when cut.
///
/// The cut never splits an escape sequence.
pub fn fit_body(body: &str, budget: usize) -> String {
    let full: usize = body.chars().map(escaped_len).sum();
    if full <= budget {
        return escape_html(body);
    }

    let room = budget.saturating_sub(ELLIPSIS.len());
    let mut used = 0;
    let mut out = String::new();
    for c in body.chars() {
        let width = escaped_len(c);
        if used + width > room {
            break;
        }
        used += width;
        push_escaped(&mut out, c);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Escape the characters Telegram's HTML parse mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#039;"),
        _ => out.push(c),
    }
}

/// Characters `c` occupies once escaped.
fn escaped_len(c: char) -> usize {
    match c {
        '&' => 5,
        '<' | '>' => 4,
        '"' | '\'' => 6,
        _ => 1,
    }
}
