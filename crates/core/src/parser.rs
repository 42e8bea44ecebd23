// crates/core/src/parser.rs
//! Defensive JSONL parsing for transcript deltas.
//!
//! [`parse_line`] turns one line of text into at most one [`LogRecord`];
//! anything unparseable (log noise, malformed JSON) yields `None` rather
//! than an error. [`parse_delta`] runs the full line → record → normalized
//! message pipeline over a delta buffer while doing the byte accounting the
//! offset invariant depends on: only fully `\n`-terminated lines are
//! consumed, so a writer caught mid-append never corrupts the mirror.

use crate::extract::extract_content;
use chrono::{DateTime, Utc};
use memchr::memchr;
use openclaw_memory_types::{
    LogRecord, MessageRecord, NewMessage, Role, SessionMeta, SessionRecord, UNKNOWN_SOURCE,
};
use tracing::debug;

/// Parse one line of text as a structured record.
///
/// Empty/whitespace lines and malformed JSON yield `None` (logged at debug
/// level); they are skippable data, not errors.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(error = %e, "Skipping malformed JSONL line");
            None
        }
    }
}

/// Everything extracted from one delta region of a session file.
#[derive(Debug, Default)]
pub struct DeltaBatch {
    /// Session metadata, present when the delta contained a `session` record.
    pub session: Option<SessionMeta>,
    /// Normalized messages in file order.
    pub messages: Vec<NewMessage>,
    /// Bytes covered by fully-terminated lines. The recorded offset may be
    /// advanced by exactly this amount; a trailing unterminated fragment is
    /// left for the next pass.
    pub bytes_consumed: u64,
}

/// Run the parse/extract pipeline over a raw delta buffer.
///
/// Every complete line advances `bytes_consumed` — including empty,
/// malformed, and ignored-type lines. A complete line never needs to be
/// re-read; re-reading could not turn it into something different.
pub fn parse_delta(delta: &[u8]) -> DeltaBatch {
    let mut batch = DeltaBatch::default();
    let mut consumed = 0usize;

    while let Some(nl) = memchr(b'\n', &delta[consumed..]) {
        let raw = &delta[consumed..consumed + nl];
        consumed += nl + 1;

        let Ok(text) = std::str::from_utf8(raw) else {
            debug!("Skipping non-UTF-8 line in delta");
            continue;
        };
        let Some(record) = parse_line(text) else {
            continue;
        };

        match record {
            LogRecord::Session(header) => batch.session = Some(normalize_session(header)),
            LogRecord::Message(record) => {
                if let Some(message) = normalize_message(record) {
                    batch.messages.push(message);
                }
            }
            LogRecord::Other => {}
        }
    }

    batch.bytes_consumed = consumed as u64;
    batch
}

fn normalize_session(header: SessionRecord) -> SessionMeta {
    SessionMeta {
        started_at: parse_timestamp(header.timestamp.as_deref()),
        model: header.model,
        source: Some(header.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string())),
    }
}

/// Transform a raw message record into a normalized turn, or `None` when it
/// is ineligible: unkeyed, wrong role, or no extractable content.
fn normalize_message(record: MessageRecord) -> Option<NewMessage> {
    let message_id = record.id?;
    let payload = record.message?;
    let role = Role::from_wire(payload.role.as_deref()?)?;
    let content = extract_content(payload.content.as_ref()?)?;

    Some(NewMessage {
        message_id,
        parent_id: record.parent_id,
        role,
        content,
        source: record.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        created_at: parse_timestamp(record.timestamp.as_deref()).unwrap_or_else(Utc::now),
    })
}

/// Lenient RFC3339 parsing: a bad timestamp degrades to `None`, it does not
/// invalidate the record carrying it.
fn parse_timestamp(ts: Option<&str>) -> Option<DateTime<Utc>> {
    ts.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
