// crates/types/src/record.rs
//! Raw wire model of one transcript log line.
//!
//! Every line of a session file is one JSON object discriminated by a
//! top-level `type` field. Only `session` and `message` records matter to
//! the sync engine; everything else (tool calls, thinking, model changes,
//! custom events, streamed text fragments) deserializes into
//! [`LogRecord::Other`] and is counted but never stored.

use serde::Deserialize;

/// One decoded transcript line, discriminated on the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    /// Session header: emitted once when the transcript is opened.
    Session(SessionRecord),
    /// One conversational event carrying a role and content payload.
    Message(MessageRecord),
    /// Any other record type. Complete but irrelevant to the mirror.
    #[serde(other)]
    Other,
}

/// The `session`-typed header record.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub timestamp: Option<String>,
    pub model: Option<String>,
    pub source: Option<String>,
}

/// The `message`-typed record wrapping the actual conversational payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub source: Option<String>,
    pub timestamp: Option<String>,
    pub message: Option<MessagePayload>,
}

/// Role + content of a message record.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub role: Option<String>,
    pub content: Option<MessageContent>,
}

/// Message content is heterogeneous on the wire: older sessions carry a
/// bare string, newer ones an array of typed segments. Modeled as a closed
/// variant so extraction is a total match rather than runtime type sniffing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    PlainText(String),
    Segments(Vec<Segment>),
}

/// One element of the segment-array content shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl Segment {
    /// Internal segments carry model plumbing (reasoning, tool traffic),
    /// not conversation text, and never contribute to extraction.
    pub fn is_internal(&self) -> bool {
        matches!(self.kind.as_str(), "thinking" | "tool_call" | "tool_result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_session_record() {
        let line = r#"{"type":"session","timestamp":"2026-01-02T03:04:05Z","model":"claw-4","source":"ui"}"#;
        let record: LogRecord = serde_json::from_str(line).unwrap();
        match record {
            LogRecord::Session(s) => {
                assert_eq!(s.timestamp.as_deref(), Some("2026-01-02T03:04:05Z"));
                assert_eq!(s.model.as_deref(), Some("claw-4"));
                assert_eq!(s.source.as_deref(), Some("ui"));
            }
            other => panic!("expected session record, got {:?}", other),
        }
    }

    #[test]
    fn parses_message_with_string_content() {
        let line = r#"{"type":"message","id":"m1","parent_id":"m0","message":{"role":"user","content":"hello"}}"#;
        let record: LogRecord = serde_json::from_str(line).unwrap();
        match record {
            LogRecord::Message(m) => {
                assert_eq!(m.id.as_deref(), Some("m1"));
                assert_eq!(m.parent_id.as_deref(), Some("m0"));
                let payload = m.message.unwrap();
                assert_eq!(payload.role.as_deref(), Some("user"));
                assert!(matches!(
                    payload.content,
                    Some(MessageContent::PlainText(ref s)) if s == "hello"
                ));
            }
            other => panic!("expected message record, got {:?}", other),
        }
    }

    #[test]
    fn parses_message_with_segment_content() {
        let line = r#"{"type":"message","id":"m2","message":{"role":"assistant","content":[{"type":"thinking","text":"hmm"},{"type":"text","text":"answer"}]}}"#;
        let record: LogRecord = serde_json::from_str(line).unwrap();
        let LogRecord::Message(m) = record else {
            panic!("expected message record");
        };
        let Some(MessageContent::Segments(segments)) = m.message.unwrap().content else {
            panic!("expected segment content");
        };
        assert_eq!(segments.len(), 2);
        assert!(segments[0].is_internal());
        assert!(!segments[1].is_internal());
        assert_eq!(segments[1].text.as_deref(), Some("answer"));
    }

    #[test]
    fn unknown_types_fold_into_other() {
        for line in [
            r#"{"type":"toolCall","id":"t1"}"#,
            r#"{"type":"thinking","text":"..."}"#,
            r#"{"type":"model_change","model":"claw-5"}"#,
            r#"{"type":"custom","payload":{}}"#,
        ] {
            let record: LogRecord = serde_json::from_str(line).unwrap();
            assert!(matches!(record, LogRecord::Other), "line: {line}");
        }
    }

    #[test]
    fn missing_type_is_an_error() {
        assert!(serde_json::from_str::<LogRecord>(r#"{"id":"m1"}"#).is_err());
    }

    #[test]
    fn tool_segments_are_internal() {
        for kind in ["thinking", "tool_call", "tool_result"] {
            let seg = Segment {
                kind: kind.to_string(),
                text: Some("x".into()),
            };
            assert!(seg.is_internal(), "kind: {kind}");
        }
        let seg = Segment {
            kind: "text".to_string(),
            text: Some("x".into()),
        };
        assert!(!seg.is_internal());
    }
}
