// crates/core/src/extract.rs
//! Content extraction: collapse a message payload into plain text.

use openclaw_memory_types::MessageContent;

/// Normalize a content payload into plain text, or `None` for "no content".
///
/// Plain strings are returned verbatim. Segment arrays contribute only the
/// text of non-internal segments, joined by newline; reasoning and tool
/// traffic contribute nothing. An empty result is "no content" — such a
/// record is excluded from the message stream rather than stored empty.
pub fn extract_content(content: &MessageContent) -> Option<String> {
    match content {
        MessageContent::PlainText(text) => (!text.is_empty()).then(|| text.clone()),
        MessageContent::Segments(segments) => {
            let texts: Vec<&str> = segments
                .iter()
                .filter(|segment| !segment.is_internal())
                .filter_map(|segment| segment.text.as_deref())
                .filter(|text| !text.is_empty())
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openclaw_memory_types::Segment;
    use pretty_assertions::assert_eq;

    fn seg(kind: &str, text: Option<&str>) -> Segment {
        Segment {
            kind: kind.to_string(),
            text: text.map(String::from),
        }
    }

    #[test]
    fn plain_text_is_verbatim() {
        let content = MessageContent::PlainText("  hello\nworld ".to_string());
        assert_eq!(extract_content(&content).as_deref(), Some("  hello\nworld "));
    }

    #[test]
    fn empty_plain_text_is_no_content() {
        let content = MessageContent::PlainText(String::new());
        assert_eq!(extract_content(&content), None);
    }

    #[test]
    fn internal_segments_are_filtered() {
        let content = MessageContent::Segments(vec![
            seg("thinking", Some("let me reason")),
            seg("text", Some("the answer")),
            seg("tool_call", Some("{\"cmd\":\"ls\"}")),
            seg("tool_result", Some("file.txt")),
        ]);
        assert_eq!(extract_content(&content).as_deref(), Some("the answer"));
    }

    #[test]
    fn text_segments_join_with_newline() {
        let content = MessageContent::Segments(vec![
            seg("text", Some("first")),
            seg("text", Some("second")),
        ]);
        assert_eq!(extract_content(&content).as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn only_internal_segments_is_no_content() {
        let content = MessageContent::Segments(vec![
            seg("thinking", Some("private")),
            seg("tool_call", None),
        ]);
        assert_eq!(extract_content(&content), None);
    }

    #[test]
    fn textless_and_empty_segments_contribute_nothing() {
        let content = MessageContent::Segments(vec![
            seg("text", None),
            seg("text", Some("")),
            seg("image", None),
        ]);
        assert_eq!(extract_content(&content), None);
    }

    #[test]
    fn empty_segment_array_is_no_content() {
        let content = MessageContent::Segments(vec![]);
        assert_eq!(extract_content(&content), None);
    }
}
