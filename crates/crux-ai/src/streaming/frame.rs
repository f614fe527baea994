//! Line classification and delta payload extraction.

/// Prefix of a data line, including the mandatory single space.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One newline-delimited unit of the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// `:`-prefixed keep-alive or comment.
    Comment(&'a str),
    /// `data: <payload>`, payload trimmed.
    Data(&'a str),
    /// `data: [DONE]`.
    Done,
    /// Anything else (`event:`, `id:`, stray text). Ignored by the framer.
    Other(&'a str),
}

impl<'a> Frame<'a> {
    /// Classify a line that has already had its `\n` / `\r\n` removed.
    pub fn classify(line: &'a str) -> Self {
        if let Some(comment) = line.strip_prefix(':') {
            return Frame::Comment(comment);
        }
        if line.trim().is_empty() {
            return Frame::Blank;
        }
        match line.strip_prefix(DATA_PREFIX) {
            Some(payload) => {
                let payload = payload.trim();
                if payload == DONE_SENTINEL {
                    Frame::Done
                } else {
                    Frame::Data(payload)
                }
            }
            None => Frame::Other(line),
        }
    }
}

/// Decoded body of a data frame: `{"choices":[{"delta":{"content":"..."}}]}`.
///
/// Only the first choice's delta text is kept; every other field is ignored
/// and any missing level yields an empty delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaPayload {
    content: String,
}

impl DeltaPayload {
    /// Parse a payload. Fails only when `payload` is not valid JSON.
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let content = value["choices"][0]["delta"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_line_kind() {
        assert_eq!(Frame::classify(""), Frame::Blank);
        assert_eq!(Frame::classify("   "), Frame::Blank);
        assert_eq!(Frame::classify(": keep-alive"), Frame::Comment(" keep-alive"));
        assert_eq!(Frame::classify("data: [DONE]"), Frame::Done);
        assert_eq!(Frame::classify("data:  [DONE]  "), Frame::Done);
        assert_eq!(Frame::classify("data: {\"a\":1} "), Frame::Data("{\"a\":1}"));
        assert_eq!(Frame::classify("event: message"), Frame::Other("event: message"));
    }

    #[test]
    fn data_prefix_requires_space() {
        assert_eq!(Frame::classify("data:{}"), Frame::Other("data:{}"));
    }

    #[test]
    fn extracts_first_choice_delta() {
        let p = DeltaPayload::parse(r#"{"choices":[{"delta":{"content":"Hel"}},{"delta":{"content":"x"}}]}"#)
            .unwrap();
        assert_eq!(p.content(), "Hel");
    }

    #[test]
    fn missing_fields_are_empty_delta() {
        for payload in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"delta":{}}]}"#,
            r#"{"choices":[{"delta":{"role":"assistant"}}]}"#,
            r#"{"choices":[{"delta":{"content":null}}]}"#,
            r#"{"choices":null}"#,
            "42",
        ] {
            let p = DeltaPayload::parse(payload).unwrap();
            assert!(p.is_empty(), "expected empty delta for {payload}");
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(DeltaPayload::parse(r#"{"choices":[{"delta":"#).is_err());
    }
}
