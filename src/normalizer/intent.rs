//! Parsing untrusted classification text into an [`Intent`]

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::ClassifyError;

/// Hard cap on the length of a direct answer, in characters.
pub const MAX_ANSWER_CHARS: usize = 240;

/// What the downstream dispatcher receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizerResult {
    /// Canonical command, or the trimmed original utterance
    pub transcript: String,

    /// Short direct reply, only for chit-chat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl NormalizerResult {
    /// A result with no answer: either a canonical command or the
    /// utterance echoed unchanged.
    pub fn passthrough(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            answer: None,
        }
    }
}

/// A classified utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Search(String),
    Calculate(String),
    AddNote(String),
    ListNotes,
    Answer(String),
    /// Invalid, unrecognized, or unavailable
    Passthrough,
}

/// The `{action, content}` pair pulled out of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRecord {
    action: String,
    content: String,
}

impl Intent {
    /// Classify a raw service response for `transcript` (already trimmed).
    ///
    /// Anything unusable becomes [`Intent::Passthrough`].
    pub fn from_response(text: &str, transcript: &str) -> Self {
        Self::parse_response(text, transcript).unwrap_or(Self::Passthrough)
    }

    /// Like [`Intent::from_response`], but says why a response was rejected.
    pub fn parse_response(text: &str, transcript: &str) -> Result<Self, ClassifyError> {
        let record = extract_record(text)?;
        match Self::from_record(&record, transcript) {
            Self::Passthrough => Err(ClassifyError::Malformed(format!(
                "unusable action '{}'",
                record.action.trim()
            ))),
            intent => Ok(intent),
        }
    }

    fn from_record(record: &RawRecord, transcript: &str) -> Self {
        let action = record.action.trim().to_lowercase();
        let content = record.content.trim();
        let payload = || {
            if content.is_empty() {
                transcript.to_string()
            } else {
                content.to_string()
            }
        };

        match action.as_str() {
            "search" => Self::Search(payload()),
            "calculate" => Self::Calculate(payload()),
            "add_note" => Self::AddNote(payload()),
            "list_notes" => Self::ListNotes,
            "answer" if !content.is_empty() => Self::Answer(truncate_answer(content)),
            _ => Self::Passthrough,
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Calculate(_) => "calculate",
            Self::AddNote(_) => "add_note",
            Self::ListNotes => "list_notes",
            Self::Answer(_) => "answer",
            Self::Passthrough => "passthrough",
        }
    }

    /// Map onto the canonical output form.
    pub fn into_result(self, transcript: &str) -> NormalizerResult {
        match self {
            Self::Search(topic) => NormalizerResult::passthrough(format!("search {topic}")),
            Self::Calculate(expr) => NormalizerResult::passthrough(format!("calculate {expr}")),
            Self::AddNote(note) => NormalizerResult::passthrough(format!("add a note {note}")),
            Self::ListNotes => NormalizerResult::passthrough("list notes"),
            Self::Answer(answer) => NormalizerResult {
                transcript: transcript.to_string(),
                answer: Some(answer),
            },
            Self::Passthrough => NormalizerResult::passthrough(transcript),
        }
    }
}

fn object_pattern() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // Greedy, spans newlines: first '{' to last '}'
    REGEX.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("Invalid regex"))
}

/// Pull a single `{action, content}` object out of free text.
fn extract_record(text: &str) -> Result<RawRecord, ClassifyError> {
    let candidate = object_pattern()
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(text);

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| ClassifyError::Malformed(format!("not JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| ClassifyError::Malformed("not a JSON object".to_string()))?;

    let field = |name: &str| match object.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ClassifyError::Malformed(format!("'{name}' is not a string"))),
    };

    Ok(RawRecord {
        action: field("action")?,
        content: field("content")?,
    })
}

fn truncate_answer(content: &str) -> String {
    content
        .chars()
        .take(MAX_ANSWER_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
