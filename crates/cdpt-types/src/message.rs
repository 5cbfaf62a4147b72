use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Suffix appended to the caller identifier when naming a stored transcript.
const CHAT_HISTORY_SUFFIX: &str = "_chatHistory.json";

/// Storage filename for the transcript of `identifier`.
pub fn chat_history_filename(identifier: &str) -> String {
    format!("{}{}", identifier, CHAT_HISTORY_SUFFIX)
}

/// One entry of a chat transcript
///
/// Fields the frontend attaches beyond `role`/`content`/`timestamp` are kept
/// in `extra` so they survive a save/load cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    /// Any JSON number; kept as received so it serializes back unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp: None,
            extra: Map::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<Number>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Timestamp used for ordering; a missing timestamp counts as 0.
    pub fn sort_key(&self) -> f64 {
        self.timestamp
            .as_ref()
            .and_then(Number::as_f64)
            .unwrap_or(0.0)
    }
}

/// Ordered transcript, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory(Vec<ChatMessage>);

impl ChatHistory {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self(messages)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    /// Reorder newest first.
    ///
    /// The sort is stable, so messages sharing a timestamp (or both lacking
    /// one) keep their stored relative order.
    pub fn sort_newest_first(&mut self) {
        self.0.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
    }

    pub fn sorted_newest_first(mut self) -> Self {
        self.sort_newest_first();
        self
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
