use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

/// On-disk shape of `sessions-index.json`.
///
/// Current Claude Code releases wrap the list as `{"version": 1, "entries": [...]}`;
/// a bare array is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IndexDocument {
    Wrapped { entries: Vec<Value> },
    Bare(Vec<Value>),
}

impl IndexDocument {
    pub fn into_entries(self) -> Vec<Value> {
        match self {
            IndexDocument::Wrapped { entries } => entries,
            IndexDocument::Bare(entries) => entries,
        }
    }
}

/// One line of a session log. Only the fields lorekeep reads are modelled.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ClaudeRecord {
    User(UserRecord),
    Assistant(AssistantRecord),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRecord {
    pub message: UserMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserMessage {
    pub content: UserContent,
}

/// A typed prompt is a plain string; anything else (tool results, images)
/// arrives as an array of blocks and is not conversation text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserContent {
    Text(String),
    Composite(IgnoredAny),
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantRecord {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantMessage {
    #[serde(default, deserialize_with = "deserialize_assistant_content")]
    pub content: Vec<AssistantContent>,
}

fn deserialize_assistant_content<'de, D>(deserializer: D) -> Result<Vec<AssistantContent>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrArray {
        String(String),
        Array(Vec<AssistantContent>),
    }

    match StringOrArray::deserialize(deserializer)? {
        StringOrArray::String(text) => Ok(vec![AssistantContent::Text { text }]),
        StringOrArray::Array(blocks) => Ok(blocks),
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum AssistantContent {
    Text {
        text: String,
    },
    /// tool_use, thinking, and anything newer
    #[serde(other)]
    Other,
}
