use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Locally stored proof of authentication. One backend variant names the
/// access token `access`, the other `token`; both land in `token` here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    #[serde(alias = "access")]
    pub token: String,
    #[serde(rename = "refresh")]
    pub refresh_token: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRoom {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "public", default)]
    pub is_public: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    File,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub sender: String,
    #[serde(default)]
    pub content: String,
    /// ISO 8601; lexicographic order matches chronological order.
    pub timestamp: String,
    #[serde(rename = "type", default = "MessageKind::text")]
    pub kind: MessageKind,
    #[serde(rename = "file_url", default)]
    pub attachment_url: Option<String>,
    #[serde(rename = "file_type", default)]
    pub attachment_mime_type: Option<String>,
}

impl MessageKind {
    fn text() -> Self {
        MessageKind::Text
    }
}

/// A file the user picked but has not finished uploading. Never persisted.
/// The MIME type and filename come from the picker and are sent verbatim.
#[derive(Debug, Clone)]
pub struct PendingAttachment {
    pub local_path: PathBuf,
    pub mime_type: String,
    pub file_name: String,
}

/// The backend serializes ids and senders as integer pks in some responses
/// and as strings in others; accept both.
fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(de)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
