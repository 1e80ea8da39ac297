use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Denormalized user projection the backend embeds in conversations and
/// group message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A direct or group conversation, as returned by `GET /api/conversations`.
///
/// Server-owned: the client never mutates one in place, it replaces the whole
/// list from the next snapshot. A non-group conversation has exactly two
/// participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub participants: Vec<String>,
    #[serde(default)]
    pub admins: Vec<String>,
    pub is_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub participant_details: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// The name to render for this conversation from `viewer_id`'s side:
    /// the group name for groups, the other participant's name for 1:1 chats.
    pub fn display_name(&self, viewer_id: &str) -> &str {
        if self.is_group {
            return self.name.as_deref().unwrap_or("Group Chat");
        }
        self.other_participant(viewer_id)
            .map(|u| u.name.as_str())
            .unwrap_or("Unknown")
    }

    /// The participant that is not `viewer_id`, for 1:1 chats.
    pub fn other_participant(&self, viewer_id: &str) -> Option<&UserSummary> {
        self.participant_details.iter().find(|p| p.id != viewer_id)
    }
}

/// A file attached to a message. Produced by the upload endpoint before the
/// message is sent, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// A single chat message. Never mutated after creation except the `read` flag,
/// which the server flips when the recipient opens the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_details: Option<UserSummary>,
}

impl Message {
    /// One-line preview for conversation list entries.
    pub fn preview(&self) -> &str {
        if !self.content.is_empty() {
            &self.content
        } else if !self.attachments.is_empty() {
            "Attachment"
        } else {
            ""
        }
    }
}

/// A server-generated notification, delivered via push and/or bulk fetch.
/// The client only ever flips `read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// POST body for `POST /api/conversations` — starting a 1:1 chat or a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub participants: Vec<String>,
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ConversationCreate {
    pub fn direct(me: &str, other: &str) -> Self {
        Self {
            name: None,
            participants: vec![me.to_string(), other.to_string()],
            is_group: false,
            avatar: None,
        }
    }

    pub fn group(name: impl Into<String>, participants: Vec<String>) -> Self {
        Self {
            name: Some(name.into()),
            participants,
            is_group: true,
            avatar: None,
        }
    }
}

/// POST body for `POST /api/messages`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreate {
    pub conversation_id: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
}
