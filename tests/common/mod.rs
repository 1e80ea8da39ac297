#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

use chrono::Utc;
use uuid::Uuid;

use devlink_sync::api::ResourceClient;
use devlink_sync::errors::SyncError;
use devlink_sync::models::{
    Attachment, Conversation, ConversationCreate, Message, MessageCreate, Notification,
    UserSummary,
};
use devlink_sync::session::Session;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init()
            .ok();
    });
}

pub fn session(user_id: &str) -> Session {
    Session::new(user_id, format!("token-{user_id}"))
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn user(id: &str, name: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: name.to_string(),
        username: name.to_lowercase(),
        avatar: None,
    }
}

pub fn direct_conversation(id: &str, a: &str, b: &str) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: None,
        participants: vec![a.to_string(), b.to_string()],
        admins: vec![],
        is_group: false,
        avatar: None,
        created_by: a.to_string(),
        last_message: None,
        participant_details: vec![user(a, a), user(b, b)],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn group_conversation(id: &str, name: &str, members: &[&str]) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: Some(name.to_string()),
        participants: members.iter().map(|m| m.to_string()).collect(),
        admins: vec![members[0].to_string()],
        is_group: true,
        avatar: None,
        created_by: members[0].to_string(),
        last_message: None,
        participant_details: members.iter().map(|m| user(m, m)).collect(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn message(id: &str, conversation_id: &str, sender_id: &str, content: &str) -> Message {
    Message {
        id: id.to_string(),
        conversation_id: conversation_id.to_string(),
        sender_id: sender_id.to_string(),
        content: content.to_string(),
        project_id: None,
        project_title: None,
        attachments: vec![],
        read: false,
        created_at: Utc::now(),
        sender_details: None,
    }
}

pub fn notification(id: &str, message: &str, read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        user_id: "u1".to_string(),
        kind: "mention".to_string(),
        message: message.to_string(),
        link: None,
        read,
        created_at: Utc::now(),
    }
}

pub fn attachment(filename: &str) -> Attachment {
    Attachment {
        filename: filename.to_string(),
        url: format!("http://localhost:8000/uploads/{filename}"),
        size: 42,
        mime_type: "text/plain".to_string(),
    }
}

// ── Scripted ResourceClient ──────────────────────────────────────────────────

#[derive(Default)]
struct MockState {
    conversations: Vec<Conversation>,
    messages: HashMap<String, Vec<Message>>,
    notifications: Vec<Notification>,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
}

/// In-memory stand-in for the backend. Cloning shares the same state, so a
/// test can keep a handle for scripting and inspection after the controller
/// takes ownership of its copy.
#[derive(Clone, Default)]
pub struct MockClient {
    inner: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_conversation(&self, conversation: Conversation) {
        self.inner.lock().unwrap().conversations.push(conversation);
    }

    pub fn set_messages(&self, conversation_id: &str, messages: Vec<Message>) {
        self.inner
            .lock()
            .unwrap()
            .messages
            .insert(conversation_id.to_string(), messages);
    }

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        self.inner.lock().unwrap().notifications = notifications;
    }

    /// Record a new message server-side, bumping the conversation's
    /// lastMessage preview the way the backend does.
    pub fn record_message(&self, message: Message) {
        let mut state = self.inner.lock().unwrap();
        if let Some(conv) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == message.conversation_id)
        {
            conv.last_message = Some(message.clone());
        }
        state
            .messages
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message);
    }

    /// Make `method` fail with a scripted HTTP 500 until cleared.
    pub fn fail(&self, method: &'static str) {
        self.inner.lock().unwrap().failing.insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.inner.lock().unwrap().failing.remove(method);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    pub fn server_notifications(&self) -> Vec<Notification> {
        self.inner.lock().unwrap().notifications.clone()
    }

    fn record(&self, call: String) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn check(&self, method: &'static str) -> Result<(), SyncError> {
        if self.inner.lock().unwrap().failing.contains(method) {
            return Err(SyncError::Http {
                status: 500,
                message: format!("scripted failure: {method}"),
            });
        }
        Ok(())
    }
}

impl ResourceClient for MockClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, SyncError> {
        self.record("list_conversations".to_string());
        self.check("list_conversations")?;
        Ok(self.inner.lock().unwrap().conversations.clone())
    }

    async fn create_conversation(
        &self,
        request: &ConversationCreate,
    ) -> Result<Conversation, SyncError> {
        self.record("create_conversation".to_string());
        self.check("create_conversation")?;
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            participants: request.participants.clone(),
            admins: vec![],
            is_group: request.is_group,
            avatar: request.avatar.clone(),
            created_by: request.participants.first().cloned().unwrap_or_default(),
            last_message: None,
            participant_details: request
                .participants
                .iter()
                .map(|p| user(p, p))
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .conversations
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn leave_conversation(
        &self,
        conversation_id: &str,
        member_id: &str,
    ) -> Result<(), SyncError> {
        self.record(format!("leave_conversation {conversation_id} {member_id}"));
        self.check("leave_conversation")?;
        let mut state = self.inner.lock().unwrap();
        if let Some(conv) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conv.participants.retain(|p| p != member_id);
            conv.admins.retain(|a| a != member_id);
        }
        Ok(())
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, SyncError> {
        self.record(format!("list_messages {conversation_id}"));
        self.check("list_messages")?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_message(&self, request: &MessageCreate) -> Result<Message, SyncError> {
        self.record(format!("create_message {}", request.conversation_id));
        self.check("create_message")?;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: request.conversation_id.clone(),
            sender_id: "mock-sender".to_string(),
            content: request.content.clone(),
            project_id: request.project_id.clone(),
            project_title: request.project_title.clone(),
            attachments: request.attachments.clone(),
            read: false,
            created_at: Utc::now(),
            sender_details: None,
        };
        self.record_message(message.clone());
        Ok(message)
    }

    async fn upload_attachment(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, SyncError> {
        self.record(format!("upload_attachment {filename}"));
        self.check("upload_attachment")?;
        Ok(Attachment {
            filename: filename.to_string(),
            url: format!("http://localhost:8000/uploads/{filename}"),
            size: bytes.len() as u64,
            mime_type: mime_type.to_string(),
        })
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, SyncError> {
        self.record("list_notifications".to_string());
        self.check("list_notifications")?;
        Ok(self.inner.lock().unwrap().notifications.clone())
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<(), SyncError> {
        self.record(format!("mark_notification_read {notification_id}"));
        self.check("mark_notification_read")?;
        let mut state = self.inner.lock().unwrap();
        if let Some(n) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            n.read = true;
        }
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<(), SyncError> {
        self.record("mark_all_notifications_read".to_string());
        self.check("mark_all_notifications_read")?;
        for n in &mut self.inner.lock().unwrap().notifications {
            n.read = true;
        }
        Ok(())
    }
}
