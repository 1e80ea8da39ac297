pub mod rest_client;

pub use rest_client::HttpResourceClient;

use crate::errors::SyncError;
use crate::models::{
    Attachment, Conversation, ConversationCreate, Message, MessageCreate, Notification,
};

/// Contract the sync controller consumes for everything REST-shaped.
///
/// Implementations return JSON-decoded models or a `SyncError`; the controller
/// never sees raw payloads. `HttpResourceClient` is the real transport, tests
/// swap in a scripted mock.
#[allow(async_fn_in_trait)]
pub trait ResourceClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, SyncError>;

    async fn create_conversation(
        &self,
        request: &ConversationCreate,
    ) -> Result<Conversation, SyncError>;

    /// Remove `member_id` from the conversation. Members may remove
    /// themselves; admins may remove anyone.
    async fn leave_conversation(
        &self,
        conversation_id: &str,
        member_id: &str,
    ) -> Result<(), SyncError>;

    /// Full message history for one conversation, oldest first.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, SyncError>;

    /// Create a message; the returned `Message` is canonical, with the
    /// server-assigned id and timestamp.
    async fn create_message(&self, request: &MessageCreate) -> Result<Message, SyncError>;

    /// Upload one file ahead of sending; the returned `Attachment` goes into
    /// a subsequent `MessageCreate`.
    async fn upload_attachment(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, SyncError>;

    /// Most recent notifications for the session user, newest first.
    async fn list_notifications(&self) -> Result<Vec<Notification>, SyncError>;

    async fn mark_notification_read(&self, notification_id: &str) -> Result<(), SyncError>;

    async fn mark_all_notifications_read(&self) -> Result<(), SyncError>;
}
