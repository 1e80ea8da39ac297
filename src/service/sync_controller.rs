use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ResourceClient;
use crate::channel::{EventChannel, PushEvent};
use crate::errors::SyncError;
use crate::models::{
    Attachment, Conversation, ConversationCreate, Message, MessageCreate, Notification,
};
use crate::session::Session;

const MAX_MESSAGE_LENGTH: usize = 8000;
/// Other members a group needs besides its creator.
const MIN_GROUP_MEMBERS: usize = 2;

/// Lifecycle of the message pane. Only `Open` appends live push messages;
/// every other state leaves push handling to the conversation-list refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneState {
    Closed,
    Loading { conversation_id: String },
    Open { conversation_id: String, messages: Vec<Message> },
    Error { conversation_id: String, message: String },
}

/// Follow-up work a reducer step asks the event pump to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEffect {
    None,
    RefreshConversations,
}

/// Owns the client-side view of conversations, messages, and notifications.
///
/// REST snapshots overwrite collections wholesale; push events are
/// incremental appends funneled through [`SyncController::apply_event`]. All
/// state lives behind `&mut self`, so mutations interleave only at explicit
/// suspension points and a late snapshot overwriting newer push state is an
/// accepted race rather than a bug to correct here.
pub struct SyncController<C> {
    session: Session,
    client: C,
    conversations: Vec<Conversation>,
    pane: PaneState,
    notifications: Vec<Notification>,
    events: Option<mpsc::UnboundedReceiver<PushEvent>>,
}

impl<C: ResourceClient> SyncController<C> {
    pub fn new(session: Session, client: C) -> Self {
        Self {
            session,
            client,
            conversations: Vec::new(),
            pane: PaneState::Closed,
            notifications: Vec::new(),
            events: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Event channel lifecycle ──────────────────────────────────────────────

    /// Subscribe to the push channel. A second call replaces the previous
    /// subscription, so one published event is never handled twice.
    pub fn initialize(&mut self, channel: &dyn EventChannel) {
        self.events = Some(channel.subscribe());
    }

    /// Drain every already-delivered push event, running each through the
    /// reducer and executing its effect. Returns the number handled.
    pub async fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let event = match self.events.as_mut().map(|rx| rx.try_recv()) {
                Some(Ok(event)) => event,
                _ => break,
            };
            self.handle_event(event).await;
            handled += 1;
        }
        handled
    }

    /// Await the next push event, then handle it. Returns `false` once the
    /// channel is gone (never initialized, or the publisher hung up).
    pub async fn run_once(&mut self) -> bool {
        let event = {
            let Some(receiver) = self.events.as_mut() else {
                return false;
            };
            match receiver.recv().await {
                Some(event) => event,
                None => return false,
            }
        };
        self.handle_event(event).await;
        true
    }

    /// Apply one event and run the effect it requests. Refresh failures are
    /// logged, not fatal: the next push triggers another refresh.
    pub async fn handle_event(&mut self, event: PushEvent) {
        match self.apply_event(event) {
            SyncEffect::RefreshConversations => {
                if let Err(error) = self.load_conversations().await {
                    warn!(%error, "conversation list refresh after push failed");
                }
            }
            SyncEffect::None => {}
        }
    }

    /// The single mutation path for push-delivered deltas.
    pub fn apply_event(&mut self, event: PushEvent) -> SyncEffect {
        match event {
            PushEvent::NewMessage(message) => {
                if let PaneState::Open { conversation_id, messages } = &mut self.pane {
                    if *conversation_id == message.conversation_id {
                        messages.push(message);
                    }
                }
                // Unconditional: the refresh is what updates lastMessage
                // previews for conversations that are not open.
                SyncEffect::RefreshConversations
            }
            PushEvent::NewNotification(notification) => {
                // Prepended as delivered, without a dedup-by-id pass against
                // concurrently fetched snapshots.
                self.notifications.insert(0, notification);
                SyncEffect::None
            }
        }
    }

    // ── Conversations ────────────────────────────────────────────────────────

    /// Fetch the full conversation list and replace the local one. On failure
    /// the prior list stays untouched and the error surfaces; no retry.
    pub async fn load_conversations(&mut self) -> Result<(), SyncError> {
        self.conversations = self.client.list_conversations().await?;
        Ok(())
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Start a 1:1 chat or a group, refresh the list, and open the new
    /// thread. The backend reuses an existing 1:1 thread for the same pair.
    pub async fn start_conversation(
        &mut self,
        request: ConversationCreate,
    ) -> Result<Conversation, SyncError> {
        if request.is_group {
            if request.name.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err(SyncError::EmptyField { field_name: "name".to_string() });
            }
            let others = request
                .participants
                .iter()
                .filter(|id| **id != self.session.user_id)
                .count();
            if others < MIN_GROUP_MEMBERS {
                return Err(SyncError::GroupTooSmall { minimum: MIN_GROUP_MEMBERS });
            }
        } else if request.participants.len() != 2 {
            return Err(SyncError::DirectParticipants { actual: request.participants.len() });
        }

        let conversation = self.client.create_conversation(&request).await?;
        if let Err(error) = self.load_conversations().await {
            warn!(%error, "conversation list refresh after create failed");
        }
        if let Err(error) = self.open_conversation(&conversation.id).await {
            warn!(%error, conversation_id = %conversation.id, "failed to open new conversation");
        }
        Ok(conversation)
    }

    /// Remove self from a conversation. On success a matching pane closes and
    /// the list reloads.
    pub async fn leave_conversation(&mut self, conversation_id: &str) -> Result<(), SyncError> {
        let member_id = self.session.user_id.clone();
        self.client.leave_conversation(conversation_id, &member_id).await?;
        if self.active_conversation() == Some(conversation_id) {
            self.pane = PaneState::Closed;
        }
        self.load_conversations().await
    }

    // ── Message pane ─────────────────────────────────────────────────────────

    /// Point the pane at `conversation_id` and mark its history as loading.
    pub fn begin_open(&mut self, conversation_id: &str) {
        self.pane = PaneState::Loading { conversation_id: conversation_id.to_string() };
    }

    /// Apply a history fetch result. A result for a conversation that is no
    /// longer the pane's target is stale and gets discarded.
    pub fn finish_open(
        &mut self,
        conversation_id: &str,
        result: Result<Vec<Message>, SyncError>,
    ) -> Result<(), SyncError> {
        if self.active_conversation() != Some(conversation_id) {
            debug!(conversation_id, "discarding stale history response");
            return Ok(());
        }
        match result {
            Ok(messages) => {
                self.pane = PaneState::Open {
                    conversation_id: conversation_id.to_string(),
                    messages,
                };
                Ok(())
            }
            Err(error) => {
                self.pane = PaneState::Error {
                    conversation_id: conversation_id.to_string(),
                    message: error.to_string(),
                };
                Err(error)
            }
        }
    }

    /// Fetch and display a conversation's history: `begin_open` + REST fetch
    /// + `finish_open`. Hosts driving their own event loop can call the two
    /// halves directly and interleave fetches.
    pub async fn open_conversation(&mut self, conversation_id: &str) -> Result<(), SyncError> {
        self.begin_open(conversation_id);
        let result = self.client.list_messages(conversation_id).await;
        self.finish_open(conversation_id, result)
    }

    pub fn close_conversation(&mut self) {
        self.pane = PaneState::Closed;
    }

    pub fn pane(&self) -> &PaneState {
        &self.pane
    }

    /// The conversation the pane currently targets, in any non-closed state.
    pub fn active_conversation(&self) -> Option<&str> {
        match &self.pane {
            PaneState::Closed => None,
            PaneState::Loading { conversation_id }
            | PaneState::Open { conversation_id, .. }
            | PaneState::Error { conversation_id, .. } => Some(conversation_id),
        }
    }

    /// Messages of the open conversation; empty unless the pane is `Open`.
    pub fn messages(&self) -> &[Message] {
        match &self.pane {
            PaneState::Open { messages, .. } => messages,
            _ => &[],
        }
    }

    // ── Sending ──────────────────────────────────────────────────────────────

    /// Send a message. Validation runs before any request is issued; on
    /// success the canonical server message (server-assigned id, no temp-id
    /// reconciliation) is appended to a matching open pane and the
    /// conversation list refreshes. On failure local state is unchanged.
    pub async fn send(&mut self, request: MessageCreate) -> Result<Message, SyncError> {
        if request.content.trim().is_empty() && request.attachments.is_empty() {
            return Err(SyncError::EmptyMessage);
        }
        if request.content.len() > MAX_MESSAGE_LENGTH {
            return Err(SyncError::FieldTooLong {
                field_name: "content".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: request.content.len(),
            });
        }

        let message = self.client.create_message(&request).await?;
        if let PaneState::Open { conversation_id, messages } = &mut self.pane {
            if *conversation_id == message.conversation_id {
                messages.push(message.clone());
            }
        }
        if let Err(error) = self.load_conversations().await {
            warn!(%error, "conversation list refresh after send failed");
        }
        Ok(message)
    }

    pub async fn send_message(
        &mut self,
        conversation_id: &str,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> Result<Message, SyncError> {
        self.send(MessageCreate {
            conversation_id: conversation_id.to_string(),
            content: content.to_string(),
            attachments,
            project_id: None,
            project_title: None,
        })
        .await
    }

    /// Upload one file ahead of sending it as an attachment.
    pub async fn upload_attachment(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, SyncError> {
        self.client.upload_attachment(filename, mime_type, bytes).await
    }

    // ── Notifications ────────────────────────────────────────────────────────

    /// Fetch the notification snapshot and replace the local list.
    pub async fn load_notifications(&mut self) -> Result<(), SyncError> {
        self.notifications = self.client.list_notifications().await?;
        Ok(())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Unread count, recomputed from the list on every call — never stored.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Optimistically flip one notification to read and confirm with the
    /// server. The local flip survives a failed confirmation.
    pub async fn mark_notification_read(&mut self, notification_id: &str) {
        if let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            notification.read = true;
        }
        if let Err(error) = self.client.mark_notification_read(notification_id).await {
            warn!(%error, notification_id, "mark-read confirmation failed; keeping local state");
        }
    }

    /// Optimistically flip every notification to read and confirm with the
    /// server. The local flips survive a failed confirmation.
    pub async fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        if let Err(error) = self.client.mark_all_notifications_read().await {
            warn!(%error, "mark-all-read confirmation failed; keeping local state");
        }
    }

    /// Click-through on a notification: mark it read if unread, and hand the
    /// navigation target back to the host.
    pub async fn open_notification(&mut self, notification_id: &str) -> Option<String> {
        let unread = self
            .notifications
            .iter()
            .any(|n| n.id == notification_id && !n.read);
        if unread {
            self.mark_notification_read(notification_id).await;
        }
        self.notifications
            .iter()
            .find(|n| n.id == notification_id)
            .and_then(|n| n.link.clone())
    }
}
