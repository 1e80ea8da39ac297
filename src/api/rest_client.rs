use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use crate::api::ResourceClient;
use crate::config::ApiConfig;
use crate::errors::SyncError;
use crate::models::{
    Attachment, Conversation, ConversationCreate, Message, MessageCreate, Notification,
};
use crate::session::Session;

/// `ResourceClient` over HTTP. Attaches the session's bearer token to every
/// request and decodes responses at this boundary, so nothing downstream has
/// to trust payload shapes.
#[derive(Clone)]
pub struct HttpResourceClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpResourceClient {
    pub fn new(config: &ApiConfig, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success statuses into the error taxonomy, keeping whatever the
    /// server put in the body as the display message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::Unauthorized { message });
        }
        Err(SyncError::Http { status: status.as_u16(), message })
    }
}

impl ResourceClient for HttpResourceClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, SyncError> {
        let response = self
            .http
            .get(self.url("/conversations"))
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response)
            .await?
            .json::<Vec<Conversation>>()
            .await
            .map_err(SyncError::Parse)
    }

    async fn create_conversation(
        &self,
        request: &ConversationCreate,
    ) -> Result<Conversation, SyncError> {
        let response = self
            .http
            .post(self.url("/conversations"))
            .bearer_auth(&self.session.token)
            .json(request)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response)
            .await?
            .json::<Conversation>()
            .await
            .map_err(SyncError::Parse)
    }

    async fn leave_conversation(
        &self,
        conversation_id: &str,
        member_id: &str,
    ) -> Result<(), SyncError> {
        let response = self
            .http
            .delete(self.url(&format!(
                "/conversations/{conversation_id}/members/{member_id}"
            )))
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, SyncError> {
        let response = self
            .http
            .get(self.url(&format!("/conversations/{conversation_id}/messages")))
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response)
            .await?
            .json::<Vec<Message>>()
            .await
            .map_err(SyncError::Parse)
    }

    async fn create_message(&self, request: &MessageCreate) -> Result<Message, SyncError> {
        let response = self
            .http
            .post(self.url("/messages"))
            .bearer_auth(&self.session.token)
            .json(request)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response)
            .await?
            .json::<Message>()
            .await
            .map_err(SyncError::Parse)
    }

    async fn upload_attachment(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, SyncError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(SyncError::Network)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/messages/upload"))
            .bearer_auth(&self.session.token)
            .multipart(form)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response)
            .await?
            .json::<Attachment>()
            .await
            .map_err(SyncError::Parse)
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, SyncError> {
        let response = self
            .http
            .get(self.url("/notifications"))
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response)
            .await?
            .json::<Vec<Notification>>()
            .await
            .map_err(SyncError::Parse)
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<(), SyncError> {
        let response = self
            .http
            .put(self.url(&format!("/notifications/{notification_id}/read")))
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<(), SyncError> {
        let response = self
            .http
            .put(self.url("/notifications/read-all"))
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(SyncError::Network)?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
