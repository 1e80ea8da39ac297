use thiserror::Error;

/// Top-level sync error — everything the controller or the REST client can
/// surface to the host UI. All variants carry a human-readable message for
/// display/logging.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Transport errors ─────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Server error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Response parse failed: {0}")]
    Parse(#[source] reqwest::Error),

    // ── Authorization errors ─────────────────────────────────────────────────
    #[error("Authorization failed: {message}")]
    Unauthorized { message: String },

    // ── Validation errors (rejected before any request is issued) ────────────
    #[error("Message must have content or at least one attachment")]
    EmptyMessage,

    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },

    #[error("A group needs at least {minimum} other members")]
    GroupTooSmall { minimum: usize },

    #[error("A direct conversation must have exactly 2 participants (got {actual})")]
    DirectParticipants { actual: usize },
}

impl SyncError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SyncError::Network(_) | SyncError::Http { .. } | SyncError::Parse(_)
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SyncError::Unauthorized { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SyncError::EmptyMessage
                | SyncError::EmptyField { .. }
                | SyncError::FieldTooLong { .. }
                | SyncError::GroupTooSmall { .. }
                | SyncError::DirectParticipants { .. }
        )
    }
}
