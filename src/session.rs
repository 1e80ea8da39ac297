/// Authenticated session context, passed explicitly to everything that needs
/// it instead of living in a global. Tests can hold several independent ones.
///
/// The token is attached to REST calls by the resource client; the user id is
/// what the controller compares sender ids and participant lists against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), token: token.into() }
    }
}
