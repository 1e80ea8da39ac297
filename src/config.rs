/// REST endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, no trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read configuration from the environment, loading `.env` if present
    /// (development convenience).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("DEVLINK_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".to_string());
        Self::new(base_url)
    }
}
