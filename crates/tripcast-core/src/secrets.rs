use async_trait::async_trait;

use crate::error::SecretError;

/// Source of provider credentials (API keys, usernames).
///
/// Provider clients never hold keys of their own; they ask for one by name
/// right before each request so that keys stay on the backend.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError>;
}
