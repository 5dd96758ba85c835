use std::collections::HashMap;

use async_trait::async_trait;
use tripcast_core::{SecretError, SecretProvider};

/// In-memory secrets for provider tests; unknown names are unavailable.
#[derive(Default)]
pub struct FixedSecrets(HashMap<String, String>);

impl FixedSecrets {
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl SecretProvider for FixedSecrets {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::unavailable(name, "not configured"))
    }
}
