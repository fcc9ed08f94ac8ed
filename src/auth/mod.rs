use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no API token is configured")]
    MissingToken,
}

/// Identity and credentials for the signed-in user.
///
/// Injected into the page controller so tests can substitute a fake;
/// the real implementation reads from [`Config`].
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Identifier of the signed-in user, or `None` when signed out.
    fn user_id(&self) -> Option<String>;

    /// Fetch a bearer token for API requests.
    async fn token(&self) -> Result<String, AuthError>;
}

/// [`AuthProvider`] backed by environment configuration.
pub struct EnvAuth {
    user_id: Option<String>,
    token: Option<String>,
}

impl EnvAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            user_id: config.clerk_user_id.clone(),
            token: config.clerk_api_token.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for EnvAuth {
    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    async fn token(&self) -> Result<String, AuthError> {
        self.token.clone().ok_or(AuthError::MissingToken)
    }
}
