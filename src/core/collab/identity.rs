use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// How long an interactive sign-in may take before the launcher gives up.
pub const AUTH_WAIT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthTokens {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("authentication timed out after {0:?}")]
    Timeout(Duration),
    #[error("authentication failed: {0}")]
    Provider(String),
}

/// An interactive or cached authentication source. Implementations drive the
/// actual exchange (browser flow, token refresh, offline stub); the pipeline
/// only consumes the resulting tokens and profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self) -> Result<AuthTokens, AuthError>;

    async fn fetch_profile(&self, tokens: &AuthTokens) -> Result<PlayerProfile, AuthError>;
}

/// Run the provider's sign-in with an upper bound on how long the user may
/// keep the flow open.
pub async fn authenticate_with_timeout(
    provider: &dyn IdentityProvider,
    wait: Duration,
) -> Result<AuthTokens, AuthError> {
    let tokens = tokio::time::timeout(wait, provider.authenticate())
        .await
        .map_err(|_| AuthError::Timeout(wait))??;
    info!("authentication completed");
    Ok(tokens)
}
