use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{ApiError, ACCOUNT_SWITCH_INVALID_STATUS_ERROR, ACCOUNT_SWITCH_REQUEST_ERROR},
    model::profile::{LinkedAccount, TokenResponse},
};

const GRANT_TYPE_ACCOUNT_SWITCH: &str = "account_switch";

/// Holds the active session's token set and performs the account-switch
/// grant. A successful switch replaces the active token atomically; reads
/// never observe a half-updated session.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Exchange the current session for the linked account's session.
    async fn switch_account(&self, account: &LinkedAccount) -> Result<TokenResponse, ApiError>;

    /// Bearer token of the active session, if any.
    async fn access_token(&self) -> Option<String>;
}

pub struct HttpSessionService {
    client: reqwest::Client,
    config: Arc<Config>,
    active: RwLock<Option<TokenResponse>>,
}

impl HttpSessionService {
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self {
            client,
            config,
            active: RwLock::new(None),
        }
    }

    /// Seed the active session, e.g. from the login redirect's token set.
    pub async fn set_active(&self, token: TokenResponse) {
        let mut active = self.active.write().await;
        *active = Some(token);
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn switch_account(&self, account: &LinkedAccount) -> Result<TokenResponse, ApiError> {
        let url = self.config.token_url();
        let current_token = self.access_token().await.unwrap_or_default();

        tracing::debug!(username = %account.username, "switching account");
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", GRANT_TYPE_ACCOUNT_SWITCH),
                ("username", account.username.as_str()),
                ("userstore-domain", account.user_store_domain.as_str()),
                ("tenant-domain", account.tenant_domain.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("token", current_token.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ApiError::Request {
                code: ACCOUNT_SWITCH_REQUEST_ERROR,
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "account switch rejected");
            return Err(ApiError::InvalidStatus {
                code: ACCOUNT_SWITCH_INVALID_STATUS_ERROR,
                status,
                url,
                body,
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|source| ApiError::Decode {
                    code: ACCOUNT_SWITCH_REQUEST_ERROR,
                    url,
                    source,
                })?;

        let mut active = self.active.write().await;
        *active = Some(token.clone());
        tracing::info!(username = %account.username, "account switched");
        Ok(token)
    }

    async fn access_token(&self) -> Option<String> {
        let active = self.active.read().await;
        active.as_ref().map(|token| token.access_token.clone())
    }
}
