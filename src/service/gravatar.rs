use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::{
    config::Config,
    error::{ApiError, GRAVATAR_INVALID_STATUS_ERROR, GRAVATAR_REQUEST_ERROR},
};

const DEFAULT_SIZE: u32 = 200;

/// The `d=404` default makes Gravatar answer 404 for unknown emails, which is
/// what turns a plain GET into an existence check.
pub const FALLBACK_404: &str = "404";

#[async_trait]
pub trait GravatarService: Send + Sync {
    /// Build the Gravatar URL for `email` and verify it resolves. Returns the
    /// URL on success, the operation's uniform error otherwise.
    async fn get_gravatar_image(
        &self,
        email: &str,
        size: Option<u32>,
        default_image: Option<&str>,
        fallback: &str,
    ) -> Result<String, ApiError>;
}

pub struct HttpGravatarService {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl HttpGravatarService {
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    fn avatar_url(&self, email: &str, size: u32, default_image: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(email.trim().to_lowercase().as_bytes());
        let hash = hex::encode(hasher.finalize());
        format!(
            "{}/avatar/{}?s={}&d={}",
            self.config.gravatar_base_url.trim_end_matches('/'),
            hash,
            size,
            urlencoding::encode(default_image)
        )
    }
}

#[async_trait]
impl GravatarService for HttpGravatarService {
    async fn get_gravatar_image(
        &self,
        email: &str,
        size: Option<u32>,
        default_image: Option<&str>,
        fallback: &str,
    ) -> Result<String, ApiError> {
        let size = size.unwrap_or(DEFAULT_SIZE);
        let url = self.avatar_url(email, size, default_image.unwrap_or(fallback));

        tracing::debug!(url = %url, "checking gravatar");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                code: GRAVATAR_REQUEST_ERROR,
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "no gravatar for email");
            return Err(ApiError::InvalidStatus {
                code: GRAVATAR_INVALID_STATUS_ERROR,
                status,
                url,
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(url)
    }
}
