use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    config::Config,
    error::{ApiError, EMAIL_TEMPLATES_INVALID_STATUS_ERROR, EMAIL_TEMPLATES_REQUEST_ERROR},
    model::templates::EmailTemplateType,
    service::session::SessionService,
};

#[async_trait]
pub trait EmailTemplatesService: Send + Sync {
    /// Fetch a template type with its locale-specific templates.
    async fn get_template_type(
        &self,
        template_type_id: &str,
    ) -> Result<EmailTemplateType, ApiError>;
}

pub struct HttpEmailTemplatesService {
    client: reqwest::Client,
    config: Arc<Config>,
    session: Arc<dyn SessionService>,
}

impl HttpEmailTemplatesService {
    pub fn new(
        client: reqwest::Client,
        config: Arc<Config>,
        session: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            client,
            config,
            session,
        }
    }
}

#[async_trait]
impl EmailTemplatesService for HttpEmailTemplatesService {
    async fn get_template_type(
        &self,
        template_type_id: &str,
    ) -> Result<EmailTemplateType, ApiError> {
        let url = self.config.email_template_type_url(template_type_id);

        tracing::debug!(url = %url, "fetching email template type");
        let mut request = self.client.get(&url);
        if let Some(token) = self.session.access_token().await {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|source| ApiError::Request {
            code: EMAIL_TEMPLATES_REQUEST_ERROR,
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "email template fetch rejected");
            return Err(ApiError::InvalidStatus {
                code: EMAIL_TEMPLATES_INVALID_STATUS_ERROR,
                status,
                url,
                body,
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            code: EMAIL_TEMPLATES_REQUEST_ERROR,
            url,
            source,
        })
    }
}
