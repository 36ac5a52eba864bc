use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    config::Config,
    error::{
        ApiError, PROFILE_INFO_INVALID_STATUS_ERROR, PROFILE_INFO_REQUEST_ERROR,
        PROFILE_SCHEMAS_INVALID_STATUS_ERROR, PROFILE_SCHEMAS_REQUEST_ERROR,
        PROFILE_UPDATE_INVALID_STATUS_ERROR, PROFILE_UPDATE_REQUEST_ERROR,
    },
    model::profile::{ProfileInfo, ProfileSchema, ScimPatch, ScimUser},
    service::{
        gravatar::{GravatarService, FALLBACK_404},
        session::SessionService,
    },
};

const SCIM_CONTENT_TYPE: &str = "application/scim+json";

/// Gravatar parameters used when the profile carries no image of its own.
#[derive(Debug, Clone)]
pub struct GravatarConfig {
    pub size: Option<u32>,
    pub default_image: Option<String>,
    pub fallback: String,
}

impl Default for GravatarConfig {
    fn default() -> Self {
        Self {
            size: None,
            default_image: None,
            fallback: FALLBACK_404.to_string(),
        }
    }
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Fetch the authenticated user's SCIM profile.
    ///
    /// A missing profile image degrades to a Gravatar lookup and, failing
    /// that, to an empty string; neither failure aborts the fetch. A
    /// server-reported internal error maps to [`ApiError::ScimDisabled`] so
    /// the caller can redirect instead of showing a generic failure.
    async fn get_profile_info(
        &self,
        gravatar_config: Option<GravatarConfig>,
    ) -> Result<ProfileInfo, ApiError>;

    /// Apply a partial update to the profile and return the refreshed view.
    async fn update_profile_info(&self, patch: ScimPatch) -> Result<ProfileInfo, ApiError>;

    /// Fetch claim-schema metadata for the dynamic profile form.
    async fn get_profile_schemas(&self) -> Result<Vec<ProfileSchema>, ApiError>;
}

pub struct HttpProfileService {
    client: reqwest::Client,
    config: Arc<Config>,
    gravatar: Arc<dyn GravatarService>,
    session: Arc<dyn SessionService>,
}

impl HttpProfileService {
    pub fn new(
        client: reqwest::Client,
        config: Arc<Config>,
        gravatar: Arc<dyn GravatarService>,
        session: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            client,
            config,
            gravatar,
            session,
        }
    }

    async fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.access_token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn resolve_fallback_image(
        &self,
        user: &ScimUser,
        gravatar_config: Option<GravatarConfig>,
    ) -> Option<String> {
        let has_image = user
            .user_image
            .as_deref()
            .is_some_and(|value| !value.is_empty())
            || user
                .profile_url
                .as_deref()
                .is_some_and(|value| !value.is_empty());
        if has_image {
            return None;
        }

        let email = user.emails.first()?.value().to_string();
        let gravatar_config = gravatar_config.unwrap_or_default();
        match self
            .gravatar
            .get_gravatar_image(
                &email,
                gravatar_config.size,
                gravatar_config.default_image.as_deref(),
                &gravatar_config.fallback,
            )
            .await
        {
            Ok(url) => Some(url),
            Err(err) => {
                // No Gravatar is an expected outcome, not a profile failure.
                tracing::debug!(code = err.code(), "gravatar fallback unavailable");
                None
            }
        }
    }
}

/// The backend signals "SCIM disabled" by embedding a 500 status in the error
/// payload. Old server versions send it as the string `"500"`, newer ones as
/// a number; both count.
fn is_scim_disabled_payload(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return false;
    };
    match value.get("status") {
        Some(serde_json::Value::String(status)) => status == "500",
        Some(serde_json::Value::Number(status)) => status.as_u64() == Some(500),
        _ => false,
    }
}

#[async_trait]
impl ProfileService for HttpProfileService {
    async fn get_profile_info(
        &self,
        gravatar_config: Option<GravatarConfig>,
    ) -> Result<ProfileInfo, ApiError> {
        let url = self.config.me_url();

        tracing::debug!(url = %url, "fetching profile");
        let request = self
            .authorized(self.client.get(&url).header("Accept", SCIM_CONTENT_TYPE))
            .await;
        let response = request.send().await.map_err(|source| ApiError::Request {
            code: PROFILE_INFO_REQUEST_ERROR,
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            if is_scim_disabled_payload(&body) {
                tracing::error!(status = %status, "profile backend disabled");
                return Err(ApiError::ScimDisabled { status, url, body });
            }
            tracing::error!(status = %status, "profile fetch rejected");
            return Err(ApiError::InvalidStatus {
                code: PROFILE_INFO_INVALID_STATUS_ERROR,
                status,
                url,
                body,
            });
        }

        let user: ScimUser = response.json().await.map_err(|source| ApiError::Decode {
            code: PROFILE_INFO_REQUEST_ERROR,
            url,
            source,
        })?;

        let fallback_image = self.resolve_fallback_image(&user, gravatar_config).await;
        Ok(ProfileInfo::from_scim(user, fallback_image))
    }

    async fn update_profile_info(&self, patch: ScimPatch) -> Result<ProfileInfo, ApiError> {
        let url = self.config.me_url();

        tracing::debug!(url = %url, "updating profile");
        let request = self
            .authorized(
                self.client
                    .patch(&url)
                    .header("Accept", SCIM_CONTENT_TYPE)
                    .json(&patch),
            )
            .await;
        let response = request.send().await.map_err(|source| ApiError::Request {
            code: PROFILE_UPDATE_REQUEST_ERROR,
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "profile update rejected");
            return Err(ApiError::InvalidStatus {
                code: PROFILE_UPDATE_INVALID_STATUS_ERROR,
                status,
                url,
                body,
            });
        }

        let user: ScimUser = response.json().await.map_err(|source| ApiError::Decode {
            code: PROFILE_UPDATE_REQUEST_ERROR,
            url,
            source,
        })?;
        Ok(ProfileInfo::from_scim(user, None))
    }

    async fn get_profile_schemas(&self) -> Result<Vec<ProfileSchema>, ApiError> {
        let url = self.config.profile_schemas_url();

        tracing::debug!(url = %url, "fetching profile schemas");
        let request = self.authorized(self.client.get(&url)).await;
        let response = request.send().await.map_err(|source| ApiError::Request {
            code: PROFILE_SCHEMAS_REQUEST_ERROR,
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "profile schemas fetch rejected");
            return Err(ApiError::InvalidStatus {
                code: PROFILE_SCHEMAS_INVALID_STATUS_ERROR,
                status,
                url,
                body,
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            code: PROFILE_SCHEMAS_REQUEST_ERROR,
            url,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{GRAVATAR_INVALID_STATUS_ERROR, SCIM_DISABLED_ERROR},
        model::profile::{LinkedAccount, TokenResponse},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    struct StubGravatarService {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubGravatarService {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GravatarService for StubGravatarService {
        async fn get_gravatar_image(
            &self,
            email: &str,
            _size: Option<u32>,
            _default_image: Option<&str>,
            _fallback: &str,
        ) -> Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::InvalidStatus {
                    code: GRAVATAR_INVALID_STATUS_ERROR,
                    status: reqwest::StatusCode::NOT_FOUND,
                    url: "https://www.gravatar.com/avatar/x?d=404".to_string(),
                    body: String::new(),
                });
            }
            Ok(format!("https://www.gravatar.com/avatar/{}?d=404", email))
        }
    }

    struct StubSessionService;

    #[async_trait]
    impl SessionService for StubSessionService {
        async fn switch_account(
            &self,
            _account: &LinkedAccount,
        ) -> Result<TokenResponse, ApiError> {
            unreachable!("profile tests never switch accounts")
        }

        async fn access_token(&self) -> Option<String> {
            None
        }
    }

    fn service(origin: &str, gravatar: Arc<StubGravatarService>) -> HttpProfileService {
        HttpProfileService::new(
            reqwest::Client::new(),
            Arc::new(Config {
                server_origin: origin.to_string(),
                scim_me_path: "/scim2/Me".to_string(),
                profile_schemas_path: "/scim2/Schemas".to_string(),
                email_template_types_path: "/api/server/v1/email/template-types".to_string(),
                token_path: "/oauth2/token".to_string(),
                client_id: "CONSOLE".to_string(),
                tenant_domain: "carbon.super".to_string(),
                gravatar_base_url: "https://www.gravatar.com".to_string(),
                request_timeout_seconds: 10,
            }),
            gravatar,
            Arc::new(StubSessionService),
        )
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    /// Answers exactly one request with a canned response and returns the
    /// server origin.
    async fn serve_once(response: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn disabled_payload_matches_string_and_numeric_status() {
        assert!(is_scim_disabled_payload(r#"{"status":"500"}"#));
        assert!(is_scim_disabled_payload(r#"{"status":500}"#));
    }

    #[test]
    fn other_payloads_are_not_disabled() {
        assert!(!is_scim_disabled_payload(r#"{"status":"403"}"#));
        assert!(!is_scim_disabled_payload(r#"{"detail":"forbidden"}"#));
        assert!(!is_scim_disabled_payload("not json"));
        assert!(!is_scim_disabled_payload(""));
    }

    #[tokio::test]
    async fn gravatar_is_skipped_when_profile_carries_an_image() {
        let origin = serve_once(http_response(
            "200 OK",
            r#"{"userName":"alice","emails":["alice@example.com"],"userImage":"https://img.example.com/a.png"}"#,
        ))
        .await;
        let gravatar = StubGravatarService::new(false);
        let info = service(&origin, gravatar.clone())
            .get_profile_info(Some(GravatarConfig::default()))
            .await
            .expect("profile fetch");

        assert_eq!(info.user_image, "https://img.example.com/a.png");
        assert_eq!(gravatar.call_count(), 0);
    }

    #[tokio::test]
    async fn gravatar_is_attempted_when_profile_has_no_image() {
        let origin = serve_once(http_response(
            "200 OK",
            r#"{"userName":"alice","emails":["alice@example.com"]}"#,
        ))
        .await;
        let gravatar = StubGravatarService::new(false);
        let info = service(&origin, gravatar.clone())
            .get_profile_info(None)
            .await
            .expect("profile fetch");

        assert_eq!(gravatar.call_count(), 1);
        assert_eq!(
            info.user_image,
            "https://www.gravatar.com/avatar/alice@example.com?d=404"
        );
    }

    #[tokio::test]
    async fn gravatar_failure_degrades_to_empty_image() {
        let origin = serve_once(http_response(
            "200 OK",
            r#"{"userName":"alice","emails":["alice@example.com"]}"#,
        ))
        .await;
        let gravatar = StubGravatarService::new(true);
        let info = service(&origin, gravatar.clone())
            .get_profile_info(None)
            .await
            .expect("profile fetch still succeeds");

        assert_eq!(gravatar.call_count(), 1);
        assert_eq!(info.user_image, "");
    }

    #[tokio::test]
    async fn non_200_surfaces_the_designated_error_code() {
        let origin = serve_once(http_response(
            "403 Forbidden",
            r#"{"detail":"forbidden"}"#,
        ))
        .await;
        let err = service(&origin, StubGravatarService::new(false))
            .get_profile_info(None)
            .await
            .expect_err("fetch must fail");

        assert_eq!(err.code(), PROFILE_INFO_INVALID_STATUS_ERROR);
        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
        assert!(!err.redirect_required());
    }

    #[tokio::test]
    async fn disabled_backend_maps_to_scim_disabled_exactly_once() {
        let origin = serve_once(http_response(
            "500 Internal Server Error",
            r#"{"status":"500"}"#,
        ))
        .await;
        let err = service(&origin, StubGravatarService::new(false))
            .get_profile_info(None)
            .await
            .expect_err("fetch must fail");

        assert_eq!(err.code(), SCIM_DISABLED_ERROR);
        assert!(err.redirect_required());
    }
}
