use std::{env, sync::Arc};

use crate::config::Config;

pub trait ConfigService: Send + Sync {
    fn values(&self) -> &Config;
    fn shared(&self) -> Arc<Config>;
}

pub struct ConfigServiceImpl {
    config: Arc<Config>,
}

impl ConfigServiceImpl {
    fn strip_wrapping_quotes(value: &str) -> &str {
        if value.len() >= 2 {
            let bytes = value.as_bytes();
            let first = bytes[0];
            let last = bytes[value.len() - 1];
            if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
                return &value[1..value.len() - 1];
            }
        }
        value
    }

    fn env_nonempty(key: &str) -> Option<String> {
        env::var(key).ok().and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            let normalized = Self::strip_wrapping_quotes(trimmed).trim();
            if normalized.is_empty() {
                None
            } else {
                Some(normalized.to_string())
            }
        })
    }

    fn env_u64(key: &str) -> Option<u64> {
        Self::env_nonempty(key).and_then(|value| value.parse::<u64>().ok())
    }

    pub fn new() -> Self {
        let server_origin = Self::env_nonempty("CONSOLE_SERVER_ORIGIN")
            .unwrap_or_else(|| "https://localhost:9443".to_string());
        let scim_me_path =
            Self::env_nonempty("CONSOLE_SCIM_ME_PATH").unwrap_or_else(|| "/scim2/Me".to_string());
        let profile_schemas_path = Self::env_nonempty("CONSOLE_PROFILE_SCHEMAS_PATH")
            .unwrap_or_else(|| "/scim2/Schemas".to_string());
        let email_template_types_path = Self::env_nonempty("CONSOLE_EMAIL_TEMPLATE_TYPES_PATH")
            .unwrap_or_else(|| "/api/server/v1/email/template-types".to_string());
        let token_path =
            Self::env_nonempty("CONSOLE_TOKEN_PATH").unwrap_or_else(|| "/oauth2/token".to_string());
        let client_id =
            Self::env_nonempty("CONSOLE_CLIENT_ID").unwrap_or_else(|| "CONSOLE".to_string());
        let tenant_domain = Self::env_nonempty("CONSOLE_TENANT_DOMAIN")
            .unwrap_or_else(|| "carbon.super".to_string());
        let gravatar_base_url = Self::env_nonempty("CONSOLE_GRAVATAR_BASE_URL")
            .unwrap_or_else(|| "https://www.gravatar.com".to_string());
        let request_timeout_seconds =
            Self::env_u64("CONSOLE_REQUEST_TIMEOUT_SECONDS").unwrap_or(10);

        Self {
            config: Arc::new(Config {
                server_origin,
                scim_me_path,
                profile_schemas_path,
                email_template_types_path,
                token_path,
                client_id,
                tenant_domain,
                gravatar_base_url,
                request_timeout_seconds,
            }),
        }
    }
}

impl Default for ConfigServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService for ConfigServiceImpl {
    fn values(&self) -> &Config {
        &self.config
    }

    fn shared(&self) -> Arc<Config> {
        self.config.clone()
    }
}
