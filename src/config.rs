#[derive(Clone)]
pub struct Config {
    pub server_origin: String,
    pub scim_me_path: String,
    pub profile_schemas_path: String,
    pub email_template_types_path: String,
    pub token_path: String,
    pub client_id: String,
    pub tenant_domain: String,
    pub gravatar_base_url: String,
    pub request_timeout_seconds: u64,
}

impl Config {
    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_origin.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn me_url(&self) -> String {
        self.join(&self.scim_me_path)
    }

    pub fn profile_schemas_url(&self) -> String {
        self.join(&self.profile_schemas_path)
    }

    pub fn email_template_type_url(&self, template_type_id: &str) -> String {
        format!(
            "{}/{}",
            self.join(&self.email_template_types_path),
            urlencoding::encode(template_type_id)
        )
    }

    pub fn token_url(&self) -> String {
        self.join(&self.token_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server_origin: "https://idp.example.com/".to_string(),
            scim_me_path: "/scim2/Me".to_string(),
            profile_schemas_path: "scim2/Schemas".to_string(),
            email_template_types_path: "/api/server/v1/email/template-types".to_string(),
            token_path: "/oauth2/token".to_string(),
            client_id: "CONSOLE".to_string(),
            tenant_domain: "carbon.super".to_string(),
            gravatar_base_url: "https://www.gravatar.com".to_string(),
            request_timeout_seconds: 10,
        }
    }

    #[test]
    fn joins_origin_and_path_without_double_slash() {
        let config = config();
        assert_eq!(config.me_url(), "https://idp.example.com/scim2/Me");
        assert_eq!(
            config.profile_schemas_url(),
            "https://idp.example.com/scim2/Schemas"
        );
    }

    #[test]
    fn template_type_url_encodes_the_id() {
        let config = config();
        assert_eq!(
            config.email_template_type_url("account confirmation"),
            "https://idp.example.com/api/server/v1/email/template-types/account%20confirmation"
        );
    }
}
