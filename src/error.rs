use reqwest::StatusCode;
use thiserror::Error;

// Error code constants, one pair per client operation: a request/transport
// code and an invalid-response-code code.
pub const PROFILE_INFO_REQUEST_ERROR: &str = "profile_info_request_error";
pub const PROFILE_INFO_INVALID_STATUS_ERROR: &str = "profile_info_invalid_status_error";
pub const PROFILE_UPDATE_REQUEST_ERROR: &str = "profile_update_request_error";
pub const PROFILE_UPDATE_INVALID_STATUS_ERROR: &str = "profile_update_invalid_status_error";
pub const PROFILE_SCHEMAS_REQUEST_ERROR: &str = "profile_schemas_request_error";
pub const PROFILE_SCHEMAS_INVALID_STATUS_ERROR: &str = "profile_schemas_invalid_status_error";
pub const GRAVATAR_REQUEST_ERROR: &str = "gravatar_request_error";
pub const GRAVATAR_INVALID_STATUS_ERROR: &str = "gravatar_invalid_status_error";
pub const ACCOUNT_SWITCH_REQUEST_ERROR: &str = "account_switch_request_error";
pub const ACCOUNT_SWITCH_INVALID_STATUS_ERROR: &str = "account_switch_invalid_status_error";
pub const EMAIL_TEMPLATES_REQUEST_ERROR: &str = "email_templates_request_error";
pub const EMAIL_TEMPLATES_INVALID_STATUS_ERROR: &str = "email_templates_invalid_status_error";
pub const SCIM_DISABLED_ERROR: &str = "scim_disabled_error";
pub const INVALID_ROUTE_ERROR: &str = "invalid_route_error";

/// Uniform failure type for every console client operation.
///
/// Each variant carries the operation's designated error code plus the
/// diagnostic context (request URL, HTTP status, response body) that the
/// console's logging layer expects.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure surfaced by the HTTP layer.
    #[error("{code}: request to {url} failed: {source}")]
    Request {
        code: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an unexpected status code.
    #[error("{code}: unexpected status {status} from {url}")]
    InvalidStatus {
        code: &'static str,
        status: StatusCode,
        url: String,
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("{code}: failed to decode response from {url}: {source}")]
    Decode {
        code: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The profile backend reported itself disabled. Callers are expected to
    /// redirect the user rather than retry.
    #[error("scim_disabled_error: profile backend disabled ({status} from {url})")]
    ScimDisabled {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// The current route did not carry the identifier an operation needed.
    #[error("{code}: no usable identifier in path {path}")]
    Route { code: &'static str, path: String },
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Request { code, .. }
            | Self::InvalidStatus { code, .. }
            | Self::Decode { code, .. }
            | Self::Route { code, .. } => code,
            Self::ScimDisabled { .. } => SCIM_DISABLED_ERROR,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::InvalidStatus { status, .. } | Self::ScimDisabled { status, .. } => Some(*status),
            Self::Request { source, .. } | Self::Decode { source, .. } => source.status(),
            Self::Route { .. } => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Request { url, .. }
            | Self::InvalidStatus { url, .. }
            | Self::Decode { url, .. }
            | Self::ScimDisabled { url, .. } => Some(url),
            Self::Route { .. } => None,
        }
    }

    /// True when the caller should redirect instead of surfacing a generic
    /// failure.
    pub fn redirect_required(&self) -> bool {
        matches!(self, Self::ScimDisabled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scim_disabled_carries_fixed_code_and_redirect_hint() {
        let err = ApiError::ScimDisabled {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "https://idp.example.com/scim2/Me".to_string(),
            body: "{\"status\":\"500\"}".to_string(),
        };
        assert_eq!(err.code(), SCIM_DISABLED_ERROR);
        assert!(err.redirect_required());
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn invalid_status_exposes_operation_code() {
        let err = ApiError::InvalidStatus {
            code: PROFILE_INFO_INVALID_STATUS_ERROR,
            status: StatusCode::FORBIDDEN,
            url: "https://idp.example.com/scim2/Me".to_string(),
            body: String::new(),
        };
        assert_eq!(err.code(), PROFILE_INFO_INVALID_STATUS_ERROR);
        assert!(!err.redirect_required());
    }
}
