use serde::{Deserialize, Serialize};

pub const ENTERPRISE_USER_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// SCIM "me" response. Only the fields the console renders are modeled;
/// everything else the server sends is dropped on the floor instead of being
/// merged blindly over computed defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub name: ScimName,
    #[serde(default)]
    pub emails: Vec<ScimMultiValued>,
    #[serde(default)]
    pub phone_numbers: Vec<ScimMultiValued>,
    #[serde(default)]
    pub roles: Vec<ScimRole>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub user_image: Option<String>,
    #[serde(default, rename = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User")]
    pub enterprise: EnterpriseExtension,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
}

/// SCIM multi-valued attributes arrive either as bare strings or as
/// `{value, type}` objects, depending on the server version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScimMultiValued {
    Plain(String),
    Typed {
        #[serde(default)]
        value: String,
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        primary: Option<bool>,
    },
}

impl ScimMultiValued {
    pub fn value(&self) -> &str {
        match self {
            Self::Plain(value) => value,
            Self::Typed { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimRole {
    #[serde(default)]
    pub display: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseExtension {
    #[serde(default)]
    pub organization: String,
}

/// The profile shape the console renders. Every field is defaulted so an
/// absent server attribute shows up as empty, never as a deserialize failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub user_name: String,
    pub display_name: String,
    pub organization: String,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub roles: Vec<String>,
    pub user_image: String,
}

impl ProfileInfo {
    /// Precedence for the avatar: explicit `userImage`, then `profileUrl`,
    /// then the Gravatar fallback resolved by the caller, then empty.
    pub fn from_scim(user: ScimUser, fallback_image: Option<String>) -> Self {
        let display_name = match (
            user.name.given_name.trim(),
            user.name.family_name.trim(),
        ) {
            ("", "") => String::new(),
            (given, "") => given.to_string(),
            ("", family) => family.to_string(),
            (given, family) => format!("{} {}", given, family),
        };

        let user_image = user
            .user_image
            .filter(|value| !value.is_empty())
            .or(user.profile_url.filter(|value| !value.is_empty()))
            .or(fallback_image)
            .unwrap_or_default();

        Self {
            user_name: user.user_name,
            display_name,
            organization: user.enterprise.organization,
            emails: user
                .emails
                .iter()
                .map(|email| email.value().to_string())
                .collect(),
            phone_numbers: user
                .phone_numbers
                .iter()
                .map(|phone| phone.value().to_string())
                .collect(),
            roles: user.roles.into_iter().map(|role| role.display).collect(),
            user_image,
        }
    }
}

/// SCIM PatchOp envelope for partial profile updates.
#[derive(Debug, Clone, Serialize)]
pub struct ScimPatch {
    pub schemas: Vec<&'static str>,
    #[serde(rename = "Operations")]
    pub operations: Vec<ScimPatchOperation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScimPatchOperation {
    pub op: &'static str,
    pub value: serde_json::Value,
}

impl ScimPatch {
    pub fn replace(value: serde_json::Value) -> Self {
        Self {
            schemas: vec![PATCH_OP_SCHEMA],
            operations: vec![ScimPatchOperation {
                op: "replace",
                value,
            }],
        }
    }
}

/// Claim-schema metadata used by the console's dynamic profile form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSchema {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<SchemaAttribute>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttribute {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multi_valued: bool,
    #[serde(default)]
    pub mutability: String,
    #[serde(default)]
    pub sub_attributes: Vec<SchemaAttribute>,
}

/// An account linked to the current session, as listed by the associated
/// accounts resource. This is the argument to the account-switch grant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub username: String,
    #[serde(default)]
    pub user_store_domain: String,
    #[serde(default)]
    pub tenant_domain: String,
}

/// Token set returned by the account-switch grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}
