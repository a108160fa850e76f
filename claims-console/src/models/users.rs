use serde::{Deserialize, Serialize};

use super::{de_flag, de_id, de_opt_i64, de_vec_or_null, default_true};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
    #[serde(default)]
    pub message: String,
}

/// Role reference embedded in user payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRef {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Permission reference embedded in user payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRef {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub codename: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub module: String,
}

/// The logged-in user as returned by `GET /core/me/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Option<RoleRef>,
    #[serde(default, deserialize_with = "de_vec_or_null")]
    pub permissions: Vec<PermissionRef>,
}

impl CurrentUser {
    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name).unwrap_or_else(|| self.username.clone())
    }
}

/// Row of the user administration list (`GET /users/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    /// "Active" / "Inactive" as sent by the backend.
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub claims_handled: Option<i64>,
    #[serde(default)]
    pub last_login: Option<String>,
}

impl UserSummary {
    pub fn is_active(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("active")
    }

    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name).unwrap_or_else(|| self.username.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// Envelope used by user create/update endpoints: `{ user, message }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: UserSummary },
    Bare(UserSummary),
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> UserSummary {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub permission_count: Option<i64>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub codename: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub module: String,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Permission granted to a role (`GET /core/roles/:id/permissions/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePermission {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(deserialize_with = "de_id")]
    pub role: String,
    #[serde(deserialize_with = "de_id")]
    pub permission: String,
    #[serde(default)]
    pub permission_codename: String,
    #[serde(default)]
    pub permission_name: String,
    #[serde(default)]
    pub module: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignPermissionsRequest {
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignRoleRequest {
    pub role_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignRoleResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub role: Option<RoleRef>,
}

fn full_name(first: &str, last: &str) -> Option<String> {
    let name = format!("{} {}", first.trim(), last.trim());
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
