use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    AssignPermissionsRequest, AssignRoleRequest, AssignRoleResponse, ChangeRoleRequest,
    CreateUserRequest, CurrentUser, LoginRequest, LoginResponse, MessageResponse, Permission,
    PermissionDraft, ResetPasswordRequest, Role, RoleDraft, RolePermission, UpdateUserRequest,
    UserEnvelope, UserSummary,
};
use crate::session::Session;

impl ApiClient {
    /// Exchange credentials for a token, install it and load the caller's identity.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let response: LoginResponse = self
            .post_json(
                "/login",
                &LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.set_token(Some(response.token.clone())).await;

        let me = match self.current_user().await {
            Ok(me) => me,
            Err(err) => {
                self.set_token(None).await;
                warn!(error = %err, "Identity lookup failed after login; token discarded");
                return Err(err);
            }
        };
        info!(user = %me.username, permissions = me.permissions.len(), "Logged in");
        Ok(Session::new(response.token, response.user.username).with_user(me))
    }

    /// Re-use a stored session's token for subsequent calls.
    pub async fn restore(&self, session: &Session) {
        self.set_token(Some(session.token.clone())).await;
    }

    pub async fn logout(&self) {
        self.set_token(None).await;
    }

    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.get_json("/core/me/").await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.get_list("/users/").await
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<UserSummary> {
        let envelope: UserEnvelope = self.post_json("/users/create", request).await?;
        let user = envelope.into_user();
        info!(user = %user.username, "User created");
        Ok(user)
    }

    pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> Result<UserSummary> {
        let envelope: UserEnvelope = self.patch_json(&format!("/users/{id}"), request).await?;
        Ok(envelope.into_user())
    }

    pub async fn change_user_role(&self, id: &str, role: &str) -> Result<UserSummary> {
        let envelope: UserEnvelope = self
            .post_json(
                &format!("/users/{id}/change-role"),
                &ChangeRoleRequest {
                    role: role.to_string(),
                },
            )
            .await?;
        Ok(envelope.into_user())
    }

    pub async fn reset_user_password(&self, id: &str, new_password: &str) -> Result<MessageResponse> {
        self.post_json(
            &format!("/users/{id}/reset-password"),
            &ResetPasswordRequest {
                new_password: new_password.to_string(),
            },
        )
        .await
    }

    pub async fn deactivate_user(&self, id: &str) -> Result<UserSummary> {
        let envelope: UserEnvelope = self.post_empty(&format!("/users/{id}/deactivate")).await?;
        Ok(envelope.into_user())
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.get_list("/core/roles/").await
    }

    pub async fn get_role(&self, id: &str) -> Result<Role> {
        self.get_json(&format!("/core/roles/{id}/")).await
    }

    pub async fn create_role(&self, draft: &RoleDraft) -> Result<Role> {
        self.post_json("/core/roles/", draft).await
    }

    pub async fn update_role(&self, id: &str, draft: &RoleDraft) -> Result<Role> {
        self.patch_json(&format!("/core/roles/{id}/"), draft).await
    }

    pub async fn delete_role(&self, id: &str) -> Result<()> {
        self.delete(&format!("/core/roles/{id}/")).await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        self.get_list("/core/permissions/").await
    }

    pub async fn create_permission(&self, draft: &PermissionDraft) -> Result<Permission> {
        self.post_json("/core/permissions/", draft).await
    }

    pub async fn update_permission(&self, id: &str, draft: &PermissionDraft) -> Result<Permission> {
        self.patch_json(&format!("/core/permissions/{id}/"), draft).await
    }

    pub async fn delete_permission(&self, id: &str) -> Result<()> {
        self.delete(&format!("/core/permissions/{id}/")).await
    }

    pub async fn role_permissions(&self, role_id: &str) -> Result<Vec<RolePermission>> {
        self.get_list(&format!("/core/roles/{role_id}/permissions/")).await
    }

    /// Replace the role's permission set with `permission_ids`.
    pub async fn assign_role_permissions(
        &self,
        role_id: &str,
        permission_ids: Vec<i64>,
    ) -> Result<MessageResponse> {
        let count = permission_ids.len();
        let response = self
            .post_json(
                &format!("/core/roles/{role_id}/permissions/assign/"),
                &AssignPermissionsRequest { permission_ids },
            )
            .await?;
        info!(role_id, permission_count = count, "Assigned role permissions");
        Ok(response)
    }

    pub async fn assign_user_role(&self, user_id: &str, role_id: i64) -> Result<AssignRoleResponse> {
        self.post_json(
            &format!("/core/users/{user_id}/assign-role/"),
            &AssignRoleRequest { role_id },
        )
        .await
    }
}
