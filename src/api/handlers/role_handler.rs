//! Role handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Role, RoleId, RoleInput, RolePermissions};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreatedResponse {
    pub success: bool,
    pub message: String,
    pub new_role: Role,
}

pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", patch(assign_permissions).delete(delete_role))
}

#[utoipa::path(
    post,
    path = "/api/v1/role",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = RoleInput,
    responses(
        (status = 201, description = "Role created", body = RoleCreatedResponse),
        (status = 400, description = "Invalid permission or role already exists")
    )
)]
pub async fn create_role(
    _auth: Authorized<perm::RoleCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RoleInput>,
) -> AppResult<Created<RoleCreatedResponse>> {
    let new_role = state.services.roles().create_role(payload).await?;
    Ok(Created(RoleCreatedResponse {
        success: true,
        message: "Role created successfully".to_string(),
        new_role,
    }))
}

/// Every role, as a bare array
#[utoipa::path(
    get,
    path = "/api/v1/role",
    tag = "Roles",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All roles", body = Vec<Role>))
)]
pub async fn list_roles(
    _auth: Authorized<perm::RoleRead>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.services.roles().list_roles().await?))
}

/// Replace the role's permission list
#[utoipa::path(
    patch,
    path = "/api/v1/role/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    request_body = RolePermissions,
    responses(
        (status = 200, description = "Permissions assigned", body = MessageResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn assign_permissions(
    _auth: Authorized<perm::RoleUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<RoleId>,
    ValidatedJson(payload): ValidatedJson<RolePermissions>,
) -> AppResult<Json<MessageResponse>> {
    state.services.roles().assign_permissions(id, payload).await?;
    Ok(Json(MessageResponse::new("permission assigned successfully")))
}

/// Delete the role and detach it from every user
#[utoipa::path(
    delete,
    path = "/api/v1/role/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = MessageResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    _auth: Authorized<perm::RoleDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<RoleId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.roles().delete_role(id).await?;
    Ok(Json(MessageResponse::new("Role deleted successfully")))
}
