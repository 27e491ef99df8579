//! Staff account handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::USERS_PAGE_SIZE;
use crate::domain::{ChangePassword, CreateUser, UpdateUser, UserId, UserProfile, UserSummary};
use crate::errors::AppResult;
use crate::services::UserDirectory;
use crate::types::{Created, MessageResponse, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub data: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedResponse {
    pub success: bool,
    pub message: String,
    pub new_user: UserSummary,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile).post(create_user).patch(change_password))
        .route("/all", get(list_users))
        .route("/:id", put(update_user).delete(delete_user))
}

/// The caller's own profile
#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile with role names", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn profile(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    let data = state.services.users().profile(user.id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        message: "profile fetched successfully".to_string(),
        data,
    }))
}

/// Non-admin staff, newest first, with every role for the picker
#[utoipa::path(
    get,
    path = "/api/v1/user/all",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of users plus all roles"),
        (status = 403, description = "Missing user:read")
    )
)]
pub async fn list_users(
    _auth: Authorized<perm::UserRead>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<UserDirectory>> {
    let directory = state
        .services
        .users()
        .list_users(params.resolve(USERS_PAGE_SIZE))
        .await?;
    Ok(Json(directory))
}

/// Create a staff account
#[utoipa::path(
    post,
    path = "/api/v1/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserCreatedResponse),
        (status = 400, description = "Validation error, unknown role or duplicate email/phone")
    )
)]
pub async fn create_user(
    _auth: Authorized<perm::UserCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<Created<UserCreatedResponse>> {
    let new_user = state.services.users().create_user(payload).await?;
    Ok(Created(UserCreatedResponse {
        success: true,
        message: "User created successfully".to_string(),
        new_user,
    }))
}

/// Replace a user's profile fields and roles
#[utoipa::path(
    put,
    path = "/api/v1/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    _auth: Authorized<perm::UserUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<UserId>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<MessageResponse>> {
    state.services.users().update_user(id, payload).await?;
    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// Delete a user; their sessions go with them
#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    _auth: Authorized<perm::UserDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<UserId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.users().delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Change the caller's own password
#[utoipa::path(
    patch,
    path = "/api/v1/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password does not match")
    )
)]
pub async fn change_password(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePassword>,
) -> AppResult<Json<MessageResponse>> {
    state.services.users().change_password(user.id, payload).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
