//! Guest handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::query::SearchQuery;
use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::config::GUESTS_PAGE_SIZE;
use crate::domain::{CreateGuest, Guest, GuestFiles, GuestId, UpdateGuest};
use crate::errors::AppResult;
use crate::services::{GuestCreated, GuestEdited};
use crate::types::{MessageResponse, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyNumberRequest {
    pub phone_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestLookup {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<Guest>,
}

/// Guest edit body: new values plus keys to drop
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditGuestRequest {
    #[validate(nested)]
    pub values: UpdateGuest,
    #[serde(default)]
    pub removed_files: Vec<String>,
}

/// Keys the client finished uploading
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveGuestFilesRequest {
    pub guest_id: GuestId,
    pub uploaded_files: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestFilesSaved {
    pub success: bool,
    pub message: String,
    pub guest: GuestFiles,
}

pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_guests).post(create_guest).patch(save_files))
        .route("/verify-number", post(verify_number))
        .route("/verfy-number", post(verify_number))
        .route("/:id", put(update_guest).delete(delete_guest))
}

/// Search guests by name, email, phone or address
#[utoipa::path(
    get,
    path = "/api/v1/guest",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(
        PaginationParams,
        ("search" = Option<String>, Query, description = "Case-insensitive text")
    ),
    responses((status = 200, description = "One page of guests"))
)]
pub async fn list_guests(
    _auth: Authorized<perm::GuestRead>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Paginated<Guest>>> {
    let page = state
        .services
        .guests()
        .list_guests(query.term(), query.page(GUESTS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

/// Look a returning guest up by phone
#[utoipa::path(
    post,
    path = "/api/v1/guest/verify-number",
    tag = "Guests",
    security(("bearer_auth" = [])),
    request_body = VerifyNumberRequest,
    responses((status = 200, description = "Whether the phone is registered", body = GuestLookup))
)]
pub async fn verify_number(
    _auth: Authorized<perm::BookingCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyNumberRequest>,
) -> AppResult<Json<GuestLookup>> {
    let guest = state
        .services
        .guests()
        .find_by_phone(payload.phone_number)
        .await?;
    Ok(Json(GuestLookup {
        exists: guest.is_some(),
        guest,
    }))
}

/// Register a guest; returns upload URLs for the listed documents
#[utoipa::path(
    post,
    path = "/api/v1/guest",
    tag = "Guests",
    security(("bearer_auth" = [])),
    request_body = CreateGuest,
    responses(
        (status = 200, description = "Guest registered", body = GuestCreated),
        (status = 400, description = "Validation error or phone already taken")
    )
)]
pub async fn create_guest(
    _auth: Authorized<perm::BookingCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateGuest>,
) -> AppResult<Json<GuestCreated>> {
    Ok(Json(state.services.guests().create_guest(payload).await?))
}

/// Attach uploaded keys to the guest
#[utoipa::path(
    patch,
    path = "/api/v1/guest",
    tag = "Guests",
    security(("bearer_auth" = [])),
    request_body = SaveGuestFilesRequest,
    responses(
        (status = 200, description = "Files saved", body = GuestFilesSaved),
        (status = 404, description = "Guest not found")
    )
)]
pub async fn save_files(
    _auth: Authorized<perm::GuestFiles>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SaveGuestFilesRequest>,
) -> AppResult<Json<GuestFilesSaved>> {
    let guest = state
        .services
        .guests()
        .save_files(payload.guest_id, payload.uploaded_files)
        .await?;
    Ok(Json(GuestFilesSaved {
        success: true,
        message: "Files saved successfully".to_string(),
        guest,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/guest/{id}",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Guest ID")),
    request_body = EditGuestRequest,
    responses(
        (status = 200, description = "Guest updated", body = GuestEdited),
        (status = 404, description = "Guest not found")
    )
)]
pub async fn update_guest(
    _auth: Authorized<perm::GuestUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<GuestId>,
    ValidatedJson(payload): ValidatedJson<EditGuestRequest>,
) -> AppResult<Json<GuestEdited>> {
    let edited = state
        .services
        .guests()
        .update_guest(id, payload.values, payload.removed_files)
        .await?;
    Ok(Json(edited))
}

/// Delete the guest with its bookings and all of their files
#[utoipa::path(
    delete,
    path = "/api/v1/guest/{id}",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Guest ID")),
    responses(
        (status = 200, description = "Guest deleted", body = MessageResponse),
        (status = 404, description = "Guest not found")
    )
)]
pub async fn delete_guest(
    _auth: Authorized<perm::GuestDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<GuestId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.guests().delete_guest(id).await?;
    Ok(Json(MessageResponse::new("Guest deleted successfully")))
}
