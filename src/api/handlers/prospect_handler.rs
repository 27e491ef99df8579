//! Prospective guest handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::query::SearchQuery;
use super::Values;
use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::config::PROSPECTIVE_GUESTS_PAGE_SIZE;
use crate::domain::{ProspectName, ProspectiveGuest, ProspectiveGuestId, ProspectiveGuestInput};
use crate::errors::AppResult;
use crate::types::{MessageResponse, Paginated, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspectCreatedResponse {
    pub success: bool,
    pub new_guest: ProspectiveGuest,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspectUpdatedResponse {
    pub success: bool,
    pub updated_prospective_guest: ProspectiveGuest,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspectNamesResponse {
    pub success: bool,
    pub prospective_guests: Vec<ProspectName>,
}

pub fn prospect_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_prospects).post(create_prospect))
        .route("/name-id", get(prospect_names))
        .route("/:id", put(update_prospect).delete(delete_prospect))
}

#[utoipa::path(
    post,
    path = "/api/v1/prospective-guest",
    tag = "Prospective guests",
    security(("bearer_auth" = [])),
    request_body = ProspectiveGuestInput,
    responses(
        (status = 200, description = "Prospect created", body = ProspectCreatedResponse),
        (status = 400, description = "Validation error or duplicate phone")
    )
)]
pub async fn create_prospect(
    _auth: Authorized<perm::ProspectCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProspectiveGuestInput>,
) -> AppResult<Json<ProspectCreatedResponse>> {
    let new_guest = state.services.prospects().create_prospect(payload).await?;
    Ok(Json(ProspectCreatedResponse {
        success: true,
        new_guest,
    }))
}

/// Search by name, email, phone or company; newest first
#[utoipa::path(
    get,
    path = "/api/v1/prospective-guest",
    tag = "Prospective guests",
    security(("bearer_auth" = [])),
    params(
        PaginationParams,
        ("search" = Option<String>, Query, description = "Case-insensitive text")
    ),
    responses((status = 200, description = "One page of prospects"))
)]
pub async fn list_prospects(
    _auth: Authorized<perm::ProspectRead>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Paginated<ProspectiveGuest>>> {
    let page = state
        .services
        .prospects()
        .list_prospects(query.term(), query.page(PROSPECTIVE_GUESTS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

/// Edit a prospect; a new name is copied onto its bookings
#[utoipa::path(
    put,
    path = "/api/v1/prospective-guest/{id}",
    tag = "Prospective guests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Prospective guest ID")),
    request_body(content = ProspectiveGuestInput, description = "Wrapped as `{values}`"),
    responses(
        (status = 200, description = "Prospect updated", body = ProspectUpdatedResponse),
        (status = 404, description = "Prospective guest not found")
    )
)]
pub async fn update_prospect(
    _auth: Authorized<perm::ProspectUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<ProspectiveGuestId>,
    ValidatedJson(Values { values }): ValidatedJson<Values<ProspectiveGuestInput>>,
) -> AppResult<Json<ProspectUpdatedResponse>> {
    let updated_prospective_guest = state
        .services
        .prospects()
        .update_prospect(id, values)
        .await?;
    Ok(Json(ProspectUpdatedResponse {
        success: true,
        updated_prospective_guest,
    }))
}

/// Delete a prospect and its meetings; bookings lose the link
#[utoipa::path(
    delete,
    path = "/api/v1/prospective-guest/{id}",
    tag = "Prospective guests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Prospective guest ID")),
    responses(
        (status = 200, description = "Prospect deleted", body = MessageResponse),
        (status = 404, description = "Prospective guest not found")
    )
)]
pub async fn delete_prospect(
    _auth: Authorized<perm::ProspectDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<ProspectiveGuestId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.prospects().delete_prospect(id).await?;
    Ok(Json(MessageResponse::new(
        "Prospective Guest deleted successfully",
    )))
}

/// `{id, name}` of every prospect for the booking form
#[utoipa::path(
    get,
    path = "/api/v1/prospective-guest/name-id",
    tag = "Prospective guests",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All prospect names", body = ProspectNamesResponse))
)]
pub async fn prospect_names(
    _auth: Authorized<perm::BookingUpdate>,
    State(state): State<AppState>,
) -> AppResult<Json<ProspectNamesResponse>> {
    let prospective_guests = state.services.prospects().prospect_names().await?;
    Ok(Json(ProspectNamesResponse {
        success: true,
        prospective_guests,
    }))
}
