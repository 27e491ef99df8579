//! Meeting handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::Values;
use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::config::MEETINGS_PAGE_SIZE;
use crate::domain::{CreateMeeting, Meeting, MeetingDetails, MeetingId, ProspectiveGuestId};
use crate::errors::AppResult;
use crate::types::{MessageResponse, Paginated, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingCreatedResponse {
    pub success: bool,
    pub new_meeting: Meeting,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingUpdatedResponse {
    pub success: bool,
    pub updated_meeting: Meeting,
}

pub fn meeting_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_meeting))
        .route(
            "/:id",
            get(list_meetings).put(update_meeting).delete(delete_meeting),
        )
}

/// Meetings with one prospect, latest date first
#[utoipa::path(
    get,
    path = "/api/v1/meeting/{id}",
    tag = "Meetings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Prospective guest ID"), PaginationParams),
    responses((status = 200, description = "One page of meetings"))
)]
pub async fn list_meetings(
    _auth: Authorized<perm::ProspectRead>,
    State(state): State<AppState>,
    IdPath(id): IdPath<ProspectiveGuestId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Meeting>>> {
    let page = state
        .services
        .prospects()
        .list_meetings(id, params.resolve(MEETINGS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/meeting",
    tag = "Meetings",
    security(("bearer_auth" = [])),
    request_body = CreateMeeting,
    responses(
        (status = 200, description = "Meeting recorded", body = MeetingCreatedResponse),
        (status = 404, description = "Prospective guest not found")
    )
)]
pub async fn create_meeting(
    _auth: Authorized<perm::MeetingCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateMeeting>,
) -> AppResult<Json<MeetingCreatedResponse>> {
    let new_meeting = state.services.prospects().create_meeting(payload).await?;
    Ok(Json(MeetingCreatedResponse {
        success: true,
        new_meeting,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/meeting/{id}",
    tag = "Meetings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Meeting ID")),
    request_body(content = MeetingDetails, description = "Wrapped as `{values}`"),
    responses(
        (status = 200, description = "Meeting updated", body = MeetingUpdatedResponse),
        (status = 404, description = "Meeting not found")
    )
)]
pub async fn update_meeting(
    _auth: Authorized<perm::MeetingUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<MeetingId>,
    ValidatedJson(Values { values }): ValidatedJson<Values<MeetingDetails>>,
) -> AppResult<Json<MeetingUpdatedResponse>> {
    let updated_meeting = state.services.prospects().update_meeting(id, values).await?;
    Ok(Json(MeetingUpdatedResponse {
        success: true,
        updated_meeting,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meeting/{id}",
    tag = "Meetings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting deleted", body = MessageResponse),
        (status = 404, description = "Meeting not found")
    )
)]
pub async fn delete_meeting(
    _auth: Authorized<perm::MeetingDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<MeetingId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.prospects().delete_meeting(id).await?;
    Ok(Json(MessageResponse::new("Meeting deleted successfully")))
}
