//! Booking handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::query::{day_param, search_term};
use crate::api::extractors::{parse_id, perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::config::{BOOKINGS_PAGE_SIZE, PROSPECT_BOOKINGS_PAGE_SIZE};
use crate::domain::{
    BookingFilter, BookingId, BookingWithGuest, CostItem, CostKind, CreateBooking, GuestId,
    ProspectiveGuestId, UpdateBooking,
};
use crate::errors::AppResult;
use crate::services::{BookingCreated, BookingEdited};
use crate::types::{MessageResponse, Paginated, PaginationParams};

/// `GET /booking` query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub search: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub dob: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl BookingQuery {
    fn filter(&self) -> AppResult<BookingFilter> {
        Ok(BookingFilter {
            search: search_term(self.search.as_deref()),
            check_in_day: day_param("checkInDate", self.check_in_date.as_deref())?,
            check_out_day: day_param("checkOutDate", self.check_out_date.as_deref())?,
            guest_dob: day_param("dob", self.dob.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(nested)]
    pub values: CreateBooking,
    pub guest_id: GuestId,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditBookingRequest {
    #[validate(nested)]
    pub values: UpdateBooking,
    #[serde(default)]
    pub removed_files: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveBookingFilesRequest {
    pub booking_id: BookingId,
    pub uploaded_files: Vec<String>,
}

/// Full document list after a save
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilesSaved {
    pub updated_files: Vec<String>,
    pub success: bool,
    pub message: String,
}

impl FilesSaved {
    pub fn new(updated_files: Vec<String>) -> Self {
        Self {
            updated_files,
            success: true,
            message: "Files saved successfully".to_string(),
        }
    }
}

/// `{values: {item, cost}, type}`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCostRequest {
    #[validate(nested)]
    pub values: CostItem,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CostItemName {
    pub item: String,
}

/// `{values: {item}}`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RemoveCostRequest {
    pub values: CostItemName,
}

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking).patch(save_files))
        .route(
            "/:id",
            get(list_for_prospect)
                .put(update_booking)
                .patch(add_cost)
                .delete(delete_booking),
        )
        .route("/:id/:type", patch(remove_cost))
}

/// Bookings with their guest, check-in newest first
#[utoipa::path(
    get,
    path = "/api/v1/booking",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        PaginationParams,
        ("search" = Option<String>, Query, description = "Guest name, email, phone, address or GRC number"),
        ("checkInDate" = Option<String>, Query, description = "Check-in day, YYYY-MM-DD"),
        ("checkOutDate" = Option<String>, Query, description = "Check-out day, YYYY-MM-DD"),
        ("dob" = Option<String>, Query, description = "Guest date of birth")
    ),
    responses(
        (status = 200, description = "One page of bookings"),
        (status = 400, description = "Unparsable date filter")
    )
)]
pub async fn list_bookings(
    _auth: Authorized<perm::BookingRead>,
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<Paginated<BookingWithGuest>>> {
    let filter = query.filter()?;
    let page = state
        .services
        .bookings()
        .list_bookings(filter, query.pagination.resolve(BOOKINGS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

/// Bookings that came from one prospective guest
#[utoipa::path(
    get,
    path = "/api/v1/booking/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Prospective guest ID"), PaginationParams),
    responses((status = 200, description = "One page of bookings"))
)]
pub async fn list_for_prospect(
    _auth: Authorized<perm::ProspectRead>,
    State(state): State<AppState>,
    IdPath(id): IdPath<ProspectiveGuestId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BookingWithGuest>>> {
    let page = state
        .services
        .bookings()
        .list_for_prospect(id, params.resolve(PROSPECT_BOOKINGS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

/// Book a stay for an existing guest
#[utoipa::path(
    post,
    path = "/api/v1/booking",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingCreated),
        (status = 404, description = "Guest not found")
    )
)]
pub async fn create_booking(
    _auth: Authorized<perm::BookingCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<Json<BookingCreated>> {
    let created = state
        .services
        .bookings()
        .create_booking(payload.guest_id, payload.values)
        .await?;
    Ok(Json(created))
}

#[utoipa::path(
    patch,
    path = "/api/v1/booking",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = SaveBookingFilesRequest,
    responses(
        (status = 200, description = "Files saved", body = FilesSaved),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn save_files(
    _auth: Authorized<perm::BookingFiles>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SaveBookingFilesRequest>,
) -> AppResult<Json<FilesSaved>> {
    let files = state
        .services
        .bookings()
        .save_files(payload.booking_id, payload.uploaded_files)
        .await?;
    Ok(Json(FilesSaved::new(files)))
}

#[utoipa::path(
    put,
    path = "/api/v1/booking/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = EditBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = BookingEdited),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking(
    _auth: Authorized<perm::BookingUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<BookingId>,
    ValidatedJson(payload): ValidatedJson<EditBookingRequest>,
) -> AppResult<Json<BookingEdited>> {
    let edited = state
        .services
        .bookings()
        .update_booking(id, payload.values, payload.removed_files)
        .await?;
    Ok(Json(edited))
}

#[utoipa::path(
    delete,
    path = "/api/v1/booking/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = MessageResponse),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    _auth: Authorized<perm::BookingDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<BookingId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.bookings().delete_booking(id).await?;
    Ok(Json(MessageResponse::new("Booking deleted successfully")))
}

/// Append a line to the additional-purchase or damage ledger
#[utoipa::path(
    patch,
    path = "/api/v1/booking/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = AddCostRequest,
    responses(
        (status = 200, description = "Cost added", body = MessageResponse),
        (status = 400, description = "Invalid cost type or duplicate item")
    )
)]
pub async fn add_cost(
    _auth: Authorized<perm::BookingUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<BookingId>,
    ValidatedJson(payload): ValidatedJson<AddCostRequest>,
) -> AppResult<Json<MessageResponse>> {
    let kind: CostKind = payload.kind.parse()?;
    state
        .services
        .bookings()
        .add_cost(id, kind, payload.values)
        .await?;
    Ok(Json(MessageResponse::new(kind.added_message())))
}

/// Drop a line from the ledger named in the path
#[utoipa::path(
    patch,
    path = "/api/v1/booking/{id}/{type}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Booking ID"),
        ("type" = CostKind, Path, description = "Ledger name")
    ),
    request_body = RemoveCostRequest,
    responses(
        (status = 200, description = "Cost removed", body = MessageResponse),
        (status = 400, description = "Invalid cost type")
    )
)]
pub async fn remove_cost(
    _auth: Authorized<perm::BookingUpdate>,
    State(state): State<AppState>,
    Path((raw_id, raw_kind)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<RemoveCostRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id: BookingId = parse_id(&raw_id)?;
    let kind: CostKind = raw_kind.parse()?;
    state
        .services
        .bookings()
        .remove_cost(id, kind, payload.values.item)
        .await?;
    Ok(Json(MessageResponse::new(kind.removed_message())))
}
