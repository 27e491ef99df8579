//! Purchase handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::booking_handler::FilesSaved;
use super::query::{day_param, search_term};
use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::config::PURCHASES_PAGE_SIZE;
use crate::domain::{PurchaseFilter, PurchaseId, PurchaseInput, PurchaseWithVendor, VendorId};
use crate::errors::AppResult;
use crate::services::{PurchaseCreated, PurchaseEdited};
use crate::types::{MessageResponse, Paginated, PaginationParams};

/// `GET /purchase` query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseQuery {
    pub search: Option<String>,
    #[serde(alias = "startPurchaseDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endPurchaseDate")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl PurchaseQuery {
    fn filter(&self) -> AppResult<PurchaseFilter> {
        Ok(PurchaseFilter {
            search: search_term(self.search.as_deref()),
            start_day: day_param("startDate", self.start_date.as_deref())?,
            end_day: day_param("endDate", self.end_date.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    #[validate(nested)]
    pub values: PurchaseInput,
    pub vendor_id: VendorId,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPurchaseRequest {
    #[validate(nested)]
    pub values: PurchaseInput,
    #[serde(default)]
    pub removed_files: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePurchaseFilesRequest {
    pub purchase_id: PurchaseId,
    pub uploaded_files: Vec<String>,
}

pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchases).post(create_purchase).patch(save_files))
        .route("/:id", put(update_purchase).delete(delete_purchase))
}

/// Purchases with their vendor, purchase date newest first
#[utoipa::path(
    get,
    path = "/api/v1/purchase",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    params(
        PaginationParams,
        ("search" = Option<String>, Query, description = "Vendor fields, item or invoice number"),
        ("startDate" = Option<String>, Query, description = "First purchase day, inclusive"),
        ("endDate" = Option<String>, Query, description = "Last purchase day, inclusive")
    ),
    responses(
        (status = 200, description = "One page of purchases"),
        (status = 400, description = "Unparsable date filter")
    )
)]
pub async fn list_purchases(
    _auth: Authorized<perm::PurchaseRead>,
    State(state): State<AppState>,
    Query(query): Query<PurchaseQuery>,
) -> AppResult<Json<Paginated<PurchaseWithVendor>>> {
    let filter = query.filter()?;
    let page = state
        .services
        .purchases()
        .list_purchases(filter, query.pagination.resolve(PURCHASES_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/purchase",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    request_body = CreatePurchaseRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = PurchaseCreated),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn create_purchase(
    _auth: Authorized<perm::PurchaseCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePurchaseRequest>,
) -> AppResult<Json<PurchaseCreated>> {
    let created = state
        .services
        .purchases()
        .create_purchase(payload.vendor_id, payload.values)
        .await?;
    Ok(Json(created))
}

#[utoipa::path(
    patch,
    path = "/api/v1/purchase",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    request_body = SavePurchaseFilesRequest,
    responses(
        (status = 200, description = "Files saved", body = FilesSaved),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn save_files(
    _auth: Authorized<perm::PurchaseFiles>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SavePurchaseFilesRequest>,
) -> AppResult<Json<FilesSaved>> {
    let files = state
        .services
        .purchases()
        .save_files(payload.purchase_id, payload.uploaded_files)
        .await?;
    Ok(Json(FilesSaved::new(files)))
}

#[utoipa::path(
    put,
    path = "/api/v1/purchase/{id}",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Purchase ID")),
    request_body = EditPurchaseRequest,
    responses(
        (status = 200, description = "Purchase updated", body = PurchaseEdited),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn update_purchase(
    _auth: Authorized<perm::PurchaseUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<PurchaseId>,
    ValidatedJson(payload): ValidatedJson<EditPurchaseRequest>,
) -> AppResult<Json<PurchaseEdited>> {
    let edited = state
        .services
        .purchases()
        .update_purchase(id, payload.values, payload.removed_files)
        .await?;
    Ok(Json(edited))
}

#[utoipa::path(
    delete,
    path = "/api/v1/purchase/{id}",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Purchase ID")),
    responses(
        (status = 200, description = "Purchase deleted", body = MessageResponse),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn delete_purchase(
    _auth: Authorized<perm::PurchaseDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<PurchaseId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.purchases().delete_purchase(id).await?;
    Ok(Json(MessageResponse::new("Purchase deleted successfully")))
}
