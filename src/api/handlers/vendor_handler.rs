//! Vendor handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::guest_handler::VerifyNumberRequest;
use super::query::SearchQuery;
use super::Values;
use crate::api::extractors::{perm, Authorized, IdPath, ValidatedJson};
use crate::api::AppState;
use crate::config::VENDORS_PAGE_SIZE;
use crate::domain::{Vendor, VendorBrief, VendorId, VendorInput};
use crate::errors::AppResult;
use crate::types::{MessageResponse, Paginated, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorLookup {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorCreatedResponse {
    pub success: bool,
    pub vendor: VendorBrief,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorUpdatedResponse {
    pub success: bool,
    pub updated_vendor: Vendor,
}

pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vendors).post(create_vendor))
        .route("/verify-number", post(verify_number))
        .route("/verfy-number", post(verify_number))
        .route("/:id", put(update_vendor).delete(delete_vendor))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendor",
    tag = "Vendors",
    security(("bearer_auth" = [])),
    params(
        PaginationParams,
        ("search" = Option<String>, Query, description = "Name, email, phone, address, GSTIN or contact person")
    ),
    responses((status = 200, description = "One page of vendors"))
)]
pub async fn list_vendors(
    _auth: Authorized<perm::VendorRead>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Paginated<Vendor>>> {
    let page = state
        .services
        .vendors()
        .list_vendors(query.term(), query.page(VENDORS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/vendor/verify-number",
    tag = "Vendors",
    security(("bearer_auth" = [])),
    request_body = VerifyNumberRequest,
    responses((status = 200, description = "Whether the phone is registered", body = VendorLookup))
)]
pub async fn verify_number(
    _auth: Authorized<perm::PurchaseCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyNumberRequest>,
) -> AppResult<Json<VendorLookup>> {
    let vendor = state
        .services
        .vendors()
        .find_by_phone(payload.phone_number)
        .await?;
    Ok(Json(VendorLookup {
        exists: vendor.is_some(),
        vendor,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/vendor",
    tag = "Vendors",
    security(("bearer_auth" = [])),
    request_body = VendorInput,
    responses(
        (status = 200, description = "Vendor created", body = VendorCreatedResponse),
        (status = 400, description = "Validation error or duplicate phone")
    )
)]
pub async fn create_vendor(
    _auth: Authorized<perm::PurchaseCreate>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VendorInput>,
) -> AppResult<Json<VendorCreatedResponse>> {
    let vendor = state.services.vendors().create_vendor(payload).await?;
    Ok(Json(VendorCreatedResponse {
        success: true,
        vendor,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/vendor/{id}",
    tag = "Vendors",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vendor ID")),
    request_body(content = VendorInput, description = "Wrapped as `{values}`"),
    responses(
        (status = 200, description = "Vendor updated", body = VendorUpdatedResponse),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn update_vendor(
    _auth: Authorized<perm::VendorUpdate>,
    State(state): State<AppState>,
    IdPath(id): IdPath<VendorId>,
    ValidatedJson(Values { values }): ValidatedJson<Values<VendorInput>>,
) -> AppResult<Json<VendorUpdatedResponse>> {
    let updated_vendor = state.services.vendors().update_vendor(id, values).await?;
    Ok(Json(VendorUpdatedResponse {
        success: true,
        updated_vendor,
    }))
}

/// Delete the vendor, its purchases and their invoices
#[utoipa::path(
    delete,
    path = "/api/v1/vendor/{id}",
    tag = "Vendors",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor deleted", body = MessageResponse),
        (status = 404, description = "Vendor not found")
    )
)]
pub async fn delete_vendor(
    _auth: Authorized<perm::VendorDelete>,
    State(state): State<AppState>,
    IdPath(id): IdPath<VendorId>,
) -> AppResult<Json<MessageResponse>> {
    state.services.vendors().delete_vendor(id).await?;
    Ok(Json(MessageResponse::new("Vendor deleted successfully")))
}
