//! Document browser handlers.
//!
//! The required permission depends on the `kind` path segment, so these
//! handlers authorize inline instead of through `Authorized<P>`.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::query::SearchQuery;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::DOCUMENTS_PAGE_SIZE;
use crate::domain::DocumentKind;
use crate::errors::{AppError, AppResult};
use crate::services::DocumentPage;
use crate::types::PaginationParams;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlResponse {
    pub signed_url: String,
}

pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/:kind", get(list_documents))
        .route("/:kind/:file_name", get(download_url))
        .route("/:kind/:file_name/:folder", get(download_url_in_folder))
}

/// Every document key of one entity type, newest owner first
#[utoipa::path(
    get,
    path = "/api/v1/document/{kind}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(
        ("kind" = DocumentKind, Path, description = "guest, booking or purchase"),
        PaginationParams,
        ("search" = Option<String>, Query, description = "Case-insensitive literal match on the key")
    ),
    responses(
        (status = 200, description = "One page of keys", body = DocumentPage),
        (status = 403, description = "Missing {kind}:files:read")
    )
)]
pub async fn list_documents(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DocumentPage>> {
    let kind: DocumentKind = kind.parse()?;
    state
        .services
        .access()
        .authorize(user.id, &[kind.read_permission()])
        .await?;

    let page = state
        .services
        .documents()
        .list_documents(kind, query.term(), query.page(DOCUMENTS_PAGE_SIZE))
        .await?;
    Ok(Json(page))
}

/// Short-lived download URL for one stored key
#[utoipa::path(
    get,
    path = "/api/v1/document/{kind}/{fileName}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(
        ("kind" = DocumentKind, Path, description = "guest, booking or purchase"),
        ("fileName" = String, Path, description = "Stored key")
    ),
    responses(
        (status = 200, description = "Presigned GET URL", body = DownloadUrlResponse),
        (status = 403, description = "Missing {kind}:file:download")
    )
)]
pub async fn download_url(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((kind, file_name)): Path<(String, String)>,
) -> AppResult<Json<DownloadUrlResponse>> {
    issue_download(&state, &user, &kind, file_name).await
}

/// Same as [`download_url`]; older clients append a folder, which is ignored
/// because the kind already fixes it.
#[utoipa::path(
    get,
    path = "/api/v1/document/{kind}/{fileName}/{folder}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(
        ("kind" = DocumentKind, Path, description = "guest, booking or purchase"),
        ("fileName" = String, Path, description = "Stored key"),
        ("folder" = String, Path, description = "Ignored")
    ),
    responses(
        (status = 200, description = "Presigned GET URL", body = DownloadUrlResponse),
        (status = 403, description = "Missing {kind}:file:download")
    )
)]
pub async fn download_url_in_folder(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((kind, file_name, _folder)): Path<(String, String, String)>,
) -> AppResult<Json<DownloadUrlResponse>> {
    issue_download(&state, &user, &kind, file_name).await
}

async fn issue_download(
    state: &AppState,
    user: &CurrentUser,
    kind: &str,
    file_name: String,
) -> AppResult<Json<DownloadUrlResponse>> {
    let kind: DocumentKind = kind.parse()?;
    if file_name.trim().is_empty() {
        return Err(AppError::bad_request("Missing file name"));
    }

    state
        .services
        .access()
        .authorize(user.id, &[kind.download_permission()])
        .await?;

    let signed_url = state
        .services
        .documents()
        .download_url(kind, file_name)
        .await?;
    Ok(Json(DownloadUrlResponse { signed_url }))
}
