//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserId;
use crate::errors::AppError;

/// Authenticated caller extracted from the access token.
///
/// Role names are informational; authorization always resolves grants
/// from the database.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: UserId,
    pub roles: Vec<String>,
}

/// Bearer token out of the `Authorization` header.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware.
///
/// Validates the access token and injects the `CurrentUser` into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or_else(|| AppError::unauthorized("Access Denied"))?;
    let claims = state.services.auth().verify_access_token(token)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.id,
        roles: claims.roles,
    });

    Ok(next.run(request).await)
}
