//! Authentication handlers: login, logout, token refresh and password reset.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{REFRESH_COOKIE_NAME, REFRESH_TOKEN_TTL_SECONDS};
use crate::domain::password::validate_password_policy;
use crate::domain::rules::validate_not_blank;
use crate::errors::AppResult;
use crate::types::{MessageResponse, NoContent};

/// Staff login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "desk@hotel.example")]
    pub email: String,
    #[validate(custom(function = "validate_not_blank", message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub access_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Reset link request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetMailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// New password chosen through a reset link
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewPasswordRequest {
    pub token: String,
    #[validate(custom(function = "validate_password_policy"))]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(logout))
        .route("/login", post(login))
        .route("/reset-password", post(send_reset_mail))
        .route("/change-password", post(change_password))
}

/// Create the token refresh route
pub fn refresh_routes() -> Router<AppState> {
    Router::new().route("/", get(refresh))
}

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(REFRESH_TOKEN_TTL_SECONDS))
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .build()
}

/// Log in and receive an access token plus the refresh cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials or validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let outcome = state
        .services
        .auth()
        .login(payload.email, payload.password)
        .await?;

    let jar = jar.add(refresh_cookie(&state, outcome.refresh_token));
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            username: outcome.username,
            access_token: outcome.access_token,
        }),
    ))
}

/// Forget the refresh token and clear the cookie
#[utoipa::path(
    get,
    path = "/api/v1/auth",
    tag = "Authentication",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, NoContent)> {
    let token = jar.get(REFRESH_COOKIE_NAME).map(|c| c.value().to_string());
    state.services.auth().logout(token).await?;

    let jar = jar.remove(Cookie::build(REFRESH_COOKIE_NAME).path("/"));
    Ok((jar, NoContent))
}

/// Exchange the refresh cookie for a new access token
#[utoipa::path(
    get,
    path = "/api/v1/refresh",
    tag = "Authentication",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "No refresh cookie"),
        (status = 403, description = "Refresh token rejected")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<AccessTokenResponse>> {
    let token = jar.get(REFRESH_COOKIE_NAME).map(|c| c.value().to_string());
    let access_token = state.services.auth().refresh(token).await?;
    Ok(Json(AccessTokenResponse { access_token }))
}

/// Mail a password reset link
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "Authentication",
    request_body = ResetMailRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn send_reset_mail(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetMailRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .auth()
        .request_password_reset(payload.email)
        .await?;
    Ok(Json(MessageResponse::new("password reset link is send to email.")))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    request_body = NewPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 401, description = "Reset token expired or invalid")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .auth()
        .reset_password(payload.token, payload.password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated successfully.")))
}
