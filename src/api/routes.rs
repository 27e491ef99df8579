//! Application route configuration.

use std::path::Path;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, booking_routes, document_routes, guest_routes, meeting_routes, prospect_routes,
    purchase_routes, refresh_routes, role_routes, user_routes, vendor_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::API_PREFIX;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let cors = build_cors_layer(&state);

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(API_PREFIX, api_routes(state.clone()))
        .fallback_service(spa_service(&static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Every `/api/v1` resource. Only auth and refresh are reachable without a token.
fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/user", user_routes())
        .nest("/role", role_routes())
        .nest("/guest", guest_routes())
        .nest("/booking", booking_routes())
        .nest("/vendor", vendor_routes())
        .nest("/purchase", purchase_routes())
        .nest("/prospective-guest", prospect_routes())
        .nest("/meeting", meeting_routes())
        .nest("/document", document_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .nest("/auth", auth_routes())
        .nest("/refresh", refresh_routes())
        .merge(protected)
        .fallback(api_not_found)
}

async fn api_not_found() -> Response {
    AppError::not_found("Route").into_response()
}

/// Built client with history-mode routing: unknown paths get `index.html`
fn spa_service(static_dir: &str) -> ServeDir<ServeFile> {
    let index = Path::new(static_dir).join("index.html");
    ServeDir::new(static_dir).fallback(ServeFile::new(index))
}

/// The client origin may send the refresh cookie
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => tracing::warn!(
            origin = %state.config.frontend_url,
            "FRONTEND_URL is not a valid origin; cross-origin requests will be refused"
        ),
    }

    cors
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// Liveness plus a database ping
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let Some(database) = state.database.as_ref() else {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "not configured",
            }),
        );
    };

    match database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "healthy",
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unhealthy",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{DbBackend, DbErr, MockDatabase};

    use super::*;
    use crate::config::Config;
    use crate::infra::Database;
    use crate::services::MockServiceContainer;

    #[tokio::test]
    async fn test_failed_ping_reports_status_only() {
        let connection = MockDatabase::new(DbBackend::Postgres)
            .append_exec_errors([DbErr::Custom(
                "password authentication failed for user \"desk\" at 10.0.4.7".into(),
            )])
            .into_connection();
        let mut state = AppState::new(Arc::new(MockServiceContainer::new()), Config::default());
        state.database = Some(Arc::new(Database::from_connection(connection)));

        let (status, Json(body)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body = serde_json::to_value(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "degraded", "database": "unhealthy"})
        );
    }
}
