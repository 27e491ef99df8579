//! Router-level tests.
//!
//! The full router is driven with `oneshot` over fake services, so no
//! database or bucket is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use frontdesk::api::{create_router, AppState};
use frontdesk::config::Config;
use frontdesk::domain::{
    CreateGuest, DocumentKind, Guest, GuestDetails, GuestFiles, GuestId, Permission, UpdateGuest,
    UserId,
};
use frontdesk::errors::{AppError, AppResult};
use frontdesk::services::{
    AccessService, AuthService, Claims, DocumentPage, DocumentService, GuestCreated, GuestEdited,
    GuestService, LoginOutcome, MockServiceContainer,
};
use frontdesk::types::{PageRequest, Paginated};

const VALID_TOKEN: &str = "valid-token";

// =============================================================================
// Fakes
// =============================================================================

struct FakeAuth;

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, _email: String, password: String) -> AppResult<LoginOutcome> {
        if password == "Str0ng!Pass" {
            Ok(LoginOutcome {
                username: "front_desk".to_string(),
                access_token: "access.jwt".to_string(),
                refresh_token: "refresh.jwt".to_string(),
            })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    async fn refresh(&self, refresh_token: Option<String>) -> AppResult<String> {
        match refresh_token {
            Some(_) => Ok("fresh.jwt".to_string()),
            None => Err(AppError::unauthorized("Unauthorized")),
        }
    }

    async fn logout(&self, _refresh_token: Option<String>) -> AppResult<()> {
        Ok(())
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        if token == VALID_TOKEN {
            let now = Utc::now().timestamp();
            Ok(Claims {
                id: UserId::new(),
                roles: vec!["FRONT DESK".to_string()],
                permission: Vec::new(),
                exp: now + 900,
                iat: now,
                jti: None,
            })
        } else {
            Err(AppError::forbidden("Invalid token"))
        }
    }

    async fn request_password_reset(&self, _email: String) -> AppResult<()> {
        Ok(())
    }

    async fn reset_password(&self, _token: String, _new_password: String) -> AppResult<()> {
        Ok(())
    }
}

/// Grants a fixed permission set to every caller
struct FakeAccess(Vec<Permission>);

#[async_trait]
impl AccessService for FakeAccess {
    async fn authorize(&self, _user_id: UserId, any_of: &[Permission]) -> AppResult<()> {
        if any_of.iter().any(|p| self.0.contains(p)) {
            Ok(())
        } else {
            Err(AppError::forbidden("Forbidden: Insufficient permissions"))
        }
    }
}

/// Twelve stored guests, paged in memory
struct FakeGuests {
    guests: Vec<Guest>,
}

impl FakeGuests {
    fn new() -> Self {
        let guests = (0..12)
            .map(|i| {
                Guest::new(GuestDetails {
                    name: format!("Guest {i}"),
                    email: format!("guest{i}@example.com"),
                    phone: format!("+91987654{i:04}"),
                    dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                    address: "MG Road".to_string(),
                })
            })
            .collect();
        Self { guests }
    }
}

#[async_trait]
impl GuestService for FakeGuests {
    async fn find_by_phone(&self, phone: String) -> AppResult<Option<Guest>> {
        Ok(self.guests.iter().find(|g| g.phone == phone).cloned())
    }

    async fn list_guests(
        &self,
        _search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Guest>> {
        Ok(Paginated::new(
            page.slice(&self.guests),
            page,
            self.guests.len() as u64,
        ))
    }

    async fn create_guest(&self, _input: CreateGuest) -> AppResult<GuestCreated> {
        Ok(GuestCreated {
            guest_id: GuestId::new(),
            signed_urls: Vec::new(),
        })
    }

    async fn save_files(&self, _id: GuestId, _file_names: Vec<String>) -> AppResult<GuestFiles> {
        Err(AppError::not_found("Guest"))
    }

    async fn update_guest(
        &self,
        _id: GuestId,
        _input: UpdateGuest,
        _removed_files: Vec<String>,
    ) -> AppResult<GuestEdited> {
        Err(AppError::not_found("Guest"))
    }

    async fn delete_guest(&self, _id: GuestId) -> AppResult<()> {
        Err(AppError::not_found("Guest"))
    }
}

struct FakeDocuments;

#[async_trait]
impl DocumentService for FakeDocuments {
    async fn list_documents(
        &self,
        _kind: DocumentKind,
        _search: Option<String>,
        _page: PageRequest,
    ) -> AppResult<DocumentPage> {
        Ok(DocumentPage {
            success: true,
            documents: vec!["1700000000000-abc-passport.pdf".to_string()],
            total_documents: 1,
            total_pages: 1,
        })
    }

    async fn download_url(&self, kind: DocumentKind, file_name: String) -> AppResult<String> {
        Ok(format!("https://bucket.example/{}/{}?sig=1", kind.folder(), file_name))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app(granted: Vec<Permission>) -> Router {
    let auth: Arc<dyn AuthService> = Arc::new(FakeAuth);
    let access: Arc<dyn AccessService> = Arc::new(FakeAccess(granted));
    let guests: Arc<dyn GuestService> = Arc::new(FakeGuests::new());
    let documents: Arc<dyn DocumentService> = Arc::new(FakeDocuments);

    let mut services = MockServiceContainer::new();
    services.expect_auth().returning(move || auth.clone());
    services.expect_access().returning(move || access.clone());
    services.expect_guests().returning(move || guests.clone());
    services.expect_documents().returning(move || documents.clone());

    create_router(AppState::new(Arc::new(services), Config::default()))
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_token_is_401() {
    let response = app(vec![Permission::GuestRead])
        .oneshot(get("/api/v1/guest", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Access Denied");
}

#[tokio::test]
async fn test_bad_token_is_403() {
    let response = app(vec![Permission::GuestRead])
        .oneshot(get("/api/v1/guest", Some("forged")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["message"], "Invalid token");
}

#[tokio::test]
async fn test_permission_checked_before_validation() {
    // Body is invalid, but the caller lacks booking:create
    let response = app(vec![Permission::GuestRead])
        .oneshot(send_json("POST", "/api/v1/guest", Some(VALID_TOKEN), json!({"name": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await["message"],
        "Forbidden: Insufficient permissions"
    );
}

#[tokio::test]
async fn test_validation_messages_are_joined() {
    let body = json!({
        "name": " ",
        "email": "not-an-email",
        "phone": "+919876543210",
        "dob": "1990-04-12",
        "address": "12 MG Road",
        "documents": []
    });
    let response = app(vec![Permission::BookingCreate])
        .oneshot(send_json("POST", "/api/v1/guest", Some(VALID_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "At least one document is required, Invalid email, Name is required"
    );
}

#[tokio::test]
async fn test_guest_listing_default_limit_and_past_the_end() {
    let app = app(vec![Permission::GuestRead]);

    let response = app
        .clone()
        .oneshot(get("/api/v1/guest", Some(VALID_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"]["total"], 12);
    assert_eq!(body["meta"]["totalPages"], 3);

    let response = app
        .oneshot(get("/api/v1/guest?page=9&limit=5", Some(VALID_TOKEN)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["page"], 9);
}

#[tokio::test]
async fn test_verify_number_and_typo_alias() {
    let app = app(vec![Permission::BookingCreate]);

    for path in ["/api/v1/guest/verify-number", "/api/v1/guest/verfy-number"] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                path,
                Some(VALID_TOKEN),
                json!({"phoneNumber": "0000000000"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body, json!({"exists": false}));
    }
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let response = app(vec![Permission::GuestDelete])
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/guest/not-an-id")
                .header(header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Invalid ID: not-an-id");
}

#[tokio::test]
async fn test_login_sets_refresh_cookie() {
    let response = app(Vec::new())
        .oneshot(send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"email": "desk@hotel.example", "password": "Str0ng!Pass"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token=refresh.jwt"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=172800"));
    assert!(cookie.contains("SameSite=Lax"));

    let body = json_body(response).await;
    assert_eq!(body["accessToken"], "access.jwt");
    assert_eq!(body["username"], "front_desk");
}

#[tokio::test]
async fn test_wrong_password_is_400() {
    let response = app(Vec::new())
        .oneshot(send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"email": "a@b.com", "password": "Wrong1!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_refresh_reads_cookie() {
    let response = app(Vec::new())
        .oneshot(
            Request::builder()
                .uri("/api/v1/refresh")
                .header(header::COOKIE, "token=refresh.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["accessToken"], "fresh.jwt");
}

#[tokio::test]
async fn test_document_permission_follows_kind() {
    let app = app(vec![Permission::GuestFilesRead]);

    let response = app
        .clone()
        .oneshot(get("/api/v1/document/guest", Some(VALID_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["totalDocuments"], 1);

    let response = app
        .oneshot(get("/api/v1/document/purchase", Some(VALID_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_ignores_trailing_folder() {
    let response = app(vec![Permission::BookingFileDownload])
        .oneshot(get(
            "/api/v1/document/booking/1700000000000-abc-visa.pdf/anything",
            Some(VALID_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["signedUrl"],
        "https://bucket.example/booking/1700000000000-abc-visa.pdf?sig=1"
    );
}

#[tokio::test]
async fn test_download_by_kind_and_key() {
    let app = app(vec![Permission::PurchaseFileDownload]);

    let response = app
        .clone()
        .oneshot(get(
            "/api/v1/document/purchase/1700000000000-abc-invoice.pdf",
            Some(VALID_TOKEN),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["signedUrl"],
        "https://bucket.example/purchases/1700000000000-abc-invoice.pdf?sig=1"
    );

    let response = app
        .oneshot(get("/api/v1/document/invoice/x.pdf", Some(VALID_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Document type not found");
}

#[tokio::test]
async fn test_unknown_api_path_is_404_envelope() {
    let response = app(Vec::new())
        .oneshot(get("/api/v1/nothing-here", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_health_without_database() {
    let response = app(Vec::new()).oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}
