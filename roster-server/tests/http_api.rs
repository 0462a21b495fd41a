use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use roster_server::api::build_app;
use roster_server::auth::JwtIssuer;
use roster_server::blob::MemoryBlobStore;
use roster_server::core::SequentialCodeAllocator;
use roster_server::core::files::DEFAULT_MAX_UPLOAD_BYTES;
use roster_server::state::AppState;
use roster_server::store::MemoryStore;

fn app() -> Router {
    let state = AppState::from_parts(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryBlobStore::new()),
        Arc::new(JwtIssuer::new("http-test-secret", 1)),
        SequentialCodeAllocator::default(),
        DEFAULT_MAX_UPLOAD_BYTES,
        5,
    );
    build_app(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/auth",
        None,
        Some(json!({ "email": email, "password": "password123", "action": "create" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_resources_require_bearer_token() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/department", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = send(&app, Method::GET, "/v1/employee", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_department_employee_scenario() {
    let app = app();
    let token = register(&app, "owner@example.com").await;
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/department",
        token,
        Some(json!({ "name": "Engineering" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "departmentId": "DEP-01", "name": "Engineering" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/employee",
        token,
        Some(json!({
            "identityNumber": "E0001",
            "name": "Alice Doe",
            "gender": "female",
            "departmentId": "DEP-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["identityNumber"], "E0001");
    assert!(body["employeeImageUri"].is_null());

    let (status, body) = send(&app, Method::DELETE, "/v1/department/DEP-01", token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    let (status, _) = send(&app, Method::DELETE, "/v1/employee/E0001", token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/v1/department/DEP-01", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);

    let (status, body) = send(&app, Method::GET, "/v1/department", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_error_statuses() {
    let app = app();
    let owner = register(&app, "owner@example.com").await;
    let other = register(&app, "other@example.com").await;

    send(
        &app,
        Method::POST,
        "/v1/department",
        Some(&owner),
        Some(json!({ "name": "Engineering" })),
    )
    .await;

    // Another account's department
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/v1/department/DEP-01",
        Some(&other),
        Some(json!({ "name": "Stolen Team" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Well-formed but absent, then malformed
    let (status, _) = send(&app, Method::DELETE, "/v1/department/DEP-42", Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) =
        send(&app, Method::DELETE, "/v1/department/DEP-1", Some(&owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    // Name too short
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/department",
        Some(&owner),
        Some(json!({ "name": "HR" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown department on an employee write
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/employee",
        Some(&owner),
        Some(json!({
            "identityNumber": "E0001",
            "name": "Alice Doe",
            "gender": "female",
            "departmentId": "DEP-99"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    // Duplicate registration
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth",
        None,
        Some(json!({ "email": "owner@example.com", "password": "password123", "action": "create" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Wrong password
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth",
        None,
        Some(json!({ "email": "owner@example.com", "password": "wrongpass1", "action": "login" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_round_trip() {
    let app = app();
    let token = register(&app, "owner@example.com").await;

    let (status, body) = send(&app, Method::GET, "/v1/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "owner@example.com");
    assert!(body["name"].is_null());

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/v1/user",
        Some(&token),
        Some(json!({
            "email": "owner@example.com",
            "name": "Owner Name",
            "userImageUri": "",
            "companyName": "Acme Corp",
            "companyImageUri": "https://cdn.example.com/logo.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Owner Name");
    assert!(body["userImageUri"].is_null());
    assert_eq!(body["companyImageUri"], "https://cdn.example.com/logo.png");
}

fn multipart_request(token: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "roster-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/v1/file")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_file_upload() {
    let app = app();
    let token = register(&app, "owner@example.com").await;

    let request = multipart_request(&token, "avatar.png", "image/png", &[0x89, b'P', b'N', b'G']);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let uri = body["uri"].as_str().unwrap();
    assert!(uri.starts_with("memory://owner@example.com/"));
    assert!(uri.ends_with(".png"));

    let oversized = vec![0u8; DEFAULT_MAX_UPLOAD_BYTES + 1];
    let request = multipart_request(&token, "big.jpg", "image/jpeg", &oversized);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let request = multipart_request(&token, "doc.pdf", "application/pdf", b"%PDF");
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
